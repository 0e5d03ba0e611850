/// A stored user account, as exposed outside the storage layer.
///
/// Carries no password hash; that is only reachable through
/// [`UserStore::select_hash_by_id`](crate::traits::UserStore::select_hash_by_id).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// Sign-up payload before hashing.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Partial update of a user. Only fields that are `Some` are written.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
}

impl UserUpdate {
    /// True when the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
    }
}

/// A user row together with its password hash.
///
/// Used to seed in-memory stores; never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithHash {
    pub user: User,
    pub hash: String,
}
