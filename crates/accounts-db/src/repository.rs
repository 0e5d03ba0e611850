use accounts_core::error::AppError;
use accounts_core::models::User;
use sqlx::{PgPool, Pool, Postgres, Transaction};

/// PostgreSQL-backed [`UserStore`](accounts_core::UserStore).
///
/// Every write runs in its own transaction. `remove` and `update_username`
/// inspect the affected row count and roll back unless exactly one row changed.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

fn db_err(e: sqlx::Error) -> AppError {
    AppError::DatabaseError(e.to_string())
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("User ID {id} doesn't exist"))
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user. A taken email surfaces as [`AppError::Conflict`].
    pub async fn create(&self, username: &str, email: &str, hash: &str) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: (i32,) = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::Conflict("Email address already exist".into())
            }
            _ => db_err(e),
        })?;

        tx.commit().await.map_err(db_err)?;

        Ok(User {
            id: row.0,
            username: username.to_string(),
            email: email.to_string(),
        })
    }

    /// Fetch one user by id.
    pub async fn select_by_id(&self, id: i32) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Into::into).ok_or_else(|| not_found(id))
    }

    /// Fetch one user by exact email match.
    pub async fn select_by_email(&self, email: &str) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("No user with email {email}")))
    }

    /// Password hash only; the row type never leaves this module.
    pub async fn select_hash_by_id(&self, id: i32) -> Result<String, AppError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(|(hash,)| hash).ok_or_else(|| not_found(id))
    }

    /// All users, oldest id first.
    pub async fn select_all(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn remove(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        finish_single_row(tx, affected, id, "removed").await
    }

    pub async fn update_username(&self, id: i32, username: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let affected = sqlx::query("UPDATE users SET username = $1 WHERE id = $2")
            .bind(username)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        finish_single_row(tx, affected, id, "updated").await
    }

    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.0)
    }
}

/// Commit when exactly one row was touched, otherwise roll back and classify.
async fn finish_single_row(
    tx: Transaction<'_, Postgres>,
    affected: u64,
    id: i32,
    action: &str,
) -> Result<(), AppError> {
    match affected {
        1 => tx.commit().await.map_err(db_err),
        0 => {
            tx.rollback().await.map_err(db_err)?;
            Err(not_found(id))
        }
        n => {
            tx.rollback().await.map_err(db_err)?;
            tracing::error!(id, rows = n, "Multiple rows matched a single user id");
            Err(AppError::Conflict(format!(
                "There was {n} users with id {id}. User not {action}."
            )))
        }
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
        }
    }
}

// -- Trait implementation --

impl accounts_core::traits::UserStore for UserRepository {
    async fn create(&self, username: &str, email: &str, hash: &str) -> Result<User, AppError> {
        UserRepository::create(self, username, email, hash).await
    }

    async fn select_by_id(&self, id: i32) -> Result<User, AppError> {
        UserRepository::select_by_id(self, id).await
    }

    async fn select_by_email(&self, email: &str) -> Result<User, AppError> {
        UserRepository::select_by_email(self, email).await
    }

    async fn select_hash_by_id(&self, id: i32) -> Result<String, AppError> {
        UserRepository::select_hash_by_id(self, id).await
    }

    async fn select_all(&self) -> Result<Vec<User>, AppError> {
        UserRepository::select_all(self).await
    }

    async fn remove(&self, id: i32) -> Result<(), AppError> {
        UserRepository::remove(self, id).await
    }

    async fn update_username(&self, id: i32, username: &str) -> Result<(), AppError> {
        UserRepository::update_username(self, id, username).await
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        UserRepository::exists(self, id).await
    }
}
