use accounts_core::AppError;
use accounts_db::{Database, UserRepository};

use crate::integration::common::setup_test_db;

const HASH: &str = "$2b$04$abcdefghijklmnopqrstuuMKWlYJQ3x5Km3nE0sHyuBUcXR2Yxuxy";

#[tokio::test]
async fn create_and_select_user() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let created = repo
        .create("diego", "diego@mail.com", HASH)
        .await
        .unwrap();
    assert_eq!(created.username, "diego");

    let by_id = repo.select_by_id(created.id).await.unwrap();
    assert_eq!(by_id, created);

    let by_email = repo.select_by_email("diego@mail.com").await.unwrap();
    assert_eq!(by_email, created);

    assert_eq!(repo.select_hash_by_id(created.id).await.unwrap(), HASH);
    assert!(repo.exists(created.id).await.unwrap());
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    repo.create("diego", "diego@mail.com", HASH).await.unwrap();
    let err = repo
        .create("other", "diego@mail.com", HASH)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Email address already exist"));
    assert_eq!(repo.select_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn select_all_orders_by_insertion() {
    let (pool, _container) = setup_test_db().await;
    let repo = Database::from_pool(pool).user_repo();

    for (name, email) in [
        ("diego", "diego@mail.com"),
        ("alex", "alex@mail.com"),
        ("R2D2", "r2d2@mail.com"),
    ] {
        repo.create(name, email, HASH).await.unwrap();
    }

    let names: Vec<String> = repo
        .select_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec!["diego", "alex", "R2D2"]);
}

#[tokio::test]
async fn remove_then_remove_again() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let user = repo.create("diego", "diego@mail.com", HASH).await.unwrap();

    repo.remove(user.id).await.unwrap();
    assert!(!repo.exists(user.id).await.unwrap());

    let err = repo.remove(user.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_username_binds_in_order() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let user = repo.create("diego", "diego@mail.com", HASH).await.unwrap();
    repo.update_username(user.id, "dieguito").await.unwrap();

    let user = repo.select_by_id(user.id).await.unwrap();
    assert_eq!(user.username, "dieguito");
    assert_eq!(user.email, "diego@mail.com");
}

#[tokio::test]
async fn missing_rows_are_not_found() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    assert!(matches!(
        repo.select_by_id(42).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        repo.select_by_email("nobody@mail.com").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        repo.select_hash_by_id(42).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        repo.update_username(42, "x").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(!repo.exists(42).await.unwrap());
}

#[tokio::test]
async fn concurrent_creates_with_same_email_have_one_winner() {
    let (pool, _container) = setup_test_db().await;
    let repo = UserRepository::new(pool);

    let (first, second) = tokio::join!(
        repo.create("diego", "diego@mail.com", HASH),
        repo.create("alex", "diego@mail.com", HASH),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(
        |r| matches!(r, Err(AppError::Conflict(msg)) if msg == "Email address already exist")
    ));
    assert_eq!(repo.select_all().await.unwrap().len(), 1);
}
