//! Integration tests for refresh-session storage.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use speakcoach_db::models::auth_session::CreateAuthSession;
use speakcoach_db::models::user::CreateUser;
use speakcoach_db::repositories::{AuthSessionRepo, UserRepo};

async fn seed(pool: &PgPool, hash: &str, ttl: Duration) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Test Speaker".into(),
            email: "speaker@example.com".into(),
            password_hash: "$argon2id$fake-hash".into(),
        },
    )
    .await
    .unwrap();

    AuthSessionRepo::create(
        pool,
        &CreateAuthSession {
            user_id: user.id,
            refresh_token_hash: hash.into(),
            expires_at: Utc::now() + ttl,
        },
    )
    .await
    .unwrap();

    user.id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_session_is_found_by_hash(pool: PgPool) {
    let user_id = seed(&pool, "hash-a", Duration::days(30)).await;

    let found = AuthSessionRepo::find_by_token_hash(&pool, "hash-a")
        .await
        .unwrap()
        .expect("active session should be found");
    assert_eq!(found.user_id, user_id);

    assert!(AuthSessionRepo::find_by_token_hash(&pool, "hash-b")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_session_is_not_found(pool: PgPool) {
    seed(&pool, "hash-a", Duration::seconds(-1)).await;

    assert!(AuthSessionRepo::find_by_token_hash(&pool, "hash-a")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revoked_session_is_not_found(pool: PgPool) {
    seed(&pool, "hash-a", Duration::days(30)).await;

    let session = AuthSessionRepo::find_by_token_hash(&pool, "hash-a")
        .await
        .unwrap()
        .unwrap();
    AuthSessionRepo::revoke(&pool, session.id).await.unwrap();

    assert!(AuthSessionRepo::find_by_token_hash(&pool, "hash-a")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_all_user_sessions(pool: PgPool) {
    let user_id = seed(&pool, "hash-a", Duration::days(30)).await;
    AuthSessionRepo::create(
        &pool,
        &CreateAuthSession {
            user_id,
            refresh_token_hash: "hash-b".into(),
            expires_at: Utc::now() + Duration::days(30),
        },
    )
    .await
    .unwrap();

    AuthSessionRepo::revoke_all_for_user(&pool, user_id)
        .await
        .unwrap();

    for hash in ["hash-a", "hash-b"] {
        assert!(AuthSessionRepo::find_by_token_hash(&pool, hash)
            .await
            .unwrap()
            .is_none());
    }
}
