//! Integration tests for one-time verification codes: single-use
//! consumption, expiry, and re-issue rate limiting.

use quill_db::repositories::CodeRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn code_is_consumed_exactly_once(pool: PgPool) {
    CodeRepo::issue(&pool, "ada@example.com", "123456", 86_400)
        .await
        .unwrap();

    assert!(CodeRepo::consume(&pool, "ada@example.com", "123456")
        .await
        .unwrap());
    // Second use within the TTL fails: the row is gone.
    assert!(!CodeRepo::consume(&pool, "ada@example.com", "123456")
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_code_or_email_does_not_consume(pool: PgPool) {
    CodeRepo::issue(&pool, "ada@example.com", "123456", 86_400)
        .await
        .unwrap();

    assert!(!CodeRepo::consume(&pool, "ada@example.com", "654321")
        .await
        .unwrap());
    assert!(!CodeRepo::consume(&pool, "bob@example.com", "123456")
        .await
        .unwrap());
    // The original pairing still works.
    assert!(CodeRepo::consume(&pool, "ada@example.com", "123456")
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_code_is_rejected(pool: PgPool) {
    CodeRepo::issue(&pool, "ada@example.com", "123456", -1)
        .await
        .unwrap();

    assert!(!CodeRepo::consume(&pool, "ada@example.com", "123456")
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recent_issuance_is_visible_for_rate_limiting(pool: PgPool) {
    assert!(!CodeRepo::issued_recently(&pool, "ada@example.com", 120)
        .await
        .unwrap());

    CodeRepo::issue(&pool, "ada@example.com", "123456", 86_400)
        .await
        .unwrap();

    assert!(CodeRepo::issued_recently(&pool, "ada@example.com", 120)
        .await
        .unwrap());
    assert!(!CodeRepo::issued_recently(&pool, "bob@example.com", 120)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn purge_removes_only_expired_codes(pool: PgPool) {
    CodeRepo::issue(&pool, "old@example.com", "111111", -10).await.unwrap();
    CodeRepo::issue(&pool, "new@example.com", "222222", 86_400)
        .await
        .unwrap();

    let purged = CodeRepo::purge_expired(&pool).await.unwrap();
    assert_eq!(purged, 1);
    assert!(CodeRepo::consume(&pool, "new@example.com", "222222")
        .await
        .unwrap());
}
