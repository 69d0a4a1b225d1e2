use sqlx::PgPool;

/// Connect, migrate, and verify the schema is in place.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    sponnect_db::health_check(&pool).await.unwrap();

    for table in ["users", "campaigns", "ad_requests", "negotiation_history"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Closed enumerations are enforced by CHECK constraints.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_role_check_constraint(pool: PgPool) {
    let err = sqlx::query(
        "INSERT INTO users (username, email, password_hash, role) VALUES ('x', 'x@x.io', 'h', 'superuser')",
    )
    .execute(&pool)
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("ck_users_role"));
}
