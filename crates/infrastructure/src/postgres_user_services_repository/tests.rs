use chrono::{TimeZone, Utc};
use roster_application::UserServicesRepository;
use roster_domain::{Service, UserServices};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{PostgresUserServicesRepository, run_migrations};

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = run_migrations(&pool).await {
        panic!("failed to run migrations for postgres user services tests: {error}");
    }

    Some(pool)
}

fn roster(user_id: &str, client_ids: &[&str]) -> UserServices {
    UserServices {
        user_id: user_id.to_owned(),
        services: client_ids
            .iter()
            .map(|client_id| Service {
                client_id: (*client_id).to_owned(),
                count_successful_logins: 1,
                last_accessed: Utc
                    .with_ymd_and_hms(2026, 5, 1, 8, 0, 0)
                    .single()
                    .unwrap_or_else(|| unreachable!()),
            })
            .collect(),
    }
}

#[tokio::test]
async fn write_replaces_entire_service_list() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresUserServicesRepository::new(pool);
    let user_id = format!("pg-test-{}", uuid::Uuid::new_v4());

    let first = repository
        .write_user_services(&roster(user_id.as_str(), &["a", "b"]))
        .await;
    assert!(matches!(first, Ok(ref ack) if ack.created));

    let second = repository
        .write_user_services(&roster(user_id.as_str(), &["c"]))
        .await;
    assert!(matches!(second, Ok(ref ack) if !ack.created));

    let stored = repository.find_user_services(user_id.as_str()).await;
    assert!(
        matches!(stored, Ok(Some(ref user_services)) if user_services == &roster(user_id.as_str(), &["c"]))
    );
}

#[tokio::test]
async fn find_returns_none_for_unknown_user() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresUserServicesRepository::new(pool);
    let stored = repository.find_user_services("pg-test-missing-user").await;
    assert!(matches!(stored, Ok(None)));
}
