//! PostgreSQL-backed user services repository using the `user_services` table.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::types::Json;

use roster_application::{UserServicesRepository, WriteAcknowledgement};
use roster_core::{AppError, AppResult};
use roster_domain::{Service, UserServices};

#[cfg(test)]
mod tests;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))
}

/// PostgreSQL implementation of the user services repository port.
#[derive(Clone)]
pub struct PostgresUserServicesRepository {
    pool: PgPool,
}

impl PostgresUserServicesRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserServicesRepository for PostgresUserServicesRepository {
    async fn write_user_services(
        &self,
        user_services: &UserServices,
    ) -> AppResult<WriteAcknowledgement> {
        // xmax is zero only for freshly inserted tuples.
        let created = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO user_services (user_id, services, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE
            SET
                services = EXCLUDED.services,
                updated_at = now()
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(user_services.user_id.as_str())
        .bind(Json(&user_services.services))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Store(format!(
                "failed to write user services for '{}': {error}",
                user_services.user_id
            ))
        })?;

        Ok(WriteAcknowledgement {
            user_id: user_services.user_id.clone(),
            created,
        })
    }

    async fn find_user_services(&self, user_id: &str) -> AppResult<Option<UserServices>> {
        let services = sqlx::query_scalar::<_, Json<Vec<Service>>>(
            r#"
            SELECT services
            FROM user_services
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Store(format!(
                "failed to read user services for '{user_id}': {error}"
            ))
        })?;

        Ok(services.map(|Json(services)| UserServices {
            user_id: user_id.to_owned(),
            services,
        }))
    }
}
