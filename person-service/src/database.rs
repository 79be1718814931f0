//! PostgreSQL connection pool with startup retries

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::repository::{RepositoryError, RepositoryResult};

/// Connect, retrying with exponential backoff
///
/// Makes at most `max_retries + 1` attempts. The delay before retry `n` is
/// `retry_delay_secs * 2^(n-1)`.
pub async fn create_pool(config: &DatabaseConfig) -> RepositoryResult<PgPool> {
    let base_delay = Duration::from_secs(config.retry_delay_secs);
    let mut attempt = 0;

    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                tracing::info!(
                    attempts = attempt + 1,
                    max = config.max_connections,
                    min = config.min_connections,
                    "Database connection pool created"
                );
                return Ok(pool);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries {
                    tracing::error!(
                        "Failed to connect to database after {} attempts: {}",
                        attempt,
                        e
                    );
                    return Err(e);
                }

                let delay = backoff_delay(base_delay, attempt);
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn try_create_pool(config: &DatabaseConfig) -> RepositoryResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| {
            RepositoryError::connection_failed(format!(
                "Failed to connect to database at '{}': {}",
                sanitize_connection_url(&config.url),
                e
            ))
        })
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Mask the password in a connection URL for logging
fn sanitize_connection_url(url: &str) -> String {
    let (Some(scheme_end), Some(at_pos)) = (url.find("://"), url.rfind('@')) else {
        return url.to_string();
    };
    let userinfo_start = scheme_end + 3;
    if at_pos < userinfo_start {
        return url.to_string();
    }

    match url[userinfo_start..at_pos].find(':') {
        Some(colon) => format!(
            "{}***{}",
            &url[..userinfo_start + colon + 1],
            &url[at_pos..]
        ),
        None => url.to_string(),
    }
}
