//! Admin bootstrap service for initial setup.
//!
//! Seeds the first admin API key on startup so a fresh deployment can
//! reach the admin endpoints. Idempotent: skipped once any active key
//! exists.

use persistence::repositories::AdminApiKeyRepository;
use shared::crypto::{extract_key_prefix, sha256_hex};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::SecurityConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Seed the bootstrap admin key if configured and not already done.
///
/// Should be called after migrations on startup. If any non-revoked key
/// already exists, or no bootstrap key is configured, does nothing.
pub async fn bootstrap_admin_key(
    pool: &PgPool,
    config: &SecurityConfig,
) -> Result<(), BootstrapError> {
    if config.bootstrap_admin_key.is_empty() {
        return Ok(());
    }

    let repo = AdminApiKeyRepository::new(pool.clone());

    if repo.count_active().await? > 0 {
        info!("Active admin keys already exist, skipping bootstrap");
        return Ok(());
    }

    let key = config.bootstrap_admin_key.as_str();
    let key_hash = sha256_hex(key);
    let key_prefix = extract_key_prefix(key).unwrap_or_else(|| key.get(..8).unwrap_or(key));

    let entity = repo
        .create(&key_hash, key_prefix, "Bootstrap admin key", true, None)
        .await?;

    info!(
        key_id = %entity.id,
        key_prefix = %key_prefix,
        "Bootstrap admin key created"
    );

    warn!(
        "SECURITY: Remove WB__SECURITY__BOOTSTRAP_ADMIN_KEY from configuration \
         and rotate the key once real admin keys exist"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use shared::crypto::{extract_key_prefix, generate_api_key, sha256_hex};

    #[test]
    fn test_generated_key_is_prefixable() {
        let key = generate_api_key();
        let prefix = extract_key_prefix(&key).unwrap();
        assert_eq!(prefix.len(), 8);
    }

    #[test]
    fn test_bootstrap_key_hash_is_stable() {
        let key = "wb_0123456789abcdef";
        assert_eq!(sha256_hex(key), sha256_hex(key));
    }
}
