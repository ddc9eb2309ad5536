//! Tenant domain models.
//!
//! A tenant is the isolation boundary of the system: it owns its intents,
//! flows, settings and the WhatsApp phone-number channel binding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A customer account bound to one WhatsApp phone-number channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    /// Meta phone_number_id this tenant receives messages on.
    /// Exactly one tenant matches a given channel identifier.
    pub phone_number_id: String,
    pub is_active: bool,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Returns true if the tenant may receive bot replies right now.
    ///
    /// Inactive tenants and tenants with a lapsed subscription are skipped
    /// by the webhook pipeline without sending anything.
    pub fn is_operational(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        match self.subscription_expires_at {
            Some(expires_at) => expires_at >= now,
            None => true,
        }
    }
}

/// Request body for creating a tenant (super-admin only).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "phone_number_id is required"))]
    pub phone_number_id: String,

    pub subscription_expires_at: Option<DateTime<Utc>>,
}

/// Request body for updating a tenant (super-admin only).
///
/// All fields are optional; omitted fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTenantRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    pub is_active: Option<bool>,

    /// Wrapped in a double Option so `null` clears the expiry while an
    /// absent field leaves it untouched.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub subscription_expires_at: Option<Option<DateTime<Utc>>>,
}

/// Deserializes a present-but-possibly-null field into `Some(inner)`.
fn deserialize_explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// API representation of a tenant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TenantResponse {
    pub id: Uuid,
    pub name: String,
    pub phone_number_id: String,
    pub is_active: bool,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Tenant> for TenantResponse {
    fn from(t: Tenant) -> Self {
        Self {
            id: t.id,
            name: t.name,
            phone_number_id: t.phone_number_id,
            is_active: t.is_active,
            subscription_expires_at: t.subscription_expires_at,
            created_at: t.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tenant(is_active: bool, expires: Option<DateTime<Utc>>) -> Tenant {
        let now = Utc::now();
        Tenant {
            id: Uuid::new_v4(),
            name: "Acme".into(),
            phone_number_id: "1098765".into(),
            is_active,
            subscription_expires_at: expires,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_active_without_expiry_is_operational() {
        assert!(tenant(true, None).is_operational(Utc::now()));
    }

    #[test]
    fn test_inactive_is_not_operational() {
        assert!(!tenant(false, None).is_operational(Utc::now()));
    }

    #[test]
    fn test_expired_subscription_is_not_operational() {
        let now = Utc::now();
        let t = tenant(true, Some(now - Duration::days(1)));
        assert!(!t.is_operational(now));
    }

    #[test]
    fn test_future_subscription_is_operational() {
        let now = Utc::now();
        let t = tenant(true, Some(now + Duration::days(30)));
        assert!(t.is_operational(now));
    }
}
