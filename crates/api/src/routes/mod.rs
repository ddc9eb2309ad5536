//! HTTP route handlers.

pub mod flows;
pub mod health;
pub mod intents;
pub mod settings;
pub mod tenants;
pub mod webhook;
