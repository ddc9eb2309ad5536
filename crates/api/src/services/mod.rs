//! Application services.

pub mod admin_bootstrap;
pub mod pipeline;
pub mod spam_guard;
pub mod whatsapp;
