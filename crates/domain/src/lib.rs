//! Domain layer for the Wabot backend.
//!
//! This crate contains:
//! - Domain models (Tenant, Intent, FlowGraph, BotConfig)
//! - The message routing decision engine and its collaborators
//! - Domain error types

pub mod models;
pub mod services;
