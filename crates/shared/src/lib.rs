//! Shared utilities and common types for the Wabot backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (hashing, key generation, webhook signatures)
//! - Common validation logic (time-of-day strings, phone numbers)
//! - Cursor-based pagination helpers

pub mod crypto;
pub mod pagination;
pub mod validation;
