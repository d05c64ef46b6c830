//! Orderdesk Core - Shared domain types.
//!
//! This crate provides common types used across all Orderdesk components:
//! - `api` - The order API service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, product ids, and order ids

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
