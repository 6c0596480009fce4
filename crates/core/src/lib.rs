//! Storefront Settings Core - Shared types library.
//!
//! This crate provides the types shared by every storefront settings component:
//! - `storefront` - The settings synchronizer and its storage backends
//! - `cli` - Command-line tools for inspecting and editing settings
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! network access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Settings sub-objects, partial updates, prices, admin credential
//! - [`paths`] - Document paths in the remote store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod paths;
pub mod types;

pub use types::*;
