//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cache`] - Cache management (clear, stats, gc)
//! - [`fetch`] - Fetch one tile, composited or single-provider
//! - [`layers`] - Show the configured layer stack
//! - [`providers`] - List bundled providers

pub mod cache;
pub mod common;
pub mod fetch;
pub mod layers;
pub mod providers;
