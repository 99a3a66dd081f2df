//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`categories`] - List the searchable categories
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`geocode`] - One-shot place lookup
//! - [`interactive`] - Search-as-you-type session on stdin
//! - [`lang`] - Show or store the interface language
//! - [`search`] - Find facilities around a point

pub mod categories;
pub mod common;
pub mod config;
pub mod geocode;
pub mod interactive;
pub mod lang;
pub mod search;
