//! Core domain + moderation logic for the Orbis chat moderation bot.
//!
//! This crate is intentionally framework-agnostic. Discord lives behind the
//! messaging port (trait) implemented in the adapter crate.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod handler;
pub mod logging;
pub mod messaging;
pub mod moderation;
pub mod replies;

pub use errors::{Error, Result};
