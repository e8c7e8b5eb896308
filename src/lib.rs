//! palantir-chat - flat-JSON chat room store.
//!
//! Keeps a list of chat rooms in a single JSON file that is read and
//! rewritten in full on every change, with JSON and text backups on the side.

pub mod backup;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
