//! CLI command implementations.

pub mod backup;
pub mod delete;
pub mod init;
pub mod list;
pub mod new;
pub mod send;
pub mod show;
