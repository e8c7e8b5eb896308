//! Core chat document types.

pub mod document;

pub use document::{ChatRecord, ChatStoreDocument, Message, TIMESTAMP_FORMAT};
