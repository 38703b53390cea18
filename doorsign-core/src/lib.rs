//! Core types for the doorsign room display.
//!
//! This crate provides everything the server needs to answer "what is on in
//! this room right now": the event model, the on-disk store, the mtime-gated
//! cache, and the current/next selection logic.

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod select;
pub mod store;

pub use cache::EventCache;
pub use config::DoorsignConfig;
pub use error::{SignError, SignResult};
pub use event::{Event, Organizer};
pub use select::{Selection, select};
