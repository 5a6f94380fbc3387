//! # Dispatch Events
//!
//! Side channel for observability. The dispatcher and services write to it;
//! nothing in the core ever reads from it.

pub mod publisher;

pub use publisher::{DispatchEvent, EventPublisher, PublishedEvent};
