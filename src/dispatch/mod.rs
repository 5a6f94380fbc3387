//! # Batch Dispatch
//!
//! The batching and admission-control loop: slicing the item collection,
//! opening a deadline scope per submission, and reacting to the service's
//! answer.

pub mod batches;
pub mod deadline;
pub mod dispatcher;

pub use batches::{batch_bounds, batch_count, Batches};
pub use deadline::DeadlineScope;
pub use dispatcher::{BatchOutcome, DispatchSummary, Dispatcher};
