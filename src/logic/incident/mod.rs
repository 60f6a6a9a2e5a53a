//! Incident Module
//!
//! Persistence of finalized outcomes.
//!
//! ## Structure
//! - `types`: The on-disk record schema
//! - `store`: Append-only JSON store, corruption-tolerant

#![allow(dead_code)]

pub mod store;
pub mod types;

pub use store::IncidentRecorder;
pub use types::IncidentRecord;
