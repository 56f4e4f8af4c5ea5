//! Serializable views of SWF requests and tasks.
//!
//! These types are the record schema. Field names follow the SWF JSON API
//! (camelCase), absent values are omitted, and nothing but the listed fields
//! can ever reach the stream: SDK bookkeeping (metric collectors, credential
//! overrides, progress listeners, custom headers, read limits) has no field
//! here, and unknown input fields are dropped on deserialization.

pub mod history;
pub mod queue;
pub mod request;
pub mod task;

pub use history::*;
pub use queue::*;
pub use request::*;
pub use task::*;
