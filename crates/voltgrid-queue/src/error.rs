//! Queue error types.

use thiserror::Error;

/// Errors that can occur during queue admission.
#[derive(Debug, Error, PartialEq)]
pub enum QueueError {
    #[error("VRAM requirement {need_gb}GB exceeds device capacity {capacity_gb}GB")]
    CapacityExceeded { need_gb: f64, capacity_gb: f64 },
}
