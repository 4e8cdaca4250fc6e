//! Utility modules
//!
//! Contains timeout handling and string helpers.

pub mod string;
pub mod timeout;

pub use string::{mask_secret, truncate_str, truncate_with_suffix};
pub use timeout::{with_timeout, TimeoutError};
