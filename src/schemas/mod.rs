//! Schema module
//!
//! Wire types for the gateway's own API and for the upstream providers.

pub mod api;
pub mod gemini;
pub mod openai;
