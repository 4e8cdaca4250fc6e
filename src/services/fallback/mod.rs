//! Provider fallback resolution
//!
//! Candidates are plain data built by the [`CandidateCatalog`]; one generic
//! loop in [`FallbackResolver`] consumes them, delegating request shaping and
//! response extraction to a per-dialect [`ProviderAdapter`].

pub mod adapter;
pub mod candidate;
pub mod catalog;
pub mod outcome;
pub mod resolver;

pub use adapter::{adapter_for, AttemptLimits, Extracted, ProviderAdapter};
pub use candidate::{Candidate, ExtractionRule, LabelStyle, ProviderKind, Wire};
pub use catalog::{CandidateCatalog, TextProfile, IMAGE_FALLBACK_LABEL};
pub use outcome::{AttemptError, AttemptFailure, Outcome, Payload, Resolution};
pub use resolver::FallbackResolver;
