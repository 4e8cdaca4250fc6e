//! Services module
//!
//! Provider fallback, prompt rendering and the small collaborators the HTTP
//! handlers lean on.

pub mod fallback;
pub mod feeds;
pub mod prompts;
pub mod stats;
pub mod tables;

pub use fallback::{CandidateCatalog, FallbackResolver, Outcome, Resolution, TextProfile};
pub use feeds::{FeedAggregator, FeedError};
pub use prompts::{image_prompt, AiAction, NewsAction, Stage, UnknownTag};
pub use stats::{Stats, StatsError, StatsStore};
pub use tables::{build_table, TableError};
