//! # Folio AI
//!
//! Article analysis backed by an LLM chat-completion API.
//!
//! ## Features
//!
//! - **Fixed Catalog**: every result is classified into one of nine category slugs
//! - **Bounded Output**: model replies are sanitized into an `AnalyzeResult` whose
//!   fields always satisfy their ranges, whatever the model returned
//! - **Bounded Retry**: malformed replies get one more attempt; transport failures get none
//! - **HTTP Service**: axum router exposing `/api/analyze` and `/health`

pub mod analysis;
pub mod category;
pub mod client;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;
pub mod server;

pub use analysis::{AnalyzeRequest, AnalyzeResult, Language};
pub use category::Catalog;
pub use client::{ChatCompletionClient, CompletionClient};
pub use config::Config;
pub use pipeline::{AnalyzeError, Analyzer};
