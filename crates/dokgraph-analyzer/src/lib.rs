//! Dokgraph Analyzer
//!
//! Infers which lower-tier items each higher-tier item rests on, using a
//! text-completion model.
//!
//! # Architecture
//!
//! ```text
//! Document → ConnectionAnalyzer → prompts → ModelProvider → parser → fan-out cap → ConnectionSet
//! ```
//!
//! Every tier-3 item is asked about the tier-2 items, and every tier-4 item
//! about the tier-3 items. Each call may name at most one candidate. Calls
//! run concurrently under a shared request limit; a failed or malformed
//! reply only loses that one edge. Afterwards no item keeps more than
//! `max_connections_per_node` edges on either side.
//!
//! # Example Usage
//!
//! ```no_run
//! use dokgraph_analyzer::{AnalyzerConfig, ConnectionAnalyzer};
//! use dokgraph_domain::Document;
//! use dokgraph_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"connections": [{"id": 1, "type": "supports"}]}"#);
//! let analyzer = ConnectionAnalyzer::new(provider, AnalyzerConfig::default())?;
//!
//! let connections = analyzer.analyze_document(&Document::default()).await;
//! println!("{} connections", connections.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod parser;
mod prompt;

#[cfg(test)]
mod tests;

pub use analyzer::{cap_fan_out, ConnectionAnalyzer, InferenceOutcome};
pub use config::{AnalyzerConfig, SubItemDetail};
pub use error::AnalyzerError;
pub use parser::{parse_reply, sanitize, Candidate, ParseFailure};
pub use prompt::{item_content, numbered_list, PromptBuilder};
