//! Core ConnectionAnalyzer implementation

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::parser::{parse_reply, Candidate, ParseFailure};
use crate::prompt::PromptBuilder;
use dokgraph_domain::traits::ModelProvider;
use dokgraph_domain::{Connection, ConnectionSet, Document, KnowledgeItem, Tier};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Result of asking the model about one subject item
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    /// The model picked a valid candidate
    Parsed(Candidate),

    /// The model declined to pick anything
    Empty,

    /// The call or its reply was unusable
    Failed(String),
}

/// Infers support and contradiction edges between adjacent tiers
///
/// Each higher-tier item gets one model call that may pick a single item
/// from the tier below. Calls within a tier run concurrently, bounded by a
/// semaphore, and every call has its own timeout. A failed call only
/// loses that item's edge.
pub struct ConnectionAnalyzer<P>
where
    P: ModelProvider,
{
    provider: Arc<P>,
    semaphore: Arc<Semaphore>,
    config: AnalyzerConfig,
}

impl<P> ConnectionAnalyzer<P>
where
    P: ModelProvider + 'static,
{
    /// Create a new ConnectionAnalyzer
    pub fn new(provider: P, config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        Self::from_arc(Arc::new(provider), config)
    }

    /// Create an analyzer over a shared provider
    pub fn from_arc(provider: Arc<P>, config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate().map_err(AnalyzerError::Config)?;

        Ok(Self {
            provider,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Infer every connection of a document
    pub async fn analyze_document(&self, document: &Document) -> ConnectionSet {
        self.analyze(
            document.items(Tier::Dok2),
            document.items(Tier::Dok3),
            document.items(Tier::Dok4),
        )
        .await
    }

    /// Infer connections across the three tiers
    ///
    /// Tier-2 to tier-3 edges are inferred first, then tier-3 to tier-4.
    /// A pair with an empty side yields no edges and no model calls.
    pub async fn analyze(
        &self,
        tier2: &[KnowledgeItem],
        tier3: &[KnowledgeItem],
        tier4: &[KnowledgeItem],
    ) -> ConnectionSet {
        let tier2_to_tier3 = self.link_tier(tier3, Tier::Dok3, tier2).await;
        let tier3_to_tier4 = self.link_tier(tier4, Tier::Dok4, tier3).await;

        info!(
            tier2_to_tier3 = tier2_to_tier3.len(),
            tier3_to_tier4 = tier3_to_tier4.len(),
            "connection analysis complete"
        );

        ConnectionSet {
            tier2_to_tier3,
            tier3_to_tier4,
        }
    }

    /// Ask about every subject, then cap fan-out on both endpoints
    async fn link_tier(
        &self,
        subjects: &[KnowledgeItem],
        subject_tier: Tier,
        candidates: &[KnowledgeItem],
    ) -> Vec<Connection> {
        if subjects.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        info!(
            subjects = subjects.len(),
            candidates = candidates.len(),
            tier = %subject_tier,
            "finding connections"
        );

        let outcomes = self.infer_all(subjects, subject_tier, candidates).await;

        let mut connections = Vec::new();
        for (subject, outcome) in subjects.iter().zip(outcomes) {
            match outcome {
                InferenceOutcome::Parsed(candidate) => {
                    debug!(subject = subject.index, candidate = candidate.id, kind = candidate.kind.as_str(), "connection found");
                    connections.push(Connection::inferred(
                        candidate.id,
                        subject.index,
                        candidate.kind,
                        self.config.confidence_score,
                    ));
                }
                InferenceOutcome::Empty => {
                    debug!(subject = subject.index, tier = %subject_tier, "no connection");
                }
                InferenceOutcome::Failed(reason) => {
                    warn!(subject = subject.index, tier = %subject_tier, "inference failed: {}", reason);
                }
            }
        }

        let max = self.config.max_connections_per_node;
        let connections = cap_fan_out(connections, max, |c| c.source_index);
        cap_fan_out(connections, max, |c| c.target_index)
    }

    /// One model call per subject, outcomes in subject order
    ///
    /// Calls run on a [`JoinSet`], so dropping the returned future aborts
    /// every call that is still queued or in flight.
    async fn infer_all(
        &self,
        subjects: &[KnowledgeItem],
        subject_tier: Tier,
        candidates: &[KnowledgeItem],
    ) -> Vec<InferenceOutcome> {
        let valid: Arc<HashSet<u32>> = Arc::new(candidates.iter().map(|c| c.index).collect());
        let request_timeout = self.config.request_timeout();

        let mut tasks = JoinSet::new();
        for (position, subject) in subjects.iter().enumerate() {
            let prompt = PromptBuilder::new(subject, subject_tier, candidates, &self.config).build();
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&self.semaphore);
            let valid = Arc::clone(&valid);

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            position,
                            InferenceOutcome::Failed("request limiter closed".to_string()),
                        )
                    }
                };

                let outcome = match timeout(request_timeout, provider.infer(&prompt)).await {
                    Err(_) => InferenceOutcome::Failed(format!(
                        "model call timed out after {:?}",
                        request_timeout
                    )),
                    Ok(Err(e)) => InferenceOutcome::Failed(format!("model call failed: {}", e)),
                    Ok(Ok(reply)) => interpret(&reply, &valid),
                };
                (position, outcome)
            });
        }

        let mut outcomes: Vec<Option<InferenceOutcome>> = vec![None; subjects.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, outcome)) => outcomes[position] = Some(outcome),
                Err(e) => warn!(error = %e, "inference task did not finish"),
            }
        }

        outcomes
            .into_iter()
            .map(|outcome| {
                outcome.unwrap_or_else(|| {
                    InferenceOutcome::Failed("inference task failed".to_string())
                })
            })
            .collect()
    }
}

fn interpret(reply: &str, valid: &HashSet<u32>) -> InferenceOutcome {
    match parse_reply(reply, valid) {
        Ok(Some(candidate)) => InferenceOutcome::Parsed(candidate),
        Ok(None) => InferenceOutcome::Empty,
        Err(failure) => InferenceOutcome::Failed(describe(failure, reply)),
    }
}

fn describe(failure: ParseFailure, reply: &str) -> String {
    let excerpt: String = reply.chars().take(100).collect();
    format!("{} (reply: {:?})", failure, excerpt)
}

/// Keep at most `max_per_node` connections per value of `key`
///
/// Earlier connections win; order is preserved.
pub fn cap_fan_out<F>(connections: Vec<Connection>, max_per_node: usize, key: F) -> Vec<Connection>
where
    F: Fn(&Connection) -> u32,
{
    let mut counts: HashMap<u32, usize> = HashMap::new();
    connections
        .into_iter()
        .filter(|connection| {
            let count = counts.entry(key(connection)).or_insert(0);
            if *count < max_per_node {
                *count += 1;
                true
            } else {
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dokgraph_domain::ConnectionKind;

    fn edge(source: u32, target: u32) -> Connection {
        Connection::inferred(source, target, ConnectionKind::Supports, 95)
    }

    #[test]
    fn test_cap_fan_out_keeps_earliest() {
        let edges = vec![edge(1, 1), edge(1, 2), edge(1, 3), edge(2, 4), edge(1, 5)];
        let capped = cap_fan_out(edges, 2, |c| c.source_index);

        let targets: Vec<u32> = capped.iter().map(|c| c.target_index).collect();
        assert_eq!(targets, vec![1, 2, 4]);
    }

    #[test]
    fn test_cap_fan_out_by_target() {
        let edges = vec![edge(1, 9), edge(2, 9), edge(3, 9), edge(4, 8)];
        let capped = cap_fan_out(edges, 2, |c| c.target_index);

        let sources: Vec<u32> = capped.iter().map(|c| c.source_index).collect();
        assert_eq!(sources, vec![1, 2, 4]);
    }

    #[test]
    fn test_interpret_outcomes() {
        let valid: HashSet<u32> = [1, 2].into_iter().collect();

        assert!(matches!(
            interpret(r#"{"connections": [{"id": 2, "type": "contradicts"}]}"#, &valid),
            InferenceOutcome::Parsed(Candidate { id: 2, kind: ConnectionKind::Contradicts })
        ));
        assert_eq!(interpret(r#"{"connections": []}"#, &valid), InferenceOutcome::Empty);
        assert!(matches!(
            interpret(r#"{"connections": [{"id": 99}]}"#, &valid),
            InferenceOutcome::Failed(_)
        ));
    }
}
