//! Integration tests for the ConnectionAnalyzer

use crate::{AnalyzerConfig, ConnectionAnalyzer};
use dokgraph_domain::{ConnectionKind, KnowledgeItem};
use dokgraph_llm::MockProvider;
use std::time::Duration;

fn item(index: u32, content: &str) -> KnowledgeItem {
    KnowledgeItem {
        index,
        content: content.to_string(),
        children: Vec::new(),
    }
}

/// Items whose content is `"{prefix} #{index}."`, unique per prompt
fn items(prefix: &str, count: u32) -> Vec<KnowledgeItem> {
    (1..=count).map(|i| item(i, &format!("{} #{}.", prefix, i))).collect()
}

fn reply(id: u32, kind: &str) -> String {
    format!(r#"{{"connections": [{{"id": {}, "type": "{}"}}]}}"#, id, kind)
}

#[tokio::test]
async fn test_full_analysis_flow() {
    let mut provider = MockProvider::new(r#"{"connections": []}"#);
    provider.add_response("DOK3 INSIGHT:\nInsight #1.", reply(2, "supports"));
    provider.add_response("DOK3 INSIGHT:\nInsight #2.", reply(1, "contradicts"));
    provider.add_response("DOK4 SPIKY POV:\nStance #1.", reply(2, "supports"));

    let analyzer = ConnectionAnalyzer::new(provider.clone(), AnalyzerConfig::default()).unwrap();
    let result = analyzer
        .analyze(&items("Fact", 3), &items("Insight", 2), &items("Stance", 1))
        .await;

    assert_eq!(provider.call_count(), 3);
    assert_eq!(result.tier2_to_tier3.len(), 2);

    let first = &result.tier2_to_tier3[0];
    assert_eq!((first.source_index, first.target_index), (2, 1));
    assert_eq!(first.kind, ConnectionKind::Supports);
    assert_eq!(first.confidence_score, 95);
    assert_eq!(first.reasoning, "Direct support identified");

    let second = &result.tier2_to_tier3[1];
    assert_eq!((second.source_index, second.target_index), (1, 2));
    assert_eq!(second.kind, ConnectionKind::Contradicts);
    assert_eq!(second.reasoning, "Direct contradiction identified");

    assert_eq!(result.tier3_to_tier4.len(), 1);
    assert_eq!(result.tier3_to_tier4[0].source_index, 2);
    assert_eq!(result.tier3_to_tier4[0].target_index, 1);
}

#[tokio::test]
async fn test_fan_out_is_capped() {
    // Every insight points at the same fact
    let provider = MockProvider::new(reply(1, "supports"));
    let analyzer = ConnectionAnalyzer::new(provider, AnalyzerConfig::default()).unwrap();

    let result = analyzer.analyze(&items("Fact", 3), &items("Insight", 10), &[]).await;

    assert_eq!(result.tier2_to_tier3.len(), 2);
    assert!(result.tier2_to_tier3.iter().all(|c| c.source_index == 1));
    let targets: Vec<u32> = result.tier2_to_tier3.iter().map(|c| c.target_index).collect();
    assert_eq!(targets, vec![1, 2]);
    assert!(result.tier3_to_tier4.is_empty());
}

#[tokio::test]
async fn test_reasoning_reply_yields_contradiction() {
    let provider = MockProvider::new(
        "<think>item 2 disagrees</think>{\"connections\":[{\"id\":2,\"type\":\"contradicts\"}]}",
    );
    let analyzer = ConnectionAnalyzer::new(provider, AnalyzerConfig::default()).unwrap();

    let result = analyzer.analyze(&items("Fact", 3), &items("Insight", 1), &[]).await;

    assert_eq!(result.tier2_to_tier3.len(), 1);
    assert_eq!(result.tier2_to_tier3[0].source_index, 2);
    assert_eq!(result.tier2_to_tier3[0].kind, ConnectionKind::Contradicts);
}

#[tokio::test]
async fn test_unknown_candidate_is_dropped() {
    let provider = MockProvider::new(reply(99, "supports"));
    let analyzer = ConnectionAnalyzer::new(provider, AnalyzerConfig::default()).unwrap();

    let result = analyzer.analyze(&items("Fact", 3), &items("Insight", 2), &[]).await;
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let mut provider = MockProvider::new(reply(1, "supports"));
    provider.add_error("DOK3 INSIGHT:\nInsight #2.");
    provider.add_response("DOK3 INSIGHT:\nInsight #3.", "not json at all");

    let analyzer = ConnectionAnalyzer::new(provider.clone(), AnalyzerConfig::default()).unwrap();
    let result = analyzer.analyze(&items("Fact", 2), &items("Insight", 4), &[]).await;

    assert_eq!(provider.call_count(), 4);
    let targets: Vec<u32> = result.tier2_to_tier3.iter().map(|c| c.target_index).collect();
    assert_eq!(targets, vec![1, 4]);
}

#[tokio::test]
async fn test_empty_tiers_make_no_calls() {
    let provider = MockProvider::new(reply(1, "supports"));
    let analyzer = ConnectionAnalyzer::new(provider.clone(), AnalyzerConfig::default()).unwrap();

    let result = analyzer.analyze(&[], &items("Insight", 3), &[]).await;
    assert!(result.is_empty());

    let result = analyzer.analyze(&items("Fact", 3), &[], &items("Stance", 2)).await;
    assert!(result.is_empty());

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let provider = MockProvider::new(r#"{"connections": []}"#).with_delay(Duration::from_millis(20));
    let analyzer = ConnectionAnalyzer::new(provider.clone(), AnalyzerConfig::default()).unwrap();

    analyzer.analyze(&items("Fact", 2), &items("Insight", 20), &[]).await;

    assert_eq!(provider.call_count(), 20);
    assert!(provider.peak_in_flight() <= 5);
    assert!(provider.peak_in_flight() >= 2);
}

#[tokio::test]
async fn test_custom_concurrency_limit() {
    let provider = MockProvider::new(r#"{"connections": []}"#).with_delay(Duration::from_millis(10));
    let config = AnalyzerConfig {
        max_concurrent_requests: 1,
        ..AnalyzerConfig::default()
    };
    let analyzer = ConnectionAnalyzer::new(provider.clone(), config).unwrap();

    analyzer.analyze(&items("Fact", 1), &items("Insight", 4), &[]).await;
    assert_eq!(provider.peak_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_call_times_out() {
    let provider = MockProvider::new(reply(1, "supports")).with_delay(Duration::from_secs(60));
    let analyzer = ConnectionAnalyzer::new(provider, AnalyzerConfig::default()).unwrap();

    let result = analyzer.analyze(&items("Fact", 1), &items("Insight", 1), &[]).await;
    assert!(result.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_analysis_stops_calling_model() {
    let provider = MockProvider::new(reply(1, "supports")).with_delay(Duration::from_secs(1));
    let config = AnalyzerConfig {
        max_concurrent_requests: 1,
        ..AnalyzerConfig::default()
    };
    let analyzer = ConnectionAnalyzer::new(provider.clone(), config).unwrap();
    let facts = items("Fact", 2);
    let insights = items("Insight", 6);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(2500),
        analyzer.analyze(&facts, &insights, &[]),
    )
    .await;
    assert!(abandoned.is_err());

    let started = provider.call_count();
    assert!(started >= 1 && started < 6);

    // Queued calls would have run by now had they outlived the analysis
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(provider.call_count(), started);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = AnalyzerConfig {
        max_connections_per_node: 0,
        ..AnalyzerConfig::default()
    };
    assert!(ConnectionAnalyzer::new(MockProvider::default(), config).is_err());
}
