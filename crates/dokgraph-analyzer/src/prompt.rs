//! Prompt construction for connection inference

use crate::config::{AnalyzerConfig, SubItemDetail};
use dokgraph_domain::{KnowledgeItem, Tier};

const INSIGHT_SUPPORT: &str = "The DOK2 provides evidence/foundation for the insight";
const INSIGHT_CONTRADICT: &str = "The DOK2 challenges or conflicts with the insight";
const SPOV_SUPPORT: &str = "The insight provides foundation for this SPOV";
const SPOV_CONTRADICT: &str = "The insight challenges or conflicts with this SPOV";

const RULES: &str = "\
- Only pick if there's a SPECIFIC, DIRECT connection (not thematic similarity)
- If nothing strongly connects, return empty";

const OUTPUT_FORMAT: &str = r#"Respond ONLY with JSON:
{"connections": [{"id": 1, "type": "supports"}]} or {"connections": [{"id": 2, "type": "contradicts"}]} or {"connections": []} /no_think"#;

/// Builds the prompt asking which lower-tier item one subject rests on
pub struct PromptBuilder<'a> {
    subject: &'a KnowledgeItem,
    subject_tier: Tier,
    candidates: &'a [KnowledgeItem],
    config: &'a AnalyzerConfig,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for `subject`, choosing among `candidates`
    ///
    /// Candidates always come from the tier directly below `subject_tier`.
    pub fn new(
        subject: &'a KnowledgeItem,
        subject_tier: Tier,
        candidates: &'a [KnowledgeItem],
        config: &'a AnalyzerConfig,
    ) -> Self {
        Self {
            subject,
            subject_tier,
            candidates,
            config,
        }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let wording = Wording::for_subject(self.subject_tier);
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "You analyze knowledge documents. Given a {}, identify which {} have a DIRECT relationship.\n\n",
            wording.subject, wording.candidates,
        ));

        prompt.push_str(wording.subject_heading);
        prompt.push_str(":\n");
        prompt.push_str(&item_content(self.subject, self.config));
        prompt.push_str("\n\n");

        prompt.push_str(wording.list_heading);
        prompt.push_str(":\n");
        prompt.push_str(&numbered_list(self.candidates, self.config));
        prompt.push_str("\n\n");

        prompt.push_str("Instructions:\n");
        prompt.push_str(&format!(
            "- Pick AT MOST 1 {} that DIRECTLY relates to this {}\n",
            wording.candidate, wording.subject_short
        ));
        prompt.push_str("- A relationship can be:\n");
        prompt.push_str(&format!("  - SUPPORTS: {}\n", wording.supports));
        prompt.push_str(&format!("  - CONTRADICTS: {}\n", wording.contradicts));
        prompt.push_str(RULES);
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT);

        prompt
    }
}

struct Wording {
    subject: &'static str,
    subject_short: &'static str,
    subject_heading: &'static str,
    candidate: &'static str,
    candidates: &'static str,
    list_heading: &'static str,
    supports: &'static str,
    contradicts: &'static str,
}

impl Wording {
    fn for_subject(tier: Tier) -> Self {
        match tier {
            Tier::Dok4 => Self {
                subject: "DOK4 Spiky POV",
                subject_short: "SPOV",
                subject_heading: "DOK4 SPIKY POV",
                candidate: "DOK3 insight",
                candidates: "DOK3 Insights",
                list_heading: "DOK3 INSIGHTS",
                supports: SPOV_SUPPORT,
                contradicts: SPOV_CONTRADICT,
            },
            _ => Self {
                subject: "DOK3 Insight",
                subject_short: "insight",
                subject_heading: "DOK3 INSIGHT",
                candidate: "DOK2 item",
                candidates: "DOK2 items",
                list_heading: "DOK2 KNOWLEDGE ITEMS",
                supports: INSIGHT_SUPPORT,
                contradicts: INSIGHT_CONTRADICT,
            },
        }
    }
}

/// Item text as shown to the model: content plus a sub-item digest
pub fn item_content(item: &KnowledgeItem, config: &AnalyzerConfig) -> String {
    let mut content = item.content.clone();

    if !item.children.is_empty() {
        match config.sub_item_detail {
            SubItemDetail::Count => {
                content.push_str(&format!("\n  Sub-items: ({} items)", item.children.len()));
            }
            SubItemDetail::Text => {
                content.push_str("\n  Sub-items:");
                for child in &item.children {
                    let first_line = child.lines().next().unwrap_or_default();
                    let first_line = first_line.trim().trim_start_matches("- ");
                    content.push_str("\n  - ");
                    content.push_str(&truncate(first_line, config.sub_item_text_chars));
                }
            }
        }
    }

    content.trim().to_string()
}

/// `"{index}. {content}"` lines separated by blank lines
pub fn numbered_list(items: &[KnowledgeItem], config: &AnalyzerConfig) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{}. {}",
                item.index,
                truncate(&item_content(item, config), config.preview_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Keep the first `max` characters, marking the cut with `...`
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(index: u32, content: &str, children: &[&str]) -> KnowledgeItem {
        KnowledgeItem {
            index,
            content: content.to_string(),
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_item_content_counts_children() {
        let config = AnalyzerConfig::default();
        let it = item(1, "Forgetting curve", &["- a", "- b"]);
        assert_eq!(item_content(&it, &config), "Forgetting curve\n  Sub-items: (2 items)");

        let bare = item(2, "  Testing effect  ", &[]);
        assert_eq!(item_content(&bare, &config), "Testing effect");
    }

    #[test]
    fn test_item_content_text_mode() {
        let config = AnalyzerConfig {
            sub_item_detail: SubItemDetail::Text,
            sub_item_text_chars: 5,
            ..AnalyzerConfig::default()
        };
        let it = item(1, "Claim", &["- Exponential decay\n  - deeper", "- Short"]);
        assert_eq!(
            item_content(&it, &config),
            "Claim\n  Sub-items:\n  - Expon...\n  - Short"
        );
    }

    #[test]
    fn test_numbered_list_truncates() {
        let config = AnalyzerConfig {
            preview_chars: 4,
            ..AnalyzerConfig::default()
        };
        let items = vec![item(1, "abcdefgh", &[]), item(2, "xy", &[])];
        assert_eq!(numbered_list(&items, &config), "1. abcd...\n\n2. xy");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 3), "hél...");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn test_insight_prompt() {
        let config = AnalyzerConfig::default();
        let subject = item(1, "Spacing beats massing", &[]);
        let candidates = vec![item(1, "Forgetting curve", &[]), item(2, "Testing effect", &[])];
        let prompt = PromptBuilder::new(&subject, Tier::Dok3, &candidates, &config).build();

        assert!(prompt.starts_with("You analyze knowledge documents. Given a DOK3 Insight,"));
        assert!(prompt.contains("DOK3 INSIGHT:\nSpacing beats massing\n\n"));
        assert!(prompt.contains("DOK2 KNOWLEDGE ITEMS:\n1. Forgetting curve\n\n2. Testing effect\n\n"));
        assert!(prompt.contains("Pick AT MOST 1 DOK2 item"));
        assert!(prompt.ends_with("/no_think"));
    }

    #[test]
    fn test_spov_prompt() {
        let config = AnalyzerConfig::default();
        let subject = item(1, "Cramming is never worth it", &[]);
        let candidates = vec![item(1, "Spacing beats massing", &[])];
        let prompt = PromptBuilder::new(&subject, Tier::Dok4, &candidates, &config).build();

        assert!(prompt.contains("Given a DOK4 Spiky POV, identify which DOK3 Insights"));
        assert!(prompt.contains("DOK4 SPIKY POV:\nCramming is never worth it"));
        assert!(prompt.contains("DOK3 INSIGHTS:\n1. Spacing beats massing"));
        assert!(prompt.contains("relates to this SPOV"));
    }
}
