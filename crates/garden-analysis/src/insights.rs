//! Templated insight strings over analysis outputs.
//!
//! Pure string formatting; the base analysis never makes external calls.
//! AI enrichment, when enabled, is layered on by the service crate and can
//! only add to these, never replace them.

use garden_types::ContentGap;

/// Number of topics named in the "Main topics" line.
const TOP_TOPICS: usize = 3;

/// Terms shown per topic in the "Main topics" line.
const TERMS_PER_TOPIC: usize = 3;

/// Build human-readable observations for one analysis.
pub fn summarize(topics: &[Vec<String>], gaps: &[ContentGap]) -> Vec<String> {
    let mut insights = Vec::new();

    insights.push(format!("Identified {} main topic clusters", topics.len()));

    if !gaps.is_empty() {
        insights.push(format!("Found {} content gaps to address", gaps.len()));
    }

    let top: Vec<String> = topics
        .iter()
        .take(TOP_TOPICS)
        .map(|topic| {
            topic
                .iter()
                .take(TERMS_PER_TOPIC)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();
    if !top.is_empty() {
        insights.push(format!("Main topics: {}", top.join("; ")));
    }

    insights
}
