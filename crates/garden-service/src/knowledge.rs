//! Text analysis orchestration and AI enrichment.
//!
//! The base pipeline result is always computed locally and returned intact;
//! AI enrichment is additive and falls back silently when the collaborator
//! fails or times out.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use garden_types::{
    EdgeType, GraphNode, NodeType, Properties, TextNetworkAnalysis,
};

use crate::service::{excerpt, GardenService};

/// Length of the label excerpt taken from stored text.
const TEXT_LABEL_LENGTH: usize = 50;

/// Cap on AI-extracted concepts merged into an enriched analysis.
const MAX_AI_CONCEPTS: usize = 10;

/// Persisted outcome of feeding one analysis into the store.
#[derive(Debug, Clone, Serialize)]
pub struct StoredAnalysis {
    /// The stored text node
    #[serde(rename = "textNode")]
    pub text_node: GraphNode,
    /// Concept nodes created or updated for this text
    #[serde(rename = "conceptNodes")]
    pub concept_nodes: Vec<GraphNode>,
}

/// Base analysis plus optional AI additions.
#[derive(Debug, Clone, Serialize)]
pub struct AiEnhancedAnalysis {
    /// The unmodified base analysis
    #[serde(flatten)]
    pub analysis: TextNetworkAnalysis,
    /// Concepts proposed by the collaborator
    #[serde(rename = "aiConcepts")]
    pub ai_concepts: Vec<String>,
    /// Free-text observations from the collaborator
    #[serde(rename = "aiInsights")]
    pub ai_insights: Vec<String>,
    /// Whether enrichment succeeded
    #[serde(rename = "aiEnhanced")]
    pub ai_enhanced: bool,
}

/// Concept suggestions derived from existing notes.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptSuggestions {
    pub suggestions: Vec<String>,
    pub domain: String,
    #[serde(rename = "basedOn")]
    pub based_on: usize,
}

/// Whole-graph insight summary.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeInsights {
    #[serde(rename = "aiInsights")]
    pub ai_insights: Vec<String>,
    #[serde(rename = "structuralInsights")]
    pub structural_insights: Vec<String>,
    pub suggestions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl GardenService {
    /// Run the analysis pipeline on one text. Pure; nothing is stored.
    pub fn analyze_text(&self, text: &str) -> TextNetworkAnalysis {
        self.analyzer().analyze(text)
    }

    /// Run the analysis pipeline jointly over several documents.
    pub fn analyze_documents(&self, texts: &[&str]) -> TextNetworkAnalysis {
        self.analyzer().analyze_documents(texts)
    }

    /// Analyze a text and persist it: the text node, its key terms as
    /// concepts, and the containment/co-occurrence edges between them.
    pub async fn analyze_and_store(&self, text: &str) -> (TextNetworkAnalysis, StoredAnalysis) {
        let analysis = self.analyze_text(text);
        let stored = self.store_text_analysis(text, &analysis.key_terms).await;
        (analysis, stored)
    }

    /// Persist one text submission and its extracted concepts.
    ///
    /// Concepts are found-or-created by exact label; repeat occurrences
    /// increment the stored frequency instead of duplicating nodes, and
    /// repeat co-occurrences increment edge weight instead of duplicating
    /// edges.
    pub async fn store_text_analysis(&self, text: &str, concepts: &[String]) -> StoredAnalysis {
        let store = self.store();

        let label = if text.chars().count() > TEXT_LABEL_LENGTH {
            format!("{}...", excerpt(text, TEXT_LABEL_LENGTH))
        } else {
            text.to_string()
        };
        let mut properties = Properties::new();
        properties.insert("fullText".to_string(), serde_json::json!(text));
        properties.insert(
            "wordCount".to_string(),
            serde_json::json!(text.split_whitespace().count()),
        );
        let text_node = store.create_node(label, NodeType::Text, properties).await;

        let mut concept_nodes: Vec<GraphNode> = Vec::new();
        for concept in concepts {
            let node = self.upsert_concept(concept).await;
            store
                .create_edge(&text_node.id, &node.id, EdgeType::Contains, 1.0, Properties::new())
                .await;
            concept_nodes.push(node);
        }

        // Co-occurrence edges between every concept pair in this text.
        for i in 0..concept_nodes.len() {
            for j in (i + 1)..concept_nodes.len() {
                let (a, b) = (&concept_nodes[i], &concept_nodes[j]);
                if a.id == b.id {
                    continue;
                }
                let existing = store.get_edges_between(&a.id, &b.id).await;
                match existing.iter().find(|e| e.edge_type == EdgeType::CoOccurs) {
                    Some(edge) => {
                        store.increment_edge_weight(&edge.id, 1.0).await;
                    }
                    None => {
                        store
                            .create_edge(&a.id, &b.id, EdgeType::CoOccurs, 1.0, Properties::new())
                            .await;
                    }
                }
            }
        }

        info!(
            text_node = %text_node.id,
            concepts = concept_nodes.len(),
            "stored text analysis"
        );
        StoredAnalysis {
            text_node,
            concept_nodes,
        }
    }

    /// Find a concept node by exact label, creating it at frequency 1 or
    /// incrementing its stored frequency.
    async fn upsert_concept(&self, label: &str) -> GraphNode {
        let store = self.store();
        let pattern = format!("^{}$", regex::escape(label));
        let existing = store
            .find_nodes_by_label(&pattern)
            .await
            .into_iter()
            .find(|n| n.node_type == NodeType::Concept);

        match existing {
            Some(node) => {
                let mut properties = node.properties.clone();
                let frequency = node.frequency() + 1;
                properties.insert("frequency".to_string(), serde_json::json!(frequency));
                store
                    .update_node(
                        &node.id,
                        garden_store::NodeUpdate::properties(properties),
                    )
                    .await
                    .unwrap_or(node)
            }
            None => {
                let mut properties = Properties::new();
                properties.insert("frequency".to_string(), serde_json::json!(1));
                store.create_node(label, NodeType::Concept, properties).await
            }
        }
    }

    /// Base analysis with optional AI additions.
    ///
    /// Enrichment failure downgrades to the base result with
    /// `ai_enhanced = false`; it never errors and never alters the base.
    pub async fn analyze_text_with_ai(&self, text: &str, use_ai: bool) -> AiEnhancedAnalysis {
        let analysis = self.analyze_text(text);

        if !use_ai {
            return AiEnhancedAnalysis {
                analysis,
                ai_concepts: Vec::new(),
                ai_insights: Vec::new(),
                ai_enhanced: false,
            };
        }

        let prompt =
            format!("Analyze this text for key concepts and relationships:\n\n{text}");
        match self.try_generate(&prompt).await {
            Ok(response) => {
                let ai_concepts = response
                    .split([',', '\n'])
                    .map(str::trim)
                    .filter(|c| c.len() > 2)
                    .take(MAX_AI_CONCEPTS)
                    .map(String::from)
                    .collect();
                AiEnhancedAnalysis {
                    analysis,
                    ai_concepts,
                    ai_insights: vec![excerpt(&response, 200)],
                    ai_enhanced: true,
                }
            }
            Err(e) => {
                warn!(error = %e, "AI analysis failed, using base analysis");
                AiEnhancedAnalysis {
                    analysis,
                    ai_concepts: Vec::new(),
                    ai_insights: Vec::new(),
                    ai_enhanced: false,
                }
            }
        }
    }

    /// Suggest connection candidates for one note; empty when the note is
    /// unknown, fail-soft otherwise.
    pub async fn suggest_related_notes(&self, note_id: &str) -> Vec<String> {
        let Some(note) = self.store().get_node(note_id).await else {
            return Vec::new();
        };
        let content = note
            .properties
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or(&note.label);

        let prompt = format!(
            "Analyze this note and suggest 3-5 related concepts or topics that \
             would make good connections in a knowledge graph:\n\n{content}"
        );
        let response = self.generate_text(&prompt).await;
        response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(5)
            .map(String::from)
            .collect()
    }

    /// Concept suggestions grounded in existing note excerpts.
    pub async fn concept_suggestions(&self, domain: Option<&str>) -> ConceptSuggestions {
        let notes = self.all_notes().await;
        let excerpts: Vec<String> = notes
            .iter()
            .take(20)
            .filter_map(|n| n.properties.get("content").and_then(|v| v.as_str()))
            .map(|content| excerpt(content, 100))
            .collect();

        let domain_name = domain.unwrap_or("general");
        let prompt = format!(
            "Suggest new concepts for a {domain_name} knowledge base that would \
             connect well with these existing notes:\n\n{}",
            excerpts.join("\n")
        );
        let response = self.generate_text(&prompt).await;
        let suggestions = response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        ConceptSuggestions {
            suggestions,
            domain: domain_name.to_string(),
            based_on: excerpts.len(),
        }
    }

    /// Whole-graph insight summary: structural observations plus fail-soft
    /// AI commentary.
    pub async fn knowledge_insights(&self) -> KnowledgeInsights {
        let stats = self.store().stats().await;
        let notes = stats.nodes_by_type.get("note").copied().unwrap_or(0);
        let concepts = stats.nodes_by_type.get("concept").copied().unwrap_or(0);

        let structural_insights = vec![
            format!(
                "Network has {} concepts and {} connections",
                concepts, stats.total_edges
            ),
            "Consider adding cross-domain connections".to_string(),
            "Look for isolated concept clusters".to_string(),
        ];

        let prompt = format!(
            "A knowledge graph holds {notes} notes, {concepts} concepts and {} \
             connections. Summarize its shape and suggest one way to improve it.",
            stats.total_edges
        );
        let ai_insights = vec![self.generate_text(&prompt).await];
        let suggestions = self.concept_suggestions(None).await.suggestions;

        KnowledgeInsights {
            ai_insights,
            structural_insights,
            suggestions,
            timestamp: Utc::now(),
        }
    }
}
