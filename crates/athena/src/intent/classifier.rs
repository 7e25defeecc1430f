use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    context::ConversationContext,
    matcher::try_exact_match,
    registry::CategoryRegistry,
    scoring::{CategoryScore, ScoringEngine},
    ClassificationResult,
};
use crate::{lexicon::SynonymExpander, nlp::NormalizedText};

/// How database-synonym contributions combine across a category's keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynonymWeighting {
    /// Each keyword contributes up to the full synonym weight, so totals can
    /// exceed 1.0 for categories with many keywords.
    #[default]
    PerKeyword,
    /// The summed contribution is divided by the keyword count.
    Normalized,
}

/// Classifier tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Scores at or below this are rejected
    pub acceptance_threshold: f64,
    /// Added when a category repeats the previous accepted category
    pub context_bonus: f64,
    pub keyword_weight: f64,
    pub synonym_weight: f64,
    pub phrase_weight: f64,
    pub synonym_weighting: SynonymWeighting,
    /// Categories matched on the raw utterance before classification runs
    pub priority_categories: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.3,
            context_bonus: 0.1,
            keyword_weight: 0.4,
            synonym_weight: 0.3,
            phrase_weight: 0.3,
            synonym_weighting: SynonymWeighting::PerKeyword,
            priority_categories: vec!["open_app".to_string(), "close_app".to_string()],
        }
    }
}

/// Two-pass intent classifier: exact patterns first, weighted scoring second.
///
/// The classifier itself holds no conversation state; callers pass their
/// [`ConversationContext`] in and it is updated on acceptance.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    registry: Arc<CategoryRegistry>,
    expander: Arc<SynonymExpander>,
    config: ClassifierConfig,
}

impl IntentClassifier {
    pub fn new(
        registry: Arc<CategoryRegistry>,
        expander: Arc<SynonymExpander>,
        config: ClassifierConfig,
    ) -> Self {
        Self {
            registry,
            expander,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        &self.registry
    }

    pub fn expander(&self) -> &Arc<SynonymExpander> {
        &self.expander
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, text: &str, context: &mut ConversationContext) -> ClassificationResult {
        let normalized = NormalizedText::new(text);
        if normalized.is_empty() {
            debug!("Empty utterance after normalization");
            return ClassificationResult::none();
        }

        let result = match try_exact_match(normalized.as_str(), &self.registry) {
            Some(category) => ClassificationResult::exact(category.id()),
            None => ScoringEngine::new(&self.config, &self.expander).score(
                &normalized,
                &self.registry,
                context,
            ),
        };

        context.record(&result, self.config.acceptance_threshold);
        info!(
            utterance = %normalized.as_str(),
            category = %result.category,
            confidence = result.confidence,
            method = ?result.method,
            "Classified utterance"
        );
        result
    }

    /// Per-category score breakdown without touching the context
    pub fn explain(&self, text: &str, context: &ConversationContext) -> Vec<CategoryScore> {
        let normalized = NormalizedText::new(text);
        if normalized.is_empty() {
            return Vec::new();
        }
        ScoringEngine::new(&self.config, &self.expander).score_all(
            &normalized,
            &self.registry,
            context,
        )
    }
}
