//! Weighted keyword and synonym scoring.
//!
//! Every dimension is a fraction of the matches possible in that dimension,
//! so a category with many keywords is not favoured over a small one. Empty
//! dimensions contribute zero.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    classifier::{ClassifierConfig, SynonymWeighting},
    context::ConversationContext,
    registry::{CategoryRegistry, CommandCategory},
    ClassificationResult,
};
use crate::{lexicon::SynonymExpander, nlp::NormalizedText};

/// Score breakdown for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    pub keyword: f64,
    pub synonym: f64,
    pub phrase: f64,
    pub context_bonus: f64,
    pub total: f64,
}

fn fraction(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

pub struct ScoringEngine<'a> {
    config: &'a ClassifierConfig,
    expander: &'a SynonymExpander,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(config: &'a ClassifierConfig, expander: &'a SynonymExpander) -> Self {
        Self { config, expander }
    }

    pub fn score_category(
        &self,
        text: &NormalizedText,
        category: &CommandCategory,
        context: &ConversationContext,
    ) -> CategoryScore {
        let keywords = category.keywords();

        let matched_keywords = keywords.iter().filter(|kw| text.contains(kw)).count();
        let keyword = self.config.keyword_weight * fraction(matched_keywords, keywords.len());

        let mut synonym: f64 = keywords
            .iter()
            .map(|kw| {
                let synonyms = self.expander.synonyms_of(kw);
                let matched = synonyms.iter().filter(|s| text.contains(s)).count();
                self.config.synonym_weight * fraction(matched, synonyms.len())
            })
            .sum();
        if self.config.synonym_weighting == SynonymWeighting::Normalized && !keywords.is_empty() {
            synonym /= keywords.len() as f64;
        }

        let phrase: f64 = category
            .synonym_groups()
            .iter()
            .map(|group| {
                let matched = group.phrases.iter().filter(|p| text.contains(p)).count();
                self.config.phrase_weight * fraction(matched, group.phrases.len())
            })
            .sum();

        let context_bonus = if context.is_previous(category.id()) {
            self.config.context_bonus
        } else {
            0.0
        };

        CategoryScore {
            category: category.id().to_string(),
            keyword,
            synonym,
            phrase,
            context_bonus,
            total: keyword + synonym + phrase + context_bonus,
        }
    }

    /// Scores for every category, in registration order
    pub fn score_all(
        &self,
        text: &NormalizedText,
        registry: &CategoryRegistry,
        context: &ConversationContext,
    ) -> Vec<CategoryScore> {
        registry
            .iter()
            .map(|category| self.score_category(text, category, context))
            .collect()
    }

    /// Best category if its total clears the acceptance threshold.
    ///
    /// Only a strictly higher total replaces the current leader, so on a tie
    /// the category registered first wins.
    pub fn score(
        &self,
        text: &NormalizedText,
        registry: &CategoryRegistry,
        context: &ConversationContext,
    ) -> ClassificationResult {
        if text.is_empty() {
            return ClassificationResult::none();
        }

        let mut best: Option<CategoryScore> = None;
        for score in self.score_all(text, registry, context) {
            if best.as_ref().map_or(true, |leader| score.total > leader.total) {
                best = Some(score);
            }
        }

        match best {
            Some(winner) if winner.total > self.config.acceptance_threshold => {
                debug!(
                    category = %winner.category,
                    score = winner.total,
                    keyword = winner.keyword,
                    synonym = winner.synonym,
                    phrase = winner.phrase,
                    bonus = winner.context_bonus,
                    "Scoring accepted category"
                );
                ClassificationResult::scored(winner.category, winner.total)
            }
            Some(leader) => {
                debug!(
                    category = %leader.category,
                    score = leader.total,
                    threshold = self.config.acceptance_threshold,
                    "Best score below acceptance threshold"
                );
                ClassificationResult::none()
            }
            None => ClassificationResult::none(),
        }
    }
}
