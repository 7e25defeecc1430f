use serde::{Deserialize, Serialize};

use super::ClassificationResult;

/// Conversation continuity between utterances.
///
/// Owned by whoever drives the conversation (the assistant worker, a test)
/// and passed into every classification call. Starts empty; only accepted
/// classifications move it forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    previous_category: Option<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context seeded with a previous category
    pub fn with_previous(category: impl Into<String>) -> Self {
        Self {
            previous_category: Some(category.into()),
        }
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous_category.as_deref()
    }

    pub fn is_previous(&self, category: &str) -> bool {
        self.previous() == Some(category)
    }

    /// Remember `result` if it is an accepted classification. Rejected and
    /// "none" results leave the context untouched.
    pub fn record(&mut self, result: &ClassificationResult, threshold: f64) -> bool {
        if result.is_none() || result.confidence <= threshold {
            return false;
        }
        self.previous_category = Some(result.category.clone());
        true
    }

    pub fn reset(&mut self) {
        self.previous_category = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert_eq!(ConversationContext::new().previous(), None);
    }

    #[test]
    fn test_records_only_accepted_results() {
        let mut context = ConversationContext::new();

        assert!(!context.record(&ClassificationResult::none(), 0.3));
        assert!(!context.record(&ClassificationResult::scored("volume", 0.3), 0.3));
        assert_eq!(context.previous(), None);

        assert!(context.record(&ClassificationResult::scored("volume", 0.31), 0.3));
        assert!(context.is_previous("volume"));

        assert!(context.record(&ClassificationResult::exact("search"), 0.3));
        assert!(context.is_previous("search"));

        context.record(&ClassificationResult::none(), 0.3);
        assert!(context.is_previous("search"));
    }

    #[test]
    fn test_reset() {
        let mut context = ConversationContext::with_previous("time");
        context.reset();
        assert_eq!(context.previous(), None);
    }
}
