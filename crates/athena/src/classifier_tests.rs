//! Tests for the intent classifier

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        intent::{
            CategoryRegistry, CategorySpec, ClassifierConfig, ConversationContext,
            IntentClassifier, MatchMethod,
        },
        lexicon::{NullLexicon, StaticLexicon, SynonymExpander, UnavailableLexicon},
        AthenaConfig, LexicalDatabase, RegistryConfig,
    };

    const EPSILON: f64 = 1e-9;

    /// Scores on the scoring path with no lexical database: "sound", "quiet"
    /// and "increase" out of nine volume keywords, plus two of six "up"
    /// phrases and one of three "mute" phrases.
    const QUIET_UTTERANCE: &str = "the sound is too quiet, increase it and boost it";
    const QUIET_SCORE: f64 = 0.4 * 3.0 / 9.0 + 0.3 * 2.0 / 6.0 + 0.3 / 3.0;

    fn builtin_classifier(lexicon: Arc<dyn LexicalDatabase>) -> IntentClassifier {
        IntentClassifier::new(
            Arc::new(CategoryRegistry::builtin()),
            Arc::new(SynonymExpander::new(lexicon)),
            ClassifierConfig::default(),
        )
    }

    fn keyword_spec(id: &str, keywords: &[&str]) -> CategorySpec {
        CategorySpec {
            id: id.to_string(),
            patterns: Vec::new(),
            excludes: Vec::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            synonyms: Vec::new(),
            handler: None,
        }
    }

    #[test]
    fn test_pattern_match_has_full_confidence() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let mut context = ConversationContext::new();

        let result = classifier.classify("Set volume to 45 percent", &mut context);
        assert_eq!(result.category, "volume");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.method, MatchMethod::Pattern);
        assert!(context.is_previous("volume"));
    }

    #[test]
    fn test_pattern_wins_over_keywords_of_other_categories() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let mut context = ConversationContext::new();

        // Also a search-style question; time is registered first.
        let result = classifier.classify("what time is it", &mut context);
        assert_eq!(result.category, "time");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_empty_and_punctuation_only_input() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let mut context = ConversationContext::with_previous("search");

        for text in ["", "   ", "?!...", "-- !"] {
            let result = classifier.classify(text, &mut context);
            assert!(result.is_none(), "input: {text:?}");
            assert_eq!(result.confidence, 0.0);
            assert_eq!(result.method, MatchMethod::Unmatched);
        }
        assert!(context.is_previous("search"));
    }

    #[test]
    fn test_polite_volume_request_matches_pattern() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let mut context = ConversationContext::new();

        let result = classifier.classify("hey could you turn the sound up a bit", &mut context);
        assert_eq!(result.category, "volume");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_scoring_path_accepts_volume() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let mut context = ConversationContext::new();

        let result = classifier.classify(QUIET_UTTERANCE, &mut context);
        assert_eq!(result.category, "volume");
        assert_eq!(result.method, MatchMethod::Scored);
        assert!((result.confidence - QUIET_SCORE).abs() < EPSILON);
        assert!(context.is_previous("volume"));
    }

    #[test]
    fn test_context_bonus_on_repeat() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let mut context = ConversationContext::new();

        let first = classifier.classify(QUIET_UTTERANCE, &mut context);
        let second = classifier.classify(QUIET_UTTERANCE, &mut context);
        assert_eq!(first.category, second.category);
        assert!(second.confidence >= first.confidence);
        assert!((second.confidence - first.confidence - 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_follow_up_question_keeps_search() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let mut context = ConversationContext::new();

        let first = classifier.classify("what is the capital of France", &mut context);
        assert_eq!(first.category, "search");
        assert_eq!(first.confidence, 1.0);

        let follow_up = classifier.classify("and its population", &mut context);
        assert_eq!(follow_up.category, "search");
        assert_eq!(follow_up.method, MatchMethod::Scored);
        assert!((follow_up.confidence - 0.4).abs() < EPSILON);
    }

    #[test]
    fn test_follow_up_without_context_is_rejected() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));

        let mut fresh = ConversationContext::new();
        assert!(classifier.classify("and its population", &mut fresh).is_none());
        assert_eq!(fresh.previous(), None);

        // Rejection leaves an unrelated previous category in place.
        let mut volume = ConversationContext::with_previous("volume");
        assert!(classifier.classify("and its population", &mut volume).is_none());
        assert!(volume.is_previous("volume"));
    }

    #[test]
    fn test_unrecognized_utterance_is_none() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let mut context = ConversationContext::new();
        assert!(classifier
            .classify("purple monkey dishwasher", &mut context)
            .is_none());
    }

    #[test]
    fn test_unavailable_lexicon_degrades_to_keyword_scoring() {
        let offline = builtin_classifier(Arc::new(UnavailableLexicon::new("offline")));
        let baseline = builtin_classifier(Arc::new(NullLexicon));

        let degraded = offline.classify(QUIET_UTTERANCE, &mut ConversationContext::new());
        let expected = baseline.classify(QUIET_UTTERANCE, &mut ConversationContext::new());
        assert_eq!(degraded, expected);
        assert!(offline.expander().stats().failures > 0);
    }

    #[test]
    fn test_lexicon_synonyms_raise_score() {
        let offline = builtin_classifier(Arc::new(NullLexicon));
        let online = builtin_classifier(Arc::new(StaticLexicon::builtin()));

        let without = offline.explain(QUIET_UTTERANCE, &ConversationContext::new());
        let with = online.explain(QUIET_UTTERANCE, &ConversationContext::new());
        let volume = |scores: &[crate::intent::CategoryScore]| {
            scores
                .iter()
                .find(|score| score.category == "volume")
                .map(|score| score.total)
                .unwrap()
        };
        assert!(volume(&with) > volume(&without));
    }

    #[test]
    fn test_tie_break_follows_registration_order() {
        let expander = Arc::new(SynonymExpander::new(Arc::new(NullLexicon)));
        let lamp = keyword_spec("lamp", &["light", "bright"]);
        let bulb = keyword_spec("bulb", &["light", "bright"]);

        for (specs, expected) in [
            (vec![lamp.clone(), bulb.clone()], "lamp"),
            (vec![bulb, lamp], "bulb"),
        ] {
            let classifier = IntentClassifier::new(
                Arc::new(CategoryRegistry::from_specs(&specs).unwrap()),
                expander.clone(),
                ClassifierConfig::default(),
            );
            let result = classifier.classify("bright light", &mut ConversationContext::new());
            assert_eq!(result.category, expected);
        }
    }

    #[test]
    fn test_configurable_threshold() {
        let strict = IntentClassifier::new(
            Arc::new(CategoryRegistry::builtin()),
            Arc::new(SynonymExpander::new(Arc::new(NullLexicon))),
            ClassifierConfig {
                acceptance_threshold: 0.5,
                ..ClassifierConfig::default()
            },
        );
        assert!(strict
            .classify(QUIET_UTTERANCE, &mut ConversationContext::new())
            .is_none());
    }

    #[test]
    fn test_explain_lists_every_category() {
        let classifier = builtin_classifier(Arc::new(NullLexicon));
        let scores = classifier.explain(QUIET_UTTERANCE, &ConversationContext::new());
        assert_eq!(scores.len(), classifier.registry().len());
        assert_eq!(scores[0].category, "volume");
        assert!(classifier.explain("", &ConversationContext::new()).is_empty());
    }

    #[test]
    fn test_classifier_uses_configured_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(
            &path,
            r#"[{"id": "kettle", "patterns": ["\\bkettle\\b"], "keywords": ["tea"]}]"#,
        )
        .unwrap();

        let config = AthenaConfig {
            registry: RegistryConfig {
                categories_path: Some(path),
            },
            ..AthenaConfig::default()
        };
        let classifier = crate::build_classifier(&config, Arc::new(NullLexicon)).unwrap();
        assert_eq!(classifier.registry().ids(), vec!["kettle"]);

        let mut context = ConversationContext::new();
        let result = classifier.classify("boil the kettle", &mut context);
        assert_eq!(result.category, "kettle");
        assert_eq!(result.method, MatchMethod::Pattern);

        let result = classifier.classify("what time is it", &mut context);
        assert_eq!(result.category, "none");
    }
}
