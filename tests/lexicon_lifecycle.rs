// Process-wide lexicon state lives in its own test binary so nothing else
// can initialize it first.

use std::sync::Arc;

use stock_news_sentiment::error::ScoringError;
use stock_news_sentiment::sentiment::{self, init_lexicon, LexiconSource, Scorer, SentimentAnalyzer};

#[test]
fn analyzer_requires_explicit_lexicon_init() {
    assert!(sentiment::lexicon().is_none());
    assert!(matches!(
        SentimentAnalyzer::new(),
        Err(ScoringError::LexiconNotInitialized)
    ));

    let first = init_lexicon(LexiconSource::Embedded).expect("embedded lexicon loads");
    assert!(!first.is_empty());

    // A second init is a no-op, even with a different source.
    let again = init_lexicon(LexiconSource::File("does/not/exist.txt".into()))
        .expect("already initialized");
    assert!(Arc::ptr_eq(&first, &again));

    let analyzer = SentimentAnalyzer::new().expect("lexicon installed");
    assert_eq!(analyzer.compound("good").unwrap(), 0.4404);
    assert_eq!(analyzer.compound("").unwrap(), 0.0);
}
