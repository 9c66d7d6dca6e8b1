use crate::{
    Result, Token,
    chunk::{ChunkCounts, ChunkGrammar},
    classifier::{BoostedTrees, Classifier, Screening},
    config::ResourcePaths,
    features::FeatureVector,
    lemmatize::{Lemmatizer, WordNetLemmatizer},
    lexicon::ConceptLexicon,
    metrics::{Metrics, TextCounts},
    tagger::{PerceptronTagger, Tagger},
    tokenize::word_tokenize,
};

/// Everything computed for one text on the way to its feature vector.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Analysis {
    pub counts: TextCounts,
    pub tokens: Vec<Token>,
    pub chunks: ChunkCounts,
    pub metrics: Metrics,
    pub concepts: Vec<&'static str>,
    pub features: FeatureVector,
}

/// Turns English text into features. Holds only read-only resources, so one instance can serve
/// any number of threads.
pub struct Analyzer {
    tagger: Box<dyn Tagger>,
    lemmatizer: Box<dyn Lemmatizer>,
    grammar: ChunkGrammar,
    lexicon: ConceptLexicon,
}

impl Analyzer {
    pub fn new(tagger: Box<dyn Tagger>, lemmatizer: Box<dyn Lemmatizer>) -> Self {
        Self {
            tagger,
            lemmatizer,
            grammar: ChunkGrammar::default(),
            lexicon: ConceptLexicon::default(),
        }
    }

    pub fn load(paths: &ResourcePaths) -> Result<Self> {
        let tagger = PerceptronTagger::load(&paths.tagger_dir)?;
        let lemmatizer = WordNetLemmatizer::load(&paths.wordnet_dir)?;
        Ok(Self::new(Box::new(tagger), Box::new(lemmatizer)))
    }

    /// Tokenizes, tags and lemmatizes `text`.
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        let words = word_tokenize(text);
        let tags = self.tagger.tag(&words);
        words
            .into_iter()
            .zip(tags)
            .map(|(text, tag)| {
                let lemma = match tag.word_class() {
                    Some(class) => self.lemmatizer.lemmatize(&text, class).unwrap_or_else(|| {
                        log::trace!("No {class:?} lemma for {text:?}, keeping the surface form");
                        text.clone()
                    }),
                    None => text.clone(),
                };
                Token { text, tag, lemma }
            })
            .collect()
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let counts = TextCounts::of(text);
        if counts.is_degenerate() {
            log::debug!("Degenerate text ({counts:?}), using the zero feature vector");
            return Analysis {
                counts,
                ..Analysis::default()
            };
        }

        let tokens = self.tokens(text);
        if tokens.is_empty() {
            return Analysis {
                counts,
                ..Analysis::default()
            };
        }
        let chunks = self.grammar.count(&tokens);
        let metrics = Metrics::compute(counts, &tokens, chunks, &self.lexicon);
        let concepts = self
            .lexicon
            .concepts_mentioned(tokens.iter().map(|token| token.lemma.as_str()));
        let features = FeatureVector::from(&metrics);
        Analysis {
            counts,
            tokens,
            chunks,
            metrics,
            concepts,
            features,
        }
    }

    pub fn extract_features(&self, text: &str) -> FeatureVector {
        self.analyze(text).features
    }
}

/// The analyzer and the classifier, built once at startup.
pub struct Screener {
    analyzer: Analyzer,
    classifier: Box<dyn Classifier>,
}

impl Screener {
    pub fn new(analyzer: Analyzer, classifier: Box<dyn Classifier>) -> Self {
        Self {
            analyzer,
            classifier,
        }
    }

    /// Loads every resource; any failure means the screener cannot be used at all.
    pub fn load(paths: &ResourcePaths) -> Result<Self> {
        let classifier = BoostedTrees::load(&paths.model_path)?;
        let analyzer = Analyzer::load(paths)?;
        Ok(Self::new(analyzer, Box::new(classifier)))
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn score(&self, features: &FeatureVector) -> Screening {
        Screening::score(self.classifier.as_ref(), features)
    }

    pub fn screen(&self, text: &str) -> Screening {
        let features = self.analyzer.extract_features(text);
        let screening = self.score(&features);
        log::info!(
            "Screened {} chars: {} ({}%)",
            text.len(),
            screening.label,
            screening.confidence_percent
        );
        screening
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::{PartOfSpeechTag, WordClass};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tags by a fixed word list; everything else is a noun.
    struct ListTagger {
        calls: Arc<AtomicUsize>,
    }

    impl Tagger for ListTagger {
        fn tag(&self, tokens: &[String]) -> Vec<PartOfSpeechTag> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokens
                .iter()
                .map(|token| match token.to_lowercase().as_str() {
                    "the" | "a" => PartOfSpeechTag::DT,
                    "she" | "he" => PartOfSpeechTag::PRP,
                    "is" => PartOfSpeechTag::VBZ,
                    "falls" => PartOfSpeechTag::VBZ,
                    "washing" | "stealing" => PartOfSpeechTag::VBG,
                    "." => PartOfSpeechTag::SentenceFinal,
                    _ => PartOfSpeechTag::NN,
                })
                .collect()
        }
    }

    /// Strips a trailing `ing` from verbs, knows no nouns.
    struct SuffixLemmatizer;

    impl Lemmatizer for SuffixLemmatizer {
        fn lemmatize(&self, word: &str, class: WordClass) -> Option<String> {
            match class {
                WordClass::Verb => word.strip_suffix("ing").map(str::to_string),
                WordClass::Noun => None,
            }
        }
    }

    fn analyzer() -> (Analyzer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let tagger = ListTagger {
            calls: calls.clone(),
        };
        (
            Analyzer::new(Box::new(tagger), Box::new(SuffixLemmatizer)),
            calls,
        )
    }

    #[test]
    fn test_degenerate_text_skips_tagging() {
        let (analyzer, calls) = analyzer();
        assert_eq!(analyzer.extract_features(""), FeatureVector::ZERO);
        assert_eq!(
            analyzer.extract_features("the boy ran"),
            FeatureVector::ZERO
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lemma_falls_back_to_surface_form() {
        let (analyzer, _) = analyzer();
        let tokens = analyzer.tokens("She is washing cookies.");
        let lemmas: Vec<_> = tokens.iter().map(|t| t.lemma.as_str()).collect();
        // VBZ is not lemmatized, unknown nouns keep their surface form
        assert_eq!(lemmas, vec!["She", "is", "wash", "cookies", "."]);
    }

    #[test]
    fn test_analysis_feeds_features() {
        let (analyzer, calls) = analyzer();
        let analysis = analyzer.analyze("She is washing the sink.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(analysis.tokens.len(), 6);
        assert_eq!(analysis.metrics.pronoun_count, 1);
        assert_eq!(analysis.metrics.noun_count, 1);
        assert_eq!(analysis.metrics.concept_count, 2);
        assert_eq!(analysis.concepts, vec!["scene", "chores"]);
        assert_eq!(analysis.features, FeatureVector::from(&analysis.metrics));
        assert_eq!(analysis.features.values()[5], 1.0);
    }

    #[test]
    fn test_screener_scores_zero_vector() {
        struct Halves;
        impl Classifier for Halves {
            fn predict_proba(&self, features: &FeatureVector) -> [f64; 2] {
                if features.is_zero() {
                    [0.25, 0.75]
                } else {
                    [0.75, 0.25]
                }
            }
        }
        let (analyzer, _) = analyzer();
        let screener = Screener::new(analyzer, Box::new(Halves));
        let screening = screener.screen("");
        assert_eq!(screening.label, crate::Label::PossibleDementia);
        assert_eq!(screening.confidence_percent, 75.0);
    }

    #[test]
    fn test_screener_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer>();
        assert_send_sync::<Screener>();
    }

    #[test]
    fn test_threads_share_one_analyzer() {
        const TEXT: &str = "She is washing the sink. He is stealing a cookie. The jar falls.";
        let (analyzer, calls) = analyzer();
        let analyzer = Arc::new(analyzer);
        let expected = analyzer.extract_features(TEXT);
        assert!(!expected.is_zero());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let analyzer = Arc::clone(&analyzer);
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| analyzer.extract_features(TEXT))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for features in handle.join().unwrap() {
                assert_eq!(features, expected);
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), 101);
    }
}
