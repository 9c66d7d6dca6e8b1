use screening_core::{
    Analyzer, Error, FeatureVector, Label, PartOfSpeechTag, PredictionResult, ResourcePaths,
    Screener, features::FEATURE_NAMES,
};
use std::path::{Path, PathBuf};

const SCENE: &str =
    "The boy is stealing a cookie from the jar. The woman is washing dishes at the sink.";

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn paths() -> ResourcePaths {
    ResourcePaths::under(fixtures())
}

fn analyzer() -> Analyzer {
    Analyzer::load(&paths()).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_scene_description_features() {
    let analysis = analyzer().analyze(SCENE);

    let tags: Vec<String> = analysis.tokens.iter().map(|t| t.tag.to_string()).collect();
    assert_eq!(
        tags,
        vec![
            "DT", "NN", "VBZ", "VBG", "DT", "NN", "IN", "DT", "NN", ".", "DT", "NN", "VBZ", "VBG",
            "NNS", "IN", "DT", "NN", ".",
        ]
    );
    let lemmas: Vec<&str> = analysis.tokens.iter().map(|t| t.lemma.as_str()).collect();
    assert!(lemmas.contains(&"steal"));
    assert!(lemmas.contains(&"wash"));
    assert!(lemmas.contains(&"dish"));
    assert!(lemmas.contains(&"is"));

    assert_eq!(analysis.counts.characters, 65);
    assert_eq!(analysis.counts.words, 17);
    assert_eq!(analysis.counts.sentences, 2);
    assert_eq!(analysis.concepts, vec!["scene", "mother", "boy", "dishes", "chores"]);

    let [ttr, r, concepts, ari, cli, pronouns, vps, nps, ratio, words_per_sentence] =
        *analysis.features.values();
    assert_close(ttr, 15.0 / 19.0);
    // 15 distinct lemmas, 11 of them once
    assert_close(r, 100.0 * (19.0f64 / (1.0 - 11.0 / 15.0)).ln());
    assert_eq!(concepts, 8.0);
    assert_close(ari, 4.71 * (65.0 / 17.0) + 0.5 * (17.0 / 2.0) - 21.43);
    assert_close(cli, 3.2);
    assert_eq!(pronouns, 0.0);
    assert_eq!(vps, 2.0);
    assert_eq!(nps, 2.0);
    assert_eq!(ratio, 0.0);
    assert_eq!(words_per_sentence, 8.5);
    assert_eq!(analysis.metrics.noun_count, 6);
}

#[test]
fn test_degenerate_texts_get_zero_vector() {
    let analyzer = analyzer();
    for text in ["", "   ", "the boy ran", "."] {
        assert_eq!(analyzer.extract_features(text), FeatureVector::ZERO, "{text:?}");
    }
}

#[test]
fn test_empty_text_is_still_classified() {
    let screener = Screener::load(&paths()).unwrap();
    let screening = screener.screen("");
    assert_eq!(screening.label, Label::PossibleDementia);
    assert_eq!(screening.confidence_percent, 64.57);
}

#[test]
fn test_scene_description_is_screened() {
    let screener = Screener::load(&paths()).unwrap();
    let screening = screener.screen(SCENE);
    assert_eq!(screening.label, Label::Control);
    assert_eq!(screening.confidence_percent, 59.87);

    let result = PredictionResult::new(screening, "texto".to_string(), SCENE.to_string());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["result"], "Control (0)");
    assert_eq!(json["confidence_percent"], 59.87);
    assert_eq!(json["original_text"], "texto");
    assert_eq!(json["translated_text"], SCENE);
}

#[test]
fn test_extraction_is_idempotent() {
    let analyzer = analyzer();
    let first = analyzer.extract_features(SCENE);
    for _ in 0..3 {
        assert_eq!(analyzer.extract_features(SCENE), first);
    }
}

#[test]
fn test_all_hapax_text() {
    let features = analyzer().extract_features("A boy fell.");
    let values = features.values();
    assert_eq!(values[0], 1.0);
    assert_eq!(values[1], 0.0);
    // boy, and fell lemmatized to fall
    assert_eq!(values[2], 2.0);
}

#[test]
fn test_pronouns_without_nouns() {
    let analysis = analyzer().analyze("She saw it.");
    assert_eq!(analysis.tokens[1].lemma, "see");
    assert_eq!(analysis.metrics.pronoun_count, 2);
    assert_eq!(analysis.metrics.noun_count, 0);
    assert_eq!(analysis.metrics.pronoun_noun_ratio, 2.0);
}

#[test]
fn test_single_concept_word() {
    let analysis = analyzer().analyze("The faucet.");
    assert_eq!(analysis.tokens[1].tag, PartOfSpeechTag::NN);
    assert_eq!(analysis.metrics.concept_count, 1);
    assert_eq!(analysis.concepts, vec!["faucet"]);
}

#[test]
fn test_questions_count_as_sentences() {
    let analysis = analyzer().analyze("She is washing her dishes? The water is spilling.");
    assert_eq!(analysis.counts.sentences, 2);
    assert_eq!(analysis.metrics.pronoun_count, 2);
    assert!(analysis.features.values().iter().all(|value| value.is_finite()));
}

#[test]
fn test_feature_names_follow_vector_order() {
    let features = analyzer().extract_features(SCENE);
    let named: Vec<_> = features.named().collect();
    assert_eq!(named.len(), FEATURE_NAMES.len());
    assert_eq!(named[0].0, "ttr");
    assert_eq!(named[2], ("num_concepts_mentioned", 8.0));
    assert_eq!(named[9], ("word_sentence_ratio", 8.5));
}

#[test]
fn test_missing_resources_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let result = Screener::load(&ResourcePaths::under(dir.path()));
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_corrupt_classifier_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    std::fs::write(&model_path, r#"{"learner": {"objective": {"name": "binary:logistic"}}}"#)
        .unwrap();
    let paths = ResourcePaths {
        model_path,
        ..paths()
    };
    assert!(matches!(Screener::load(&paths), Err(Error::Json { .. })));
}

#[test]
fn test_unknown_tag_in_tagger_model_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let source = fixtures().join("averaged_perceptron_tagger_eng");
    for entry in std::fs::read_dir(&source).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), dir.path().join(entry.file_name())).unwrap();
    }
    std::fs::write(
        dir.path()
            .join("averaged_perceptron_tagger_eng.classes.json"),
        r#"["NN", "-NONE-"]"#,
    )
    .unwrap();
    let paths = ResourcePaths {
        tagger_dir: dir.path().to_path_buf(),
        ..paths()
    };
    assert!(matches!(
        Analyzer::load(&paths),
        Err(Error::InvalidTaggerModel(_))
    ));
}
