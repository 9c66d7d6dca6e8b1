//! Averaged-perceptron part-of-speech tagger.
//!
//! The model is read from the three JSON files of an exported perceptron model: a weight table
//! `{feature: {tag: weight}}`, a tag dictionary `{word: tag}` for frequent unambiguous words, and
//! the list of classes.

use crate::{Error, Result, pos::PartOfSpeechTag, read_json};
use rustc_hash::FxHashMap;
use std::{collections::HashMap, path::Path};

const START: [&str; 2] = ["-START-", "-START2-"];
const END: [&str; 2] = ["-END-", "-END2-"];

pub const WEIGHTS_FILE: &str = "averaged_perceptron_tagger_eng.weights.json";
pub const TAGDICT_FILE: &str = "averaged_perceptron_tagger_eng.tagdict.json";
pub const CLASSES_FILE: &str = "averaged_perceptron_tagger_eng.classes.json";

/// Assigns one tag to every token of a sentence or text.
pub trait Tagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Vec<PartOfSpeechTag>;
}

pub struct PerceptronTagger {
    /// Sorted by label so that later entries win ties.
    classes: Vec<PartOfSpeechTag>,
    weights: FxHashMap<String, Vec<(usize, f64)>>,
    tagdict: FxHashMap<String, PartOfSpeechTag>,
}

impl PerceptronTagger {
    /// Loads the model files from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        log::info!("Loading perceptron tagger from {}", dir.display());
        let weights: HashMap<String, HashMap<String, f64>> = read_json(&dir.join(WEIGHTS_FILE))?;
        let tagdict: HashMap<String, String> = read_json(&dir.join(TAGDICT_FILE))?;
        let classes: Vec<String> = read_json(&dir.join(CLASSES_FILE))?;

        let tagger = Self::from_parts(weights, tagdict, classes)?;
        log::info!(
            "Perceptron tagger ready: {} classes, {} features, {} dictionary words",
            tagger.classes.len(),
            tagger.weights.len(),
            tagger.tagdict.len()
        );
        Ok(tagger)
    }

    /// Builds a tagger from an in-memory model, rejecting tags outside the tag set.
    pub fn from_parts(
        weights: HashMap<String, HashMap<String, f64>>,
        tagdict: HashMap<String, String>,
        classes: Vec<String>,
    ) -> Result<Self> {
        let parse_tag = |label: &str| {
            label
                .parse::<PartOfSpeechTag>()
                .map_err(|_| Error::InvalidTaggerModel(format!("unknown tag `{label}`")))
        };

        let mut labels = classes;
        labels.sort();
        labels.dedup();
        if labels.is_empty() {
            return Err(Error::InvalidTaggerModel("model has no classes".to_string()));
        }
        let classes = labels
            .iter()
            .map(|label| parse_tag(label))
            .collect::<Result<Vec<_>>>()?;
        let class_index: FxHashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();

        let weights = weights
            .into_iter()
            .map(|(feature, per_label)| {
                let per_class = per_label
                    .into_iter()
                    .map(|(label, weight)| {
                        class_index.get(label.as_str()).map(|&i| (i, weight)).ok_or_else(|| {
                            Error::InvalidTaggerModel(format!(
                                "feature `{feature}` has a weight for unknown class `{label}`"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((feature, per_class))
            })
            .collect::<Result<FxHashMap<_, _>>>()?;

        let tagdict = tagdict
            .into_iter()
            .map(|(word, label)| Ok((word, parse_tag(&label)?)))
            .collect::<Result<FxHashMap<_, _>>>()?;

        Ok(Self {
            classes,
            weights,
            tagdict,
        })
    }

    fn predict(&self, features: &[String]) -> PartOfSpeechTag {
        let mut scores = vec![0.0f64; self.classes.len()];
        for feature in features {
            if let Some(per_class) = self.weights.get(feature) {
                for &(class, weight) in per_class {
                    scores[class] += weight;
                }
            }
        }

        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if score.total_cmp(&scores[best]).is_ge() {
                best = i;
            }
        }
        self.classes[best]
    }
}

impl Tagger for PerceptronTagger {
    fn tag(&self, tokens: &[String]) -> Vec<PartOfSpeechTag> {
        let context: Vec<String> = START
            .iter()
            .map(|s| s.to_string())
            .chain(tokens.iter().map(|word| normalize(word)))
            .chain(END.iter().map(|s| s.to_string()))
            .collect();

        let mut prev = START[0].to_string();
        let mut prev2 = START[1].to_string();
        let mut tags = Vec::with_capacity(tokens.len());

        for (i, word) in tokens.iter().enumerate() {
            let tag = match self.tagdict.get(word) {
                Some(&tag) => tag,
                None => self.predict(&features(i, word, &context, &prev, &prev2)),
            };
            tags.push(tag);
            prev2 = std::mem::replace(&mut prev, tag.to_string());
        }
        tags
    }
}

fn normalize(word: &str) -> String {
    let first = word.chars().next();
    if word.contains('-') && first != Some('-') {
        "!HYPHEN".to_string()
    } else if word.chars().count() == 4 && word.chars().all(|c| c.is_ascii_digit()) {
        "!YEAR".to_string()
    } else if first.is_some_and(|c| c.is_ascii_digit()) {
        "!DIGITS".to_string()
    } else {
        word.to_lowercase()
    }
}

fn suffix(word: &str) -> &str {
    match word.char_indices().rev().nth(2) {
        Some((i, _)) => &word[i..],
        None => word,
    }
}

fn features(i: usize, word: &str, context: &[String], prev: &str, prev2: &str) -> Vec<String> {
    let i = i + START.len();
    let first: String = word.chars().take(1).collect();
    vec![
        "bias".to_string(),
        format!("i suffix {}", suffix(word)),
        format!("i pref1 {first}"),
        format!("i-1 tag {prev}"),
        format!("i-2 tag {prev2}"),
        format!("i tag+i-2 tag {prev} {prev2}"),
        format!("i word {}", context[i]),
        format!("i-1 tag+i word {prev} {}", context[i]),
        format!("i-1 word {}", context[i - 1]),
        format!("i-1 suffix {}", suffix(&context[i - 1])),
        format!("i-2 word {}", context[i - 2]),
        format!("i+1 word {}", context[i + 1]),
        format!("i+1 suffix {}", suffix(&context[i + 1])),
        format!("i+2 word {}", context[i + 2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::PartOfSpeechTag::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn model(weights: &[(&str, &str, f64)], tagdict: &[(&str, &str)]) -> PerceptronTagger {
        let mut table: HashMap<String, HashMap<String, f64>> = HashMap::new();
        for (feature, label, weight) in weights {
            table
                .entry(feature.to_string())
                .or_default()
                .insert(label.to_string(), *weight);
        }
        let tagdict = tagdict
            .iter()
            .map(|(w, t)| (w.to_string(), t.to_string()))
            .collect();
        let classes = ["DT", "NN", "NNS", "VBZ", "VBG", "JJ", "."]
            .iter()
            .map(|c| c.to_string())
            .collect();
        PerceptronTagger::from_parts(table, tagdict, classes).unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("well-known"), "!HYPHEN");
        assert_eq!(normalize("-ish"), "-ish");
        assert_eq!(normalize("1984"), "!YEAR");
        assert_eq!(normalize("42nd"), "!DIGITS");
        assert_eq!(normalize("Cookie"), "cookie");
    }

    #[test]
    fn test_suffix_counts_characters() {
        assert_eq!(suffix("stealing"), "ing");
        assert_eq!(suffix("is"), "is");
        assert_eq!(suffix("café"), "afé");
    }

    #[test]
    fn test_tag_dictionary_wins() {
        let tagger = model(&[("bias", "NN", 5.0)], &[("the", "DT")]);
        assert_eq!(tagger.tag(&tokens(&["the", "jar"])), vec![DT, NN]);
    }

    #[test]
    fn test_context_features_are_scored() {
        let tagger = model(
            &[
                ("bias", "NN", 1.0),
                ("i suffix ing", "VBG", 3.0),
                ("i-1 tag VBG", "NNS", 0.5),
                ("i suffix hes", "NNS", 1.0),
            ],
            &[],
        );
        assert_eq!(
            tagger.tag(&tokens(&["washing", "dishes"])),
            vec![VBG, NNS]
        );
    }

    #[test]
    fn test_ties_go_to_the_greatest_label() {
        let tagger = model(&[], &[]);
        // "VBZ" is the greatest label among the classes
        assert_eq!(tagger.tag(&tokens(&["anything"])), vec![VBZ]);
    }

    #[test]
    fn test_unknown_class_is_rejected() {
        let result = PerceptronTagger::from_parts(
            HashMap::new(),
            HashMap::new(),
            vec!["NN".to_string(), "-NONE-".to_string()],
        );
        assert!(matches!(result, Err(Error::InvalidTaggerModel(_))));
    }

    #[test]
    fn test_weight_for_unlisted_class_is_rejected() {
        let weights = HashMap::from([(
            "bias".to_string(),
            HashMap::from([("VB".to_string(), 1.0)]),
        )]);
        let result = PerceptronTagger::from_parts(weights, HashMap::new(), vec!["NN".to_string()]);
        assert!(matches!(result, Err(Error::InvalidTaggerModel(_))));
    }
}
