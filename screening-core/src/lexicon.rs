use rustc_hash::FxHashSet;

/// One picture element or action, with the words that name it.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct ConceptList {
    pub name: &'static str,
    pub words: &'static [&'static str],
}

/// The picture-scene list followed by the nine concept lists of the Cookie Theft picture.
///
/// Lists may share words; a shared word scores once per list.
pub const COOKIE_THEFT_CONCEPTS: &[ConceptList] = &[
    ConceptList {
        name: "scene",
        words: &[
            "cookie", "jar", "stool", "steal", "sink", "kitchen", "window", "curtain", "fall",
        ],
    },
    ConceptList {
        name: "mother",
        words: &["mother", "woman", "lady"],
    },
    ConceptList {
        name: "girl",
        words: &["girl", "daughter", "sister"],
    },
    ConceptList {
        name: "boy",
        words: &["boy", "son", "child", "kid", "brother"],
    },
    ConceptList {
        name: "dishes",
        words: &["dish", "plate", "cup"],
    },
    ConceptList {
        name: "overflow",
        words: &["overflow", "spill", "running"],
    },
    ConceptList {
        name: "chores",
        words: &["dry", "wash"],
    },
    ConceptList {
        name: "faucet",
        words: &["faucet"],
    },
    ConceptList {
        name: "furniture",
        words: &["counter", "cabinet"],
    },
    ConceptList {
        name: "water",
        words: &["water"],
    },
];

#[derive(Clone, Copy, Debug)]
pub struct ConceptLexicon {
    pub lists: &'static [ConceptList],
}

impl Default for ConceptLexicon {
    fn default() -> Self {
        Self {
            lists: COOKIE_THEFT_CONCEPTS,
        }
    }
}

impl ConceptLexicon {
    /// Sum over all lists of how many of the list's words occur among `lemmas`.
    ///
    /// Lemmas are compared lowercased.
    pub fn concept_count<'a>(&self, lemmas: impl IntoIterator<Item = &'a str>) -> usize {
        let lemmas: FxHashSet<String> = lemmas.into_iter().map(str::to_lowercase).collect();
        self.lists
            .iter()
            .map(|list| {
                list.words
                    .iter()
                    .filter(|word| lemmas.contains(**word))
                    .count()
            })
            .sum()
    }

    /// Names of the lists with at least one word among `lemmas`.
    pub fn concepts_mentioned<'a>(
        &self,
        lemmas: impl IntoIterator<Item = &'a str>,
    ) -> Vec<&'static str> {
        let lemmas: FxHashSet<String> = lemmas.into_iter().map(str::to_lowercase).collect();
        self.lists
            .iter()
            .filter(|list| list.words.iter().any(|word| lemmas.contains(*word)))
            .map(|list| list.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_from_single_list() {
        let lexicon = ConceptLexicon::default();
        assert_eq!(lexicon.concept_count(["faucet", "the", "."]), 1);
    }

    #[test]
    fn test_counts_each_word_once() {
        let lexicon = ConceptLexicon::default();
        assert_eq!(lexicon.concept_count(["cookie", "cookie", "jar"]), 2);
    }

    #[test]
    fn test_case_insensitive() {
        let lexicon = ConceptLexicon::default();
        assert_eq!(lexicon.concept_count(["Mother", "WATER"]), 2);
    }

    #[test]
    fn test_shared_words_count_per_list() {
        static LISTS: &[ConceptList] = &[
            ConceptList {
                name: "a",
                words: &["sink", "water"],
            },
            ConceptList {
                name: "b",
                words: &["water"],
            },
        ];
        let lexicon = ConceptLexicon { lists: LISTS };
        assert_eq!(lexicon.concept_count(["water"]), 2);
        assert_eq!(lexicon.concepts_mentioned(["water"]), vec!["a", "b"]);
    }

    #[test]
    fn test_concepts_mentioned() {
        let lexicon = ConceptLexicon::default();
        assert_eq!(
            lexicon.concepts_mentioned(["boy", "steal", "plate", "nothing"]),
            vec!["scene", "boy", "dishes"]
        );
        assert!(lexicon.concepts_mentioned([]).is_empty());
    }
}
