//! WordNet lemmatization ("morphy"): exception lists first, then iterated suffix detachment,
//! keeping only candidates that WordNet knows for the word class.

use crate::{Error, Result, pos::WordClass};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;

const NOUN_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

pub trait Lemmatizer: Send + Sync {
    /// Dictionary form of `word` for the given word class, or `None` when the word is unknown.
    fn lemmatize(&self, word: &str, class: WordClass) -> Option<String>;
}

#[derive(Default)]
struct ClassTables {
    lemmas: FxHashSet<String>,
    exceptions: FxHashMap<String, Vec<String>>,
}

pub struct WordNetLemmatizer {
    nouns: ClassTables,
    verbs: ClassTables,
}

impl WordNetLemmatizer {
    /// Reads `index.noun`, `index.verb`, `noun.exc` and `verb.exc` from a WordNet `dict` directory.
    pub fn load(dir: &Path) -> Result<Self> {
        log::info!("Loading WordNet tables from {}", dir.display());
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|source| Error::Io { path, source })
        };

        let lemmatizer = Self::from_sources(
            &read("index.noun")?,
            &read("noun.exc")?,
            &read("index.verb")?,
            &read("verb.exc")?,
        )?;
        log::info!(
            "WordNet ready: {} noun lemmas, {} verb lemmas",
            lemmatizer.nouns.lemmas.len(),
            lemmatizer.verbs.lemmas.len()
        );
        Ok(lemmatizer)
    }

    /// Builds the tables from the contents of the index and exception files.
    pub fn from_sources(
        noun_index: &str,
        noun_exceptions: &str,
        verb_index: &str,
        verb_exceptions: &str,
    ) -> Result<Self> {
        let nouns = ClassTables {
            lemmas: parse_index(noun_index),
            exceptions: parse_exceptions(noun_exceptions),
        };
        let verbs = ClassTables {
            lemmas: parse_index(verb_index),
            exceptions: parse_exceptions(verb_exceptions),
        };
        if nouns.lemmas.is_empty() || verbs.lemmas.is_empty() {
            return Err(Error::InvalidWordNet(
                "noun and verb indexes must both list lemmas".to_string(),
            ));
        }
        Ok(Self { nouns, verbs })
    }

    fn tables(&self, class: WordClass) -> (&ClassTables, &'static [(&'static str, &'static str)]) {
        match class {
            WordClass::Noun => (&self.nouns, NOUN_SUBSTITUTIONS),
            WordClass::Verb => (&self.verbs, VERB_SUBSTITUTIONS),
        }
    }

    /// Every candidate lemma in the order WordNet's morphy produces them.
    pub fn morphy(&self, form: &str, class: WordClass) -> Vec<String> {
        let (tables, substitutions) = self.tables(class);

        let known = |forms: Vec<String>| -> Vec<String> {
            let mut seen = FxHashSet::default();
            forms
                .into_iter()
                .filter(|form| tables.lemmas.contains(form) && seen.insert(form.clone()))
                .collect()
        };
        let detach = |forms: &[String]| -> Vec<String> {
            forms
                .iter()
                .flat_map(|form| {
                    substitutions.iter().filter_map(move |(old, new)| {
                        form.strip_suffix(old).map(|stem| format!("{stem}{new}"))
                    })
                })
                .collect()
        };

        if let Some(bases) = tables.exceptions.get(form) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return known(forms);
        }

        let mut forms = detach(&[form.to_string()]);
        let mut candidates = vec![form.to_string()];
        candidates.extend(forms.iter().cloned());
        let results = known(candidates);
        if !results.is_empty() {
            return results;
        }

        while !forms.is_empty() {
            forms = detach(&forms);
            let results = known(forms.clone());
            if !results.is_empty() {
                return results;
            }
        }
        Vec::new()
    }
}

impl Lemmatizer for WordNetLemmatizer {
    fn lemmatize(&self, word: &str, class: WordClass) -> Option<String> {
        // shortest candidate, first one on ties
        self.morphy(&word.to_lowercase(), class)
            .into_iter()
            .min_by_key(|candidate| candidate.chars().count())
    }
}

fn parse_index(content: &str) -> FxHashSet<String> {
    content
        .lines()
        .filter(|line| !line.starts_with(' '))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn parse_exceptions(content: &str) -> FxHashMap<String, Vec<String>> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let inflected = fields.next()?;
            Some((inflected.to_string(), fields.map(str::to_string).collect()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::WordClass::{Noun, Verb};

    const NOUN_INDEX: &str = "  1 This software and database is being provided
  2 to you, the LICENSEE, by Princeton University
boy n 3 3 @ ~ + 3 1 10305010 10285313 09890662
child n 4 3 @ ~ %p 4 2 09918248 09917593 10332385 09845999
dish n 6 3 @ ~ + 6 1 03206908 07557434 07579787 07580053 03207305 03207470
glass n 7 3 @ ~ + 7 2 03438257 07963711 03438661 04432662 13384557 03438801 03439814
mouse n 4 3 @ ~ %p 4 1 02330245 03793489 10344922 14379829
woman n 4 3 @ ~ + 4 2 10787470 10788852 09637912 10788231
";
    const NOUN_EXC: &str = "children child\nmice mouse\n";
    const VERB_INDEX: &str = "  1 This software and database is being provided
be v 13 4 @ ~ $ > 13 13 02604760 02620587 02445925 02697725 02268246 02614181 02744820 02702508 02603699 02664769 02616386 02655135 02603926
dry v 2 3 @ ~ > 2 2 00218475 00219012
run v 41 4 @ ~ * $ 41 24 01926311 01914832
steal v 2 3 @ ~ $ 2 2 02321757 01163047
wash v 12 5 @ ~ * $ + 12 5 00036362 01532589
";
    const VERB_EXC: &str = "ran run\nwas be\nwere be\n";

    fn lemmatizer() -> WordNetLemmatizer {
        WordNetLemmatizer::from_sources(NOUN_INDEX, NOUN_EXC, VERB_INDEX, VERB_EXC).unwrap()
    }

    fn lemma(word: &str, class: WordClass) -> Option<String> {
        lemmatizer().lemmatize(word, class)
    }

    #[test]
    fn test_license_header_is_skipped() {
        let lemmatizer = lemmatizer();
        assert!(!lemmatizer.nouns.lemmas.contains("1"));
        assert!(!lemmatizer.nouns.lemmas.contains("2"));
        assert!(lemmatizer.nouns.lemmas.contains("boy"));
    }

    #[test]
    fn test_noun_rules() {
        assert_eq!(lemma("boys", Noun).as_deref(), Some("boy"));
        assert_eq!(lemma("dishes", Noun).as_deref(), Some("dish"));
        assert_eq!(lemma("glasses", Noun).as_deref(), Some("glass"));
        assert_eq!(lemma("women", Noun).as_deref(), Some("woman"));
    }

    #[test]
    fn test_exception_lists() {
        assert_eq!(lemma("children", Noun).as_deref(), Some("child"));
        assert_eq!(lemma("mice", Noun).as_deref(), Some("mouse"));
        assert_eq!(lemma("ran", Verb).as_deref(), Some("run"));
        assert_eq!(lemma("was", Verb).as_deref(), Some("be"));
    }

    #[test]
    fn test_verb_rules() {
        assert_eq!(lemma("stealing", Verb).as_deref(), Some("steal"));
        assert_eq!(lemma("washed", Verb).as_deref(), Some("wash"));
        assert_eq!(lemma("dries", Verb).as_deref(), Some("dry"));
    }

    #[test]
    fn test_case_is_folded() {
        assert_eq!(lemma("Boys", Noun).as_deref(), Some("boy"));
    }

    #[test]
    fn test_unknown_word_has_no_lemma() {
        assert_eq!(lemma("cookies", Noun), None);
        assert_eq!(lemma("stealing", Noun), None);
    }

    #[test]
    fn test_empty_index_is_rejected() {
        let result = WordNetLemmatizer::from_sources("", "", VERB_INDEX, VERB_EXC);
        assert!(matches!(result, Err(Error::InvalidWordNet(_))));
    }
}
