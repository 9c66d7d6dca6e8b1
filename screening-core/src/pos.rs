use parse_display::{Display, FromStr};

/// Penn Treebank part-of-speech tags, plus the punctuation tags the tagger emits.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    FromStr,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    schemars::JsonSchema,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum PartOfSpeechTag {
    CC,  // coordinating conjunction
    CD,  // cardinal number
    DT,  // determiner
    EX,  // existential there
    FW,  // foreign word
    IN,  // preposition or subordinating conjunction
    JJ,  // adjective
    JJR, // adjective, comparative
    JJS, // adjective, superlative
    LS,  // list item marker
    MD,  // modal
    NN,  // noun, singular or mass
    NNS, // noun, plural
    NNP, // proper noun, singular
    NNPS, // proper noun, plural
    PDT, // predeterminer
    POS, // possessive ending
    PRP, // personal pronoun
    #[display("PRP$")]
    #[serde(rename = "PRP$")]
    PrpPossessive, // possessive pronoun
    RB,  // adverb
    RBR, // adverb, comparative
    RBS, // adverb, superlative
    RP,  // particle
    SYM, // symbol
    TO,  // to
    UH,  // interjection
    VB,  // verb, base form
    VBD, // verb, past tense
    VBG, // verb, gerund or present participle
    VBN, // verb, past participle
    VBP, // verb, non-3rd person singular present
    VBZ, // verb, 3rd person singular present
    WDT, // wh-determiner
    WP,  // wh-pronoun
    #[display("WP$")]
    #[serde(rename = "WP$")]
    WpPossessive, // possessive wh-pronoun
    WRB, // wh-adverb
    #[display("$")]
    #[serde(rename = "$")]
    Dollar,
    #[display("#")]
    #[serde(rename = "#")]
    Pound,
    #[display("``")]
    #[serde(rename = "``")]
    OpeningQuote,
    #[display("''")]
    #[serde(rename = "''")]
    ClosingQuote,
    #[display("(")]
    #[serde(rename = "(")]
    OpeningParen,
    #[display(")")]
    #[serde(rename = ")")]
    ClosingParen,
    #[display(",")]
    #[serde(rename = ",")]
    Comma,
    #[display("--")]
    #[serde(rename = "--")]
    Dash,
    #[display(".")]
    #[serde(rename = ".")]
    SentenceFinal,
    #[display(":")]
    #[serde(rename = ":")]
    MidSentence,
}

impl PartOfSpeechTag {
    /// Tags lemmatized with noun rules and counted as nouns.
    pub const NOUN_LIKE: &'static [PartOfSpeechTag] = &[
        PartOfSpeechTag::NN,
        PartOfSpeechTag::NNS,
        PartOfSpeechTag::NNP,
        PartOfSpeechTag::NNPS,
    ];

    /// Tags lemmatized with verb rules. VBZ is not part of this set.
    pub const VERB_LIKE: &'static [PartOfSpeechTag] = &[
        PartOfSpeechTag::VB,
        PartOfSpeechTag::VBD,
        PartOfSpeechTag::VBG,
        PartOfSpeechTag::VBN,
        PartOfSpeechTag::VBP,
    ];

    /// Every verb tag, as matched by the chunk grammar's verb slot.
    pub const VERBS: &'static [PartOfSpeechTag] = &[
        PartOfSpeechTag::VB,
        PartOfSpeechTag::VBD,
        PartOfSpeechTag::VBG,
        PartOfSpeechTag::VBN,
        PartOfSpeechTag::VBP,
        PartOfSpeechTag::VBZ,
    ];

    pub const PRONOUNS: &'static [PartOfSpeechTag] =
        &[PartOfSpeechTag::PRP, PartOfSpeechTag::PrpPossessive];

    pub fn is_noun_like(self) -> bool {
        Self::NOUN_LIKE.contains(&self)
    }

    pub fn is_verb_like(self) -> bool {
        Self::VERB_LIKE.contains(&self)
    }

    pub fn is_pronoun(self) -> bool {
        Self::PRONOUNS.contains(&self)
    }

    /// The lemmatization rules that apply to a token carrying this tag, if any.
    pub fn word_class(self) -> Option<WordClass> {
        if self.is_noun_like() {
            Some(WordClass::Noun)
        } else if self.is_verb_like() {
            Some(WordClass::Verb)
        } else {
            None
        }
    }
}

/// The two open word classes the lemmatizer knows inflection rules for.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum WordClass {
    Noun,
    Verb,
}
