//! Scoring of feature vectors with a pretrained binary classifier.

use crate::{
    Error, Result,
    features::{FEATURE_COUNT, FeatureVector},
    read_json,
};
use std::path::Path;

#[derive(
    Clone,
    Copy,
    Debug,
    parse_display::Display,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    schemars::JsonSchema,
)]
pub enum Label {
    #[display("Control (0)")]
    #[serde(rename = "Control (0)")]
    Control,
    #[display("Possible Dementia (1)")]
    #[serde(rename = "Possible Dementia (1)")]
    PossibleDementia,
}

impl Label {
    pub fn class(self) -> usize {
        match self {
            Label::Control => 0,
            Label::PossibleDementia => 1,
        }
    }
}

/// A trained scorer over the ten-feature input. Implementations are immutable once built.
pub trait Classifier: Send + Sync {
    /// Probabilities of class 0 and class 1.
    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2];

    fn predict(&self, features: &FeatureVector) -> Label {
        let [_, positive] = self.predict_proba(features);
        if positive > 0.5 {
            Label::PossibleDementia
        } else {
            Label::Control
        }
    }
}

/// A label together with the probability of that label, in percent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Screening {
    pub label: Label,
    pub confidence_percent: f64,
}

impl Screening {
    pub fn score(classifier: &dyn Classifier, features: &FeatureVector) -> Self {
        let label = classifier.predict(features);
        let probabilities = classifier.predict_proba(features);
        Self {
            label,
            confidence_percent: round_to_hundredths(probabilities[label.class()] * 100.0),
        }
    }
}

/// Rounds the exact binary value to two decimals, so `0.015` (stored just below) gives `0.01`.
fn round_to_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

// The subset of the XGBoost JSON model format needed for scoring.

#[derive(serde::Deserialize)]
struct ModelFile {
    learner: LearnerFile,
}

#[derive(serde::Deserialize)]
struct LearnerFile {
    learner_model_param: LearnerParams,
    objective: ObjectiveFile,
    gradient_booster: BoosterFile,
}

#[derive(serde::Deserialize)]
struct LearnerParams {
    base_score: Scalar,
    num_feature: Scalar,
}

#[derive(serde::Deserialize)]
struct ObjectiveFile {
    name: String,
}

#[derive(serde::Deserialize)]
struct BoosterFile {
    name: String,
    model: Option<ForestFile>,
}

#[derive(serde::Deserialize)]
struct ForestFile {
    trees: Vec<TreeFile>,
}

#[derive(serde::Deserialize)]
struct TreeFile {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    default_left: Flags,
}

/// Numbers are written as strings (`"5E-1"`), sometimes wrapped in brackets (`"[5E-1]"`).
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn value(&self, name: &str) -> Result<f64> {
        match self {
            Scalar::Number(n) => Ok(*n),
            Scalar::Text(text) => text
                .trim()
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse()
                .map_err(|_| invalid(format!("`{name}` is not a number: {text:?}"))),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Flags {
    Bools(Vec<bool>),
    Ints(Vec<u8>),
}

impl Flags {
    fn into_bools(self) -> Vec<bool> {
        match self {
            Flags::Bools(flags) => flags,
            Flags::Ints(flags) => flags.into_iter().map(|flag| flag != 0).collect(),
        }
    }
}

fn invalid(message: String) -> Error {
    Error::ClassifierUnavailable(message)
}

#[derive(Clone, Debug)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf(f64),
}

#[derive(Clone, Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_file(tree: TreeFile, num_feature: usize, id: usize) -> Result<Self> {
        let TreeFile {
            left_children,
            right_children,
            split_indices,
            split_conditions,
            default_left,
        } = tree;
        let default_left = default_left.into_bools();
        let len = left_children.len();
        if len == 0 {
            return Err(invalid(format!("tree {id} has no nodes")));
        }
        if [
            right_children.len(),
            split_indices.len(),
            split_conditions.len(),
            default_left.len(),
        ]
        .iter()
        .any(|&other| other != len)
        {
            return Err(invalid(format!(
                "tree {id} has node arrays of different lengths"
            )));
        }

        let child = |node: usize, index: i64| -> Result<usize> {
            // children always come after their parent, so routing terminates
            usize::try_from(index)
                .ok()
                .filter(|&index| index > node && index < len)
                .ok_or_else(|| invalid(format!("tree {id} node {node} has bad child {index}")))
        };

        let mut nodes = Vec::with_capacity(len);
        for i in 0..len {
            let node = match (left_children[i], right_children[i]) {
                (-1, -1) => Node::Leaf(split_conditions[i]),
                (left, right) => {
                    let feature = usize::try_from(split_indices[i])
                        .ok()
                        .filter(|&feature| feature < num_feature)
                        .ok_or_else(|| {
                            invalid(format!(
                                "tree {id} node {i} splits on feature {}",
                                split_indices[i]
                            ))
                        })?;
                    Node::Split {
                        feature,
                        threshold: split_conditions[i] as f32,
                        left: child(i, left)?,
                        right: child(i, right)?,
                        default_left: default_left[i],
                    }
                }
            };
            nodes.push(node);
        }
        Ok(Self { nodes })
    }

    fn leaf_value(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = features[*feature];
                    // inputs are compared in single precision like the trainer does
                    let go_left = if value.is_nan() {
                        *default_left
                    } else {
                        (value as f32) < *threshold
                    };
                    index = if go_left { *left } else { *right };
                }
            }
        }
    }
}

/// A gradient-boosted tree ensemble with a logistic objective, read from an XGBoost JSON model.
#[derive(Clone, Debug)]
pub struct BoostedTrees {
    base_margin: f64,
    trees: Vec<Tree>,
}

impl BoostedTrees {
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading classifier from {}", path.display());
        let file: ModelFile = read_json(path)?;
        let model = Self::from_model_file(file)?;
        log::info!("Classifier ready: {} trees", model.trees.len());
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ModelFile = serde_json::from_str(json)
            .map_err(|e| invalid(format!("not an XGBoost JSON model: {e}")))?;
        Self::from_model_file(file)
    }

    fn from_model_file(file: ModelFile) -> Result<Self> {
        let learner = file.learner;
        if learner.objective.name != "binary:logistic" {
            return Err(invalid(format!(
                "unsupported objective `{}`",
                learner.objective.name
            )));
        }
        let params = &learner.learner_model_param;
        let num_feature = params.num_feature.value("num_feature")?;
        if num_feature != FEATURE_COUNT as f64 {
            return Err(invalid(format!(
                "model expects {num_feature} features, not {FEATURE_COUNT}"
            )));
        }
        let base_score = params.base_score.value("base_score")?;
        if !(base_score > 0.0 && base_score < 1.0) {
            return Err(invalid(format!(
                "base_score {base_score} is not a probability"
            )));
        }

        let booster = learner.gradient_booster;
        let forest = match (booster.name.as_str(), booster.model) {
            ("gbtree", Some(forest)) => forest,
            (name, _) => return Err(invalid(format!("unsupported booster `{name}`"))),
        };
        let trees = forest
            .trees
            .into_iter()
            .enumerate()
            .map(|(id, tree)| Tree::from_file(tree, FEATURE_COUNT, id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base_margin: (base_score / (1.0 - base_score)).ln(),
            trees,
        })
    }

    pub fn margin(&self, features: &FeatureVector) -> f64 {
        self.base_margin
            + self
                .trees
                .iter()
                .map(|tree| tree.leaf_value(features.values()))
                .sum::<f64>()
    }
}

impl Classifier for BoostedTrees {
    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2] {
        let positive = 1.0 / (1.0 + (-self.margin(features)).exp());
        [1.0 - positive, positive]
    }
}
