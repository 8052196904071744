//! Classifier adapter: the trained-predictor capability and its concrete
//! decision-forest implementation.
//!
//! The serving core depends only on [`Predictor`]; the forest is one
//! pluggable implementation, trained offline and distributed as a versioned
//! JSON artifact. Inference only — no training, no mutation after load.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::features::FEATURE_COUNT;
use crate::types::{FeatureVector, Label};

/// A trained, immutable binary classifier over the fixed feature vector.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Label;

    fn predict_batch(&self, batch: &[FeatureVector]) -> Vec<Label> {
        batch.iter().map(|features| self.predict(features)).collect()
    }
}

/// One node of a decision tree. `Split` children are indices into the
/// owning tree's node vector and must point strictly forward, which both
/// rules out cycles and lets `validate` prove every walk terminates at a
/// leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: Label,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walks from the root (node 0) to a leaf. Callers must have validated
    /// the tree; validation guarantees in-range, forward-only children.
    fn predict(&self, features: &FeatureVector) -> Label {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { label } => return *label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features.column(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn validate(&self, tree: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::EmptyTree { tree });
        }
        for (node, entry) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = entry
            {
                if *feature >= FEATURE_COUNT {
                    return Err(ModelError::BadFeatureIndex {
                        tree,
                        node,
                        feature: *feature,
                    });
                }
                if !threshold.is_finite() {
                    return Err(ModelError::NonFiniteThreshold { tree, node });
                }
                for &child in [left, right] {
                    if child <= node || child >= self.nodes.len() {
                        return Err(ModelError::BadChildIndex { tree, node, child });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Serialized decision forest — the standard trained-predictor artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    /// Human-readable model identifier.
    pub model_id: String,
    /// Version of the training run that produced this forest.
    pub model_version: String,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let forest: Self = serde_json::from_str(json).map_err(ModelError::ParseJson)?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(ModelError::Io)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index)?;
        }
        Ok(())
    }
}

impl Predictor for RandomForest {
    /// Majority vote over the trees. A tie resolves to `dga`: for a
    /// security classifier the conservative side of a coin flip is the
    /// suspicious label.
    fn predict(&self, features: &FeatureVector) -> Label {
        let dga_votes = self
            .trees
            .iter()
            .filter(|tree| tree.predict(features) == Label::Dga)
            .count();
        if dga_votes * 2 >= self.trees.len() {
            Label::Dga
        } else {
            Label::Legit
        }
    }
}

#[derive(Debug)]
pub enum ModelError {
    EmptyForest,
    EmptyTree { tree: usize },
    BadFeatureIndex { tree: usize, node: usize, feature: usize },
    BadChildIndex { tree: usize, node: usize, child: usize },
    NonFiniteThreshold { tree: usize, node: usize },
    ParseJson(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyForest => write!(f, "forest contains no trees"),
            Self::EmptyTree { tree } => write!(f, "tree {tree} contains no nodes"),
            Self::BadFeatureIndex { tree, node, feature } => {
                write!(f, "tree {tree} node {node} splits on feature {feature}, but only {FEATURE_COUNT} features exist")
            }
            Self::BadChildIndex { tree, node, child } => {
                write!(f, "tree {tree} node {node} has out-of-order or out-of-range child {child}")
            }
            Self::NonFiniteThreshold { tree, node } => {
                write!(f, "tree {tree} node {node} has a non-finite split threshold")
            }
            Self::ParseJson(e) => write!(f, "model JSON parse error: {e}"),
            Self::Io(e) => write!(f, "model file IO error: {e}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseJson(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
