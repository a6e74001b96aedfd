use ndarray::prelude::*;

use super::{check_nb_features, checked_probability, ChurnClassifier};
use crate::errors::*;
use crate::feature_vector::FeatureVector;
use crate::models::{DecisionTreeModel, RandomForestModel};

const LEAF: i32 = -1;

/// Average of the positive class probabilities of several decision trees
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    nb_features: usize,
}

struct DecisionTree {
    nodes: Vec<Node>,
}

enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        probability: f32,
    },
}

impl RandomForest {
    pub fn from_model(model: RandomForestModel) -> Result<Self> {
        if model.trees.is_empty() {
            return Err(invalid_model("random forest has no trees".to_string()));
        }
        let trees = model
            .trees
            .into_iter()
            .enumerate()
            .map(|(tree_index, tree)| DecisionTree::from_model(tree_index, tree))
            .collect::<Result<Vec<_>>>()?;
        let nb_features = trees
            .iter()
            .filter_map(|tree| tree.max_feature_index())
            .max()
            .map(|max_index| max_index + 1)
            .unwrap_or(0);
        Ok(Self { trees, nb_features })
    }

    /// Widens the expected input, for schemas holding features no tree splits on
    pub fn with_nb_features(mut self, nb_features: usize) -> Result<Self> {
        if nb_features < self.nb_features {
            return Err(ChurnPredictorError::SchemaMismatch {
                model: self.nb_features,
                schema: nb_features,
            }
            .into());
        }
        self.nb_features = nb_features;
        Ok(self)
    }

    pub fn run(&self, features: &ArrayView1<f32>) -> f32 {
        let total: f32 = self.trees.iter().map(|tree| tree.run(features)).sum();
        total / self.trees.len() as f32
    }
}

impl ChurnClassifier for RandomForest {
    fn nb_features(&self) -> usize {
        self.nb_features
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f32> {
        check_nb_features(self.nb_features, features)?;
        checked_probability(self.run(&features.values()))
    }
}

impl DecisionTree {
    fn from_model(tree_index: usize, model: DecisionTreeModel) -> Result<Self> {
        let nb_nodes = model.children_left.len();
        if nb_nodes == 0 {
            return Err(invalid_model(format!("tree {} has no nodes", tree_index)));
        }
        if [
            model.children_right.len(),
            model.feature.len(),
            model.threshold.len(),
            model.value.len(),
        ]
        .iter()
        .any(|len| *len != nb_nodes)
        {
            return Err(invalid_model(format!(
                "tree {} has node arrays of different lengths",
                tree_index
            )));
        }

        let nodes = (0..nb_nodes)
            .map(|node_index| {
                let left = model.children_left[node_index];
                let right = model.children_right[node_index];
                if left == LEAF {
                    let probability = model.value[node_index];
                    if !(0.0..=1.0).contains(&probability) {
                        return Err(invalid_model(format!(
                            "leaf {} of tree {} holds {} which is not a probability",
                            node_index, tree_index, probability
                        )));
                    }
                    return Ok(Node::Leaf { probability });
                }
                // children always come after their parent, which rules out cycles
                let child_index = |child: i32| -> Result<usize> {
                    if child as i64 > node_index as i64 && (child as usize) < nb_nodes {
                        Ok(child as usize)
                    } else {
                        Err(invalid_model(format!(
                            "node {} of tree {} has invalid child {}",
                            node_index, tree_index, child
                        )))
                    }
                };
                let feature = model.feature[node_index];
                if feature < 0 {
                    return Err(invalid_model(format!(
                        "node {} of tree {} splits on invalid feature {}",
                        node_index, tree_index, feature
                    )));
                }
                Ok(Node::Split {
                    feature: feature as usize,
                    threshold: model.threshold[node_index],
                    left: child_index(left)?,
                    right: child_index(right)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { nodes })
    }

    fn max_feature_index(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .max()
    }

    fn run(&self, features: &ArrayView1<f32>) -> f32 {
        let mut node_index = 0;
        loop {
            match self.nodes[node_index] {
                Node::Leaf { probability } => return probability,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node_index = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

fn invalid_model(message: String) -> failure::Error {
    ChurnPredictorError::InvalidModel(message).into()
}
