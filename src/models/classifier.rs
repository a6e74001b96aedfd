use serde_derive::Deserialize;

use crate::utils::FeatureName;

#[derive(Debug, Deserialize)]
pub struct ModelVersion {
    pub model_version: String,
}

#[derive(Debug, Deserialize)]
pub struct ChurnModel {
    pub model_version: String,
    #[serde(default)]
    pub feature_names: Option<Vec<FeatureName>>,
    #[serde(flatten)]
    pub classifier: ClassifierModel,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "model_type")]
#[serde(rename_all = "snake_case")]
pub enum ClassifierModel {
    LogisticRegression(LogisticRegressionModel),
    RandomForest(RandomForestModel),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LogisticRegressionModel {
    pub intercept: f32,
    pub coeffs: Vec<f32>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RandomForestModel {
    pub trees: Vec<DecisionTreeModel>,
}

/// Flattened binary tree, one entry per node in every array
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DecisionTreeModel {
    pub children_left: Vec<i32>,
    pub children_right: Vec<i32>,
    pub feature: Vec<i32>,
    pub threshold: Vec<f32>,
    /// positive class probability, only meaningful on leaves
    pub value: Vec<f32>,
}
