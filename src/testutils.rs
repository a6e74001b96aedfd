use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};

use failure::format_err;
use tempfile::TempDir;

use crate::classifier::ChurnClassifier;
use crate::errors::*;
use crate::feature_vector::{build_feature_vector, FeatureVector, FillPolicy};
use crate::schema::{FeatureSchema, SchemaVersion};

pub const PRODUCTION_FEATURES: [&str; 4] = [
    "tenure_months",
    "seats_x",
    "mrr_amount",
    "billing_frequency_monthly",
];

pub fn epsilon_eq(a: f32, b: f32, epsilon: f32) -> bool {
    let diff = a - b;
    diff < epsilon && diff > -epsilon
}

pub fn schema(version: SchemaVersion, feature_names: &[&str]) -> FeatureSchema {
    FeatureSchema::new(
        version,
        feature_names.iter().map(|name| name.to_string()).collect(),
    )
    .unwrap()
}

pub fn feature_vector(values: &[(&str, f32)]) -> FeatureVector {
    let names: Vec<&str> = values.iter().map(|(name, _)| *name).collect();
    let overrides: HashMap<String, f32> = values
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect();
    build_feature_vector(
        &overrides,
        &schema(SchemaVersion::Production, &names),
        FillPolicy::Zero,
    )
}

/// Classifier returning a fixed probability and recording its last input
#[derive(Clone)]
pub struct MockedClassifier {
    nb_features: usize,
    probability: Option<f32>,
    last_features: Arc<Mutex<Option<FeatureVector>>>,
}

impl MockedClassifier {
    pub fn new(nb_features: usize, probability: f32) -> Self {
        Self {
            nb_features,
            probability: Some(probability),
            last_features: Arc::default(),
        }
    }

    pub fn failing(nb_features: usize) -> Self {
        Self {
            nb_features,
            probability: None,
            last_features: Arc::default(),
        }
    }

    pub fn last_features(&self) -> Option<FeatureVector> {
        self.last_features.lock().unwrap().clone()
    }
}

impl ChurnClassifier for MockedClassifier {
    fn nb_features(&self) -> usize {
        self.nb_features
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f32> {
        *self.last_features.lock().unwrap() = Some(features.clone());
        self.probability
            .ok_or_else(|| format_err!("mocked classifier failure"))
    }
}

/// Writes a model directory with the default artifact names
pub fn write_artifacts(
    model: &serde_json::Value,
    feature_names: Option<&serde_json::Value>,
    legacy_feature_names: Option<&serde_json::Value>,
) -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("churn_model.json"), model.to_string()).unwrap();
    if let Some(names) = feature_names {
        fs::write(temp_dir.path().join("feature_names.json"), names.to_string()).unwrap();
    }
    if let Some(names) = legacy_feature_names {
        fs::write(
            temp_dir.path().join("feature_names_legacy.json"),
            names.to_string(),
        )
        .unwrap();
    }
    temp_dir
}
