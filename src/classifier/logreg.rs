use ndarray::prelude::*;
use ndarray::s;

use super::{check_nb_features, checked_probability, ChurnClassifier};
use crate::errors::*;
use crate::feature_vector::FeatureVector;
use crate::models::LogisticRegressionModel;

pub struct LogisticRegression {
    /// intercept followed by one coefficient per feature
    weights: Array1<f32>,
}

impl LogisticRegression {
    pub fn new(intercept: f32, coeffs: Array1<f32>) -> Result<Self> {
        if coeffs.is_empty() {
            return Err(ChurnPredictorError::InvalidModel(
                "logistic regression has no coefficients".to_string(),
            )
            .into());
        }
        let weights = ::std::iter::once(intercept)
            .chain(coeffs.iter().cloned())
            .collect();
        Ok(Self { weights })
    }

    pub fn from_model(model: LogisticRegressionModel) -> Result<Self> {
        Self::new(model.intercept, Array::from(model.coeffs))
    }

    pub fn run(&self, features: &ArrayView1<f32>) -> f32 {
        let score = self.weights[0] + self.weights.slice(s![1..]).dot(features);
        sigmoid(score)
    }
}

impl ChurnClassifier for LogisticRegression {
    fn nb_features(&self) -> usize {
        // without intercept
        self.weights.len() - 1
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f32> {
        check_nb_features(self.nb_features(), features)?;
        checked_probability(self.run(&features.values()))
    }
}

fn sigmoid(x: f32) -> f32 {
    1. / (1. + (-x).exp())
}
