mod logreg;
mod random_forest;

use log::info;

pub use self::logreg::LogisticRegression;
pub use self::random_forest::RandomForest;
use crate::errors::*;
use crate::feature_vector::FeatureVector;
use crate::models::ClassifierModel;

/// A trained binary churn classifier
pub trait ChurnClassifier: Send + Sync {
    /// Number of features expected, in schema order
    fn nb_features(&self) -> usize;

    /// Probability of the positive (churn) class, within [0, 1]
    fn predict_probability(&self, features: &FeatureVector) -> Result<f32>;
}

/// Builds the classifier of `model` for an input of `nb_features` features
pub fn build_classifier(
    model: ClassifierModel,
    nb_features: usize,
) -> Result<Box<dyn ChurnClassifier>> {
    let classifier: Box<dyn ChurnClassifier> = match model {
        ClassifierModel::LogisticRegression(model) => {
            info!("Loading logistic regression classifier ...");
            Box::new(LogisticRegression::from_model(model)?)
        }
        ClassifierModel::RandomForest(model) => {
            info!("Loading random forest classifier ({} trees) ...", model.trees.len());
            Box::new(RandomForest::from_model(model)?.with_nb_features(nb_features)?)
        }
    };
    if classifier.nb_features() != nb_features {
        return Err(ChurnPredictorError::SchemaMismatch {
            model: classifier.nb_features(),
            schema: nb_features,
        }
        .into());
    }
    info!("Classifier loaded");
    Ok(classifier)
}

fn check_nb_features(expected: usize, features: &FeatureVector) -> Result<()> {
    if features.len() != expected {
        return Err(ChurnPredictorError::Prediction(format!(
            "expected {} features but got {}",
            expected,
            features.len()
        ))
        .into());
    }
    Ok(())
}

fn checked_probability(probability: f32) -> Result<f32> {
    if !probability.is_finite() {
        return Err(ChurnPredictorError::Prediction(format!(
            "classifier output {} is not a probability",
            probability
        ))
        .into());
    }
    Ok(probability.max(0.0).min(1.0))
}
