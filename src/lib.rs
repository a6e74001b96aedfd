mod chat_parser;
mod chat_session;
mod classifier;
pub mod errors;
mod feature_vector;
pub mod models;
mod predictor;
mod risk_tier;
mod schema;
#[cfg(test)]
mod testutils;
mod transcript;
mod utils;

pub const MODEL_VERSION: &str = "0.1.0";

pub use crate::chat_parser::{ChatParser, CustomerProfile, ParsedValues};
pub use crate::chat_session::ChatSession;
pub use crate::classifier::{build_classifier, ChurnClassifier, LogisticRegression, RandomForest};
pub use crate::errors::*;
pub use crate::feature_vector::{build_feature_vector, FeatureVector, FillPolicy};
pub use crate::predictor::{
    ArtifactLayout, ChatPrediction, ChurnPredictor, RiskAssessment, SliderInput,
};
pub use crate::risk_tier::RiskTier;
pub use crate::schema::{
    field_default, resolve_feature_schema, FeatureSchema, SchemaVersion,
    BILLING_FREQUENCY_MONTHLY, MRR_AMOUNT, SEATS, TENURE_MONTHS,
};
pub use crate::transcript::{ChatMessage, ChatRole, ChatTranscript};
pub use crate::utils::FeatureName;
