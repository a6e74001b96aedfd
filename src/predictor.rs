use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use failure::{bail, ResultExt};
use log::{debug, info};

use crate::chat_parser::{ChatParser, CustomerProfile, ParsedValues};
use crate::classifier::{build_classifier, ChurnClassifier};
use crate::errors::*;
use crate::feature_vector::{build_feature_vector, FeatureVector, FillPolicy};
use crate::models::{ChurnModel, ModelVersion};
use crate::risk_tier::RiskTier;
use crate::schema::{resolve_feature_schema, FeatureSchema};
use crate::utils::extract_artifacts_zip_archive;

/// File names of the artifacts inside a model directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub model_file: String,
    pub feature_names_file: String,
    pub legacy_feature_names_file: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            model_file: "churn_model.json".to_string(),
            feature_names_file: "feature_names.json".to_string(),
            legacy_feature_names_file: "feature_names_legacy.json".to_string(),
        }
    }
}

/// Slider panel values, each one within the bounds of its slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderInput {
    profile: CustomerProfile,
}

impl SliderInput {
    pub const TENURE_MONTHS_RANGE: (u32, u32) = (1, 60);
    pub const SEATS_RANGE: (u32, u32) = (1, 50);
    pub const MRR_AMOUNT_RANGE: (u32, u32) = (10, 1000);
    pub const BILLING_FREQUENCY_MONTHLY_RANGE: (u32, u32) = (0, 1);

    pub fn new(
        tenure_months: u32,
        seats: u32,
        mrr_amount: u32,
        billing_frequency_monthly: u32,
    ) -> Result<Self> {
        check_range("tenure_months", tenure_months, Self::TENURE_MONTHS_RANGE)?;
        check_range("seats_x", seats, Self::SEATS_RANGE)?;
        check_range("mrr_amount", mrr_amount, Self::MRR_AMOUNT_RANGE)?;
        check_range(
            "billing_frequency_monthly",
            billing_frequency_monthly,
            Self::BILLING_FREQUENCY_MONTHLY_RANGE,
        )?;
        Ok(Self {
            profile: CustomerProfile {
                tenure_months,
                seats,
                mrr_amount,
                billing_frequency_monthly: billing_frequency_monthly == 1,
            },
        })
    }

    pub fn profile(&self) -> &CustomerProfile {
        &self.profile
    }
}

impl Default for SliderInput {
    fn default() -> Self {
        Self {
            profile: CustomerProfile::default(),
        }
    }
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<()> {
    if value < min || value > max {
        return Err(ChurnPredictorError::OutOfRange {
            field,
            value,
            min,
            max,
        }
        .into());
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub probability: f32,
    pub tier: RiskTier,
}

impl RiskAssessment {
    pub fn from_probability(probability: f32) -> Self {
        Self {
            probability,
            tier: RiskTier::from_probability(probability),
        }
    }
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Churn Risk: {:.1}% | {}",
            self.probability * 100.0,
            self.tier
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrediction {
    pub parsed_values: ParsedValues,
    pub profile: CustomerProfile,
    pub assessment: RiskAssessment,
}

impl fmt::Display for ChatPrediction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} | Parsed: {}", self.assessment, self.parsed_values)
    }
}

/// Immutable handle over the loaded artifacts, serving both input surfaces
pub struct ChurnPredictor {
    schema: FeatureSchema,
    classifier: Box<dyn ChurnClassifier>,
    chat_parser: ChatParser,
}

impl ChurnPredictor {
    pub fn new(schema: FeatureSchema, classifier: Box<dyn ChurnClassifier>) -> Result<Self> {
        if classifier.nb_features() != schema.len() {
            return Err(ChurnPredictorError::SchemaMismatch {
                model: classifier.nb_features(),
                schema: schema.len(),
            }
            .into());
        }
        Ok(Self {
            schema,
            classifier,
            chat_parser: ChatParser::new()?,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with_layout(path, &ArtifactLayout::default())
    }

    pub fn from_path_with_layout<P: AsRef<Path>>(path: P, layout: &ArtifactLayout) -> Result<Self> {
        info!("Loading churn predictor ({:?}) ...", path.as_ref());
        let model = Self::load_model(path.as_ref().join(&layout.model_file))?;
        let schema = resolve_feature_schema(
            model.feature_names,
            path.as_ref().join(&layout.feature_names_file),
            path.as_ref().join(&layout.legacy_feature_names_file),
        )?;
        info!(
            "Feature schema resolved ({:?}, {} features)",
            schema.version(),
            schema.len()
        );
        let classifier = build_classifier(model.classifier, schema.len())?;
        let predictor = Self::new(schema, classifier)?;
        info!("Churn predictor loaded");
        Ok(predictor)
    }

    pub fn from_zip<R: io::Read + io::Seek>(reader: R) -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("temp_dir_churn_")
            .tempdir()?;
        let artifacts_dir_path = extract_artifacts_zip_archive(reader, temp_dir.path())?;
        Self::from_path(artifacts_dir_path)
    }

    fn check_model_version<P: AsRef<Path>>(path: P) -> Result<()> {
        let model_file = fs::File::open(&path)?;
        let model_version: ModelVersion = serde_json::from_reader(model_file)?;
        if model_version.model_version != crate::MODEL_VERSION {
            bail!(ChurnPredictorError::WrongModelVersion(
                model_version.model_version,
                crate::MODEL_VERSION
            ));
        }
        Ok(())
    }

    fn load_model<P: AsRef<Path>>(path: P) -> Result<ChurnModel> {
        let model_path = path.as_ref();
        Self::check_model_version(model_path)
            .with_context(|_| ChurnPredictorError::ModelLoad(model_path.display().to_string()))?;
        let model_file = fs::File::open(model_path)
            .with_context(|_| format!("Could not open model file {:?}", model_path))?;
        let model = serde_json::from_reader(model_file)
            .with_context(|_| format!("Invalid model file {:?}", model_path))?;
        Ok(model)
    }
}

impl ChurnPredictor {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn chat_parser(&self) -> &ChatParser {
        &self.chat_parser
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<RiskAssessment> {
        let probability = self.classifier.predict_probability(features)?;
        debug!("Predicted churn probability: {}", probability);
        Ok(RiskAssessment::from_probability(probability))
    }

    pub fn predict_sliders(&self, input: &SliderInput) -> Result<RiskAssessment> {
        let features = build_feature_vector(
            &input.profile().to_overrides(),
            &self.schema,
            FillPolicy::Zero,
        );
        self.predict(&features)
    }

    pub fn predict_chat(&self, input: &str) -> Result<ChatPrediction> {
        let parsed_values = self.chat_parser.parse_values(input);
        let profile = parsed_values.with_defaults();
        let features = build_feature_vector(
            &profile.to_overrides(),
            &self.schema,
            FillPolicy::FieldDefaults,
        );
        let assessment = self.predict(&features)?;
        Ok(ChatPrediction {
            parsed_values,
            profile,
            assessment,
        })
    }
}
