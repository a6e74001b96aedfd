use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use failure::ResultExt;
use log::info;

use crate::errors::*;
use crate::utils::FeatureName;

pub const TENURE_MONTHS: &str = "tenure_months";
pub const SEATS: &str = "seats_x";
pub const MRR_AMOUNT: &str = "mrr_amount";
pub const BILLING_FREQUENCY_MONTHLY: &str = "billing_frequency_monthly";

pub const DEFAULT_TENURE_MONTHS: u32 = 12;
pub const DEFAULT_SEATS: u32 = 5;
pub const DEFAULT_MRR_AMOUNT: u32 = 100;
pub const DEFAULT_BILLING_FREQUENCY_MONTHLY: bool = true;

/// Default used for a customer field the user did not describe, `None` for
/// features outside of the four customer fields
pub fn field_default(feature_name: &str) -> Option<f32> {
    match feature_name {
        TENURE_MONTHS => Some(DEFAULT_TENURE_MONTHS as f32),
        SEATS => Some(DEFAULT_SEATS as f32),
        MRR_AMOUNT => Some(DEFAULT_MRR_AMOUNT as f32),
        BILLING_FREQUENCY_MONTHLY => Some(if DEFAULT_BILLING_FREQUENCY_MONTHLY {
            1.0
        } else {
            0.0
        }),
        _ => None,
    }
}

/// Where the resolved feature names came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Names shipped inside the model artifact itself
    ModelEmbedded,
    Production,
    Legacy,
}

/// Ordered list of the feature names a classifier consumes, resolved once at
/// load time. The order is the positional layout of the classifier input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    version: SchemaVersion,
    feature_names: Vec<FeatureName>,
}

impl FeatureSchema {
    pub fn new(version: SchemaVersion, feature_names: Vec<FeatureName>) -> Result<Self> {
        if feature_names.is_empty() {
            return Err(ChurnPredictorError::InvalidSchema(
                "feature name list is empty".to_string(),
            )
            .into());
        }
        if let Some(duplicate) = first_duplicate(&feature_names) {
            return Err(ChurnPredictorError::InvalidSchema(format!(
                "duplicated feature name '{}'",
                duplicate
            ))
            .into());
        }
        Ok(Self {
            version,
            feature_names,
        })
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn feature_names(&self) -> &[FeatureName] {
        &self.feature_names
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }

    pub fn contains(&self, feature_name: &str) -> bool {
        self.feature_names.iter().any(|name| name == feature_name)
    }
}

/// Resolves the schema in precedence order: names embedded in the model, then
/// the production names file, then the legacy one. A missing production file
/// falls back to the legacy file, an unreadable one does not.
pub fn resolve_feature_schema<P: AsRef<Path>, Q: AsRef<Path>>(
    embedded_feature_names: Option<Vec<FeatureName>>,
    production_path: P,
    legacy_path: Q,
) -> Result<FeatureSchema> {
    if let Some(feature_names) = embedded_feature_names {
        info!("Using the {} feature names embedded in the model", feature_names.len());
        return FeatureSchema::new(SchemaVersion::ModelEmbedded, feature_names);
    }
    let production_path = production_path.as_ref();
    if production_path.exists() {
        info!("Loading production feature names ({:?}) ...", production_path);
        let feature_names = load_feature_names(production_path)?;
        return FeatureSchema::new(SchemaVersion::Production, feature_names);
    }
    let legacy_path = legacy_path.as_ref();
    if legacy_path.exists() {
        info!(
            "Production feature names not found, falling back to legacy ({:?}) ...",
            legacy_path
        );
        let feature_names = load_feature_names(legacy_path)?;
        return FeatureSchema::new(SchemaVersion::Legacy, feature_names);
    }
    Err(ChurnPredictorError::MissingFeatureNames(format!(
        "{:?} or {:?}",
        production_path, legacy_path
    ))
    .into())
}

fn first_duplicate(feature_names: &[FeatureName]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(feature_names.len());
    for name in feature_names {
        if !seen.insert(name.as_str()) {
            return Some(name.as_str());
        }
    }
    None
}

fn load_feature_names(path: &Path) -> Result<Vec<FeatureName>> {
    let file = File::open(path)
        .with_context(|_| format!("Cannot open feature names file {:?}", path))?;
    let feature_names: Vec<FeatureName> = serde_json::from_reader(file)
        .with_context(|_| format!("Cannot deserialize feature names file {:?}", path))?;
    Ok(feature_names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(values: &[&str]) -> Vec<FeatureName> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_schema_rejects_empty_and_duplicated_names() {
        assert!(FeatureSchema::new(SchemaVersion::Production, vec![]).is_err());
        assert!(FeatureSchema::new(
            SchemaVersion::Production,
            names(&["tenure_months", "tenure_months"])
        )
        .is_err());
    }

    #[test]
    fn test_embedded_names_take_precedence() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let production_path = temp_dir.path().join("feature_names.json");
        fs::write(&production_path, r#"["tenure_months", "seats_x"]"#).unwrap();

        // When
        let schema = resolve_feature_schema(
            Some(names(&["mrr_amount"])),
            &production_path,
            temp_dir.path().join("feature_names_legacy.json"),
        )
        .unwrap();

        // Then
        assert_eq!(SchemaVersion::ModelEmbedded, schema.version());
        assert_eq!(names(&["mrr_amount"]).as_slice(), schema.feature_names());
    }

    #[test]
    fn test_production_names_are_preferred_over_legacy() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let production_path = temp_dir.path().join("feature_names.json");
        let legacy_path = temp_dir.path().join("feature_names_legacy.json");
        fs::write(
            &production_path,
            r#"["tenure_months", "seats_x", "mrr_amount", "billing_frequency_monthly"]"#,
        )
        .unwrap();
        fs::write(&legacy_path, r#"["tenure_months", "seats_x"]"#).unwrap();

        // When
        let schema = resolve_feature_schema(None, &production_path, &legacy_path).unwrap();

        // Then
        assert_eq!(SchemaVersion::Production, schema.version());
        assert_eq!(4, schema.len());
    }

    #[test]
    fn test_missing_production_names_fall_back_to_legacy() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let legacy_path = temp_dir.path().join("feature_names_legacy.json");
        fs::write(&legacy_path, r#"["tenure_months", "seats_x"]"#).unwrap();

        // When
        let schema = resolve_feature_schema(
            None,
            temp_dir.path().join("feature_names.json"),
            &legacy_path,
        )
        .unwrap();

        // Then
        assert_eq!(SchemaVersion::Legacy, schema.version());
        assert_eq!(names(&["tenure_months", "seats_x"]).as_slice(), schema.feature_names());
    }

    #[test]
    fn test_missing_names_files_is_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = resolve_feature_schema(
            None,
            temp_dir.path().join("feature_names.json"),
            temp_dir.path().join("feature_names_legacy.json"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_production_names_do_not_fall_back() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let production_path = temp_dir.path().join("feature_names.json");
        let legacy_path = temp_dir.path().join("feature_names_legacy.json");
        fs::write(&production_path, "not json").unwrap();
        fs::write(&legacy_path, r#"["tenure_months", "seats_x"]"#).unwrap();

        // When
        let result = resolve_feature_schema(None, &production_path, &legacy_path);

        // Then
        assert!(result.is_err());
    }
}
