use std::collections::HashMap;

use log::debug;
use ndarray::prelude::*;

use crate::schema::{field_default, FeatureSchema};
use crate::utils::FeatureName;

/// How features that received no explicit value are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// Every missing feature is 0, as on the slider panel
    Zero,
    /// Customer fields get their documented default, other features 0
    FieldDefaults,
}

impl FillPolicy {
    fn fill_value(self, feature_name: &str) -> f32 {
        match self {
            FillPolicy::Zero => 0.0,
            FillPolicy::FieldDefaults => field_default(feature_name).unwrap_or(0.0),
        }
    }
}

/// A complete classifier input: one value per schema feature, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    feature_names: Vec<FeatureName>,
    values: Array1<f32>,
}

impl FeatureVector {
    pub fn feature_names(&self) -> &[FeatureName] {
        &self.feature_names
    }

    pub fn values(&self) -> ArrayView1<f32> {
        self.values.view()
    }

    pub fn get(&self, feature_name: &str) -> Option<f32> {
        self.feature_names
            .iter()
            .position(|name| name == feature_name)
            .map(|index| self.values[index])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.feature_names
            .iter()
            .map(|name| name.as_str())
            .zip(self.values.iter().cloned())
    }
}

/// Builds the classifier input for `schema`. Overrides are matched by name;
/// those naming a feature the schema does not have are dropped, so that parser
/// output stays usable with both the legacy and the production schema.
pub fn build_feature_vector(
    overrides: &HashMap<FeatureName, f32>,
    schema: &FeatureSchema,
    fill_policy: FillPolicy,
) -> FeatureVector {
    for name in overrides.keys().filter(|name| !schema.contains(name)) {
        debug!("Ignoring value for feature '{}' absent from the schema", name);
    }
    let feature_names = schema.feature_names().to_vec();
    let values = feature_names
        .iter()
        .map(|name| {
            overrides
                .get(name)
                .cloned()
                .unwrap_or_else(|| fill_policy.fill_value(name))
        })
        .collect::<Array1<f32>>();
    FeatureVector {
        feature_names,
        values,
    }
}
