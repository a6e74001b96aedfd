use std::fmt;

use serde_derive::Serialize;

pub const CRITICAL_THRESHOLD: f32 = 0.20;
pub const HIGH_THRESHOLD: f32 = 0.12;
pub const MEDIUM_THRESHOLD: f32 = 0.08;
pub const LOW_THRESHOLD: f32 = 0.05;

/// Churn risk bucket. Thresholds are exclusive lower bounds, checked from the
/// highest tier down, so every probability falls in exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn from_probability(probability: f32) -> RiskTier {
        if probability > CRITICAL_THRESHOLD {
            RiskTier::Critical
        } else if probability > HIGH_THRESHOLD {
            RiskTier::High
        } else if probability > MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else if probability > LOW_THRESHOLD {
            RiskTier::Low
        } else {
            RiskTier::VeryLow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Critical => "CRITICAL",
            RiskTier::High => "HIGH",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Low => "LOW",
            RiskTier::VeryLow => "VERY LOW",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskTier::Critical => "Immediate intervention!",
            RiskTier::High => "Retention campaign needed",
            RiskTier::Medium => "Monitor closely",
            RiskTier::Low => "Stable",
            RiskTier::VeryLow => "Loyal customer",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.label(), self.recommendation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_lower_tier() {
        assert_eq!(RiskTier::High, RiskTier::from_probability(0.20));
        assert_eq!(RiskTier::Medium, RiskTier::from_probability(0.12));
        assert_eq!(RiskTier::Low, RiskTier::from_probability(0.08));
        assert_eq!(RiskTier::VeryLow, RiskTier::from_probability(0.05));
    }

    #[test]
    fn test_tiers_above_boundaries() {
        assert_eq!(RiskTier::Critical, RiskTier::from_probability(0.2001));
        assert_eq!(RiskTier::High, RiskTier::from_probability(0.1201));
        assert_eq!(RiskTier::Medium, RiskTier::from_probability(0.0801));
        assert_eq!(RiskTier::Low, RiskTier::from_probability(0.0501));
    }

    #[test]
    fn test_extremes() {
        assert_eq!(RiskTier::VeryLow, RiskTier::from_probability(0.0));
        assert_eq!(RiskTier::Critical, RiskTier::from_probability(1.0));
    }

    #[test]
    fn test_tiers_partition_unit_interval() {
        let mut previous_tier = RiskTier::VeryLow;
        for step in 0..=10_000 {
            let probability = step as f32 / 10_000.0;
            let tier = RiskTier::from_probability(probability);
            let matching_tiers = [
                probability > CRITICAL_THRESHOLD,
                probability > HIGH_THRESHOLD && probability <= CRITICAL_THRESHOLD,
                probability > MEDIUM_THRESHOLD && probability <= HIGH_THRESHOLD,
                probability > LOW_THRESHOLD && probability <= MEDIUM_THRESHOLD,
                probability <= LOW_THRESHOLD,
            ]
            .iter()
            .filter(|matches| **matches)
            .count();
            assert_eq!(1, matching_tiers);
            // tiers never decrease as the probability grows
            assert!(tier >= previous_tier);
            previous_tier = tier;
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            "CRITICAL - Immediate intervention!",
            RiskTier::Critical.to_string()
        );
        assert_eq!("VERY LOW - Loyal customer", RiskTier::VeryLow.to_string());
    }
}
