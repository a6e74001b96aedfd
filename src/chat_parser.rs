use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use log::debug;
use regex::Regex;

use crate::errors::*;
use crate::schema::{
    BILLING_FREQUENCY_MONTHLY, DEFAULT_BILLING_FREQUENCY_MONTHLY, DEFAULT_MRR_AMOUNT,
    DEFAULT_SEATS, DEFAULT_TENURE_MONTHS, MRR_AMOUNT, SEATS, TENURE_MONTHS,
};
use crate::utils::FeatureName;

const NUMBER_PATTERN: &str = r"\b[0-9]+\b";

const TENURE_KEYWORDS: &[&str] = &["tenure", "month"];
const SEATS_KEYWORDS: &[&str] = &["seat", "user"];
const MRR_KEYWORDS: &[&str] = &["mrr", "revenue", "amount"];
// "month" is also a tenure keyword: a sentence mentioning months both
// consumes a number for the tenure and marks the billing as monthly
const MONTHLY_BILLING_KEYWORDS: &[&str] = &["monthly", "month"];
const BILLING_KEYWORDS: &[&str] = &["billing", "year"];

/// Customer fields detected in a sentence, `None` when never mentioned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedValues {
    pub tenure_months: Option<u32>,
    pub seats: Option<u32>,
    pub mrr_amount: Option<u32>,
    pub billing_frequency_monthly: Option<bool>,
}

impl ParsedValues {
    pub fn is_empty(&self) -> bool {
        *self == ParsedValues::default()
    }

    pub fn with_defaults(self) -> CustomerProfile {
        CustomerProfile {
            tenure_months: self.tenure_months.unwrap_or(DEFAULT_TENURE_MONTHS),
            seats: self.seats.unwrap_or(DEFAULT_SEATS),
            mrr_amount: self.mrr_amount.unwrap_or(DEFAULT_MRR_AMOUNT),
            billing_frequency_monthly: self
                .billing_frequency_monthly
                .unwrap_or(DEFAULT_BILLING_FREQUENCY_MONTHLY),
        }
    }
}

impl fmt::Display for ParsedValues {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries = vec![
            self.tenure_months.map(|v| format!("{}={}", TENURE_MONTHS, v)),
            self.seats.map(|v| format!("{}={}", SEATS, v)),
            self.mrr_amount.map(|v| format!("{}={}", MRR_AMOUNT, v)),
            self.billing_frequency_monthly
                .map(|v| format!("{}={}", BILLING_FREQUENCY_MONTHLY, v as u8)),
        ];
        write!(f, "{{{}}}", entries.into_iter().flatten().join(", "))
    }
}

/// The four customer fields the classifier is usually trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerProfile {
    pub tenure_months: u32,
    pub seats: u32,
    pub mrr_amount: u32,
    pub billing_frequency_monthly: bool,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        ParsedValues::default().with_defaults()
    }
}

impl CustomerProfile {
    pub fn to_overrides(&self) -> HashMap<FeatureName, f32> {
        self.entries()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value as f32))
            .collect()
    }

    fn entries(&self) -> Vec<(&'static str, u32)> {
        vec![
            (TENURE_MONTHS, self.tenure_months),
            (SEATS, self.seats),
            (MRR_AMOUNT, self.mrr_amount),
            (
                BILLING_FREQUENCY_MONTHLY,
                self.billing_frequency_monthly as u32,
            ),
        ]
    }
}

impl fmt::Display for CustomerProfile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let formatted = self
            .entries()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .join(", ");
        write!(f, "{}", formatted)
    }
}

/// Keyword based extraction of customer fields from a free text description.
///
/// Keywords decide which fields are mentioned; the numbers of the sentence
/// are then handed out left to right to the mentioned fields, always in the
/// order tenure, seats, mrr, whatever the position of the keywords.
pub struct ChatParser {
    number_regex: Regex,
}

impl ChatParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            number_regex: Regex::new(NUMBER_PATTERN)?,
        })
    }

    /// Parses `input` and fills the fields that were not mentioned with their
    /// defaults. Never fails: a sentence without keywords or numbers yields the
    /// default profile.
    pub fn parse(&self, input: &str) -> CustomerProfile {
        self.parse_values(input).with_defaults()
    }

    pub fn parse_values(&self, input: &str) -> ParsedValues {
        let text = input.to_lowercase();
        let numbers: Vec<u32> = self
            .number_regex
            .find_iter(&text)
            // numbers too large for a u32 saturate instead of being skipped
            .map(|number| number.as_str().parse::<u32>().unwrap_or(u32::MAX))
            .collect();
        debug!("Numbers found in chat input: {:?}", numbers);

        let mut cursor = 0;
        let mut consume_number = |fallback: u32| {
            let value = numbers.get(cursor).cloned().unwrap_or(fallback);
            cursor += 1;
            value
        };

        let mut values = ParsedValues::default();
        if contains_any(&text, TENURE_KEYWORDS) {
            values.tenure_months = Some(consume_number(DEFAULT_TENURE_MONTHS));
        }
        if contains_any(&text, SEATS_KEYWORDS) {
            values.seats = Some(consume_number(DEFAULT_SEATS));
        }
        if contains_any(&text, MRR_KEYWORDS) {
            values.mrr_amount = Some(consume_number(DEFAULT_MRR_AMOUNT));
        }
        values.billing_frequency_monthly = if contains_any(&text, MONTHLY_BILLING_KEYWORDS) {
            Some(true)
        } else if contains_any(&text, BILLING_KEYWORDS) {
            // a number left over after the numeric fields reads as a longer
            // billing cycle
            Some(cursor >= numbers.len())
        } else {
            None
        };
        debug!("Values parsed from chat input: {}", values);
        values
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
