//! # Tutor Profiles
//!
//! Hourly rate and subject list of a tutor. Profiles are created lazily the
//! first time anything asks for them.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::availability::AvailabilityWindow;
use super::user::User;
use crate::errors::FieldErrors;

/// Largest storable rate: six digits, two of them decimals.
pub fn max_hourly_rate() -> Decimal {
    Decimal::new(999_999, 2)
}

/// Subjects offered on the tutor dashboard, grouped by field. Display only;
/// stored subject lists are free-form.
pub const SUBJECT_CATALOGUE: &[(&str, &[&str])] = &[(
    "Computer Programming",
    &[
        "Ruby",
        "Swift",
        "Scala",
        "Java",
        "Javascript/React",
        "Python/Tensorflow",
        "C++",
        "C#",
    ],
)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorProfile {
    pub tutor_id: Uuid,
    pub hourly_rate: Option<Decimal>,
    pub subjects: Vec<String>,
}

impl TutorProfile {
    /// The profile every tutor starts with.
    pub fn empty(tutor_id: Uuid) -> Self {
        Self {
            tutor_id,
            hourly_rate: None,
            subjects: Vec::new(),
        }
    }

    pub fn teaches_any(&self, filters: &[String]) -> bool {
        self.subjects
            .iter()
            .any(|subject| filters.iter().any(|f| subject.eq_ignore_ascii_case(f.trim())))
    }
}

/// Checks a rate: non-negative, at most two decimals, fits the column.
pub fn validate_hourly_rate(rate: Decimal) -> Result<Decimal, FieldErrors> {
    let mut errors = FieldErrors::new();
    if rate.is_sign_negative() && !rate.is_zero() {
        errors.add("hourly_rate", "Ensure this value is greater than or equal to 0.");
    } else if rate.normalize().scale() > 2 {
        errors.add("hourly_rate", "Ensure that there are no more than 2 decimal places.");
    } else if rate > max_hourly_rate() {
        errors.add("hourly_rate", "Ensure that there are no more than 6 digits in total.");
    }
    errors.into_result(rate)
}

pub fn parse_hourly_rate(raw: &str) -> Result<Decimal, FieldErrors> {
    match Decimal::from_str(raw.trim()) {
        Ok(rate) => validate_hourly_rate(rate),
        Err(_) => {
            let mut errors = FieldErrors::new();
            errors.add("hourly_rate", "Enter a number.");
            Err(errors)
        }
    }
}

pub const CUSTOM_SUBJECT_MAX_LEN: usize = 100;

/// Trims a free-form subject name and checks it is present and short enough.
pub fn validate_custom_subject(raw: Option<&str>) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let subject = raw.map(str::trim).unwrap_or_default();
    if subject.is_empty() {
        errors.add("custom_subject", "This field is required.");
    } else if subject.chars().count() > CUSTOM_SUBJECT_MAX_LEN {
        errors.add(
            "custom_subject",
            format!("Ensure this value has at most {CUSTOM_SUBJECT_MAX_LEN} characters."),
        );
    }
    errors.into_result(subject.to_string())
}

/// A tutor as shown in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorListing {
    pub tutor: User,
    pub profile: TutorProfile,
    pub availability: Vec<AvailabilityWindow>,
}

/// Keeps listings teaching at least one of `filters`; no filters keeps all.
pub fn filter_by_subjects(listings: Vec<TutorListing>, filters: &[String]) -> Vec<TutorListing> {
    let filters: Vec<String> = filters
        .iter()
        .filter(|f| !f.trim().is_empty())
        .cloned()
        .collect();
    if filters.is_empty() {
        return listings;
    }
    listings
        .into_iter()
        .filter(|listing| listing.profile.teaches_any(&filters))
        .collect()
}
