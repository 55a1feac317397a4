//! # Tutor Availability
//!
//! Weekly open windows a tutor declares per weekday. A tutor's whole set is
//! replaced on every submission, so the types here describe a complete
//! submission rather than a patch.

use std::collections::HashMap;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::parse_clock_time;
use super::weekday::{self, WEEK};
use crate::errors::FieldErrors;

/// A stored window. `(tutor_id, day, start_time, end_time)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    pub tutor_id: Uuid,
    #[serde(with = "weekday::as_full_name")]
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

impl AvailabilityWindow {
    pub fn same_slot(&self, entry: &AvailabilityEntry) -> bool {
        self.day == entry.day && self.start_time == entry.start_time && self.end_time == entry.end_time
    }
}

/// One window to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    #[serde(with = "weekday::as_full_name")]
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Sort key for listing: weekday ordinal (Monday first), then start time.
pub fn window_order(window: &AvailabilityWindow) -> (u32, NaiveTime) {
    (window.day.num_days_from_monday(), window.start_time)
}

/// Reads the weekly form: `{weekday}_enabled`, `{weekday}_start_time`,
/// `{weekday}_end_time` with lowercase weekday names.
///
/// Pairs are taken in submission order. Disabled days and enabled days with
/// a blank start or end contribute no window. A weekday field given more
/// than once is a field error. An empty result is a valid submission.
pub fn entries_from_form(fields: &[(String, String)]) -> Result<Vec<AvailabilityEntry>, FieldErrors> {
    let mut values: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, value) in fields {
        values.entry(name.as_str()).or_default().push(value.as_str());
    }

    let mut errors = FieldErrors::new();
    let mut entries = Vec::new();

    for day in WEEK {
        let key = weekday::full_name(day).to_ascii_lowercase();
        let enabled_field = format!("{key}_enabled");
        let start_field = format!("{key}_start_time");
        let end_field = format!("{key}_end_time");

        let mut repeated = false;
        for field in [&enabled_field, &start_field, &end_field] {
            if values.get(field.as_str()).is_some_and(|v| v.len() > 1) {
                errors.add(field, "Submit this field only once.");
                repeated = true;
            }
        }
        if repeated {
            continue;
        }

        let single = |field: &str| values.get(field).and_then(|v| v.first().copied()).map(str::trim);
        if !is_checked(single(enabled_field.as_str())) {
            continue;
        }

        let start_raw = single(start_field.as_str()).unwrap_or_default();
        let end_raw = single(end_field.as_str()).unwrap_or_default();
        if start_raw.is_empty() || end_raw.is_empty() {
            continue;
        }

        if let Some(entry) = parse_entry(&mut errors, day, (&start_field, start_raw), (&end_field, end_raw)) {
            entries.push(entry);
        }
    }

    errors.into_result(entries)
}

/// A slot inside the JSON submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotInput {
    pub start_time: String,
    pub end_time: String,
}

/// Reads the JSON submission, which may carry several windows per day:
/// `{ "monday_enabled": true, "monday_slots": [{"start_time", "end_time"}] }`.
pub fn entries_from_json(
    body: &HashMap<String, serde_json::Value>,
) -> Result<Vec<AvailabilityEntry>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut entries = Vec::new();

    for day in WEEK {
        let key = weekday::full_name(day).to_ascii_lowercase();
        let enabled = body
            .get(&format!("{key}_enabled"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !enabled {
            continue;
        }

        let slots_field = format!("{key}_slots");
        let slots: Vec<SlotInput> = match body.get(&slots_field) {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(slots) => slots,
                Err(e) => {
                    errors.add(&slots_field, format!("Invalid slot list: {e}"));
                    continue;
                }
            },
        };

        for slot in &slots {
            if let Some(entry) = parse_entry(
                &mut errors,
                day,
                (&slots_field, slot.start_time.as_str()),
                (&slots_field, slot.end_time.as_str()),
            ) {
                entries.push(entry);
            }
        }
    }

    errors.into_result(entries)
}

fn parse_entry(
    errors: &mut FieldErrors,
    day: Weekday,
    (start_field, start_raw): (&str, &str),
    (end_field, end_raw): (&str, &str),
) -> Option<AvailabilityEntry> {
    let start_time = parse_clock_time(start_raw);
    let end_time = parse_clock_time(end_raw);
    if start_time.is_none() {
        errors.add(start_field, "Enter a valid time.");
    }
    if end_time.is_none() {
        errors.add(end_field, "Enter a valid time.");
    }
    let (start_time, end_time) = (start_time?, end_time?);
    if end_time <= start_time {
        errors.add(end_field, "End time must be after start time.");
        return None;
    }
    Some(AvailabilityEntry {
        day,
        start_time,
        end_time,
    })
}

fn is_checked(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "false" | "off" | "0"),
    }
}
