//! Parsing of the prediction form
//!
//! Fields are read in a fixed order; the first missing or malformed field
//! aborts parsing.

use std::collections::HashMap;
use std::str::FromStr;

use calburn_core::errors::CalburnError;
use calburn_core::ActivityInput;

pub const FIELD_GENDER: &str = "gender";
pub const FIELD_AGE: &str = "age";
pub const FIELD_HEIGHT: &str = "height";
pub const FIELD_WEIGHT: &str = "weight";
pub const FIELD_DURATION: &str = "duration";
pub const FIELD_HEART_RATE: &str = "heartRate";
pub const FIELD_BODY_TEMP: &str = "bodyTemp";

/// Parse the seven required fields into an `ActivityInput`
///
/// The gender string is kept verbatim. Numeric fields are trimmed before
/// parsing; `age` must be a non-negative integer.
///
/// # Errors
///
/// `CalburnError::MissingField` or `CalburnError::InvalidField` for the
/// first field that fails.
pub fn parse_activity_form(
    fields: &HashMap<String, String>,
) -> Result<ActivityInput, CalburnError> {
    let gender = required(fields, FIELD_GENDER)?.to_string();
    let age = parse_age(required(fields, FIELD_AGE)?)?;
    let height = parse_real(fields, FIELD_HEIGHT)?;
    let weight = parse_real(fields, FIELD_WEIGHT)?;
    let duration = parse_real(fields, FIELD_DURATION)?;
    let heart_rate = parse_real(fields, FIELD_HEART_RATE)?;
    let body_temp = parse_real(fields, FIELD_BODY_TEMP)?;

    Ok(ActivityInput {
        gender,
        age,
        height,
        weight,
        duration,
        heart_rate,
        body_temp,
    })
}

fn required<'a>(fields: &'a HashMap<String, String>, name: &str) -> Result<&'a str, CalburnError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| CalburnError::MissingField {
            field: name.to_string(),
        })
}

fn invalid(field: &str, value: &str, reason: impl ToString) -> CalburnError {
    CalburnError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_age(raw: &str) -> Result<u32, CalburnError> {
    let trimmed = raw.trim();
    u32::from_str(trimmed).map_err(|e| {
        if trimmed.parse::<i64>().is_ok() {
            invalid(FIELD_AGE, raw, "must be a non-negative integer")
        } else {
            invalid(FIELD_AGE, raw, e)
        }
    })
}

fn parse_real(fields: &HashMap<String, String>, name: &str) -> Result<f64, CalburnError> {
    let raw = required(fields, name)?;
    f64::from_str(raw.trim()).map_err(|e| invalid(name, raw, e))
}
