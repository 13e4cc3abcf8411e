//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants
//! at the store boundary.

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{Amount, EngineError, ResultEngine};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

pub(crate) fn parse_optional_uuid(value: Option<&str>, label: &str) -> ResultEngine<Option<Uuid>> {
    value.map(|v| parse_uuid(v, label)).transpose()
}

/// Dates are stored as `YYYY-MM-DD` text so lexicographic order is calendar
/// order.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| EngineError::InvalidInput(format!("invalid date: {value}")))
}

pub(crate) fn next_day(date: NaiveDate) -> ResultEngine<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| EngineError::InvalidInput("date out of range".to_string()))
}

pub(crate) fn previous_day(date: NaiveDate) -> ResultEngine<NaiveDate> {
    date.pred_opt()
        .ok_or_else(|| EngineError::InvalidInput("date out of range".to_string()))
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Canonical key used for uniqueness checks: NFKC, trimmed, inner whitespace
/// collapsed, lowercased.
pub(crate) fn normalize_key(value: &str) -> ResultEngine<String> {
    let composed: String = value.nfkc().collect();
    let collapsed = composed.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(EngineError::InvalidInput("code must not be empty".to_string()));
    }
    Ok(collapsed.to_lowercase())
}

pub(crate) fn ensure_non_negative(amount: Amount, label: &str) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(())
}
