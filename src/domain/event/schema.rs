//! Field schema - the 11 required fields of an event request.
//!
//! Single source of truth for field keys, their canonical order, their
//! primitive types, and the validator that turns a raw extracted value into
//! a typed [`FieldValue`].
//!
//! # Placeholders
//!
//! Extraction output frequently uses stand-ins for "not mentioned". These are
//! treated as absent rather than invalid: JSON `null`, blank strings, and the
//! case-insensitive strings `n/a`, `na`, `none`, `null`, `unknown`, `tbd`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Maximum length for free-text fields.
pub const MAX_TEXT_LENGTH: usize = 500;

/// Upper bound for attendee and room counts.
pub const MAX_COUNT: u32 = 1_000_000;

/// Upper bound for a budget, in major currency units.
pub const MAX_BUDGET_MAJOR_UNITS: u64 = 1_000_000_000_000;

const PLACEHOLDERS: [&str; 6] = ["n/a", "na", "none", "null", "unknown", "tbd"];

const KNOWN_CURRENCIES: [&str; 8] = ["USD", "EUR", "GBP", "INR", "JPY", "AUD", "CAD", "CHF"];

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("number pattern is valid"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("word pattern is valid"));

// ════════════════════════════════════════════════════════════════════════════
// Keys
// ════════════════════════════════════════════════════════════════════════════

/// One of the 11 required fields.
///
/// Variant order is the canonical schema order; `Ord` follows it, so any
/// `BTreeMap<FieldKey, _>` iterates in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    FullName,
    Email,
    Phone,
    Location,
    EventName,
    EventType,
    NumberOfAttendees,
    NumberOfSleepingRooms,
    Budget,
    EventStartDate,
    EventEndDate,
}

/// Primitive type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Count { min: u32 },
    Currency,
    Date,
}

impl FieldKey {
    /// All keys in canonical schema order.
    pub const ALL: [FieldKey; 11] = [
        FieldKey::FullName,
        FieldKey::Email,
        FieldKey::Phone,
        FieldKey::Location,
        FieldKey::EventName,
        FieldKey::EventType,
        FieldKey::NumberOfAttendees,
        FieldKey::NumberOfSleepingRooms,
        FieldKey::Budget,
        FieldKey::EventStartDate,
        FieldKey::EventEndDate,
    ];

    /// Wire name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::FullName => "full_name",
            FieldKey::Email => "email",
            FieldKey::Phone => "phone",
            FieldKey::Location => "location",
            FieldKey::EventName => "event_name",
            FieldKey::EventType => "event_type",
            FieldKey::NumberOfAttendees => "number_of_attendees",
            FieldKey::NumberOfSleepingRooms => "number_of_sleeping_rooms",
            FieldKey::Budget => "budget",
            FieldKey::EventStartDate => "event_start_date",
            FieldKey::EventEndDate => "event_end_date",
        }
    }

    /// Human-readable label ("Number Of Attendees").
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// Primitive type of the field.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldKey::FullName
            | FieldKey::Location
            | FieldKey::EventName
            | FieldKey::EventType => FieldKind::Text,
            FieldKey::Email => FieldKind::Email,
            FieldKey::Phone => FieldKind::Phone,
            FieldKey::NumberOfAttendees => FieldKind::Count { min: 1 },
            FieldKey::NumberOfSleepingRooms => FieldKind::Count { min: 0 },
            FieldKey::Budget => FieldKind::Currency,
            FieldKey::EventStartDate | FieldKey::EventEndDate => FieldKind::Date,
        }
    }
}

/// All keys in canonical schema order.
pub fn all_keys() -> &'static [FieldKey] {
    &FieldKey::ALL
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("field", format!("unknown field '{}'", s)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Values
// ════════════════════════════════════════════════════════════════════════════

/// A monetary amount held in minor units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyAmount {
    minor_units: u64,
    currency: Option<String>,
}

impl CurrencyAmount {
    /// Creates an amount from minor units and an optional ISO currency code.
    pub fn new(minor_units: u64, currency: Option<&str>) -> Self {
        Self {
            minor_units,
            currency: currency.map(str::to_string),
        }
    }

    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = group_thousands(self.minor_units / 100);
        let amount = format!("{}.{:02}", major, self.minor_units % 100);
        match self.currency.as_deref() {
            Some("USD") => write!(f, "${}", amount),
            Some(code) => write!(f, "{} {}", amount, code),
            None => f.write_str(&amount),
        }
    }
}

/// A validated, typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Email(String),
    Phone(String),
    Count(u32),
    Currency(CurrencyAmount),
    Date(NaiveDate),
}

impl FieldValue {
    /// Plain JSON rendering used on the wire and as drafting input.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) | FieldValue::Email(s) | FieldValue::Phone(s) => {
                Value::String(s.clone())
            }
            FieldValue::Count(n) => Value::from(*n),
            FieldValue::Currency(amount) => Value::String(amount.to_string()),
            FieldValue::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
        }
    }

    /// Returns the date if this is a date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) | FieldValue::Email(s) | FieldValue::Phone(s) => f.write_str(s),
            FieldValue::Count(n) => write!(f, "{}", n),
            FieldValue::Currency(amount) => write!(f, "{}", amount),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Validation
// ════════════════════════════════════════════════════════════════════════════

/// Returns true if the raw value means "not mentioned".
pub fn is_placeholder(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.is_empty()
                || PLACEHOLDERS
                    .iter()
                    .any(|p| p.eq_ignore_ascii_case(trimmed))
        }
        _ => false,
    }
}

/// Validates a raw extracted value for a field.
///
/// Returns `Ok(None)` for placeholders, `Ok(Some(value))` for a well-formed
/// value, and `Err` when the value is present but malformed.
pub fn validate(key: FieldKey, raw: &Value) -> Result<Option<FieldValue>, ValidationError> {
    if is_placeholder(raw) {
        return Ok(None);
    }

    let field = key.as_str();
    let value = match key.kind() {
        FieldKind::Text => FieldValue::Text(validate_text(field, raw)?),
        FieldKind::Email => FieldValue::Email(validate_email(field, raw)?),
        FieldKind::Phone => FieldValue::Phone(validate_phone(field, raw)?),
        FieldKind::Count { min } => FieldValue::Count(validate_count(field, raw, min)?),
        FieldKind::Currency => FieldValue::Currency(validate_currency(field, raw)?),
        FieldKind::Date => FieldValue::Date(validate_date(field, raw)?),
    };
    Ok(Some(value))
}

fn expect_string<'a>(field: &str, raw: &'a Value, expected: &str) -> Result<&'a str, ValidationError> {
    raw.as_str()
        .map(str::trim)
        .ok_or_else(|| ValidationError::invalid_format(field, format!("expected {}", expected)))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn validate_text(field: &str, raw: &Value) -> Result<String, ValidationError> {
    let text = collapse_whitespace(expect_string(field, raw, "text")?);
    if text.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(ValidationError::out_of_range(
            field,
            1,
            MAX_TEXT_LENGTH as i64,
            len as i64,
        ));
    }
    Ok(text)
}

fn validate_email(field: &str, raw: &Value) -> Result<String, ValidationError> {
    let email = expect_string(field, raw, "an email address")?;
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format(field, "contains whitespace"));
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ValidationError::invalid_format(field, "must contain exactly one @"));
    };
    if local.is_empty() {
        return Err(ValidationError::invalid_format(field, "missing local part"));
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(ValidationError::invalid_format(field, "invalid domain"));
    }
    Ok(email.to_lowercase())
}

fn validate_phone(field: &str, raw: &Value) -> Result<String, ValidationError> {
    let phone = match raw {
        Value::Number(n) if n.is_u64() => n.to_string(),
        Value::String(s) => collapse_whitespace(s),
        _ => return Err(ValidationError::invalid_format(field, "expected a phone number")),
    };
    if let Some(bad) = phone
        .chars()
        .find(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.')))
    {
        return Err(ValidationError::invalid_format(
            field,
            format!("unexpected character '{}'", bad),
        ));
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::out_of_range(field, 7, 15, digits as i64));
    }
    Ok(phone)
}

fn validate_count(field: &str, raw: &Value, min: u32) -> Result<u32, ValidationError> {
    let count: i64 = match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(u) = n.as_u64() {
                i64::try_from(u).unwrap_or(i64::MAX)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if !f.is_finite() || f.fract() != 0.0 {
                    return Err(ValidationError::invalid_format(field, "expected a whole number"));
                }
                f as i64
            }
        }
        Value::String(s) => {
            let number = NUMBER
                .find(s)
                .ok_or_else(|| ValidationError::invalid_format(field, "no number found"))?;
            let token = number.as_str();
            let (whole, fraction) = token.split_once('.').unwrap_or((token, ""));
            if fraction.chars().any(|c| c != '0') {
                return Err(ValidationError::invalid_format(field, "expected a whole number"));
            }
            let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
            let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
            if is_negated(s, number.start()) {
                -magnitude
            } else {
                magnitude
            }
        }
        _ => return Err(ValidationError::invalid_format(field, "expected a number")),
    };

    if count < i64::from(min) || count > i64::from(MAX_COUNT) {
        return Err(ValidationError::out_of_range(
            field,
            i64::from(min),
            i64::from(MAX_COUNT),
            count,
        ));
    }
    Ok(count as u32)
}

fn validate_currency(field: &str, raw: &Value) -> Result<CurrencyAmount, ValidationError> {
    let amount = match raw {
        Value::Number(n) => {
            let minor = if let Some(u) = n.as_u64() {
                u.checked_mul(100)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                (f.is_finite() && f > 0.0).then(|| (f * 100.0).round() as u64)
            };
            let minor = minor.ok_or_else(|| {
                ValidationError::invalid_format(field, "amount must be a positive number")
            })?;
            CurrencyAmount::new(minor, None)
        }
        Value::String(s) => parse_currency_text(field, s)?,
        _ => return Err(ValidationError::invalid_format(field, "expected an amount")),
    };

    if amount.minor_units == 0 {
        return Err(ValidationError::invalid_format(field, "amount must be positive"));
    }
    if amount.minor_units / 100 > MAX_BUDGET_MAJOR_UNITS {
        return Err(ValidationError::invalid_format(field, "amount is implausibly large"));
    }
    Ok(amount)
}

fn parse_currency_text(field: &str, text: &str) -> Result<CurrencyAmount, ValidationError> {
    let mut numbers = NUMBER.find_iter(text);
    let number = numbers
        .next()
        .ok_or_else(|| ValidationError::invalid_format(field, "no amount found"))?;
    if numbers.next().is_some() {
        return Err(ValidationError::invalid_format(field, "multiple amounts found"));
    }
    if is_negated(text, number.start()) {
        return Err(ValidationError::invalid_format(field, "amount must be positive"));
    }

    let multiplier = multiplier_after(&text[number.end()..]);
    let minor = scale_to_minor_units(number.as_str(), multiplier)
        .ok_or_else(|| ValidationError::invalid_format(field, "amount is not a valid number"))?;

    let currency = detect_currency(text)
        .map_err(|reason| ValidationError::invalid_format(field, reason))?;
    Ok(CurrencyAmount::new(minor, currency))
}

/// Reads a `K`/`M`/`thousand`/`million` suffix directly after a number.
fn multiplier_after(rest: &str) -> u64 {
    let rest = rest.trim_start();
    let lower = rest.to_ascii_lowercase();
    if lower.starts_with("thousand") {
        return 1_000;
    }
    if lower.starts_with("million") {
        return 1_000_000;
    }
    let mut chars = lower.chars();
    let multiplier = match chars.next() {
        Some('k') => 1_000,
        Some('m') => 1_000_000,
        _ => return 1,
    };
    match chars.next() {
        Some(c) if c.is_alphabetic() => 1,
        _ => multiplier,
    }
}

fn scale_to_minor_units(number: &str, multiplier: u64) -> Option<u64> {
    let cleaned: String = number.chars().filter(|c| *c != ',').collect();
    let (whole, fraction) = cleaned.split_once('.').unwrap_or((&cleaned, ""));
    if fraction.len() > 6 {
        return None;
    }
    let whole: u128 = whole.parse().ok()?;
    let fraction_value: u128 = if fraction.is_empty() { 0 } else { fraction.parse().ok()? };
    let fraction_scale = 10u128.pow(fraction.len() as u32);

    let multiplier = u128::from(multiplier);
    let whole_minor = whole.checked_mul(multiplier)?.checked_mul(100)?;
    let fraction_minor = fraction_value.checked_mul(multiplier)?.checked_mul(100)? / fraction_scale;
    u64::try_from(whole_minor.checked_add(fraction_minor)?).ok()
}

/// True when a minus sign precedes the number at `start`, possibly with a
/// currency symbol in between ("-5", "-$500", "$-500").
fn is_negated(text: &str, start: usize) -> bool {
    text[..start]
        .trim_end_matches(['$', '€', '£', '₹', '¥'])
        .ends_with('-')
}

fn detect_currency(text: &str) -> Result<Option<&'static str>, String> {
    let mut found: Option<&'static str> = None;
    let mut record = |code: &'static str| -> Result<(), String> {
        match found {
            Some(existing) if existing != code => {
                Err(format!("conflicting currencies {} and {}", existing, code))
            }
            _ => {
                found = Some(code);
                Ok(())
            }
        }
    };

    for c in text.chars() {
        let code = match c {
            '$' => "USD",
            '€' => "EUR",
            '£' => "GBP",
            '₹' => "INR",
            '¥' => "JPY",
            _ => continue,
        };
        record(code)?;
    }
    for word in WORD.find_iter(text) {
        let upper = word.as_str().to_ascii_uppercase();
        if let Some(code) = KNOWN_CURRENCIES.iter().copied().find(|c| *c == upper) {
            record(code)?;
        }
    }
    Ok(found)
}

fn validate_date(field: &str, raw: &Value) -> Result<NaiveDate, ValidationError> {
    let text = expect_string(field, raw, "a date in YYYY-MM-DD format")?;
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    Err(ValidationError::invalid_format(
        field,
        format!("'{}' is not a YYYY-MM-DD date", text),
    ))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
