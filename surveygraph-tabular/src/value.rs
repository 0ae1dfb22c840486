//! Typed cell values and precision-aware timestamps.

use std::cmp::Ordering;
use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc,
};
use serde::Serialize;
use surveygraph_ns::xsd;

use crate::schema::FieldType;

/// Separator for `list` cells.
pub const LIST_SEPARATOR: char = '|';

/// A coerced, non-blank cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Timestamp(Timestamp),
    List(Vec<String>),
}

impl Value {
    /// Coerce a trimmed, non-blank raw cell to `field_type`.
    ///
    /// On failure returns a message suitable for a `type-error` note.
    pub fn coerce(raw: &str, field_type: FieldType) -> Result<Value, String> {
        let raw = raw.trim();
        let invalid = || format!("{raw:?} is not a valid {}", field_type.name());
        match field_type {
            FieldType::String => Ok(Value::String(raw.to_string())),
            FieldType::Integer => raw.parse().map(Value::Integer).map_err(|_| invalid()),
            FieldType::Number => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Number(n)),
                _ => Err(invalid()),
            },
            FieldType::Boolean => match raw {
                "true" | "True" | "TRUE" | "1" => Ok(Value::Boolean(true)),
                "false" | "False" | "FALSE" | "0" => Ok(Value::Boolean(false)),
                _ => Err(invalid()),
            },
            FieldType::Date => parse_date(raw).map(Value::Date).ok_or_else(invalid),
            FieldType::Datetime => parse_datetime(raw)
                .map(Value::DateTime)
                .map_err(|e| format!("{}: {e}", invalid())),
            FieldType::Timestamp => Timestamp::parse(raw)
                .map(Value::Timestamp)
                .map_err(|e| format!("{}: {e}", invalid())),
            FieldType::List => Ok(Value::List(
                raw.split(LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }

    /// The string payload of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of `Integer` and `Number` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Timestamp view of any date/time variant.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(t.clone()),
            Value::Date(d) => Some(Timestamp::Date(*d)),
            Value::DateTime(dt) => Some(Timestamp::DateTime(*dt)),
            _ => None,
        }
    }

    /// Canonical text used for equality-based checks (uniqueness, lookups).
    pub fn key_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Value::Timestamp(t) => write!(f, "{t}"),
            Value::List(items) => f.write_str(&items.join("|")),
        }
    }
}

/// A point in time recorded with the precision the data provider had.
///
/// Year and year-month values are stored as the first day of the period.
/// Equality, hashing and ordering all use the covered span
/// `(earliest, latest)`, so two datetimes naming the same instant under
/// different offsets are equal.
#[derive(Debug, Clone)]
pub enum Timestamp {
    Year(NaiveDate),
    YearMonth(NaiveDate),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Parse `YYYY`, `YYYY-MM`, `MM/YYYY`, `YYYY-MM-DD`, `DD/MM/YYYY` or an
    /// RFC 3339 datetime with offset.
    pub fn parse(raw: &str) -> Result<Timestamp, String> {
        let raw = raw.trim();
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        if raw.len() == 4 && digits(raw) {
            let year: i32 = raw.parse().map_err(|_| "invalid year".to_string())?;
            return NaiveDate::from_ymd_opt(year, 1, 1)
                .map(Timestamp::Year)
                .ok_or_else(|| "year out of range".to_string());
        }
        if let Some((a, b)) = raw.split_once('-').filter(|(a, b)| a.len() == 4 && b.len() == 2) {
            if digits(a) && digits(b) {
                return year_month(a, b);
            }
        }
        if let Some((m, y)) = raw.split_once('/').filter(|(m, y)| m.len() <= 2 && y.len() == 4) {
            if digits(m) && digits(y) {
                return year_month(y, m);
            }
        }
        if let Some(d) = parse_date(raw) {
            return Ok(Timestamp::Date(d));
        }
        parse_datetime(raw).map(Timestamp::DateTime)
    }

    /// First instant covered by this timestamp.
    pub fn earliest(&self) -> DateTime<Utc> {
        match self {
            Timestamp::Year(d) | Timestamp::YearMonth(d) | Timestamp::Date(d) => {
                d.and_time(NaiveTime::MIN).and_utc()
            }
            Timestamp::DateTime(dt) => dt.with_timezone(&Utc),
        }
    }

    /// Last instant covered by this timestamp.
    pub fn latest(&self) -> DateTime<Utc> {
        let next = match self {
            Timestamp::Year(d) => d.checked_add_months(Months::new(12)),
            Timestamp::YearMonth(d) => d.checked_add_months(Months::new(1)),
            Timestamp::Date(d) => d.succ_opt(),
            Timestamp::DateTime(dt) => return dt.with_timezone(&Utc),
        };
        match next {
            Some(n) => n.and_time(NaiveTime::MIN).and_utc() - TimeDelta::nanoseconds(1),
            None => NaiveDateTime::MAX.and_utc(),
        }
    }

    /// Whether this timestamp can lie at or before `other`.
    ///
    /// Coarse values cover a whole period, so `2020` is not after
    /// `2020-05-01` and `2020-05-01` is not after `2020`.
    pub fn is_not_after(&self, other: &Timestamp) -> bool {
        self.earliest() <= other.latest()
    }

    /// XSD datatype IRI matching the recorded precision.
    pub fn xsd_datatype(&self) -> &'static str {
        match self {
            Timestamp::Year(_) => xsd::G_YEAR,
            Timestamp::YearMonth(_) => xsd::G_YEAR_MONTH,
            Timestamp::Date(_) => xsd::DATE,
            Timestamp::DateTime(_) => xsd::DATE_TIME_STAMP,
        }
    }

    /// Lexical form matching `xsd_datatype`.
    pub fn lexical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Year(d) => write!(f, "{:04}", d.year()),
            Timestamp::YearMonth(d) => write!(f, "{:04}-{:02}", d.year(), d.month()),
            Timestamp::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Timestamp::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
        }
    }
}

impl Timestamp {
    fn span(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.earliest(), self.latest())
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.span() == other.span()
    }
}

impl Eq for Timestamp {}

impl std::hash::Hash for Timestamp {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.span().hash(state);
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    /// Orders by earliest covered instant, then by latest.
    fn cmp(&self, other: &Self) -> Ordering {
        self.span().cmp(&other.span())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn year_month(year: &str, month: &str) -> Result<Timestamp, String> {
    let year: i32 = year.parse().map_err(|_| "invalid year".to_string())?;
    let month: u32 = month.parse().map_err(|_| "invalid month".to_string())?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(Timestamp::YearMonth)
        .ok_or_else(|| format!("month {month} out of range"))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

fn parse_datetime(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt);
    }
    if NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").is_ok()
    {
        return Err("datetime has no timezone offset".to_string());
    }
    Err("unrecognised date/time format".to_string())
}
