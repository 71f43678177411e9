//! JSON body encoding with the tree's scalar conventions.
//!
//! Bodies go through plain `serde_json`, with three extra rules for types
//! JSON has no native form for:
//!
//! - datetimes become ISO-8601 strings
//! - durations become their total number of seconds
//! - decimals become floating-point numbers
//!
//! Struct fields opt in with `serialize_with`:
//!
//! ```rust
//! use std::time::Duration;
//! use serde::Serialize;
//! use doctree_rest::codec;
//!
//! #[derive(Serialize)]
//! struct Reading {
//!     #[serde(serialize_with = "codec::iso8601::serialize")]
//!     taken_at: chrono::NaiveDateTime,
//!     #[serde(serialize_with = "codec::seconds::serialize")]
//!     window: Duration,
//!     #[serde(serialize_with = "codec::float::serialize")]
//!     value: rust_decimal::Decimal,
//! }
//! ```
//!
//! Ad-hoc bodies can use [`Scalar`] values directly.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone, Timelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::Error;

/// Encode a request body.
///
/// Fails with [`Error::Serialization`] when the value has no JSON form,
/// e.g. a map keyed by something other than strings.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(Error::Serialization)
}

/// Decode a response body. An empty body reads as `null`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(Error::Decode)
}

/// Values with an ISO-8601 text form.
pub trait Iso8601 {
    fn to_iso8601(&self) -> String;
}

impl Iso8601 for NaiveDateTime {
    /// Microsecond precision when there is a fractional part, none otherwise.
    fn to_iso8601(&self) -> String {
        if self.nanosecond() == 0 {
            self.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            self.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        }
    }
}

impl<Tz: TimeZone> Iso8601 for DateTime<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    fn to_iso8601(&self) -> String {
        let precision = if self.nanosecond() == 0 {
            SecondsFormat::Secs
        } else {
            SecondsFormat::Micros
        };
        self.to_rfc3339_opts(precision, false)
    }
}

/// Spans that can be expressed as a number of seconds.
pub trait TotalSeconds {
    /// Whole seconds when there is no fractional part, else `None`.
    fn whole_seconds(&self) -> Option<i64>;
    fn total_seconds(&self) -> f64;
}

impl TotalSeconds for Duration {
    fn whole_seconds(&self) -> Option<i64> {
        if self.subsec_nanos() == 0 {
            i64::try_from(self.as_secs()).ok()
        } else {
            None
        }
    }

    fn total_seconds(&self) -> f64 {
        self.as_secs_f64()
    }
}

impl TotalSeconds for TimeDelta {
    fn whole_seconds(&self) -> Option<i64> {
        let millis = self.num_milliseconds();
        if millis % 1000 == 0 && *self == TimeDelta::milliseconds(millis) {
            Some(self.num_seconds())
        } else {
            None
        }
    }

    fn total_seconds(&self) -> f64 {
        match self.num_microseconds() {
            Some(micros) => micros as f64 / 1_000_000.0,
            None => self.num_milliseconds() as f64 / 1000.0,
        }
    }
}

fn serialize_seconds<S: Serializer>(
    span: &impl TotalSeconds,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match span.whole_seconds() {
        Some(secs) => serializer.serialize_i64(secs),
        None => serializer.serialize_f64(span.total_seconds()),
    }
}

fn serialize_decimal<S: Serializer>(
    decimal: &Decimal,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let float = decimal.to_f64().ok_or_else(|| {
        <S::Error as serde::ser::Error>::custom(format!("decimal {} has no float form", decimal))
    })?;
    serializer.serialize_f64(float)
}

/// `serialize_with` helper: datetime as an ISO-8601 string.
pub mod iso8601 {
    use serde::Serializer;

    use super::Iso8601;

    pub fn serialize<T: Iso8601, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_iso8601())
    }
}

/// `serialize_with` helper: duration as total seconds.
pub mod seconds {
    use serde::Serializer;

    use super::TotalSeconds;

    pub fn serialize<T: TotalSeconds, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        super::serialize_seconds(value, serializer)
    }
}

/// `serialize_with` helper: decimal as a float.
pub mod float {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        super::serialize_decimal(value, serializer)
    }
}

/// A body value that may hold one of the non-JSON scalars.
///
/// The variants are checked in the order datetime, duration, decimal; all
/// other values pass through as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    DateTime(DateTime<Utc>),
    NaiveDateTime(NaiveDateTime),
    Duration(Duration),
    TimeDelta(TimeDelta),
    Decimal(Decimal),
    Json(Value),
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::DateTime(dt) => serializer.serialize_str(&dt.to_iso8601()),
            Scalar::NaiveDateTime(dt) => serializer.serialize_str(&dt.to_iso8601()),
            Scalar::Duration(d) => serialize_seconds(d, serializer),
            Scalar::TimeDelta(d) => serialize_seconds(d, serializer),
            Scalar::Decimal(d) => serialize_decimal(d, serializer),
            Scalar::Json(v) => v.serialize(serializer),
        }
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::DateTime(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Scalar::NaiveDateTime(value)
    }
}

impl From<Duration> for Scalar {
    fn from(value: Duration) -> Self {
        Scalar::Duration(value)
    }
}

impl From<TimeDelta> for Scalar {
    fn from(value: TimeDelta) -> Self {
        Scalar::TimeDelta(value)
    }
}

impl From<Decimal> for Scalar {
    fn from(value: Decimal) -> Self {
        Scalar::Decimal(value)
    }
}

impl From<Value> for Scalar {
    fn from(value: Value) -> Self {
        Scalar::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn sample_datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn datetime_encodes_as_iso_string() {
        let value = encode(&Scalar::from(sample_datetime())).unwrap();
        assert_eq!(value, json!("2020-01-02T03:04:05"));
    }

    #[test]
    fn utc_datetime_keeps_offset() {
        let value = encode(&Scalar::from(sample_datetime().and_utc())).unwrap();
        assert_eq!(value, json!("2020-01-02T03:04:05+00:00"));
    }

    #[test]
    fn fractional_datetime_keeps_subseconds() {
        let dt = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 250)
            .unwrap();
        assert_eq!(
            encode(&Scalar::from(dt)).unwrap(),
            json!("2020-01-02T03:04:05.250000")
        );
        assert_eq!(
            encode(&Scalar::from(dt.and_utc())).unwrap(),
            json!("2020-01-02T03:04:05.250000+00:00")
        );
    }

    #[test]
    fn duration_encodes_as_seconds() {
        let value = encode(&Scalar::from(Duration::from_secs(90))).unwrap();
        assert_eq!(value, json!(90));

        let value = encode(&Scalar::from(Duration::from_millis(1500))).unwrap();
        assert_eq!(value, json!(1.5));
    }

    #[test]
    fn time_delta_encodes_as_seconds() {
        assert_eq!(encode(&Scalar::from(TimeDelta::seconds(-90))).unwrap(), json!(-90));
        assert_eq!(
            encode(&Scalar::from(TimeDelta::milliseconds(2250))).unwrap(),
            json!(2.25)
        );
    }

    #[test]
    fn decimal_encodes_as_float() {
        let value = encode(&Scalar::from(Decimal::from_str("1.50").unwrap())).unwrap();
        assert_eq!(value, json!(1.5));
    }

    #[test]
    fn struct_fields_use_helpers() {
        #[derive(Serialize)]
        struct Reading {
            #[serde(serialize_with = "iso8601::serialize")]
            taken_at: NaiveDateTime,
            #[serde(serialize_with = "seconds::serialize")]
            window: Duration,
            #[serde(serialize_with = "float::serialize")]
            value: Decimal,
            label: &'static str,
        }

        let reading = Reading {
            taken_at: sample_datetime(),
            window: Duration::from_secs(90),
            value: Decimal::from_str("1.50").unwrap(),
            label: "probe",
        };

        assert_eq!(
            encode(&reading).unwrap(),
            json!({
                "taken_at": "2020-01-02T03:04:05",
                "window": 90,
                "value": 1.5,
                "label": "probe",
            })
        );
    }

    #[test]
    fn mixed_map_body() {
        let mut body = BTreeMap::new();
        body.insert("at", Scalar::from(sample_datetime()));
        body.insert("count", Scalar::from(json!(3)));

        assert_eq!(
            encode(&body).unwrap(),
            json!({"at": "2020-01-02T03:04:05", "count": 3})
        );
    }

    #[test]
    fn non_string_keys_fail_to_encode() {
        let mut body = BTreeMap::new();
        body.insert(vec![1u8, 2], "value");

        let err = encode(&body).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn decode_empty_body_is_null() {
        let value: Value = decode("").unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn decode_rejects_non_json() {
        let err = decode::<Value>("<html>").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
