//! Tagged cell values and their display rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::{AnyValue, TimeUnit, TimeZone};
use std::fmt;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Integer(i64),
    UInteger(u64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    /// Wall-clock time in the column's zone, with the zone abbreviation.
    ZonedTimestamp(NaiveDateTime, String),
}

impl Scalar {
    /// Convert a polars value into a [`Scalar`].
    ///
    /// Types without a dedicated variant (lists, durations, binary, ...) keep
    /// the polars display string.
    pub fn from_any_value(value: &AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Scalar::Null,
            AnyValue::Boolean(b) => Scalar::Boolean(*b),
            AnyValue::Int8(v) => Scalar::Integer(i64::from(*v)),
            AnyValue::Int16(v) => Scalar::Integer(i64::from(*v)),
            AnyValue::Int32(v) => Scalar::Integer(i64::from(*v)),
            AnyValue::Int64(v) => Scalar::Integer(*v),
            AnyValue::UInt8(v) => Scalar::UInteger(u64::from(*v)),
            AnyValue::UInt16(v) => Scalar::UInteger(u64::from(*v)),
            AnyValue::UInt32(v) => Scalar::UInteger(u64::from(*v)),
            AnyValue::UInt64(v) => Scalar::UInteger(*v),
            AnyValue::Float32(v) => Scalar::Float(f64::from(*v)),
            AnyValue::Float64(v) => Scalar::Float(*v),
            AnyValue::String(s) => Scalar::String((*s).to_string()),
            AnyValue::StringOwned(s) => Scalar::String(s.to_string()),
            AnyValue::Date(days) => date_from_epoch_days(*days)
                .map(Scalar::Date)
                .unwrap_or(Scalar::Null),
            AnyValue::Datetime(v, unit, tz) => datetime_scalar(*v, *unit, *tz, value),
            AnyValue::DatetimeOwned(v, unit, tz) => datetime_scalar(*v, *unit, tz.as_deref(), value),
            other => Scalar::String(other.to_string()),
        }
    }

    /// Canonical display string used by the grid, the filter and exports.
    pub fn render(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Integer(v) => v.to_string(),
            Scalar::UInteger(v) => v.to_string(),
            Scalar::Float(v) => render_float(*v),
            Scalar::String(s) => s.clone(),
            Scalar::Date(d) => d.format("%Y-%m-%d").to_string(),
            Scalar::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
            Scalar::ZonedTimestamp(ts, zone) => format!("{} {zone}", ts.format(TIMESTAMP_FORMAT)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render a polars value directly.
pub fn render_any_value(value: &AnyValue<'_>) -> String {
    Scalar::from_any_value(value).render()
}

// `{:?}` keeps the trailing `.0` on integral floats.
fn render_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".into() } else { "-inf".into() }
    } else {
        format!("{v:?}")
    }
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

fn timestamp_from_epoch(v: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
    };
    dt.map(|d| d.naive_utc())
}

fn datetime_scalar(v: i64, unit: TimeUnit, tz: Option<&TimeZone>, raw: &AnyValue<'_>) -> Scalar {
    let Some(utc) = timestamp_from_epoch(v, unit) else {
        return Scalar::Null;
    };
    let Some(tz) = tz else {
        return Scalar::Timestamp(utc);
    };
    match tz.to_chrono() {
        Ok(zone) => {
            let local = DateTime::<Utc>::from_naive_utc_and_offset(utc, Utc).with_timezone(&zone);
            Scalar::ZonedTimestamp(local.naive_local(), local.offset().to_string())
        }
        // Zones chrono-tz cannot resolve keep the polars rendering.
        Err(_) => Scalar::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_variant() {
        assert_eq!(Scalar::Null.render(), "");
        assert_eq!(Scalar::Boolean(true).render(), "true");
        assert_eq!(Scalar::Integer(-7).render(), "-7");
        assert_eq!(Scalar::UInteger(7).render(), "7");
        assert_eq!(Scalar::Float(1.0).render(), "1.0");
        assert_eq!(Scalar::Float(0.25).render(), "0.25");
        assert_eq!(Scalar::Float(f64::NAN).render(), "NaN");
        assert_eq!(Scalar::Float(f64::NEG_INFINITY).render(), "-inf");
        assert_eq!(Scalar::String("abc".into()).render(), "abc");
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Scalar::Date(d).render(), "2024-02-29");
        let ts = d.and_hms_opt(13, 5, 9).unwrap();
        assert_eq!(Scalar::Timestamp(ts).render(), "2024-02-29 13:05:09");
    }

    #[test]
    fn converts_polars_values() {
        assert_eq!(Scalar::from_any_value(&AnyValue::Null), Scalar::Null);
        assert_eq!(Scalar::from_any_value(&AnyValue::Int32(3)), Scalar::Integer(3));
        assert_eq!(Scalar::from_any_value(&AnyValue::UInt8(3)), Scalar::UInteger(3));
        assert_eq!(
            Scalar::from_any_value(&AnyValue::String("x")),
            Scalar::String("x".into())
        );
        assert_eq!(
            Scalar::from_any_value(&AnyValue::Date(0)),
            Scalar::Date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
        );
        let ts = Scalar::from_any_value(&AnyValue::Datetime(
            1_500_000,
            TimeUnit::Microseconds,
            None,
        ));
        assert_eq!(ts.render(), "1970-01-01 00:00:01.500");
    }

    #[test]
    fn zoned_timestamps_render_in_their_zone() {
        let tz = TimeZone::opt_try_new(Some("America/New_York")).unwrap().unwrap();
        let value = AnyValue::Datetime(0, TimeUnit::Milliseconds, Some(&tz));
        let scalar = Scalar::from_any_value(&value);
        assert_eq!(scalar.render(), "1969-12-31 19:00:00 EST");
        assert_eq!(scalar.render(), value.to_string());

        let summer = AnyValue::Datetime(1_720_000_000_000, TimeUnit::Milliseconds, Some(&tz));
        assert!(Scalar::from_any_value(&summer).render().ends_with(" EDT"));
    }
}
