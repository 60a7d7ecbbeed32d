//! Date codec for the JSON boundary
//!
//! Entities hold `DateTime<Utc>` values. On the export wire every date is an
//! ISO-8601 UTC string with millisecond precision (`2024-01-15T10:30:00.000Z`).
//! Decoding is forgiving: anything that does not describe a real instant
//! becomes `None` rather than an error.
//!
//! The object and array variants work on untyped JSON records and rewrite only
//! the listed fields. Inside a record a "native" date is the form serde uses
//! for `DateTime<Utc>`, so a record passed through [`deserialize_object_dates`]
//! can be handed straight to `serde_json::from_value`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde_json::Value;

/// Current time truncated to the millisecond precision the wire format keeps
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Wire form of a date, e.g. `2024-01-15T10:30:00.000Z`
pub fn to_iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Encode a date as an ISO-8601 string, or `None` when absent
pub fn serialize_date(date: Option<&DateTime<Utc>>) -> Option<String> {
    date.map(to_iso)
}

/// Decode an ISO-8601 string
///
/// Accepts RFC 3339 timestamps with any offset, offset-less timestamps (read
/// as UTC) and bare calendar days (midnight UTC). Absent, empty and
/// unparseable input all yield `None`.
pub fn deserialize_date(iso: Option<&str>) -> Option<DateTime<Utc>> {
    let s = iso?;
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Encode a list of dates element-wise
pub fn serialize_dates(dates: &[Option<DateTime<Utc>>]) -> Vec<Option<String>> {
    dates.iter().map(|d| serialize_date(d.as_ref())).collect()
}

/// Decode a list of ISO strings element-wise
pub fn deserialize_dates(iso_strings: &[Option<&str>]) -> Vec<Option<DateTime<Utc>>> {
    iso_strings.iter().map(|s| deserialize_date(*s)).collect()
}

/// Rewrite the listed fields of a record from native dates to wire strings
///
/// Fields that are missing or hold something other than a date become `null`.
/// Non-object values are returned unchanged.
pub fn serialize_object_dates(record: &Value, date_fields: &[&str]) -> Value {
    map_fields(record, date_fields, |value| {
        match deserialize_date(value.and_then(Value::as_str)) {
            Some(date) => Value::String(to_iso(&date)),
            None => Value::Null,
        }
    })
}

/// Rewrite the listed fields of a record from wire strings to native dates
///
/// Fields that are missing or do not parse become `null`. Non-object values
/// are returned unchanged.
pub fn deserialize_object_dates(record: &Value, date_fields: &[&str]) -> Value {
    map_fields(record, date_fields, |value| {
        match deserialize_date(value.and_then(Value::as_str)) {
            Some(date) => native_date(&date),
            None => Value::Null,
        }
    })
}

/// Apply [`serialize_object_dates`] to every record
pub fn serialize_array_dates(records: &[Value], date_fields: &[&str]) -> Vec<Value> {
    records
        .iter()
        .map(|r| serialize_object_dates(r, date_fields))
        .collect()
}

/// Apply [`deserialize_object_dates`] to every record
pub fn deserialize_array_dates(records: &[Value], date_fields: &[&str]) -> Vec<Value> {
    records
        .iter()
        .map(|r| deserialize_object_dates(r, date_fields))
        .collect()
}

/// The JSON form serde produces for a `DateTime<Utc>`
fn native_date(date: &DateTime<Utc>) -> Value {
    Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn map_fields<F>(record: &Value, date_fields: &[&str], convert: F) -> Value
where
    F: Fn(Option<&Value>) -> Value,
{
    let Value::Object(map) = record else {
        return record.clone();
    };

    let mut result = map.clone();
    for field in date_fields {
        let converted = convert(map.get(*field));
        result.insert((*field).to_string(), converted);
    }
    Value::Object(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap() + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn test_serialize_uses_millis_and_z() {
        assert_eq!(
            serialize_date(Some(&sample())).as_deref(),
            Some("2024-01-15T10:30:00.123Z")
        );
        let whole = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(
            serialize_date(Some(&whole)).as_deref(),
            Some("2024-01-15T00:00:00.000Z")
        );
    }

    #[test]
    fn test_absent_values() {
        assert_eq!(serialize_date(None), None);
        assert_eq!(deserialize_date(None), None);
        assert_eq!(deserialize_date(Some("")), None);
    }

    #[test]
    fn test_invalid_strings_degrade_to_none() {
        assert_eq!(deserialize_date(Some("not-a-date")), None);
        assert_eq!(deserialize_date(Some("2024-13-45")), None);
        assert_eq!(deserialize_date(Some("2024-02-30T00:00:00Z")), None);
    }

    #[test]
    fn test_round_trip_keeps_milliseconds() {
        let dates = [
            sample(),
            Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(1),
        ];
        for d in dates {
            let encoded = serialize_date(Some(&d));
            let decoded = deserialize_date(encoded.as_deref()).unwrap();
            assert_eq!(decoded, d);
            assert_eq!(serialize_date(Some(&decoded)), encoded);
        }
    }

    #[test]
    fn test_accepted_input_forms() {
        let offset = deserialize_date(Some("2024-01-15T12:30:00.123+02:00")).unwrap();
        assert_eq!(offset, sample());

        let naive = deserialize_date(Some("2024-01-15T10:30:00.123")).unwrap();
        assert_eq!(naive, sample());

        let day = deserialize_date(Some("2024-01-15")).unwrap();
        assert_eq!(day, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_list_variants() {
        let encoded = serialize_dates(&[Some(sample()), None]);
        assert_eq!(encoded, vec![Some("2024-01-15T10:30:00.123Z".to_string()), None]);

        let decoded = deserialize_dates(&[Some("2024-01-15T10:30:00.123Z"), Some("junk"), None]);
        assert_eq!(decoded, vec![Some(sample()), None, None]);
    }

    #[test]
    fn test_object_variants_touch_only_listed_fields() {
        let record = json!({
            "id": "x",
            "createdAt": "2024-01-15T10:30:00.123Z",
            "note": "2024-01-15T10:30:00.123Z",
        });

        let native = deserialize_object_dates(&record, &["createdAt", "endDate"]);
        assert_eq!(native["note"], record["note"]);
        assert_eq!(native["id"], "x");
        assert_eq!(native["endDate"], Value::Null);
        let parsed: DateTime<Utc> = serde_json::from_value(native["createdAt"].clone()).unwrap();
        assert_eq!(parsed, sample());

        let wire = serialize_object_dates(&native, &["createdAt", "endDate"]);
        assert_eq!(wire["createdAt"], "2024-01-15T10:30:00.123Z");
        assert_eq!(wire["endDate"], Value::Null);
    }

    #[test]
    fn test_array_variants_round_trip() {
        let records = vec![
            json!({"date": "2024-03-01T08:00:00.500Z", "amount": 12.5, "vendor": "Shop"}),
            json!({"date": "2023-11-20T23:15:42.001Z", "amount": 3, "vendor": "Cafe"}),
        ];
        let fields = ["date"];

        let native = deserialize_array_dates(&records, &fields);
        let wire = serialize_array_dates(&native, &fields);
        assert_eq!(wire, records);
    }

    #[test]
    fn test_non_object_is_untouched() {
        let value = json!([1, 2, 3]);
        assert_eq!(serialize_object_dates(&value, &["date"]), value);
        assert_eq!(deserialize_object_dates(&Value::Null, &["date"]), Value::Null);
    }

    #[test]
    fn test_now_is_millisecond_aligned() {
        let t = now();
        assert_eq!(t.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
