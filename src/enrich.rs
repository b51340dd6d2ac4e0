//! Display-only fields derived from persisted records.
//!
//! Nothing here writes back into a [`UserRecord`]: an [`EnrichedRecord`]
//! borrows the persisted record and carries the derived values next to it.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use log::warn;
use serde::Serialize;

use crate::record::{DATE_FORMAT, UserRecord};

/// A persisted record plus values computed for display
///
/// Serializes as the record's own fields with `fullName` and `dsr` added.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord<'a> {
    #[serde(flatten)]
    pub record: &'a UserRecord,

    /// First and last name joined by a single space
    pub full_name: String,

    /// Whole days since registration, never negative
    pub dsr: u64,
}

/// Join first and last name with exactly one space.
///
/// Inputs are used as given: no trimming and no case changes.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    let mut name = String::with_capacity(first_name.len() + last_name.len() + 1);
    name.push_str(first_name);
    name.push(' ');
    name.push_str(last_name);
    name
}

/// Parse a registration date, dropping any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339 timestamps
/// (converted to the local day).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|stamp| stamp.date())
}

/// Whole calendar days from `registered` to `today`.
///
/// Both ends are taken at midnight, so the count only changes when a day
/// boundary is crossed. An absent or empty date counts as 0. A date after
/// `today` gives a negative count. A value that does not parse is logged
/// and counts as 0.
pub fn days_since_registration(registered: Option<&str>, today: NaiveDate) -> i64 {
    let value = match registered {
        None | Some("") => return 0,
        Some(value) => value,
    };

    match parse_date(value) {
        Some(date) => today.signed_duration_since(date).num_days(),
        None => {
            warn!("unparseable registration date {:?}, using 0 days", value);
            0
        }
    }
}

/// Enrich one record for `today`.
pub fn enrich_record(record: &UserRecord, today: NaiveDate) -> EnrichedRecord<'_> {
    let days = days_since_registration(Some(&record.registered_date), today);
    if days < 0 {
        warn!(
            "record {} registered in the future ({}), showing 0 days",
            record.id, record.registered_date
        );
    }

    EnrichedRecord {
        record,
        full_name: full_name(&record.first_name, &record.last_name),
        dsr: days.max(0) as u64,
    }
}

/// Enrich a collection, preserving order and length.
pub fn enrich(records: &[UserRecord], today: NaiveDate) -> Vec<EnrichedRecord<'_>> {
    records
        .iter()
        .map(|record| enrich_record(record, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, first: &str, last: &str, registered: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", id),
            city: "Oslo".to_string(),
            registered_date: registered.to_string(),
        }
    }

    #[test]
    fn full_name_joins_with_single_space() {
        assert_eq!(full_name("John", "Doe"), "John Doe");
        assert_eq!(full_name("Mary Ann", "de la Cruz"), "Mary Ann de la Cruz");
        assert_eq!(full_name(" a", "b "), " a b ");
    }

    #[test]
    fn full_name_keeps_empty_artifacts() {
        assert_eq!(full_name("", "Doe"), " Doe");
        assert_eq!(full_name("John", ""), "John ");
        assert_eq!(full_name("", ""), " ");
    }

    #[test]
    fn john_doe_scenario() {
        let r = record("1", "John", "Doe", "2023-05-15");
        let enriched = enrich_record(&r, day(2023, 12, 11));
        assert_eq!(enriched.full_name, "John Doe");
        assert_eq!(enriched.dsr, 210);
    }

    #[test]
    fn same_day_is_zero() {
        let today = day(2024, 2, 29);
        assert_eq!(days_since_registration(Some("2024-02-29"), today), 0);
        assert_eq!(
            days_since_registration(Some("2024-02-29T23:59:59"), today),
            0
        );
    }

    #[test]
    fn absent_or_empty_is_zero() {
        assert_eq!(days_since_registration(None, day(2030, 1, 1)), 0);
        assert_eq!(days_since_registration(Some(""), day(2030, 1, 1)), 0);
        let r = record("1", "A", "B", "");
        assert_eq!(enrich_record(&r, day(1999, 1, 1)).dsr, 0);
    }

    #[test]
    fn n_days_before_is_n_regardless_of_time() {
        let today = day(2024, 3, 10);
        for n in [0i64, 1, 7, 30, 365, 1000] {
            let registered = today - chrono::Duration::days(n);
            let plain = registered.format("%Y-%m-%d").to_string();
            let late = registered.format("%Y-%m-%dT23:30:00").to_string();
            let early = registered.format("%Y-%m-%d 00:00:01").to_string();
            assert_eq!(days_since_registration(Some(&plain), today), n);
            assert_eq!(days_since_registration(Some(&late), today), n);
            assert_eq!(days_since_registration(Some(&early), today), n);
        }
    }

    #[test]
    fn count_grows_by_one_per_midnight() {
        let mut today = day(2023, 12, 30);
        let mut previous = days_since_registration(Some("2023-01-01"), today);
        for _ in 0..40 {
            today = today.succ_opt().unwrap();
            let current = days_since_registration(Some("2023-01-01"), today);
            assert_eq!(current, previous + 1);
            previous = current;
        }
    }

    #[test]
    fn future_date_is_negative_raw_and_clamped_when_enriched() {
        let today = day(2023, 1, 1);
        assert_eq!(days_since_registration(Some("2023-01-04"), today), -3);
        let r = record("1", "A", "B", "2023-01-04");
        assert_eq!(enrich_record(&r, today).dsr, 0);
    }

    #[test]
    fn unparseable_date_defaults_to_zero() {
        assert_eq!(days_since_registration(Some("yesterday"), day(2023, 1, 1)), 0);
    }

    #[test]
    fn enrich_preserves_order_length_and_input() {
        let records = vec![
            record("c", "Carla", "Diaz", "2023-01-01"),
            record("a", "Ann", "Lee", "2022-12-31"),
            record("b", "Bo", "Kim", "2023-01-02"),
        ];
        let before = records.clone();
        let enriched = enrich(&records, day(2023, 1, 2));

        assert_eq!(enriched.len(), records.len());
        for (out, input) in enriched.iter().zip(&records) {
            assert_eq!(out.record, input);
        }
        assert_eq!(
            enriched.iter().map(|e| e.dsr).collect::<Vec<_>>(),
            vec![1, 2, 0]
        );
        drop(enriched);
        assert_eq!(records, before);
    }

    #[test]
    fn enrich_empty_is_empty() {
        assert!(enrich(&[], day(2023, 1, 1)).is_empty());
    }

    #[test]
    fn enrichment_is_repeatable() {
        let records = vec![record("a", "Ann", "Lee", "2020-06-01")];
        let today = day(2023, 6, 1);
        let first = enrich(&records, today);
        let second = enrich(&records, today);
        assert_eq!(first[0].dsr, second[0].dsr);
        assert_eq!(first[0].full_name, second[0].full_name);
    }

    #[test]
    fn serializes_flat_with_derived_fields() {
        let r = record("1", "John", "Doe", "2023-05-15");
        let json = serde_json::to_value(enrich_record(&r, day(2023, 12, 11))).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["registeredDate"], "2023-05-15");
        assert_eq!(json["fullName"], "John Doe");
        assert_eq!(json["dsr"], 210);
    }
}
