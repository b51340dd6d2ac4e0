use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Date format used for `registeredDate` in stored records.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted user record
///
/// This is the source of truth stored verbatim in the record store. The
/// registration date stays as text so that a stored blob round-trips
/// unchanged; it is parsed only when a derived value is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Opaque identifier, unique within a collection
    pub id: String,

    pub first_name: String,

    pub last_name: String,

    /// Email address (format is not checked)
    pub email: String,

    pub city: String,

    /// Registration date as `YYYY-MM-DD`
    pub registered_date: String,
}

/// Reasons a record or a collection of records fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record {id}: field {field} is empty")]
    EmptyField { id: String, field: &'static str },

    #[error("record {id}: invalid registration date {value:?}")]
    InvalidDate { id: String, value: String },

    #[error("duplicate record id {0}")]
    DuplicateId(String),
}

impl UserRecord {
    /// Parse the registration date, if it is a valid `YYYY-MM-DD` date.
    pub fn registered_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.registered_date, DATE_FORMAT).ok()
    }

    /// Check that every field is present and the date parses.
    ///
    /// # Errors
    /// * `RecordError::EmptyField` for the first empty field found
    /// * `RecordError::InvalidDate` if `registered_date` is not a calendar date
    pub fn validate(&self) -> Result<(), RecordError> {
        let fields = [
            ("id", &self.id),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("city", &self.city),
            ("registeredDate", &self.registered_date),
        ];

        for (field, value) in fields {
            if value.is_empty() {
                return Err(RecordError::EmptyField {
                    id: self.id.clone(),
                    field,
                });
            }
        }

        if self.registered_on().is_none() {
            return Err(RecordError::InvalidDate {
                id: self.id.clone(),
                value: self.registered_date.clone(),
            });
        }

        Ok(())
    }
}

/// Validate a whole collection: every record on its own, plus unique ids.
pub fn validate_records(records: &[UserRecord]) -> Result<(), RecordError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        record.validate()?;
        if !seen.insert(record.id.as_str()) {
            return Err(RecordError::DuplicateId(record.id.clone()));
        }
    }
    Ok(())
}
