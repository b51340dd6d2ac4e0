//! Table presentation state: columns, sort descriptor and column order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enrich::EnrichedRecord;

/// A displayable column of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    FirstName,
    LastName,
    FullName,
    Email,
    City,
    RegisteredDate,
    Dsr,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::FirstName,
        Column::LastName,
        Column::FullName,
        Column::Email,
        Column::City,
        Column::RegisteredDate,
        Column::Dsr,
    ];

    /// Key used on the wire and in the terminal grid
    pub fn key(self) -> &'static str {
        match self {
            Column::FirstName => "firstName",
            Column::LastName => "lastName",
            Column::FullName => "fullName",
            Column::Email => "email",
            Column::City => "city",
            Column::RegisteredDate => "registeredDate",
            Column::Dsr => "dsr",
        }
    }

    /// Header text
    pub fn label(self) -> &'static str {
        match self {
            Column::FirstName => "First Name",
            Column::LastName => "Last Name",
            Column::FullName => "Full Name",
            Column::Email => "Email",
            Column::City => "City",
            Column::RegisteredDate => "Registered",
            Column::Dsr => "Days Since Registered",
        }
    }

    /// Cell text for one row.
    pub fn value(self, row: &EnrichedRecord<'_>) -> String {
        match self {
            Column::FirstName => row.record.first_name.clone(),
            Column::LastName => row.record.last_name.clone(),
            Column::FullName => row.full_name.clone(),
            Column::Email => row.record.email.clone(),
            Column::City => row.record.city.clone(),
            Column::RegisteredDate => row.record.registered_date.clone(),
            Column::Dsr => row.dsr.to_string(),
        }
    }

    /// Ascending order of two rows by this column.
    pub fn compare(self, a: &EnrichedRecord<'_>, b: &EnrichedRecord<'_>) -> Ordering {
        match self {
            Column::FirstName => a.record.first_name.cmp(&b.record.first_name),
            Column::LastName => a.record.last_name.cmp(&b.record.last_name),
            Column::FullName => a.full_name.cmp(&b.full_name),
            Column::Email => a.record.email.cmp(&b.record.email),
            Column::City => a.record.city.cmp(&b.record.city),
            Column::RegisteredDate => a.record.registered_date.cmp(&b.record.registered_date),
            Column::Dsr => a.dsr.cmp(&b.dsr),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl fmt::Display for UnknownColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column {:?}", self.0)
    }
}

impl std::error::Error for UnknownColumn {}

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|column| column.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Current sort: at most one column, always with a direction
///
/// Serialized as `{"column": .., "direction": ..}`, both `null` when unsorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SortWire", into = "SortWire")]
pub struct SortState(Option<(Column, SortDirection)>);

#[derive(Serialize, Deserialize)]
struct SortWire {
    column: Option<Column>,
    direction: Option<SortDirection>,
}

impl From<SortWire> for SortState {
    fn from(wire: SortWire) -> Self {
        // a column without a direction is unsorted
        SortState(wire.column.zip(wire.direction))
    }
}

impl From<SortState> for SortWire {
    fn from(sort: SortState) -> Self {
        SortWire {
            column: sort.column(),
            direction: sort.direction(),
        }
    }
}

impl SortState {
    pub fn by(column: Column, direction: SortDirection) -> Self {
        SortState(Some((column, direction)))
    }

    pub fn current(&self) -> Option<(Column, SortDirection)> {
        self.0
    }

    pub fn column(&self) -> Option<Column> {
        self.0.map(|(column, _)| column)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.0.map(|(_, direction)| direction)
    }

    pub fn is_sorted(&self) -> bool {
        self.0.is_some()
    }

    /// Header click: none -> ascending -> descending -> none on the same
    /// column; a different column starts over at ascending.
    pub fn toggle(&mut self, column: Column) {
        *self = match self.0 {
            Some((current, SortDirection::Asc)) if current == column => {
                SortState::by(column, SortDirection::Desc)
            }
            Some((current, SortDirection::Desc)) if current == column => SortState::default(),
            _ => SortState::by(column, SortDirection::Asc),
        };
    }

    /// Stable sort of `rows` in place.
    pub fn apply(&self, rows: &mut [EnrichedRecord<'_>]) {
        let Some((column, direction)) = self.0 else {
            return;
        };
        match direction {
            SortDirection::Asc => rows.sort_by(|a, b| column.compare(a, b)),
            SortDirection::Desc => rows.sort_by(|a, b| column.compare(b, a)),
        }
    }
}

/// Left-to-right order of the grid's columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnOrder(Vec<Column>);

impl Default for ColumnOrder {
    fn default() -> Self {
        ColumnOrder(Column::ALL.to_vec())
    }
}

impl ColumnOrder {
    pub fn columns(&self) -> &[Column] {
        &self.0
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.0.iter().position(|c| *c == column)
    }

    /// Drop `from` onto `to`: `from` takes `to`'s position and the columns
    /// in between shift by one. Returns whether the order changed.
    pub fn move_column(&mut self, from: Column, to: Column) -> bool {
        let (Some(old), Some(new)) = (self.position(from), self.position(to)) else {
            return false;
        };
        if old == new {
            return false;
        }
        let moved = self.0.remove(old);
        self.0.insert(new, moved);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UserRecord;
    use chrono::NaiveDate;

    fn records() -> Vec<UserRecord> {
        [
            ("1", "Zoe", "Abbott", "2023-01-10"),
            ("2", "Ann", "Costa", "2021-03-01"),
            ("3", "Mei", "Abbott", "2022-07-15"),
            ("4", "Ann", "Bianchi", "2023-01-10"),
        ]
        .into_iter()
        .map(|(id, first, last, date)| UserRecord {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            city: "Paris".to_string(),
            registered_date: date.to_string(),
        })
        .collect()
    }

    fn ids(rows: &[EnrichedRecord<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.record.id.clone()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn toggle_cycles_through_three_states() {
        let mut sort = SortState::default();
        sort.toggle(Column::City);
        assert_eq!(sort, SortState::by(Column::City, SortDirection::Asc));
        sort.toggle(Column::City);
        assert_eq!(sort, SortState::by(Column::City, SortDirection::Desc));
        sort.toggle(Column::City);
        assert_eq!(sort, SortState::default());
        assert!(!sort.is_sorted());
    }

    #[test]
    fn toggling_another_column_restarts_ascending() {
        let mut sort = SortState::by(Column::City, SortDirection::Desc);
        sort.toggle(Column::Dsr);
        assert_eq!(sort, SortState::by(Column::Dsr, SortDirection::Asc));
    }

    #[test]
    fn sorts_by_derived_dsr() {
        let records = records();
        let mut rows = crate::enrich::enrich(&records, today());
        SortState::by(Column::Dsr, SortDirection::Desc).apply(&mut rows);
        assert_eq!(ids(&rows), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn sort_is_stable() {
        let records = records();
        let mut rows = crate::enrich::enrich(&records, today());
        SortState::by(Column::FirstName, SortDirection::Asc).apply(&mut rows);
        assert_eq!(ids(&rows), vec!["2", "4", "3", "1"]);
        SortState::by(Column::LastName, SortDirection::Asc).apply(&mut rows);
        assert_eq!(ids(&rows), vec!["3", "1", "4", "2"]);
    }

    #[test]
    fn unsorted_keeps_input_order() {
        let records = records();
        let mut rows = crate::enrich::enrich(&records, today());
        SortState::default().apply(&mut rows);
        assert_eq!(ids(&rows), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn move_column_is_array_move() {
        let mut order = ColumnOrder::default();
        assert!(order.move_column(Column::Dsr, Column::FirstName));
        assert_eq!(order.columns()[0], Column::Dsr);
        assert_eq!(order.columns()[1], Column::FirstName);

        assert!(order.move_column(Column::Dsr, Column::City));
        assert_eq!(order.position(Column::Dsr), Some(5));
        assert_eq!(order.position(Column::City), Some(4));
        assert_eq!(order.columns().len(), Column::ALL.len());
    }

    #[test]
    fn move_onto_itself_is_noop() {
        let mut order = ColumnOrder::default();
        assert!(!order.move_column(Column::Email, Column::Email));
        assert_eq!(order, ColumnOrder::default());
    }

    #[test]
    fn parses_column_keys() {
        assert_eq!("dsr".parse::<Column>(), Ok(Column::Dsr));
        assert_eq!("registereddate".parse::<Column>(), Ok(Column::RegisteredDate));
        assert!("age".parse::<Column>().is_err());
        for column in Column::ALL {
            assert_eq!(column.key().parse::<Column>(), Ok(column));
        }
    }

    #[test]
    fn serializes_keys_and_directions() {
        let sort = SortState::by(Column::FullName, SortDirection::Desc);
        let json = serde_json::to_value(sort).unwrap();
        assert_eq!(json["column"], "fullName");
        assert_eq!(json["direction"], "desc");
        let unsorted = serde_json::to_value(SortState::default()).unwrap();
        assert_eq!(unsorted, serde_json::json!({"column": null, "direction": null}));
        let order = serde_json::to_value(ColumnOrder::default()).unwrap();
        assert_eq!(order[6], "dsr");
    }

    #[test]
    fn column_without_direction_reads_as_unsorted() {
        let sort: SortState = serde_json::from_str(r#"{"column": "city", "direction": null}"#).unwrap();
        assert_eq!(sort, SortState::default());
        assert_eq!(sort.column(), None);

        let sort: SortState =
            serde_json::from_str(r#"{"column": "city", "direction": "desc"}"#).unwrap();
        assert_eq!(sort.current(), Some((Column::City, SortDirection::Desc)));
    }
}
