use crate::enrich::EnrichedRecord;
use crate::table::Column;

/// Convert enriched rows to CSV
///
/// The header row holds the column labels; each following line is one row
/// with its cells in `columns` order. Fields containing commas, quotes or
/// newlines are quoted, with inner quotes doubled.
///
/// # Arguments
/// * `rows` - Rows in the order they should appear
/// * `columns` - Columns in display order
///
/// # Examples
/// ```
/// use usergrid::downloader::to_csv;
/// use usergrid::table::Column;
///
/// let csv = to_csv(&[], &[Column::FullName, Column::Dsr]);
/// assert_eq!(csv, "Full Name,Days Since Registered\n");
/// ```
pub fn to_csv(rows: &[EnrichedRecord<'_>], columns: &[Column]) -> String {
    let mut csv_content = String::new();

    push_line(&mut csv_content, columns.iter().map(|c| c.label().to_string()));
    for row in rows {
        push_line(&mut csv_content, columns.iter().map(|c| c.value(row)));
    }

    csv_content
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
    out.push('\n');
}

fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich;
    use crate::record::UserRecord;
    use chrono::NaiveDate;

    #[test]
    fn exports_rows_in_column_order() {
        let records = vec![UserRecord {
            id: "1".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@example.com".to_string(),
            city: "Mexico City".to_string(),
            registered_date: "2023-05-15".to_string(),
        }];
        let rows = enrich(&records, NaiveDate::from_ymd_opt(2023, 12, 11).unwrap());
        let csv = to_csv(&rows, &[Column::Dsr, Column::FullName, Column::City]);
        assert_eq!(
            csv,
            "Days Since Registered,Full Name,City\n210,John Doe,Mexico City\n"
        );
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }
}
