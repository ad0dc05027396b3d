//! Text layout of the live table.
use chrono::NaiveDateTime;

use crate::{fields::FieldSpec, history::Row};

pub const COLUMN_WIDTH: usize = 10;

const BANNER_DATE_FORMAT: &str = "%Y/%m/%d";
const ROW_TIME_FORMAT: &str = "%I:%M:%S %p";

/// `YYYY/MM/DD <server_info>`, with the body's trailing newline dropped
pub fn banner(now: &NaiveDateTime, server_info: &str) -> String {
    format!(
        "{} {}",
        now.format(BANNER_DATE_FORMAT),
        server_info.trim_end()
    )
}

pub fn timestamp(now: &NaiveDateTime) -> String {
    now.format(ROW_TIME_FORMAT).to_string()
}

fn columns<I, T>(cells: I) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    cells
        .into_iter()
        .map(|cell| format!("{:>width$}", cell, width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Field tokens as typed, gauge marker included
pub fn header_line(now: &NaiveDateTime, fields: &[FieldSpec]) -> String {
    format!(
        "{} {}",
        timestamp(now),
        columns(fields.iter().map(|f| f.token.as_str()))
    )
}

pub fn row_line(now: &NaiveDateTime, row: &Row) -> String {
    format!("{} {}", timestamp(now), columns(row.iter().copied()))
}

/// Shown instead of a data row when a tick could not be sampled
pub fn error_line(now: &NaiveDateTime, error: &dyn std::error::Error) -> String {
    format!("{} error: {}", timestamp(now), error)
}

/// Used by `--list-fields`, one name per line
pub fn field_listing<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|name| format!("{name}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fields::resolve_fields, history::DisplayValue};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_banner() {
        assert_eq!(
            banner(&at(9, 0, 0), "envoy 1.28.0/Clean/RELEASE live 3600 3600 0\n"),
            "2024/03/09 envoy 1.28.0/Clean/RELEASE live 3600 3600 0"
        );
    }

    #[test]
    fn test_timestamp_is_twelve_hour() {
        assert_eq!(timestamp(&at(14, 5, 9)), "02:05:09 PM");
        assert_eq!(timestamp(&at(0, 30, 0)), "12:30:00 AM");
    }

    #[test]
    fn test_header_uses_raw_tokens() {
        let fields = resolve_fields(&["cx_active-", "rq_total"], "http.ingress.").unwrap();
        assert_eq!(
            header_line(&at(10, 0, 1), &fields),
            "10:00:01 AM cx_active-   rq_total"
        );
    }

    #[test]
    fn test_row_alignment_and_absent() {
        let row = vec![
            DisplayValue::Value(3),
            DisplayValue::Absent,
            DisplayValue::Value(-12),
        ];
        assert_eq!(
            row_line(&at(10, 0, 2), &row),
            "10:00:02 AM          3          -        -12"
        );
    }

    #[test]
    fn test_wide_values_are_not_truncated() {
        let row = vec![DisplayValue::Value(123_456_789_012)];
        assert_eq!(row_line(&at(10, 0, 2), &row), "10:00:02 AM 123456789012");
    }

    #[test]
    fn test_field_listing() {
        assert_eq!(field_listing(["a", "b"]), "a\nb\n");
    }
}
