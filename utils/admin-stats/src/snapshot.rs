//! Parsing of the admin `/stats` text body into a [`Snapshot`].
//!
//! The body is one metric per line in the form `name: value`. Counters and
//! gauges carry integer values; histograms carry quantile summaries that are
//! not integers and are dropped. A line without the `: ` separator means the
//! endpoint is returning something we do not understand, and the whole body
//! is rejected.
use std::collections::BTreeMap;

use tracing::debug;

use crate::error::MalformedLineError;

const SEPARATOR: &str = ": ";

/// Point-in-time capture of every integer metric returned by the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    values: BTreeMap<String, i64>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Metric names starting with `prefix`, with the prefix removed, in sorted order.
    pub fn names_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.values
            .keys()
            .filter_map(move |name| name.strip_prefix(prefix))
    }
}

impl FromIterator<(String, i64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Outcome of parsing a single stats line.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    Value(&'a str, i64),
    /// Well formed but not an integer metric (histograms), or blank.
    Skip,
    Fatal(MalformedLineError),
}

/// Values are held as `i64`; a counter past `i64::MAX` does not parse and is
/// skipped like a histogram, so its column renders as absent.
pub fn parse_line(line_number: usize, line: &str) -> ParsedLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Skip;
    }

    match line.split_once(SEPARATOR) {
        Some((name, value)) => match value.trim().parse::<i64>() {
            Ok(value) => ParsedLine::Value(name, value),
            Err(e) => {
                debug!("Skipping stats line {}, {:?} is not an integer: {}", line_number, name, e);
                ParsedLine::Skip
            }
        },
        None => ParsedLine::Fatal(MalformedLineError {
            line_number,
            line: line.to_string(),
        }),
    }
}

/// Parse a full `/stats` body. Returns no partial snapshot on a malformed line.
pub fn parse_snapshot(body: &str) -> Result<Snapshot, MalformedLineError> {
    let mut values = BTreeMap::new();

    for (idx, line) in body.lines().enumerate() {
        match parse_line(idx + 1, line) {
            ParsedLine::Value(name, value) => {
                values.insert(name.to_string(), value);
            }
            ParsedLine::Skip => {}
            ParsedLine::Fatal(err) => return Err(err),
        }
    }

    Ok(Snapshot { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_lines_are_dropped() {
        let body = "rq_total: 42\nrq_2xx: 40\nh_histogram: P50(3.2,4.1) P99(10,12)\n";
        let snapshot = parse_snapshot(body).unwrap();

        let expected: Snapshot = [("rq_total".to_string(), 42), ("rq_2xx".to_string(), 40)]
            .into_iter()
            .collect();
        assert_eq!(snapshot, expected);
        assert!(!snapshot.contains("h_histogram"));
    }

    #[test]
    fn test_missing_separator_is_fatal() {
        let body = "rq_total: 42\nthis line has no separator\nrq_2xx: 40\n";
        let err = parse_snapshot(body).unwrap_err();

        assert_eq!(err.line_number, 2);
        assert_eq!(err.line, "this line has no separator");
    }

    #[test]
    fn test_colon_without_space_is_fatal() {
        assert!(matches!(
            parse_line(1, "cluster.rq_total:42"),
            ParsedLine::Fatal(_)
        ));
    }

    #[test]
    fn test_parse_line_outcomes() {
        assert_eq!(
            parse_line(1, "http.ingress.downstream_cx_active: 7"),
            ParsedLine::Value("http.ingress.downstream_cx_active", 7)
        );
        assert_eq!(parse_line(1, "server.uptime: -3"), ParsedLine::Value("server.uptime", -3));
        assert_eq!(parse_line(1, "version: 1.2.3"), ParsedLine::Skip);
        assert_eq!(parse_line(1, "   "), ParsedLine::Skip);
    }

    #[test]
    fn test_counter_past_i64_is_skipped() {
        let body = format!("rq_total: {}\nrq_2xx: 3\n", u64::MAX);
        let snapshot = parse_snapshot(&body).unwrap();

        assert!(!snapshot.contains("rq_total"));
        assert_eq!(snapshot.get("rq_2xx"), Some(3));
    }

    #[test]
    fn test_trailing_whitespace_and_crlf() {
        let snapshot = parse_snapshot("rq_total: 42  \r\nrq_5xx: 1\r\n").unwrap();
        assert_eq!(snapshot.get("rq_total"), Some(42));
        assert_eq!(snapshot.get("rq_5xx"), Some(1));
    }

    #[test]
    fn test_empty_body() {
        let snapshot = parse_snapshot("").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_names_with_prefix() {
        let snapshot = parse_snapshot(
            "http.ingress.rq_total: 1\nhttp.ingress.cx_active: 2\ncluster.a.rq_total: 3\n",
        )
        .unwrap();

        let names: Vec<&str> = snapshot.names_with_prefix("http.ingress.").collect();
        assert_eq!(names, vec!["cx_active", "rq_total"]);
    }
}
