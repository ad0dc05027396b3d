//! Column definitions derived from the operator's field tokens.
//!
//! A token ending in [`GAUGE_MARKER`] is shown as its raw value; any other
//! token is treated as a counter and shown as the delta since the last sample.
use crate::error::FieldError;

pub const GAUGE_MARKER: char = '-';

pub const DEFAULT_FIELDS: &[&str] = &[
    "cx_active-",
    "rq_active-",
    "rq_2xx",
    "rq_4xx",
    "rq_5xx",
    "rq_total",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Token as typed, used as the column header
    pub token: String,
    pub base_name: String,
    pub is_gauge: bool,
    /// Prefix + base name, the key looked up in each snapshot
    pub display_name: String,
}

impl FieldSpec {
    pub fn parse(token: &str, prefix: &str) -> Result<Self, FieldError> {
        let token = token.trim();
        let (base_name, is_gauge) = match token.strip_suffix(GAUGE_MARKER) {
            Some(base) => (base, true),
            None => (token, false),
        };

        if base_name.is_empty() {
            return Err(FieldError::Empty {
                token: token.to_string(),
            });
        }

        Ok(Self {
            token: token.to_string(),
            base_name: base_name.to_string(),
            is_gauge,
            display_name: format!("{}{}", prefix, base_name),
        })
    }
}

pub fn resolve_fields<S: AsRef<str>>(tokens: &[S], prefix: &str) -> Result<Vec<FieldSpec>, FieldError> {
    if tokens.is_empty() {
        return Err(FieldError::NoFields);
    }

    tokens
        .iter()
        .map(|token| FieldSpec::parse(token.as_ref(), prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_and_counter_tokens() {
        let fields = resolve_fields(&["cx_active-", "rq_total"], "http.downstream_").unwrap();

        assert_eq!(
            fields[0],
            FieldSpec {
                token: "cx_active-".to_string(),
                base_name: "cx_active".to_string(),
                is_gauge: true,
                display_name: "http.downstream_cx_active".to_string(),
            }
        );
        assert!(!fields[1].is_gauge);
        assert_eq!(fields[1].display_name, "http.downstream_rq_total");
    }

    #[test]
    fn test_only_one_marker_is_stripped() {
        let field = FieldSpec::parse("weird--", "").unwrap();
        assert!(field.is_gauge);
        assert_eq!(field.base_name, "weird-");
        assert_eq!(field.display_name, "weird-");
    }

    #[test]
    fn test_leading_marker_is_kept() {
        let field = FieldSpec::parse("-rq_total", "").unwrap();
        assert!(!field.is_gauge);
        assert_eq!(field.base_name, "-rq_total");
    }

    #[test]
    fn test_empty_prefix_uses_base_name() {
        let field = FieldSpec::parse("server.live-", "").unwrap();
        assert_eq!(field.display_name, "server.live");
    }

    #[test]
    fn test_order_is_preserved() {
        let fields = resolve_fields(DEFAULT_FIELDS, "").unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.base_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["cx_active", "rq_active", "rq_2xx", "rq_4xx", "rq_5xx", "rq_total"]
        );
    }

    #[test]
    fn test_rejects_empty_tokens() {
        assert!(matches!(
            FieldSpec::parse("-", ""),
            Err(FieldError::Empty { .. })
        ));
        assert!(matches!(
            FieldSpec::parse("", ""),
            Err(FieldError::Empty { .. })
        ));

        let none: [&str; 0] = [];
        assert!(matches!(resolve_fields(&none, ""), Err(FieldError::NoFields)));
    }
}
