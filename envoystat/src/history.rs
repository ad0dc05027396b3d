//! Two-slot snapshot history and per-tick row computation.
use std::fmt;

use admin_stats::Snapshot;

use crate::{error::SampleError, fields::FieldSpec};

/// Rendered in place of a value when the metric is missing from the current snapshot
pub const ABSENT: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayValue {
    Value(i64),
    Absent,
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate to `pad` so width/alignment flags apply to both variants
        match self {
            DisplayValue::Value(v) => f.pad(&v.to_string()),
            DisplayValue::Absent => f.pad(ABSENT),
        }
    }
}

pub type Row = Vec<DisplayValue>;

/// Compute one row of display values.
///
/// Absence from `current` wins over the gauge/counter distinction. Counter
/// deltas are not clamped, so a counter reset shows up as a negative value.
pub fn compute_row(
    previous: &Snapshot,
    current: &Snapshot,
    fields: &[FieldSpec],
) -> Result<Row, SampleError> {
    fields
        .iter()
        .map(|field| {
            let Some(now) = current.get(&field.display_name) else {
                return Ok(DisplayValue::Absent);
            };

            if field.is_gauge {
                return Ok(DisplayValue::Value(now));
            }

            let before = previous.get(&field.display_name).ok_or_else(|| {
                SampleError::MissingBaseline {
                    name: field.display_name.clone(),
                }
            })?;
            Ok(DisplayValue::Value(now.wrapping_sub(before)))
        })
        .collect()
}

/// Holds the previous snapshot between ticks.
///
/// Only a successfully fetched [`Snapshot`] can be recorded, so a failed
/// fetch leaves the baseline untouched.
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    previous: Option<Snapshot>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Record `current` and return the row it produces against the previous
    /// snapshot. Returns `Ok(None)` on the first (priming) snapshot.
    ///
    /// `current` becomes the new baseline even when a counter lacks one, so a
    /// newly appearing counter is reported from the following tick on.
    pub fn record(
        &mut self,
        current: Snapshot,
        fields: &[FieldSpec],
    ) -> Result<Option<Row>, SampleError> {
        let row = match self.previous.as_ref() {
            None => Ok(None),
            Some(previous) => compute_row(previous, &current, fields).map(Some),
        };
        self.previous = Some(current);
        row
    }
}
