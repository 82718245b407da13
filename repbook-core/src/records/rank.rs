use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;
use crate::records::RecordSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    MuscleGroup,
    MaxWeight,
    MaxReps,
    MaxVolume,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::MuscleGroup,
        SortKey::MaxWeight,
        SortKey::MaxReps,
        SortKey::MaxVolume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::MuscleGroup => "muscle_group",
            SortKey::MaxWeight => "max_weight",
            SortKey::MaxReps => "max_reps",
            SortKey::MaxVolume => "max_volume",
        }
    }

    /// Lenient parse: anything unrecognised (or nothing) sorts by name.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| Error::invalid(format!("unknown sort key '{s}'")))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankedRecords {
    pub records: Vec<RecordSummary>,
    pub count: usize,
    pub sort_by: SortKey,
}

fn by_name(a: &RecordSummary, b: &RecordSummary) -> Ordering {
    a.exercise_name
        .cmp(&b.exercise_name)
        .then_with(|| a.exercise_id.cmp(&b.exercise_id))
}

/// Orders summaries for `key`. Numeric keys sort descending with a missing
/// value counted as zero; every key falls back to name, then exercise id.
pub fn compare(a: &RecordSummary, b: &RecordSummary, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Name => Ordering::Equal,
        SortKey::MuscleGroup => a.muscle_group.cmp(&b.muscle_group),
        SortKey::MaxWeight => {
            let (a, b) = (a.max_weight().unwrap_or(0.0), b.max_weight().unwrap_or(0.0));
            b.total_cmp(&a)
        }
        SortKey::MaxReps => b.max_reps().unwrap_or(0).cmp(&a.max_reps().unwrap_or(0)),
        SortKey::MaxVolume => {
            let (a, b) = (a.max_volume().unwrap_or(0.0), b.max_volume().unwrap_or(0.0));
            b.total_cmp(&a)
        }
    };
    primary.then_with(|| by_name(a, b))
}

/// Like [`compare`], but a missing value sorts after every present one
/// instead of being equal to a zero record.
pub fn compare_strict(a: &RecordSummary, b: &RecordSummary, key: SortKey) -> Ordering {
    fn desc<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => cmp(&b, &a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    let primary = match key {
        SortKey::Name | SortKey::MuscleGroup => return compare(a, b, key),
        SortKey::MaxWeight => desc(a.max_weight(), b.max_weight(), f64::total_cmp),
        SortKey::MaxReps => desc(a.max_reps(), b.max_reps(), i32::cmp),
        SortKey::MaxVolume => desc(a.max_volume(), b.max_volume(), f64::total_cmp),
    };
    primary.then_with(|| by_name(a, b))
}

pub fn rank(mut records: Vec<RecordSummary>, sort_by: SortKey) -> RankedRecords {
    records.sort_by(|a, b| compare(a, b, sort_by));
    RankedRecords {
        count: records.len(),
        records,
        sort_by,
    }
}
