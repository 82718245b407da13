//! Personal records derived from the full set history.
//!
//! Nothing here is persisted: every call recomputes from the rows currently in
//! the store, inside one read transaction so a concurrent write cannot be half
//! visible.

pub mod aggregate;
pub mod detect;
pub mod rank;

use std::collections::HashMap;

use diesel::prelude::*;
use serde::{Serialize, Serializer};

use crate::db::models::SetEntry;
use crate::db::operations::{
    get_all_set_entries, get_exercise, get_set_entries_for_exercise, list_exercises,
};
use crate::error::{Error, Result};

pub use aggregate::TOP_SETS_LIMIT;
pub use detect::{AchievedRecord, Bests, RecordKind, RecordTimeline};
pub use rank::{RankedRecords, SortKey};

/// One set that holds (or competes for) a record.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BestSet {
    pub set_id: i32,
    pub workout_id: i32,
    pub date: String,
    pub weight: f64,
    pub reps: i32,
    pub volume: f64,
}

impl From<&SetEntry> for BestSet {
    fn from(e: &SetEntry) -> Self {
        BestSet {
            set_id: e.set_id,
            workout_id: e.workout_id,
            date: e.date.clone(),
            weight: e.weight,
            reps: e.reps,
            volume: e.volume(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    pub exercise_id: i32,
    pub exercise_name: String,
    pub muscle_group: String,
    pub best_weight: Option<BestSet>,
    pub best_reps: Option<BestSet>,
    pub best_volume: Option<BestSet>,
    pub total_sets: i64,
    pub total_workouts: i64,
    pub last_date: Option<String>,
    pub last_workout_type: Option<String>,
}

impl RecordSummary {
    pub fn has_records(&self) -> bool {
        self.best_weight.is_some() || self.best_reps.is_some() || self.best_volume.is_some()
    }

    pub fn max_weight(&self) -> Option<f64> {
        self.best_weight.as_ref().map(|b| b.weight)
    }

    pub fn max_reps(&self) -> Option<i32> {
        self.best_reps.as_ref().map(|b| b.reps)
    }

    pub fn max_volume(&self) -> Option<f64> {
        self.best_volume.as_ref().map(|b| b.volume)
    }
}

// The wire shape is flat: the web client reads `max_weight` etc. as plain numbers.
#[derive(Serialize)]
struct FlatRecordSummary<'a> {
    exercise_id: i32,
    exercise_name: &'a str,
    muscle_group: &'a str,
    max_weight: Option<f64>,
    max_weight_reps: Option<i32>,
    max_weight_date: Option<&'a str>,
    max_weight_workout_id: Option<i32>,
    max_reps: Option<i32>,
    max_reps_weight: Option<f64>,
    max_reps_date: Option<&'a str>,
    max_reps_workout_id: Option<i32>,
    max_volume: Option<f64>,
    max_volume_weight: Option<f64>,
    max_volume_reps: Option<i32>,
    max_volume_date: Option<&'a str>,
    max_volume_workout_id: Option<i32>,
    total_sets: i64,
    total_workouts: i64,
    last_date: Option<&'a str>,
    last_workout_type: Option<&'a str>,
}

impl Serialize for RecordSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let w = self.best_weight.as_ref();
        let r = self.best_reps.as_ref();
        let v = self.best_volume.as_ref();
        FlatRecordSummary {
            exercise_id: self.exercise_id,
            exercise_name: &self.exercise_name,
            muscle_group: &self.muscle_group,
            max_weight: w.map(|b| b.weight),
            max_weight_reps: w.map(|b| b.reps),
            max_weight_date: w.map(|b| b.date.as_str()),
            max_weight_workout_id: w.map(|b| b.workout_id),
            max_reps: r.map(|b| b.reps),
            max_reps_weight: r.map(|b| b.weight),
            max_reps_date: r.map(|b| b.date.as_str()),
            max_reps_workout_id: r.map(|b| b.workout_id),
            max_volume: v.map(|b| b.volume),
            max_volume_weight: v.map(|b| b.weight),
            max_volume_reps: v.map(|b| b.reps),
            max_volume_date: v.map(|b| b.date.as_str()),
            max_volume_workout_id: v.map(|b| b.workout_id),
            total_sets: self.total_sets,
            total_workouts: self.total_workouts,
            last_date: self.last_date.as_deref(),
            last_workout_type: self.last_workout_type.as_deref(),
        }
        .serialize(serializer)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExerciseStatistics {
    pub avg_weight: Option<f64>,
    pub avg_reps: Option<f64>,
    pub total_volume: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExerciseRecord {
    pub record: RecordSummary,
    pub statistics: ExerciseStatistics,
    pub top_sets_by_weight: Vec<BestSet>,
    pub top_sets_by_volume: Vec<BestSet>,
}

/// Record summaries of every exercise with at least one set, ordered by `sort_by`.
pub fn get_all_records(conn: &mut SqliteConnection, sort_by: SortKey) -> Result<RankedRecords> {
    let summaries = conn.transaction::<_, Error, _>(|conn| {
        let exercises = list_exercises(conn, None)?;
        let mut by_exercise: HashMap<i32, Vec<SetEntry>> = HashMap::new();
        for entry in get_all_set_entries(conn)? {
            by_exercise.entry(entry.exercise_id).or_default().push(entry);
        }

        Ok(exercises
            .iter()
            .filter_map(|exercise| {
                let entries = by_exercise.get(&exercise.id)?;
                Some(aggregate::summarize(exercise, entries))
            })
            .filter(RecordSummary::has_records)
            .collect::<Vec<_>>())
    })?;

    Ok(rank::rank(summaries, sort_by))
}

/// Full record detail for one exercise, including one with no sets at all.
pub fn get_exercise_record(conn: &mut SqliteConnection, exercise_id: i32) -> Result<ExerciseRecord> {
    conn.transaction(|conn| {
        let exercise = get_exercise(conn, exercise_id)?;
        let entries = get_set_entries_for_exercise(conn, exercise_id)?;

        Ok(ExerciseRecord {
            record: aggregate::summarize(&exercise, &entries),
            statistics: aggregate::statistics(&entries),
            top_sets_by_weight: aggregate::top_by(&entries, aggregate::by_weight, TOP_SETS_LIMIT),
            top_sets_by_volume: aggregate::top_by(&entries, aggregate::by_volume, TOP_SETS_LIMIT),
        })
    })
}
