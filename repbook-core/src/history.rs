//! Workout history: filtered workouts with their sets, per-workout totals and
//! the records each workout set at the time it was recorded.

use std::collections::{BTreeSet, HashMap};

use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use log::debug;
use serde::Serialize;

use crate::db::models::{SetDetail, Workout};
use crate::db::operations::{get_set_details, get_set_entries_before};
use crate::db::schema::{templates, workouts};
use crate::error::{Error, Result};
use crate::records::{AchievedRecord, RecordTimeline, detect::detect_records};

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 1000;

/// Which workouts to return. Every field narrows the selection; date bounds
/// are inclusive and compare the stored date strings.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFilter {
    pub workout_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub template_id: Option<i32>,
    pub limit: Option<i64>,
    pub include_stats: bool,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            workout_type: None,
            date_from: None,
            date_to: None,
            template_id: None,
            limit: None,
            include_stats: true,
        }
    }
}

impl HistoryFilter {
    pub fn limit(&self) -> Result<i64> {
        match self.limit {
            None => Ok(DEFAULT_HISTORY_LIMIT),
            Some(n) if (1..=MAX_HISTORY_LIMIT).contains(&n) => Ok(n),
            Some(n) => Err(Error::invalid(format!(
                "limit must be between 1 and {MAX_HISTORY_LIMIT}, got {n}"
            ))),
        }
    }

    fn query(&self, limit: i64) -> workouts::BoxedQuery<'_, Sqlite> {
        let mut query = workouts::table.into_boxed();
        if let Some(workout_type) = &self.workout_type {
            query = query.filter(workouts::workout_type.eq(workout_type));
        }
        if let Some(from) = &self.date_from {
            query = query.filter(workouts::date.ge(from));
        }
        if let Some(to) = &self.date_to {
            query = query.filter(workouts::date.le(to));
        }
        if let Some(template_id) = self.template_id {
            query = query.filter(workouts::template_id.eq(template_id));
        }
        query
            .order((workouts::date.desc(), workouts::id.desc()))
            .limit(limit)
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct WorkoutStatistics {
    pub exercises_count: usize,
    pub total_sets: usize,
    pub total_reps: i64,
    pub total_volume: f64,
}

impl WorkoutStatistics {
    pub fn from_sets(sets: &[SetDetail]) -> Self {
        let exercises: BTreeSet<i32> = sets.iter().map(|s| s.exercise_id).collect();
        WorkoutStatistics {
            exercises_count: exercises.len(),
            total_sets: sets.len(),
            total_reps: sets.iter().map(|s| i64::from(s.reps)).sum(),
            total_volume: sets.iter().map(SetDetail::volume).sum(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub workout: Workout,
    pub template_name: Option<String>,
    pub sets: Vec<SetDetail>,
    pub statistics: WorkoutStatistics,
    pub records: Option<Vec<AchievedRecord>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub total_workouts: usize,
    pub total_sets: usize,
    pub total_volume: f64,
    pub unique_exercises: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl HistorySummary {
    fn from_entries(entries: &[HistoryEntry]) -> Self {
        let exercises: BTreeSet<i32> = entries
            .iter()
            .flat_map(|e| e.sets.iter().map(|s| s.exercise_id))
            .collect();
        let dates = entries.iter().map(|e| &e.workout.date);
        HistorySummary {
            total_workouts: entries.len(),
            total_sets: entries.iter().map(|e| e.statistics.total_sets).sum(),
            total_volume: entries.iter().map(|e| e.statistics.total_volume).sum(),
            unique_exercises: exercises.len(),
            first_date: dates.clone().min().cloned(),
            last_date: dates.max().cloned(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WorkoutHistory {
    pub workouts: Vec<HistoryEntry>,
    pub count: usize,
    pub summary: Option<HistorySummary>,
}

/// Workouts matching `filter`, newest date first (ties: newest id first).
pub fn get_workout_history(
    conn: &mut SqliteConnection,
    filter: &HistoryFilter,
) -> Result<WorkoutHistory> {
    let limit = filter.limit()?;

    conn.transaction(|conn| {
        let workouts: Vec<Workout> = filter.query(limit).load::<Workout>(conn)?;
        debug!("History filter {:?} matched {} workouts", filter, workouts.len());

        let workout_ids: Vec<i32> = workouts.iter().map(|w| w.id).collect();
        let mut sets_by_workout: HashMap<i32, Vec<SetDetail>> = HashMap::new();
        for set in get_set_details(conn, &workout_ids)? {
            sets_by_workout.entry(set.workout_id).or_default().push(set);
        }

        let template_ids: Vec<i32> = workouts.iter().filter_map(|w| w.template_id).collect();
        let template_names: HashMap<i32, String> = if template_ids.is_empty() {
            HashMap::new()
        } else {
            templates::table
                .filter(templates::id.eq_any(template_ids))
                .select((templates::id, templates::name))
                .load::<(i32, String)>(conn)?
                .into_iter()
                .collect()
        };

        let exercise_ids: Vec<i32> = sets_by_workout
            .values()
            .flatten()
            .map(|s| s.exercise_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let newest = workout_ids.iter().copied().max().unwrap_or(0);
        let timeline =
            RecordTimeline::from_entries(&get_set_entries_before(conn, &exercise_ids, newest)?);

        let entries: Vec<HistoryEntry> = workouts
            .into_iter()
            .map(|workout| {
                let sets = sets_by_workout.remove(&workout.id).unwrap_or_default();
                HistoryEntry {
                    template_name: workout
                        .template_id
                        .and_then(|id| template_names.get(&id).cloned()),
                    statistics: WorkoutStatistics::from_sets(&sets),
                    records: detect_records(workout.id, &sets, &timeline),
                    sets,
                    workout,
                }
            })
            .collect();

        let summary = filter
            .include_stats
            .then(|| HistorySummary::from_entries(&entries));
        Ok(WorkoutHistory {
            count: entries.len(),
            workouts: entries,
            summary,
        })
    })
}
