//! "New record" detection for workouts shown in history.
//!
//! A set is a record when it beats the best of its exercise across all
//! workouts with a smaller id. Workout id, not date, defines "earlier": a
//! workout entered later with a back-dated date does not rewrite the records
//! of workouts that were already recorded.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::db::models::{SetDetail, SetEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Weight,
    Reps,
    Volume,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Weight => "weight",
            RecordKind::Reps => "reps",
            RecordKind::Volume => "volume",
        }
    }
}

/// Best weight, reps and volume seen so far; all zero before the first set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bests {
    pub weight: f64,
    pub reps: i32,
    pub volume: f64,
}

impl Bests {
    pub fn absorb(&mut self, weight: f64, reps: i32) {
        self.weight = self.weight.max(weight);
        self.reps = self.reps.max(reps);
        self.volume = self.volume.max(weight * f64::from(reps));
    }

    fn merge(&mut self, other: &Bests) {
        self.weight = self.weight.max(other.weight);
        self.reps = self.reps.max(other.reps);
        self.volume = self.volume.max(other.volume);
    }

    /// Record kinds a set of `weight` x `reps` strictly beats.
    pub fn beaten_by(&self, weight: f64, reps: i32) -> Vec<RecordKind> {
        let mut kinds = Vec::new();
        if weight > self.weight {
            kinds.push(RecordKind::Weight);
        }
        if reps > self.reps {
            kinds.push(RecordKind::Reps);
        }
        if weight * f64::from(reps) > self.volume {
            kinds.push(RecordKind::Volume);
        }
        kinds
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AchievedRecord {
    pub set_id: i32,
    pub exercise_id: i32,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i32,
    pub volume: f64,
    pub record_types: Vec<RecordKind>,
}

/// Running bests per exercise, indexed by workout id.
#[derive(Debug, Default, Clone)]
pub struct RecordTimeline {
    // Sorted by workout id; each entry holds the bests over that workout and every earlier one.
    by_exercise: HashMap<i32, Vec<(i32, Bests)>>,
}

impl RecordTimeline {
    pub fn from_entries(entries: &[SetEntry]) -> Self {
        let mut per_workout: HashMap<i32, BTreeMap<i32, Bests>> = HashMap::new();
        for e in entries {
            per_workout
                .entry(e.exercise_id)
                .or_default()
                .entry(e.workout_id)
                .or_default()
                .absorb(e.weight, e.reps);
        }

        let by_exercise: HashMap<i32, Vec<(i32, Bests)>> = per_workout
            .into_iter()
            .map(|(exercise_id, workouts)| {
                let mut running = Bests::default();
                let cumulative: Vec<(i32, Bests)> = workouts
                    .into_iter()
                    .map(|(workout_id, bests)| {
                        running.merge(&bests);
                        (workout_id, running)
                    })
                    .collect();
                (exercise_id, cumulative)
            })
            .collect();

        RecordTimeline { by_exercise }
    }

    /// Bests for `exercise_id` over workouts whose id is strictly below `workout_id`.
    pub fn bests_before(&self, exercise_id: i32, workout_id: i32) -> Bests {
        let Some(timeline) = self.by_exercise.get(&exercise_id) else {
            return Bests::default();
        };
        let idx = timeline.partition_point(|(w, _)| *w < workout_id);
        match idx {
            0 => Bests::default(),
            n => timeline[n - 1].1,
        }
    }
}

/// Records achieved by the sets of workout `workout_id`, or `None` when no set
/// beat its exercise's earlier bests.
pub fn detect_records(
    workout_id: i32,
    sets: &[SetDetail],
    timeline: &RecordTimeline,
) -> Option<Vec<AchievedRecord>> {
    let records: Vec<AchievedRecord> = sets
        .iter()
        .filter(|s| s.workout_id == workout_id)
        .filter_map(|s| {
            let kinds = timeline
                .bests_before(s.exercise_id, workout_id)
                .beaten_by(s.weight, s.reps);
            if kinds.is_empty() {
                return None;
            }
            Some(AchievedRecord {
                set_id: s.id,
                exercise_id: s.exercise_id,
                exercise_name: s.exercise_name.clone(),
                weight: s.weight,
                reps: s.reps,
                volume: s.volume(),
                record_types: kinds,
            })
        })
        .collect();

    (!records.is_empty()).then_some(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(set_id: i32, workout_id: i32, exercise_id: i32, weight: f64, reps: i32) -> SetEntry {
        SetEntry {
            set_id,
            workout_id,
            exercise_id,
            weight,
            reps,
            date: "2025-01-01".into(),
            workout_type: "Push".into(),
        }
    }

    fn detail(id: i32, workout_id: i32, exercise_id: i32, weight: f64, reps: i32) -> SetDetail {
        SetDetail {
            id,
            workout_id,
            exercise_id,
            exercise_name: "Bench Press".into(),
            muscle_group: "Chest".into(),
            weight,
            reps,
            set_number: Some(1),
        }
    }

    #[test]
    fn matching_an_earlier_best_is_not_a_record() {
        let timeline = RecordTimeline::from_entries(&[entry(1, 1, 1, 100.0, 5)]);
        let sets = [detail(2, 2, 1, 100.0, 5)];
        assert_eq!(detect_records(2, &sets, &timeline), None);
    }

    #[test]
    fn heavier_set_is_a_weight_record_only() {
        let timeline = RecordTimeline::from_entries(&[
            entry(1, 1, 1, 100.0, 5),
            entry(2, 2, 1, 90.0, 8),
        ]);
        let sets = [detail(3, 3, 1, 105.0, 5)];
        let records = detect_records(3, &sets, &timeline).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_types, vec![RecordKind::Weight]);
    }

    #[test]
    fn first_workout_beats_the_zero_baseline() {
        let timeline = RecordTimeline::default();
        let sets = [detail(1, 1, 1, 80.0, 8)];
        let records = detect_records(1, &sets, &timeline).unwrap();
        assert_eq!(
            records[0].record_types,
            vec![RecordKind::Weight, RecordKind::Reps, RecordKind::Volume]
        );
    }

    #[test]
    fn bodyweight_set_only_beats_reps() {
        let sets = [detail(1, 1, 1, 0.0, 12)];
        let records = detect_records(1, &sets, &RecordTimeline::default()).unwrap();
        assert_eq!(records[0].record_types, vec![RecordKind::Reps]);
    }

    #[test]
    fn later_workouts_do_not_affect_earlier_ones() {
        let timeline = RecordTimeline::from_entries(&[
            entry(1, 1, 1, 80.0, 8),
            entry(2, 2, 1, 90.0, 6),
        ]);
        let w1 = [detail(1, 1, 1, 80.0, 8)];
        let records = detect_records(1, &w1, &timeline).unwrap();
        assert_eq!(
            records[0].record_types,
            vec![RecordKind::Weight, RecordKind::Reps, RecordKind::Volume]
        );

        let w2 = [detail(2, 2, 1, 90.0, 6)];
        let records = detect_records(2, &w2, &timeline).unwrap();
        assert_eq!(records[0].record_types, vec![RecordKind::Weight]);
    }

    #[test]
    fn sets_of_the_same_workout_do_not_compete() {
        let sets = [detail(1, 1, 1, 60.0, 10), detail(2, 1, 1, 50.0, 10)];
        let records = detect_records(1, &sets, &RecordTimeline::default()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn other_exercises_have_their_own_baseline() {
        let timeline = RecordTimeline::from_entries(&[entry(1, 1, 2, 200.0, 20)]);
        let sets = [detail(2, 2, 1, 50.0, 5)];
        assert!(detect_records(2, &sets, &timeline).is_some());
    }

    #[test]
    fn bests_before_uses_strictly_smaller_ids() {
        let timeline = RecordTimeline::from_entries(&[
            entry(1, 2, 1, 50.0, 10),
            entry(2, 5, 1, 70.0, 3),
        ]);
        assert_eq!(timeline.bests_before(1, 2), Bests::default());
        assert_eq!(timeline.bests_before(1, 3).weight, 50.0);
        assert_eq!(timeline.bests_before(1, 5).weight, 50.0);
        let after = timeline.bests_before(1, 6);
        assert_eq!((after.weight, after.reps, after.volume), (70.0, 10, 500.0));
    }
}
