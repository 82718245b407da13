//! Best-of selection over the sets of a single exercise.
//!
//! Every selector is a total order on [`SetEntry`]; the best set is the first
//! one under that order. Ties left over by the documented keys fall back to
//! ascending set id, which is the order sets were recorded in.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::db::models::{Exercise, SetEntry};
use crate::records::{BestSet, ExerciseStatistics, RecordSummary};

pub const TOP_SETS_LIMIT: usize = 10;

/// Heaviest first; among equal weights the set with fewer reps wins.
pub fn by_weight(a: &SetEntry, b: &SetEntry) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.reps.cmp(&b.reps))
        .then_with(|| a.set_id.cmp(&b.set_id))
}

/// Most reps first; among equal reps the heavier set wins.
pub fn by_reps(a: &SetEntry, b: &SetEntry) -> Ordering {
    b.reps
        .cmp(&a.reps)
        .then_with(|| b.weight.total_cmp(&a.weight))
        .then_with(|| a.set_id.cmp(&b.set_id))
}

/// Largest weight x reps first.
pub fn by_volume(a: &SetEntry, b: &SetEntry) -> Ordering {
    b.volume()
        .total_cmp(&a.volume())
        .then_with(|| a.set_id.cmp(&b.set_id))
}

pub fn best_by<F>(entries: &[SetEntry], order: F) -> Option<&SetEntry>
where
    F: Fn(&SetEntry, &SetEntry) -> Ordering,
{
    entries.iter().min_by(|a, b| order(a, b))
}

pub fn top_by<F>(entries: &[SetEntry], order: F, limit: usize) -> Vec<BestSet>
where
    F: Fn(&SetEntry, &SetEntry) -> Ordering,
{
    let mut ranked: Vec<&SetEntry> = entries.iter().collect();
    ranked.sort_by(|a, b| order(a, b));
    ranked.into_iter().take(limit).map(BestSet::from).collect()
}

/// Builds the record summary of `exercise` from all of its set entries.
pub fn summarize(exercise: &Exercise, entries: &[SetEntry]) -> RecordSummary {
    let workouts: BTreeSet<i32> = entries.iter().map(|e| e.workout_id).collect();
    let latest = entries
        .iter()
        .max_by(|a, b| a.date.cmp(&b.date).then(a.workout_id.cmp(&b.workout_id)));

    RecordSummary {
        exercise_id: exercise.id,
        exercise_name: exercise.name.clone(),
        muscle_group: exercise.muscle_group.clone(),
        best_weight: best_by(entries, by_weight).map(BestSet::from),
        best_reps: best_by(entries, by_reps).map(BestSet::from),
        best_volume: best_by(entries, by_volume).map(BestSet::from),
        total_sets: entries.len() as i64,
        total_workouts: workouts.len() as i64,
        last_date: latest.map(|e| e.date.clone()),
        last_workout_type: latest.map(|e| e.workout_type.clone()),
    }
}

pub fn statistics(entries: &[SetEntry]) -> ExerciseStatistics {
    let total_volume = entries.iter().map(SetEntry::volume).sum();
    if entries.is_empty() {
        return ExerciseStatistics {
            avg_weight: None,
            avg_reps: None,
            total_volume,
        };
    }
    let n = entries.len() as f64;
    ExerciseStatistics {
        avg_weight: Some(entries.iter().map(|e| e.weight).sum::<f64>() / n),
        avg_reps: Some(entries.iter().map(|e| f64::from(e.reps)).sum::<f64>() / n),
        total_volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(set_id: i32, workout_id: i32, weight: f64, reps: i32) -> SetEntry {
        SetEntry {
            set_id,
            workout_id,
            exercise_id: 1,
            weight,
            reps,
            date: format!("2025-01-{:02}", workout_id),
            workout_type: format!("Day {workout_id}"),
        }
    }

    fn bench() -> Exercise {
        Exercise {
            id: 1,
            name: "Bench Press".into(),
            muscle_group: "Chest".into(),
            note: None,
        }
    }

    #[rstest]
    #[case::heaviest_wins(vec![entry(1, 1, 80.0, 8), entry(2, 2, 90.0, 6)], 2)]
    #[case::fewer_reps_break_weight_tie(vec![entry(1, 1, 100.0, 5), entry(2, 2, 100.0, 3)], 2)]
    #[case::earlier_set_breaks_full_tie(vec![entry(1, 1, 100.0, 5), entry(2, 2, 100.0, 5)], 1)]
    fn weight_record_selection(#[case] entries: Vec<SetEntry>, #[case] expected_set: i32) {
        assert_eq!(best_by(&entries, by_weight).unwrap().set_id, expected_set);
    }

    #[rstest]
    #[case::most_reps_wins(vec![entry(1, 1, 80.0, 8), entry(2, 2, 90.0, 6)], 1)]
    #[case::heavier_breaks_reps_tie(vec![entry(1, 1, 60.0, 12), entry(2, 2, 70.0, 12)], 2)]
    fn reps_record_selection(#[case] entries: Vec<SetEntry>, #[case] expected_set: i32) {
        assert_eq!(best_by(&entries, by_reps).unwrap().set_id, expected_set);
    }

    #[test]
    fn volume_ties_keep_row_order() {
        let entries = vec![entry(1, 1, 100.0, 6), entry(2, 2, 120.0, 5), entry(3, 3, 60.0, 10)];
        let best = best_by(&entries, by_volume).unwrap();
        assert_eq!(best.set_id, 1);
        assert_eq!(best.volume(), 600.0);
    }

    #[test]
    fn summary_reports_each_record_with_its_workout() {
        let entries = vec![entry(1, 1, 80.0, 8), entry(2, 2, 90.0, 6)];
        let summary = summarize(&bench(), &entries);

        let weight = summary.best_weight.as_ref().unwrap();
        assert_eq!((weight.weight, weight.reps, weight.workout_id), (90.0, 6, 2));
        assert_eq!(weight.date, "2025-01-02");

        let reps = summary.best_reps.as_ref().unwrap();
        assert_eq!((reps.reps, reps.weight, reps.workout_id), (8, 80.0, 1));

        assert_eq!(summary.best_volume.as_ref().unwrap().volume, 640.0);
        assert_eq!(summary.total_sets, 2);
        assert_eq!(summary.total_workouts, 2);
        assert_eq!(summary.last_date.as_deref(), Some("2025-01-02"));
        assert_eq!(summary.last_workout_type.as_deref(), Some("Day 2"));
    }

    #[test]
    fn distinct_workouts_are_counted_once() {
        let entries = vec![entry(1, 1, 80.0, 8), entry(2, 1, 85.0, 6), entry(3, 2, 90.0, 4)];
        let summary = summarize(&bench(), &entries);
        assert_eq!(summary.total_sets, 3);
        assert_eq!(summary.total_workouts, 2);
    }

    #[test]
    fn no_sets_means_no_records() {
        let summary = summarize(&bench(), &[]);
        assert!(!summary.has_records());
        assert_eq!(summary.max_weight(), None);
        assert_eq!(summary.total_sets, 0);
        assert_eq!(summary.total_workouts, 0);

        let stats = statistics(&[]);
        assert_eq!(stats.avg_weight, None);
        assert_eq!(stats.total_volume, 0.0);
    }

    #[test]
    fn top_sets_are_capped_and_ordered() {
        let entries: Vec<SetEntry> = (1..=12)
            .map(|i| entry(i, i, 50.0 + f64::from(i), 5))
            .collect();
        let top = top_by(&entries, by_weight, TOP_SETS_LIMIT);
        assert_eq!(top.len(), TOP_SETS_LIMIT);
        assert_eq!(top[0].weight, 62.0);
        assert_eq!(top[9].weight, 53.0);
    }

    #[test]
    fn statistics_average_over_all_sets() {
        let entries = vec![entry(1, 1, 80.0, 8), entry(2, 2, 100.0, 4)];
        let stats = statistics(&entries);
        assert_eq!(stats.avg_weight, Some(90.0));
        assert_eq!(stats.avg_reps, Some(6.0));
        assert_eq!(stats.total_volume, 1040.0);
    }
}
