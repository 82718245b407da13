use diesel::SqliteConnection;
use repbook::db::models::{
    NewExercise, NewTemplate, NewWorkout, NewWorkoutSet, TemplateSetInput, UpdateExercise,
};
use repbook::db::{DbConn, init_database, operations, seed};
use repbook::history::{HistoryFilter, get_workout_history};
use repbook::records::{RecordKind, SortKey, get_all_records, get_exercise_record};
use repbook::templates;
use repbook::{ErrorKind, Tracker};
use tempfile::TempDir;

fn open() -> (TempDir, DbConn) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = dir.path().join("test.db");
    let pool = init_database(url.to_str().expect("utf8 path"), 1).expect("init database");
    let conn = pool.get().expect("connection");
    (dir, conn)
}

fn exercise(conn: &mut SqliteConnection, name: &str, group: &str) -> i32 {
    operations::create_exercise(
        conn,
        NewExercise {
            name: name.into(),
            muscle_group: group.into(),
            note: None,
        },
    )
    .expect("create exercise")
    .id
}

fn workout(conn: &mut SqliteConnection, date: &str, workout_type: &str) -> i32 {
    operations::create_workout(
        conn,
        NewWorkout {
            date: date.into(),
            workout_type: workout_type.into(),
            note: None,
            template_id: None,
        },
    )
    .expect("create workout")
    .id
}

fn set(conn: &mut SqliteConnection, workout_id: i32, exercise_id: i32, weight: f64, reps: i32) -> i32 {
    operations::create_set(
        conn,
        NewWorkoutSet {
            workout_id,
            exercise_id,
            weight,
            reps,
            set_number: None,
        },
    )
    .expect("create set")
    .id
}

#[test]
fn bench_press_scenario() {
    let (_dir, mut conn) = open();
    let bench = exercise(&mut conn, "Bench Press", "Chest");
    let w1 = workout(&mut conn, "2025-03-01", "Push");
    let w2 = workout(&mut conn, "2025-03-04", "Push");
    set(&mut conn, w1, bench, 80.0, 8);
    set(&mut conn, w2, bench, 90.0, 6);

    let detail = get_exercise_record(&mut conn, bench).unwrap();
    let weight = detail.record.best_weight.as_ref().unwrap();
    assert_eq!((weight.weight, weight.reps, weight.workout_id), (90.0, 6, w2));
    let reps = detail.record.best_reps.as_ref().unwrap();
    assert_eq!((reps.reps, reps.weight, reps.workout_id), (8, 80.0, w1));
    let volume = detail.record.best_volume.as_ref().unwrap();
    assert_eq!((volume.volume, volume.workout_id), (640.0, w1));
    assert_eq!(detail.record.total_sets, 2);
    assert_eq!(detail.record.total_workouts, 2);
    assert_eq!(detail.record.last_date.as_deref(), Some("2025-03-04"));
    assert_eq!(detail.statistics.avg_weight, Some(85.0));
    assert_eq!(detail.statistics.total_volume, 1180.0);

    let history = get_workout_history(&mut conn, &HistoryFilter::default()).unwrap();
    assert_eq!(history.count, 2);
    let newest = &history.workouts[0];
    assert_eq!(newest.workout.id, w2);
    assert_eq!(
        newest.records.as_ref().unwrap()[0].record_types,
        vec![RecordKind::Weight]
    );
    let oldest = &history.workouts[1];
    assert_eq!(
        oldest.records.as_ref().unwrap()[0].record_types,
        vec![RecordKind::Weight, RecordKind::Reps, RecordKind::Volume]
    );
}

#[test]
fn exercise_without_sets_has_empty_record() {
    let (_dir, mut conn) = open();
    let plank = exercise(&mut conn, "Plank", "Core");

    let detail = get_exercise_record(&mut conn, plank).unwrap();
    assert!(!detail.record.has_records());
    assert_eq!(detail.record.total_sets, 0);
    assert_eq!(detail.record.total_workouts, 0);
    assert_eq!(detail.statistics.avg_weight, None);
    assert_eq!(detail.statistics.total_volume, 0.0);
    assert!(detail.top_sets_by_weight.is_empty());

    let err = get_exercise_record(&mut conn, plank + 100).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn all_records_skip_unused_exercises_and_sort() {
    let (_dir, mut conn) = open();
    let squat = exercise(&mut conn, "Squat", "Legs");
    let curl = exercise(&mut conn, "Curl", "Biceps");
    exercise(&mut conn, "Plank", "Core");
    let w = workout(&mut conn, "2025-01-10", "Full");
    set(&mut conn, w, squat, 100.0, 5);
    set(&mut conn, w, curl, 20.0, 15);

    let by_name = get_all_records(&mut conn, SortKey::Name).unwrap();
    assert_eq!(by_name.count, 2);
    let names: Vec<&str> = by_name.records.iter().map(|r| r.exercise_name.as_str()).collect();
    assert_eq!(names, vec!["Curl", "Squat"]);

    let by_reps = get_all_records(&mut conn, SortKey::MaxReps).unwrap();
    assert_eq!(by_reps.records[0].exercise_name, "Curl");
    let by_weight = get_all_records(&mut conn, SortKey::MaxWeight).unwrap();
    assert_eq!(by_weight.records[0].exercise_name, "Squat");
}

#[test]
fn referenced_exercise_cannot_be_deleted() {
    let (_dir, mut conn) = open();
    let row = exercise(&mut conn, "Barbell Row", "Back");
    let w = workout(&mut conn, "2025-02-01", "Pull");
    set(&mut conn, w, row, 60.0, 10);

    let err = operations::delete_exercise(&mut conn, row).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(operations::get_exercise(&mut conn, row).is_ok());
    assert_eq!(operations::get_workout_detail(&mut conn, w).unwrap().sets.len(), 1);

    let unused = exercise(&mut conn, "Face Pull", "Shoulders");
    operations::delete_exercise(&mut conn, unused).unwrap();
    assert_eq!(
        operations::get_exercise(&mut conn, unused).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn duplicate_exercise_names_conflict() {
    let (_dir, mut conn) = open();
    exercise(&mut conn, "Deadlift", "Back");
    let squat = exercise(&mut conn, "Squat", "Legs");

    let err = operations::create_exercise(
        &mut conn,
        NewExercise {
            name: " Deadlift ".into(),
            muscle_group: "Legs".into(),
            note: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = operations::update_exercise(
        &mut conn,
        squat,
        UpdateExercise {
            name: Some("Deadlift".into()),
            ..UpdateExercise::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = operations::update_exercise(&mut conn, squat, UpdateExercise::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn template_round_trip_preserves_sets() {
    let (_dir, mut conn) = open();
    let press = exercise(&mut conn, "Overhead Press", "Shoulders");
    let dips = exercise(&mut conn, "Dips", "Triceps");
    let template = templates::create_template(
        &mut conn,
        NewTemplate {
            name: "Push A".into(),
            workout_type: "Push".into(),
            note: None,
        },
        vec![
            TemplateSetInput {
                exercise_id: press,
                weight: 40.0,
                reps: 8,
                set_number: Some(1),
            },
            TemplateSetInput {
                exercise_id: dips,
                weight: 0.0,
                reps: 12,
                set_number: Some(2),
            },
        ],
    )
    .unwrap();

    let w = templates::create_workout_from_template(&mut conn, template.id, "2025-05-01".into(), None)
        .unwrap();
    assert_eq!(w.template_id, Some(template.id));
    assert_eq!(w.workout_type, "Push");

    let copy = templates::create_template_from_workout(&mut conn, w.id, "Push B".into()).unwrap();
    let original = templates::get_template_detail(&mut conn, template.id).unwrap();
    let copied = templates::get_template_detail(&mut conn, copy.id).unwrap();

    let shape = |sets: &[repbook::db::models::TemplateSetDetail]| {
        let mut v: Vec<(i32, i64, i32, Option<i32>)> = sets
            .iter()
            .map(|s| (s.exercise_id, (s.weight * 100.0) as i64, s.reps, s.set_number))
            .collect();
        v.sort();
        v
    };
    assert_eq!(shape(&original.sets), shape(&copied.sets));
    assert_eq!(copied.sets.len(), 2);
}

#[test]
fn template_with_bad_set_writes_nothing() {
    let (_dir, mut conn) = open();
    let press = exercise(&mut conn, "Overhead Press", "Shoulders");
    let err = templates::create_template(
        &mut conn,
        NewTemplate {
            name: "Broken".into(),
            workout_type: "Push".into(),
            note: None,
        },
        vec![
            TemplateSetInput {
                exercise_id: press,
                weight: 40.0,
                reps: 8,
                set_number: None,
            },
            TemplateSetInput {
                exercise_id: press + 50,
                weight: 40.0,
                reps: 8,
                set_number: None,
            },
        ],
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(templates::list_templates(&mut conn).unwrap().is_empty());
}

#[test]
fn history_orders_filters_and_validates_limit() {
    let (_dir, mut conn) = open();
    let squat = exercise(&mut conn, "Squat", "Legs");
    let a = workout(&mut conn, "2025-01-05", "Legs");
    let b = workout(&mut conn, "2025-01-07", "Push");
    let c = workout(&mut conn, "2025-01-05", "Legs");
    set(&mut conn, a, squat, 100.0, 5);
    set(&mut conn, c, squat, 100.0, 5);

    let all = get_workout_history(&mut conn, &HistoryFilter::default()).unwrap();
    let ids: Vec<i32> = all.workouts.iter().map(|e| e.workout.id).collect();
    assert_eq!(ids, vec![b, c, a]);
    // c repeats a's set exactly: no record.
    assert_eq!(all.workouts[1].records, None);
    assert!(all.workouts[2].records.is_some());
    let summary = all.summary.unwrap();
    assert_eq!(summary.total_workouts, 3);
    assert_eq!(summary.unique_exercises, 1);
    assert_eq!(summary.first_date.as_deref(), Some("2025-01-05"));
    assert_eq!(summary.last_date.as_deref(), Some("2025-01-07"));

    let legs = get_workout_history(
        &mut conn,
        &HistoryFilter {
            workout_type: Some("Legs".into()),
            date_from: Some("2025-01-05".into()),
            date_to: Some("2025-01-06".into()),
            limit: Some(1),
            include_stats: false,
            ..HistoryFilter::default()
        },
    )
    .unwrap();
    assert_eq!(legs.count, 1);
    assert_eq!(legs.workouts[0].workout.id, c);
    assert_eq!(legs.workouts[0].statistics.total_volume, 500.0);
    // a is cut by the limit but still counts as earlier history.
    assert_eq!(legs.workouts[0].records, None);
    assert!(legs.summary.is_none());

    for bad in [0, 1001] {
        let err = get_workout_history(
            &mut conn,
            &HistoryFilter {
                limit: Some(bad),
                ..HistoryFilter::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

#[test]
fn deleting_a_workout_removes_its_sets_from_records() {
    let (_dir, mut conn) = open();
    let bench = exercise(&mut conn, "Bench Press", "Chest");
    let w1 = workout(&mut conn, "2025-03-01", "Push");
    let w2 = workout(&mut conn, "2025-03-04", "Push");
    set(&mut conn, w1, bench, 80.0, 8);
    set(&mut conn, w2, bench, 90.0, 6);

    operations::delete_workout(&mut conn, w2).unwrap();
    let detail = get_exercise_record(&mut conn, bench).unwrap();
    assert_eq!(detail.record.max_weight(), Some(80.0));
    assert_eq!(detail.record.total_sets, 1);
}

#[test]
fn seeding_only_fills_an_empty_table() {
    let (_dir, mut conn) = open();
    let inserted = seed::seed_default_exercises(&mut conn).unwrap();
    assert_eq!(inserted, seed::DEFAULT_EXERCISES.len());
    assert_eq!(seed::seed_default_exercises(&mut conn).unwrap(), 0);
}

#[tokio::test]
async fn tracker_defaults_workout_date_to_today() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("tracker.db");
    let tracker = Tracker::open(url.to_str().unwrap(), 2).await.unwrap();

    let template = tracker
        .create_template(
            NewTemplate {
                name: "Empty".into(),
                workout_type: "Cardio".into(),
                note: None,
            },
            Vec::new(),
        )
        .await
        .unwrap();
    let workout = tracker
        .create_workout_from_template(template.id, None, Some("Run".into()))
        .await
        .unwrap();
    assert_eq!(workout.date, repbook::tracker::today());
    assert_eq!(workout.workout_type, "Run");
}

#[test]
fn concurrent_set_writes_all_commit() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("concurrent.db");
    let pool = init_database(url.to_str().unwrap(), 4).unwrap();
    let (bench, w) = {
        let mut conn = pool.get().unwrap();
        let bench = exercise(&mut conn, "Bench Press", "Chest");
        (bench, workout(&mut conn, "2025-05-01", "Push"))
    };

    let results: Vec<repbook::Result<()>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8_i32)
            .map(|t| {
                let pool = pool.clone();
                scope.spawn(move || -> repbook::Result<()> {
                    for i in 0..10 {
                        let mut conn = pool.get()?;
                        operations::create_set(
                            &mut conn,
                            NewWorkoutSet {
                                workout_id: w,
                                exercise_id: bench,
                                weight: 60.0 + f64::from(t),
                                reps: 5 + i,
                                set_number: None,
                            },
                        )?;
                    }
                    Ok(())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("writer thread"))
            .collect()
    });

    for result in results {
        assert!(result.is_ok(), "{result:?}");
    }
    let mut conn = pool.get().unwrap();
    let detail = operations::get_workout_detail(&mut conn, w).unwrap();
    assert_eq!(detail.sets.len(), 80);
}

#[test]
fn unnumbered_sets_follow_numbered_ones() {
    let (_dir, mut conn) = open();
    let squat = exercise(&mut conn, "Squat", "Legs");
    let w = workout(&mut conn, "2025-06-01", "Legs");
    let mut ids = Vec::new();
    for set_number in [Some(2), None, Some(1)] {
        let created = operations::create_set(
            &mut conn,
            NewWorkoutSet {
                workout_id: w,
                exercise_id: squat,
                weight: 100.0,
                reps: 5,
                set_number,
            },
        )
        .unwrap();
        ids.push(created.id);
    }

    let detail = operations::get_workout_detail(&mut conn, w).unwrap();
    let order: Vec<i32> = detail.sets.iter().map(|s| s.id).collect();
    assert_eq!(order, vec![ids[2], ids[0], ids[1]]);
}
