use diesel::prelude::*;
use log::info;

use crate::db::models::NewExercise;
use crate::db::schema::exercises;
use crate::error::Result;

pub const DEFAULT_EXERCISES: &[(&str, &str)] = &[
    ("Bench Press", "Chest"),
    ("Incline Dumbbell Press", "Chest"),
    ("Dumbbell Fly", "Chest"),
    ("Push-Up", "Chest"),
    ("Cable Crossover", "Chest"),
    ("Pull-Up", "Back"),
    ("Lat Pulldown", "Back"),
    ("Barbell Row", "Back"),
    ("Seated Cable Row", "Back"),
    ("Deadlift", "Back"),
    ("Back Squat", "Legs"),
    ("Leg Press", "Legs"),
    ("Romanian Deadlift", "Legs"),
    ("Leg Extension", "Legs"),
    ("Leg Curl", "Legs"),
    ("Calf Raise", "Legs"),
    ("Overhead Press", "Shoulders"),
    ("Dumbbell Lateral Raise", "Shoulders"),
    ("Front Raise", "Shoulders"),
    ("Face Pull", "Shoulders"),
    ("Barbell Curl", "Biceps"),
    ("Dumbbell Curl", "Biceps"),
    ("Hammer Curl", "Biceps"),
    ("Tricep Pushdown", "Triceps"),
    ("Skull Crushers", "Triceps"),
    ("Dips", "Triceps"),
    ("Plank", "Core"),
    ("Crunches", "Core"),
    ("Russian Twist", "Core"),
    ("Hanging Leg Raise", "Core"),
    ("Burpees", "Full Body"),
];

/// Inserts the default exercise list into an empty exercise table.
/// Returns the number of exercises inserted; zero when any exercise already exists.
pub fn seed_default_exercises(conn: &mut SqliteConnection) -> Result<usize> {
    conn.immediate_transaction(|conn| {
        let existing: i64 = exercises::table.count().get_result(conn)?;
        if existing > 0 {
            info!("Exercise table already has {} rows, skipping seed", existing);
            return Ok(0);
        }

        let mut inserted = 0;
        for (name, muscle_group) in DEFAULT_EXERCISES {
            inserted += diesel::insert_into(exercises::table)
                .values(&NewExercise {
                    name: name.to_string(),
                    muscle_group: muscle_group.to_string(),
                    note: None,
                })
                .execute(conn)?;
        }
        info!("Seeded {} default exercises", inserted);
        Ok(inserted)
    })
}
