use diesel::prelude::*;
use log::debug;

use crate::db::models::{
    Exercise, NewExercise, NewWorkout, NewWorkoutSet, SetDetail, SetEntry, UpdateExercise,
    UpdateWorkout, UpdateWorkoutSet, Workout, WorkoutDetail, WorkoutSet,
};
use crate::db::schema::{exercises, sets, template_sets, workouts};
use crate::error::{Error, Result};

// Exercises
pub fn list_exercises(
    conn: &mut SqliteConnection,
    muscle_group: Option<&str>,
) -> Result<Vec<Exercise>> {
    let rows = match muscle_group {
        Some(group) => exercises::table
            .filter(exercises::muscle_group.eq(group))
            .order(exercises::name.asc())
            .load::<Exercise>(conn)?,
        None => exercises::table
            .order((exercises::muscle_group.asc(), exercises::name.asc()))
            .load::<Exercise>(conn)?,
    };
    Ok(rows)
}

pub fn get_exercise(conn: &mut SqliteConnection, exercise_id: i32) -> Result<Exercise> {
    exercises::table
        .find(exercise_id)
        .first::<Exercise>(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("Exercise", exercise_id))
}

pub fn create_exercise(conn: &mut SqliteConnection, new: NewExercise) -> Result<Exercise> {
    let new = new.normalized()?;
    let name = new.name.clone();
    diesel::insert_into(exercises::table)
        .values(&new)
        .get_result::<Exercise>(conn)
        .map_err(|e| {
            Error::from_constraint(e, || {
                format!("Exercise with name '{name}' already exists")
            })
        })
}

pub fn update_exercise(
    conn: &mut SqliteConnection,
    exercise_id: i32,
    update: UpdateExercise,
) -> Result<Exercise> {
    let update = update.normalized()?;
    conn.immediate_transaction(|conn| {
        get_exercise(conn, exercise_id)?;
        diesel::update(exercises::table.find(exercise_id))
            .set(&update)
            .get_result::<Exercise>(conn)
            .map_err(|e| {
                Error::from_constraint(e, || {
                    format!(
                        "Exercise with name '{}' already exists",
                        update.name.as_deref().unwrap_or_default()
                    )
                })
            })
    })
}

/// Deletes an exercise that no set or template set refers to.
pub fn delete_exercise(conn: &mut SqliteConnection, exercise_id: i32) -> Result<()> {
    conn.immediate_transaction(|conn| {
        get_exercise(conn, exercise_id)?;

        let set_refs: i64 = sets::table
            .filter(sets::exercise_id.eq(exercise_id))
            .count()
            .get_result(conn)?;
        let template_refs: i64 = template_sets::table
            .filter(template_sets::exercise_id.eq(exercise_id))
            .count()
            .get_result(conn)?;
        if set_refs > 0 || template_refs > 0 {
            return Err(Error::conflict(format!(
                "Exercise with id={exercise_id} is used by {set_refs} sets and {template_refs} template sets"
            )));
        }

        diesel::delete(exercises::table.find(exercise_id)).execute(conn)?;
        debug!("Deleted exercise {}", exercise_id);
        Ok(())
    })
}

// Workouts
pub fn list_workouts(conn: &mut SqliteConnection) -> Result<Vec<Workout>> {
    Ok(workouts::table
        .order(workouts::id.desc())
        .load::<Workout>(conn)?)
}

pub fn get_workout(conn: &mut SqliteConnection, workout_id: i32) -> Result<Workout> {
    workouts::table
        .find(workout_id)
        .first::<Workout>(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("Workout", workout_id))
}

pub fn get_workout_detail(conn: &mut SqliteConnection, workout_id: i32) -> Result<WorkoutDetail> {
    conn.transaction(|conn| {
        let workout = get_workout(conn, workout_id)?;
        let sets = get_set_details(conn, &[workout_id])?;
        Ok(WorkoutDetail { workout, sets })
    })
}

pub fn create_workout(conn: &mut SqliteConnection, new: NewWorkout) -> Result<Workout> {
    let new = new.normalized()?;
    Ok(diesel::insert_into(workouts::table)
        .values(&new)
        .get_result::<Workout>(conn)?)
}

pub fn update_workout(
    conn: &mut SqliteConnection,
    workout_id: i32,
    update: UpdateWorkout,
) -> Result<Workout> {
    let update = update.normalized()?;
    diesel::update(workouts::table.find(workout_id))
        .set(&update)
        .get_result::<Workout>(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("Workout", workout_id))
}

/// Deletes a workout; its sets go with it.
pub fn delete_workout(conn: &mut SqliteConnection, workout_id: i32) -> Result<()> {
    let deleted = diesel::delete(workouts::table.find(workout_id)).execute(conn)?;
    if deleted == 0 {
        return Err(Error::not_found("Workout", workout_id));
    }
    Ok(())
}

// Sets
pub fn get_set(conn: &mut SqliteConnection, set_id: i32) -> Result<WorkoutSet> {
    sets::table
        .find(set_id)
        .first::<WorkoutSet>(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("Set", set_id))
}

pub fn create_set(conn: &mut SqliteConnection, new: NewWorkoutSet) -> Result<WorkoutSet> {
    let new = new.normalized()?;
    conn.immediate_transaction(|conn| {
        get_workout(conn, new.workout_id)?;
        get_exercise(conn, new.exercise_id)?;
        Ok(diesel::insert_into(sets::table)
            .values(&new)
            .get_result::<WorkoutSet>(conn)?)
    })
}

pub fn update_set(
    conn: &mut SqliteConnection,
    set_id: i32,
    update: UpdateWorkoutSet,
) -> Result<WorkoutSet> {
    let update = update.normalized()?;
    conn.immediate_transaction(|conn| {
        get_set(conn, set_id)?;
        if let Some(exercise_id) = update.exercise_id {
            get_exercise(conn, exercise_id)?;
        }
        Ok(diesel::update(sets::table.find(set_id))
            .set(&update)
            .get_result::<WorkoutSet>(conn)?)
    })
}

pub fn delete_set(conn: &mut SqliteConnection, set_id: i32) -> Result<()> {
    let deleted = diesel::delete(sets::table.find(set_id)).execute(conn)?;
    if deleted == 0 {
        return Err(Error::not_found("Set", set_id));
    }
    Ok(())
}

/// Sets of the given workouts joined with their exercise, in display order:
/// by workout, then set number (unnumbered last), then id.
pub fn get_set_details(conn: &mut SqliteConnection, workout_ids: &[i32]) -> Result<Vec<SetDetail>> {
    if workout_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut rows = sets::table
        .inner_join(exercises::table)
        .filter(sets::workout_id.eq_any(workout_ids.to_vec()))
        .select((
            sets::id,
            sets::workout_id,
            sets::exercise_id,
            exercises::name,
            exercises::muscle_group,
            sets::weight,
            sets::reps,
            sets::set_number,
        ))
        .load::<SetDetail>(conn)?;
    rows.sort_by_key(|s| (s.workout_id, s.set_number.is_none(), s.set_number, s.id));
    Ok(rows)
}

/// Every set of one exercise with its workout's date and type, oldest set first.
pub fn get_set_entries_for_exercise(
    conn: &mut SqliteConnection,
    exercise_id: i32,
) -> Result<Vec<SetEntry>> {
    Ok(sets::table
        .inner_join(workouts::table)
        .filter(sets::exercise_id.eq(exercise_id))
        .select(set_entry_columns())
        .order(sets::id.asc())
        .load::<SetEntry>(conn)?)
}

pub fn get_all_set_entries(conn: &mut SqliteConnection) -> Result<Vec<SetEntry>> {
    Ok(sets::table
        .inner_join(workouts::table)
        .select(set_entry_columns())
        .order(sets::id.asc())
        .load::<SetEntry>(conn)?)
}

/// Set entries of the given exercises recorded in workouts with an id below `before_workout`.
pub fn get_set_entries_before(
    conn: &mut SqliteConnection,
    exercise_ids: &[i32],
    before_workout: i32,
) -> Result<Vec<SetEntry>> {
    if exercise_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(sets::table
        .inner_join(workouts::table)
        .filter(sets::exercise_id.eq_any(exercise_ids.to_vec()))
        .filter(sets::workout_id.lt(before_workout))
        .select(set_entry_columns())
        .order(sets::id.asc())
        .load::<SetEntry>(conn)?)
}

#[allow(clippy::type_complexity)]
fn set_entry_columns() -> (
    sets::id,
    sets::workout_id,
    sets::exercise_id,
    sets::weight,
    sets::reps,
    workouts::date,
    workouts::workout_type,
) {
    (
        sets::id,
        sets::workout_id,
        sets::exercise_id,
        sets::weight,
        sets::reps,
        workouts::date,
        workouts::workout_type,
    )
}
