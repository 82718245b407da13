//! Workout templates and the copies between templates and workouts.

use diesel::prelude::*;
use log::info;

use crate::db::models::{
    NewTemplate, NewTemplateSet, NewWorkout, NewWorkoutSet, Template, TemplateDetail,
    TemplateSet, TemplateSetDetail, TemplateSetInput, UpdateTemplate, Workout,
};
use crate::db::operations::{get_exercise, get_workout};
use crate::db::schema::{exercises, sets, template_sets, templates, workouts};
use crate::error::{Error, Result};

pub fn list_templates(conn: &mut SqliteConnection) -> Result<Vec<Template>> {
    Ok(templates::table
        .order(templates::name.asc())
        .then_order_by(templates::id.asc())
        .load::<Template>(conn)?)
}

pub fn get_template(conn: &mut SqliteConnection, template_id: i32) -> Result<Template> {
    templates::table
        .find(template_id)
        .first::<Template>(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("Template", template_id))
}

pub fn get_template_detail(
    conn: &mut SqliteConnection,
    template_id: i32,
) -> Result<TemplateDetail> {
    conn.transaction(|conn| {
        let template = get_template(conn, template_id)?;
        let mut sets = template_sets::table
            .inner_join(exercises::table)
            .filter(template_sets::template_id.eq(template_id))
            .select((
                template_sets::id,
                template_sets::template_id,
                template_sets::exercise_id,
                exercises::name,
                exercises::muscle_group,
                template_sets::weight,
                template_sets::reps,
                template_sets::set_number,
            ))
            .load::<TemplateSetDetail>(conn)?;
        sets.sort_by_key(|s| (s.set_number.is_none(), s.set_number, s.id));
        Ok(TemplateDetail { template, sets })
    })
}

/// Creates a template together with its sets; nothing is written if any set is invalid.
pub fn create_template(
    conn: &mut SqliteConnection,
    new: NewTemplate,
    sets: Vec<TemplateSetInput>,
) -> Result<Template> {
    let new = new.normalized()?;
    let sets = sets
        .into_iter()
        .map(TemplateSetInput::normalized)
        .collect::<Result<Vec<_>>>()?;

    conn.immediate_transaction(|conn| {
        let template = diesel::insert_into(templates::table)
            .values(&new)
            .get_result::<Template>(conn)?;
        for set in &sets {
            get_exercise(conn, set.exercise_id)?;
            diesel::insert_into(template_sets::table)
                .values(&set.attach(template.id))
                .execute(conn)?;
        }
        Ok(template)
    })
}

pub fn update_template(
    conn: &mut SqliteConnection,
    template_id: i32,
    update: UpdateTemplate,
) -> Result<Template> {
    let update = update.normalized()?;
    diesel::update(templates::table.find(template_id))
        .set(&update)
        .get_result::<Template>(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("Template", template_id))
}

/// Deletes a template and its sets. Workouts created from it keep their dangling template id.
pub fn delete_template(conn: &mut SqliteConnection, template_id: i32) -> Result<()> {
    let deleted = diesel::delete(templates::table.find(template_id)).execute(conn)?;
    if deleted == 0 {
        return Err(Error::not_found("Template", template_id));
    }
    Ok(())
}

pub fn add_template_set(
    conn: &mut SqliteConnection,
    template_id: i32,
    input: TemplateSetInput,
) -> Result<TemplateSet> {
    let input = input.normalized()?;
    conn.immediate_transaction(|conn| {
        get_template(conn, template_id)?;
        get_exercise(conn, input.exercise_id)?;
        Ok(diesel::insert_into(template_sets::table)
            .values(&input.attach(template_id))
            .get_result::<TemplateSet>(conn)?)
    })
}

pub fn delete_template_set(conn: &mut SqliteConnection, template_set_id: i32) -> Result<()> {
    let deleted = diesel::delete(template_sets::table.find(template_set_id)).execute(conn)?;
    if deleted == 0 {
        return Err(Error::not_found("TemplateSet", template_set_id));
    }
    Ok(())
}

/// Instantiates a workout from a template, copying every template set.
/// `workout_type` defaults to the template's type.
pub fn create_workout_from_template(
    conn: &mut SqliteConnection,
    template_id: i32,
    date: String,
    workout_type: Option<String>,
) -> Result<Workout> {
    conn.immediate_transaction(|conn| {
        let template = get_template(conn, template_id)?;
        let new = NewWorkout {
            date,
            workout_type: workout_type.unwrap_or_else(|| template.workout_type.clone()),
            note: template.note.clone(),
            template_id: Some(template.id),
        }
        .normalized()?;

        let workout = diesel::insert_into(workouts::table)
            .values(&new)
            .get_result::<Workout>(conn)?;

        let blueprint = template_sets::table
            .filter(template_sets::template_id.eq(template_id))
            .order(template_sets::id.asc())
            .load::<TemplateSet>(conn)?;
        for ts in &blueprint {
            diesel::insert_into(sets::table)
                .values(&NewWorkoutSet {
                    workout_id: workout.id,
                    exercise_id: ts.exercise_id,
                    weight: ts.weight,
                    reps: ts.reps,
                    set_number: ts.set_number,
                })
                .execute(conn)?;
        }

        info!(
            "Created workout {} from template {} with {} sets",
            workout.id,
            template_id,
            blueprint.len()
        );
        Ok(workout)
    })
}

/// Captures a workout's sets as a new template named `name`.
pub fn create_template_from_workout(
    conn: &mut SqliteConnection,
    workout_id: i32,
    name: String,
) -> Result<Template> {
    conn.immediate_transaction(|conn| {
        let workout = get_workout(conn, workout_id)?;
        let new = NewTemplate {
            name,
            workout_type: workout.workout_type.clone(),
            note: workout.note.clone(),
        }
        .normalized()?;

        let template = diesel::insert_into(templates::table)
            .values(&new)
            .get_result::<Template>(conn)?;

        let performed = sets::table
            .filter(sets::workout_id.eq(workout_id))
            .order(sets::id.asc())
            .select((sets::exercise_id, sets::weight, sets::reps, sets::set_number))
            .load::<(i32, f64, i32, Option<i32>)>(conn)?;
        for (exercise_id, weight, reps, set_number) in &performed {
            diesel::insert_into(template_sets::table)
                .values(&NewTemplateSet {
                    template_id: template.id,
                    exercise_id: *exercise_id,
                    weight: *weight,
                    reps: *reps,
                    set_number: *set_number,
                })
                .execute(conn)?;
        }

        info!(
            "Created template {} from workout {} with {} sets",
            template.id,
            workout_id,
            performed.len()
        );
        Ok(template)
    })
}
