//! Async entry point over the store.
//!
//! `Tracker` owns the connection pool and exposes every operation as an async
//! method; the diesel work itself runs on the blocking pool through
//! [`db::interact`].

use log::info;

use crate::db::models::{
    Exercise, NewExercise, NewTemplate, NewWorkout, NewWorkoutSet, Template, TemplateDetail,
    TemplateSet, TemplateSetInput, UpdateExercise, UpdateTemplate, UpdateWorkout,
    UpdateWorkoutSet, Workout, WorkoutDetail, WorkoutSet,
};
use crate::db::{self, DbPool, operations, seed};
use crate::error::Result;
use crate::history::{self, HistoryFilter, WorkoutHistory};
use crate::records::{self, ExerciseRecord, RankedRecords, SortKey};
use crate::templates;

#[derive(Clone)]
pub struct Tracker {
    pool: DbPool,
}

/// Today's date in the `YYYY-MM-DD` form workouts are stored with.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

impl Tracker {
    /// Opens (or creates) the database at `database_url` and applies pending migrations.
    pub async fn open(database_url: &str, pool_size: u32) -> Result<Self> {
        let url = database_url.to_string();
        let pool = tokio::task::spawn_blocking(move || db::init_database(&url, pool_size)).await??;
        info!("Database ready at {}", database_url);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn seed_default_exercises(&self) -> Result<usize> {
        db::interact(&self.pool, seed::seed_default_exercises).await
    }

    // Exercises

    pub async fn list_exercises(&self, muscle_group: Option<String>) -> Result<Vec<Exercise>> {
        db::interact(&self.pool, move |conn| {
            operations::list_exercises(conn, muscle_group.as_deref())
        })
        .await
    }

    pub async fn get_exercise(&self, exercise_id: i32) -> Result<Exercise> {
        db::interact(&self.pool, move |conn| operations::get_exercise(conn, exercise_id)).await
    }

    pub async fn create_exercise(&self, new: NewExercise) -> Result<Exercise> {
        let exercise =
            db::interact(&self.pool, move |conn| operations::create_exercise(conn, new)).await?;
        info!("Created exercise {} ({})", exercise.id, exercise.name);
        Ok(exercise)
    }

    pub async fn update_exercise(&self, exercise_id: i32, update: UpdateExercise) -> Result<Exercise> {
        db::interact(&self.pool, move |conn| {
            operations::update_exercise(conn, exercise_id, update)
        })
        .await
    }

    pub async fn delete_exercise(&self, exercise_id: i32) -> Result<()> {
        db::interact(&self.pool, move |conn| operations::delete_exercise(conn, exercise_id)).await?;
        info!("Deleted exercise {}", exercise_id);
        Ok(())
    }

    // Workouts

    pub async fn list_workouts(&self) -> Result<Vec<Workout>> {
        db::interact(&self.pool, operations::list_workouts).await
    }

    pub async fn get_workout(&self, workout_id: i32) -> Result<WorkoutDetail> {
        db::interact(&self.pool, move |conn| {
            operations::get_workout_detail(conn, workout_id)
        })
        .await
    }

    pub async fn create_workout(&self, new: NewWorkout) -> Result<Workout> {
        let workout =
            db::interact(&self.pool, move |conn| operations::create_workout(conn, new)).await?;
        info!("Created workout {} on {}", workout.id, workout.date);
        Ok(workout)
    }

    pub async fn update_workout(&self, workout_id: i32, update: UpdateWorkout) -> Result<Workout> {
        db::interact(&self.pool, move |conn| {
            operations::update_workout(conn, workout_id, update)
        })
        .await
    }

    pub async fn delete_workout(&self, workout_id: i32) -> Result<()> {
        db::interact(&self.pool, move |conn| operations::delete_workout(conn, workout_id)).await?;
        info!("Deleted workout {}", workout_id);
        Ok(())
    }

    // Sets

    pub async fn create_set(&self, new: NewWorkoutSet) -> Result<WorkoutSet> {
        db::interact(&self.pool, move |conn| operations::create_set(conn, new)).await
    }

    pub async fn update_set(&self, set_id: i32, update: UpdateWorkoutSet) -> Result<WorkoutSet> {
        db::interact(&self.pool, move |conn| operations::update_set(conn, set_id, update)).await
    }

    pub async fn delete_set(&self, set_id: i32) -> Result<()> {
        db::interact(&self.pool, move |conn| operations::delete_set(conn, set_id)).await
    }

    // Templates

    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        db::interact(&self.pool, templates::list_templates).await
    }

    pub async fn get_template(&self, template_id: i32) -> Result<TemplateDetail> {
        db::interact(&self.pool, move |conn| {
            templates::get_template_detail(conn, template_id)
        })
        .await
    }

    pub async fn create_template(
        &self,
        new: NewTemplate,
        sets: Vec<TemplateSetInput>,
    ) -> Result<Template> {
        let template = db::interact(&self.pool, move |conn| {
            templates::create_template(conn, new, sets)
        })
        .await?;
        info!("Created template {} ({})", template.id, template.name);
        Ok(template)
    }

    pub async fn update_template(&self, template_id: i32, update: UpdateTemplate) -> Result<Template> {
        db::interact(&self.pool, move |conn| {
            templates::update_template(conn, template_id, update)
        })
        .await
    }

    pub async fn delete_template(&self, template_id: i32) -> Result<()> {
        db::interact(&self.pool, move |conn| templates::delete_template(conn, template_id)).await
    }

    pub async fn add_template_set(
        &self,
        template_id: i32,
        input: TemplateSetInput,
    ) -> Result<TemplateSet> {
        db::interact(&self.pool, move |conn| {
            templates::add_template_set(conn, template_id, input)
        })
        .await
    }

    pub async fn delete_template_set(&self, template_set_id: i32) -> Result<()> {
        db::interact(&self.pool, move |conn| {
            templates::delete_template_set(conn, template_set_id)
        })
        .await
    }

    /// `date` defaults to today, `workout_type` to the template's own type.
    pub async fn create_workout_from_template(
        &self,
        template_id: i32,
        date: Option<String>,
        workout_type: Option<String>,
    ) -> Result<Workout> {
        let date = date.unwrap_or_else(today);
        db::interact(&self.pool, move |conn| {
            templates::create_workout_from_template(conn, template_id, date, workout_type)
        })
        .await
    }

    pub async fn create_template_from_workout(&self, workout_id: i32, name: String) -> Result<Template> {
        db::interact(&self.pool, move |conn| {
            templates::create_template_from_workout(conn, workout_id, name)
        })
        .await
    }

    // Records and history

    pub async fn get_all_records(&self, sort_by: SortKey) -> Result<RankedRecords> {
        db::interact(&self.pool, move |conn| records::get_all_records(conn, sort_by)).await
    }

    pub async fn get_exercise_record(&self, exercise_id: i32) -> Result<ExerciseRecord> {
        db::interact(&self.pool, move |conn| {
            records::get_exercise_record(conn, exercise_id)
        })
        .await
    }

    pub async fn get_workout_history(&self, filter: HistoryFilter) -> Result<WorkoutHistory> {
        db::interact(&self.pool, move |conn| {
            history::get_workout_history(conn, &filter)
        })
        .await
    }
}
