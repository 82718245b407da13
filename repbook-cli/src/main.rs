use std::net::SocketAddr;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::info;

use repbook::Tracker;
use repbook::db::{DEFAULT_DATABASE_URL, default_pool_size};
use repbook::history::{HistoryEntry, HistoryFilter};
use repbook::logging::set_log_level;
use repbook::records::{BestSet, RecordSummary, SortKey};
use repbook_server::{AppState, DEFAULT_BIND, ServerConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Repbook - workout tracker and personal records", long_about = None)]
struct Args {
    /// SQLite database file
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL, global = true)]
    database: String,

    /// off, error, warn, info, debug or trace
    #[arg(long, env = "REPBOOK_LOG", default_value = "info", global = true)]
    log_level: String,

    /// Maximum pooled connections (defaults to the CPU count, at least 2)
    #[arg(long, env = "REPBOOK_POOL_SIZE", global = true)]
    pool_size: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "REPBOOK_BIND", default_value_t = DEFAULT_BIND)]
        bind: SocketAddr,
        /// Insert the default exercise list into an empty database first
        #[arg(long)]
        seed: bool,
    },
    /// Apply pending migrations
    Migrate,
    /// Insert the default exercise list if no exercise exists yet
    Seed,
    /// Print the personal record table
    Records {
        #[arg(short, long, default_value_t = SortKey::Name)]
        sort_by: SortKey,
    },
    /// Print one exercise's record detail
    Exercise { id: i32 },
    /// Print recent workouts with the records they set
    History {
        #[arg(short, long)]
        limit: Option<i64>,
        #[arg(short = 't', long = "type")]
        workout_type: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
}

fn format_best(best: Option<&BestSet>) -> String {
    match best {
        Some(b) => format!("{:.1}kg x {} ({})", b.weight, b.reps, b.date),
        None => "-".to_string(),
    }
}

fn print_summary(r: &RecordSummary) {
    println!(
        "{:<28} {:<12} weight {:<28} reps {:<28} volume {:<10} sets {}",
        r.exercise_name,
        r.muscle_group,
        format_best(r.best_weight.as_ref()),
        format_best(r.best_reps.as_ref()),
        r.max_volume()
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "-".to_string()),
        r.total_sets
    );
}

fn print_history_entry(entry: &HistoryEntry) {
    let w = &entry.workout;
    let template = entry
        .template_name
        .as_deref()
        .map(|name| format!(" [{name}]"))
        .unwrap_or_default();
    println!(
        "#{} {} {}{} - {} sets, {:.1} volume",
        w.id, w.date, w.workout_type, template, entry.statistics.total_sets, entry.statistics.total_volume
    );
    for set in &entry.sets {
        println!("    {set}");
    }
    for record in entry.records.iter().flatten() {
        let kinds: Vec<&str> = record.record_types.iter().map(|k| k.as_str()).collect();
        println!(
            "    * new record on {}: {}",
            record.exercise_name,
            kinds.join(", ")
        );
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    if !set_log_level(&args.log_level) {
        bail!("unknown log level '{}'", args.log_level);
    }

    let pool_size = args.pool_size.unwrap_or_else(default_pool_size);
    let tracker = Tracker::open(&args.database, pool_size).await?;

    match args.command {
        Commands::Serve { bind, seed } => {
            if seed {
                let inserted = tracker.seed_default_exercises().await?;
                info!("Seeded {} exercises", inserted);
            }
            repbook_server::serve(AppState::new(tracker), ServerConfig { bind }).await?;
        }
        Commands::Migrate => {
            println!("Database {} is up to date", args.database);
        }
        Commands::Seed => {
            let inserted = tracker.seed_default_exercises().await?;
            if inserted == 0 {
                println!("Exercises already present, nothing seeded");
            } else {
                println!("Seeded {inserted} exercises");
            }
        }
        Commands::Records { sort_by } => {
            let ranked = tracker.get_all_records(sort_by).await?;
            if ranked.records.is_empty() {
                println!("No records yet");
            }
            for summary in &ranked.records {
                print_summary(summary);
            }
        }
        Commands::Exercise { id } => {
            let detail = tracker.get_exercise_record(id).await?;
            print_summary(&detail.record);
            if let Some(avg) = detail.statistics.avg_weight {
                println!("average weight {avg:.1}kg");
            }
            if let Some(avg) = detail.statistics.avg_reps {
                println!("average reps {avg:.1}");
            }
            println!("total volume {:.1}", detail.statistics.total_volume);
            println!("top sets by weight:");
            for best in &detail.top_sets_by_weight {
                println!("    {}", format_best(Some(best)));
            }
        }
        Commands::History {
            limit,
            workout_type,
            from,
            to,
        } => {
            let history = tracker
                .get_workout_history(HistoryFilter {
                    workout_type,
                    date_from: from,
                    date_to: to,
                    limit,
                    ..HistoryFilter::default()
                })
                .await?;
            for entry in &history.workouts {
                print_history_entry(entry);
            }
            if let Some(summary) = history.summary {
                println!(
                    "{} workouts, {} sets, {} exercises, {:.1} total volume",
                    summary.total_workouts,
                    summary.total_sets,
                    summary.unique_exercises,
                    summary.total_volume
                );
            }
        }
    }

    Ok(())
}
