//! Command-line shell for geofence reminders.
//!
//! # Responsibility
//! - Manage the persisted reminder list from a terminal.
//! - Replay a stdin position feed through proximity evaluation.

mod feed;

use clap::{Parser, Subcommand};
use geofence_core::db::open_db;
use geofence_core::{
    init_logging_from_config, ChannelLocationSource, GeoPoint, GeofenceConfig, GeofenceSession,
    LocationOptions, LocationWatcher, Reminder, ReminderDraft, ReminderId, ReminderObserver,
    ReminderStore, SqliteSlotRepository, Trigger,
};
use log::info;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "geofence", version, about = "Location-based reminders")]
struct Cli {
    /// SQLite file holding the reminder slot (overrides GEOFENCE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List reminders in insertion order
    List,
    /// Save a reminder at a location
    Add {
        #[arg(long)]
        title: String,
        /// Radius in meters
        #[arg(long)]
        radius: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Delete a reminder by id
    Delete { id: ReminderId },
    /// Move a triggered reminder back to pending
    Reset { id: ReminderId },
    /// Read `lat,lng` / `error <code>` lines from stdin and report triggers
    Watch,
}

/// Prints trigger alerts as they happen.
struct ConsoleObserver;

impl ReminderObserver for ConsoleObserver {
    fn on_reminder_triggered(&mut self, reminder: &Reminder, distance_m: f64) {
        let trigger = Trigger {
            reminder: reminder.clone(),
            distance_m,
        };
        println!("{}", trigger.message());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = GeofenceConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&config, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &GeofenceConfig, command: Command) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| format!("open database: {err}"))?;
    let repo = SqliteSlotRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let mut store = ReminderStore::open_with_key(repo, config.slot_key.as_str());

    match command {
        Command::List => {
            if store.reminders().is_empty() {
                println!("No saved reminders.");
            }
            for reminder in store.reminders() {
                print_reminder(reminder);
            }
        }
        Command::Add {
            title,
            radius,
            lat,
            lng,
        } => {
            let draft = ReminderDraft::from_input(&title, &radius, Some(GeoPoint::new(lat, lng)));
            let reminder = store.add(&draft).map_err(|err| err.to_string())?;
            print_reminder(&reminder);
        }
        Command::Delete { id } => {
            let removed = store.delete(id).map_err(|err| err.to_string())?;
            println!("{}", if removed { "Deleted." } else { "No such reminder." });
        }
        Command::Reset { id } => {
            let reset = store.reset_trigger(id).map_err(|err| err.to_string())?;
            println!(
                "{}",
                if reset {
                    "Reset."
                } else {
                    "Already pending or absent."
                }
            );
        }
        Command::Watch => {
            let session = GeofenceSession::new(store, ConsoleObserver)
                .with_default_radius(config.default_radius_m);
            watch_stdin(session)?;
        }
    }
    Ok(())
}

fn watch_stdin(
    mut session: GeofenceSession<SqliteSlotRepository<'_>, ConsoleObserver>,
) -> Result<(), String> {
    let mut watcher = LocationWatcher::new(ChannelLocationSource::new());
    watcher
        .start(&LocationOptions::watch())
        .map_err(|err| err.to_string())?;
    info!("event=cli_watch module=cli status=started");

    let mut triggered = 0;
    for (index, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line.map_err(|err| format!("read stdin: {err}"))?;
        let event = match feed::parse_feed_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("line {}: {err}", index + 1);
                continue;
            }
        };
        watcher.source_mut().push(event);

        let report = session.drain(&mut watcher).map_err(|err| err.to_string())?;
        triggered += report.triggers.len();
        for error in report.errors {
            eprintln!("{} {}", error.status_text(), error.user_message());
        }
    }

    watcher.stop();
    println!("{triggered} reminder(s) triggered.");
    Ok(())
}

fn print_reminder(reminder: &Reminder) {
    let state = if reminder.triggered {
        "triggered"
    } else {
        "pending"
    };
    println!(
        "{}\t{}\t{}\tradius {} m\t{}",
        reminder.id,
        state,
        reminder.title,
        reminder.radius,
        reminder.location()
    );
}
