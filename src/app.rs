use crate::config::ClientConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gym_tracker", about = "Client for the gym workout tracker API")]
pub struct Cli {
    /// API base URL; overrides GYM_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Answer yes to every confirmation prompt.
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn config(&self) -> ClientConfig {
        let config = ClientConfig::from_env();
        match &self.api_url {
            Some(url) => config.with_api_url(url),
            None => config,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the equipment directory.
    Equipment {
        #[command(subcommand)]
        action: EquipmentCommand,
    },
    /// Record a live workout.
    Workout {
        #[command(subcommand)]
        action: WorkoutCommand,
    },
    /// Show workout statistics.
    Dashboard,
    /// View or change user settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum EquipmentCommand {
    List,
    Add(EquipmentArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        form: EquipmentArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct EquipmentArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type")]
    pub kind: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Mark the equipment inactive.
    #[arg(long)]
    pub inactive: bool,
    /// Image file to upload.
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum WorkoutCommand {
    /// Show the active workout and its sets.
    Status,
    Start {
        equipment_id: String,
    },
    /// Record a set on the active workout.
    Set {
        reps: String,
        weight: String,
        resistance: Option<String>,
    },
    DeleteSet {
        set_id: i64,
    },
    Complete,
    Abandon,
    History,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    Prefs {
        #[arg(long)]
        units: Option<String>,
        #[arg(long)]
        rest: Option<u32>,
        #[arg(long)]
        theme: Option<String>,
    },
    Profile {
        first_name: String,
        last_name: String,
        email: String,
    },
    Password {
        current: String,
        new: String,
        confirm: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_workout_set_with_optional_resistance() {
        let cli = Cli::parse_from(["gym_tracker", "workout", "set", "10", "50"]);
        match cli.command {
            Command::Workout {
                action:
                    WorkoutCommand::Set {
                        reps,
                        weight,
                        resistance,
                    },
            } => {
                assert_eq!(reps, "10");
                assert_eq!(weight, "50");
                assert_eq!(resistance, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "gym_tracker",
            "equipment",
            "delete",
            "4",
            "--yes",
            "--api-url",
            "http://gym.local/",
        ]);
        assert!(cli.yes);
        assert_eq!(cli.config().api_url, "http://gym.local");
    }

    #[test]
    fn equipment_add_reads_type_flag() {
        let cli = Cli::parse_from([
            "gym_tracker", "equipment", "add", "--name", "Rower", "--type", "Cardio",
        ]);
        match cli.command {
            Command::Equipment {
                action: EquipmentCommand::Add(form),
            } => {
                assert_eq!(form.kind, "Cardio");
                assert!(!form.inactive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
