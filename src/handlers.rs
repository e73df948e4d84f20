use crate::api::{HttpApi, WorkoutApi};
use crate::app::{Cli, Command, EquipmentArgs, EquipmentCommand, SettingsCommand, WorkoutCommand};
use crate::errors::ClientError;
use crate::models::{EquipmentForm, PasswordChange, ProfileUpdate, SetEntry};
use crate::session::SessionController;
use crate::stats::build_dashboard;
use crate::ui::{
    SessionView, TerminalView, render_dashboard, render_equipment, render_history,
    render_preferences, render_session, render_sets,
};

/// Runs one command. Failures are reported through the view before they are
/// returned, so callers only need the exit status.
pub async fn run(cli: Cli) -> Result<(), ClientError> {
    let mut view = TerminalView::new(cli.yes);
    let api = reported(&mut view, HttpApi::new(cli.config()))?;

    match cli.command {
        Command::Equipment { action } => equipment(&api, &mut view, action).await,
        Command::Workout { action } => workout(api, &mut view, action).await,
        Command::Dashboard => dashboard(&api, &mut view).await,
        Command::Settings { action } => settings(&api, &mut view, action).await,
    }
}

async fn equipment(
    api: &HttpApi,
    view: &mut TerminalView,
    action: EquipmentCommand,
) -> Result<(), ClientError> {
    match action {
        EquipmentCommand::List => {
            let equipment = reported(view, api.list_equipment().await)?;
            print!("{}", render_equipment(&equipment));
        }
        EquipmentCommand::Add(args) => {
            let created = reported(view, api.create_equipment(&equipment_form(args)).await)?;
            println!("Added equipment #{} {}", created.id, created.name);
        }
        EquipmentCommand::Edit { id, form } => {
            let updated = reported(view, api.update_equipment(id, &equipment_form(form)).await)?;
            println!("Updated equipment #{} {}", updated.id, updated.name);
        }
        EquipmentCommand::Delete { id } => {
            if !view.confirm("Are you sure you want to delete this item?") {
                println!("Skipped.");
                return Ok(());
            }
            reported(view, api.delete_equipment(id).await)?;
            println!("Deleted equipment #{id}");
        }
    }
    Ok(())
}

async fn workout(
    api: HttpApi,
    view: &mut TerminalView,
    action: WorkoutCommand,
) -> Result<(), ClientError> {
    // Operator input is checked before any request goes out.
    let entry = match &action {
        WorkoutCommand::Set {
            reps,
            weight,
            resistance,
        } => Some(reported(
            view,
            SetEntry::parse(reps, weight, resistance.as_deref()),
        )?),
        _ => None,
    };
    let show_history = matches!(
        action,
        WorkoutCommand::History | WorkoutCommand::Complete | WorkoutCommand::Abandon
    );

    {
        let mut controller = SessionController::new(api, &mut *view);
        controller.activate().await?;

        match action {
            WorkoutCommand::Status | WorkoutCommand::History => {}
            WorkoutCommand::Start { equipment_id } => controller.start(&equipment_id).await?,
            WorkoutCommand::Set { .. } => {
                if let Some(entry) = entry {
                    controller.record_set(entry).await?;
                }
            }
            WorkoutCommand::DeleteSet { set_id } => {
                if !controller.delete_set(set_id).await? {
                    println!("Skipped.");
                }
            }
            WorkoutCommand::Complete => controller.complete().await?,
            WorkoutCommand::Abandon => {
                if !controller.abandon().await? {
                    println!("Skipped.");
                }
            }
        }
    }

    print!("{}", render_session(&view.state));
    if view.state.active().is_some() {
        print!("{}", render_sets(&view.sets));
    }
    if show_history {
        println!();
        print!("{}", render_history(&view.history));
    }
    Ok(())
}

async fn dashboard(api: &HttpApi, view: &mut TerminalView) -> Result<(), ClientError> {
    let history = reported(view, api.list_workouts().await)?;
    print!("{}", render_dashboard(&build_dashboard(&history)));
    Ok(())
}

async fn settings(
    api: &HttpApi,
    view: &mut TerminalView,
    action: SettingsCommand,
) -> Result<(), ClientError> {
    match action {
        SettingsCommand::Show => {
            let preferences = reported(view, api.preferences().await)?;
            print!("{}", render_preferences(&preferences));
        }
        SettingsCommand::Prefs { units, rest, theme } => {
            let mut preferences = reported(view, api.preferences().await)?;
            if let Some(units) = units {
                preferences.units = units;
            }
            if let Some(rest) = rest {
                preferences.default_rest_time = rest;
            }
            if let Some(theme) = theme {
                preferences.theme = theme;
            }
            reported(view, api.update_preferences(&preferences).await)?;
            println!("Preferences updated successfully!");
            print!("{}", render_preferences(&preferences));
        }
        SettingsCommand::Profile {
            first_name,
            last_name,
            email,
        } => {
            let profile = ProfileUpdate {
                first_name,
                last_name,
                email,
            };
            reported(view, api.update_profile(&profile).await)?;
            println!("Profile updated successfully!");
        }
        SettingsCommand::Password {
            current,
            new,
            confirm,
        } => {
            let change = reported(view, PasswordChange::new(&current, &new, &confirm))?;
            reported(view, api.change_password(&change).await)?;
            println!("Password updated successfully!");
        }
    }
    Ok(())
}

fn equipment_form(args: EquipmentArgs) -> EquipmentForm {
    EquipmentForm {
        name: args.name,
        kind: args.kind,
        description: args.description,
        is_active: !args.inactive,
        image_path: args.image,
    }
}

fn reported<T>(view: &mut TerminalView, result: Result<T, ClientError>) -> Result<T, ClientError> {
    result.map_err(|err| {
        view.error(&err.to_string());
        err
    })
}
