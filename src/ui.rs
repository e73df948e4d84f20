use crate::models::{Equipment, Preferences, WorkoutSession, WorkoutSet};
use crate::state::SessionState;
use crate::stats::DashboardStats;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

/// Receives every state change the session controller publishes.
pub trait SessionView {
    fn session_changed(&mut self, state: &SessionState);
    fn sets_changed(&mut self, sets: &[WorkoutSet]);
    fn history_changed(&mut self, history: &[WorkoutSession]);
    fn equipment_changed(&mut self, equipment: &[Equipment]);
    fn error(&mut self, message: &str);
    /// Guard for destructive actions. Returning false skips the action.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<T: SessionView + ?Sized> SessionView for &mut T {
    fn session_changed(&mut self, state: &SessionState) {
        (**self).session_changed(state);
    }

    fn sets_changed(&mut self, sets: &[WorkoutSet]) {
        (**self).sets_changed(sets);
    }

    fn history_changed(&mut self, history: &[WorkoutSession]) {
        (**self).history_changed(history);
    }

    fn equipment_changed(&mut self, equipment: &[Equipment]) {
        (**self).equipment_changed(equipment);
    }

    fn error(&mut self, message: &str) {
        (**self).error(message);
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Terminal adapter: keeps the latest snapshot for the command to print and
/// reports errors on stderr as they happen.
#[derive(Debug, Default)]
pub struct TerminalView {
    pub assume_yes: bool,
    pub state: SessionState,
    pub sets: Vec<WorkoutSet>,
    pub history: Vec<WorkoutSession>,
    pub equipment: Vec<Equipment>,
    pub errors: Vec<String>,
}

impl TerminalView {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            ..Self::default()
        }
    }
}

impl SessionView for TerminalView {
    fn session_changed(&mut self, state: &SessionState) {
        self.state = state.clone();
        if state.active().is_none() {
            self.sets.clear();
        }
    }

    fn sets_changed(&mut self, sets: &[WorkoutSet]) {
        self.sets = sets.to_vec();
    }

    fn history_changed(&mut self, history: &[WorkoutSession]) {
        self.history = history.to_vec();
    }

    fn equipment_changed(&mut self, equipment: &[Equipment]) {
        self.equipment = equipment.to_vec();
    }

    fn error(&mut self, message: &str) {
        eprintln!("Error: {message}");
        self.errors.push(message.to_string());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        prompt_yes_no(prompt, io::stdin().lock())
    }
}

fn prompt_yes_no(prompt: &str, mut input: impl BufRead) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn render_session(state: &SessionState) -> String {
    match state {
        SessionState::Unloaded => "Workout state not loaded.\n".to_string(),
        SessionState::Idle => {
            "No active workout. Start one with `workout start <equipment-id>`.\n".to_string()
        }
        SessionState::Active(session) => {
            let mut out = String::new();
            let _ = writeln!(out, "Active workout #{}", session.id);
            match &session.equipment {
                Some(eq) => {
                    let _ = writeln!(out, "  Equipment: {}", eq.name);
                    let _ = writeln!(out, "  Type:      {}", eq.kind);
                }
                None => {
                    let _ = writeln!(out, "  Equipment: #{}", session.equipment_id);
                }
            }
            if let Some(started) = session.started_at {
                let _ = writeln!(out, "  Started:   {}", started.format("%Y-%m-%d %H:%M"));
            }
            out
        }
    }
}

pub fn render_sets(sets: &[WorkoutSet]) -> String {
    if sets.is_empty() {
        return "No sets recorded yet.\n".to_string();
    }

    let mut out = String::new();
    for set in sets {
        let _ = write!(
            out,
            "Set {}: {} reps  {} kg",
            set.set_num, set.reps_dist, set.weight_time
        );
        if set.resistance != 0 {
            let _ = write!(out, "  resistance {}", set.resistance);
        }
        let _ = writeln!(out, "  (id {})", set.id);
    }
    out
}

pub fn render_history(history: &[WorkoutSession]) -> String {
    if history.is_empty() {
        return "No workout history yet.\n".to_string();
    }

    let mut out = String::new();
    for workout in history {
        let date = workout
            .date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            out,
            "{date}  {:<20} {:<12} {} sets",
            workout.equipment_name(),
            workout.status.label(),
            workout.sets_count
        );
        if workout.max_weight > 0 {
            let _ = write!(out, "  Max: {}kg", workout.max_weight);
        }
        out.push('\n');
    }
    out
}

pub fn render_equipment(equipment: &[Equipment]) -> String {
    if equipment.is_empty() {
        return "No equipment found. Add some!\n".to_string();
    }

    let mut out = String::new();
    for eq in equipment {
        let _ = writeln!(
            out,
            "#{:<4} {} ({}) [{}]{}",
            eq.id,
            eq.name,
            eq.kind,
            if eq.is_active { "Active" } else { "Inactive" },
            if eq.image_base64.is_some() { " +image" } else { "" }
        );
        if let Some(description) = eq.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "      {description}");
        }
    }
    out
}

pub fn render_dashboard(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total workouts: {}", stats.total_workouts);
    let _ = writeln!(out, "This week:      {}", stats.this_week);
    let _ = writeln!(out, "Streak (days):  {}", stats.streak_days);

    let _ = writeln!(out, "\nWeekly frequency");
    for point in &stats.weekly_frequency {
        let _ = writeln!(
            out,
            "  {}  {:>3} {}",
            point.start_date,
            point.count,
            "#".repeat(point.count as usize)
        );
    }

    let _ = writeln!(out, "\nEquipment usage");
    if stats.equipment_usage.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for usage in &stats.equipment_usage {
        let _ = writeln!(out, "  {:<20} {}", usage.name, usage.count);
    }

    let _ = writeln!(out, "\nRecent workouts");
    if stats.recent.is_empty() {
        let _ = writeln!(out, "  No recent workouts.");
    }
    for recent in &stats.recent {
        let _ = writeln!(
            out,
            "  {:<20} {} sets  {}",
            recent.equipment, recent.sets_count, recent.date
        );
    }
    out
}

pub fn render_preferences(preferences: &Preferences) -> String {
    format!(
        "Units:             {}\nDefault rest time: {}s\nTheme:             {}\n",
        preferences.units, preferences.default_rest_time, preferences.theme
    )
}
