use crate::models::{WorkoutSession, WorkoutStatus};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

pub const WEEK_COUNT: usize = 12;
pub const RECENT_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPoint {
    pub start_date: String,
    pub end_date: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsagePoint {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentWorkout {
    pub equipment: String,
    pub sets_count: u32,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_workouts: usize,
    pub this_week: usize,
    pub streak_days: u32,
    pub weekly_frequency: Vec<WeeklyPoint>,
    pub equipment_usage: Vec<UsagePoint>,
    pub recent: Vec<RecentWorkout>,
}

pub fn build_dashboard(history: &[WorkoutSession]) -> DashboardStats {
    build_dashboard_at(Local::now().date_naive(), history)
}

pub fn build_dashboard_at(today: NaiveDate, history: &[WorkoutSession]) -> DashboardStats {
    let current_week_start = week_start(today);

    let this_week = history
        .iter()
        .filter(|workout| workout.status == WorkoutStatus::Completed)
        .filter(|workout| workout.date.is_some_and(|date| date >= current_week_start))
        .count();

    DashboardStats {
        total_workouts: history.len(),
        this_week,
        // Streaks are not tracked yet.
        streak_days: 0,
        weekly_frequency: weekly_frequency(current_week_start, history),
        equipment_usage: equipment_usage(history),
        recent: history
            .iter()
            .take(RECENT_COUNT)
            .map(|workout| RecentWorkout {
                equipment: workout.equipment_name().to_string(),
                sets_count: workout.sets_count,
                date: workout
                    .date
                    .map(|date| date.to_string())
                    .unwrap_or_default(),
            })
            .collect(),
    }
}

fn weekly_frequency(
    current_week_start: NaiveDate,
    history: &[WorkoutSession],
) -> Vec<WeeklyPoint> {
    let mut points = Vec::with_capacity(WEEK_COUNT);
    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let count = history
            .iter()
            .filter_map(|workout| workout.date)
            .filter(|date| *date >= start && *date <= end)
            .count() as u32;

        points.push(WeeklyPoint {
            start_date: start.to_string(),
            end_date: end.to_string(),
            count,
        });
    }
    points
}

fn equipment_usage(history: &[WorkoutSession]) -> Vec<UsagePoint> {
    let mut tally: BTreeMap<&str, u32> = BTreeMap::new();
    for workout in history {
        let entry = tally.entry(workout.equipment_name()).or_default();
        *entry = entry.saturating_add(1);
    }

    let mut usage: Vec<UsagePoint> = tally
        .into_iter()
        .map(|(name, count)| UsagePoint {
            name: name.to_string(),
            count,
        })
        .collect();
    // BTreeMap order already sorts ties by name; the sort is stable.
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}

/// Weeks start on Sunday.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}
