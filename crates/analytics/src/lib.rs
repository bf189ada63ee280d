//! Analytics engine.
//!
//! Pure, read-only projections over a project collection for the
//! dashboard: status distribution, upcoming deadlines, completion-time
//! and team-productivity statistics. Nothing here mutates, and every
//! function returns empty/zeroed results on an empty collection.

#![warn(missing_docs)]

use chrono::Duration;
use serde::{Deserialize, Serialize};

use prodflow_core::{ContentProject, ProjectId, ProjectStatus, Time};

/// Default cap on the upcoming-deadline list, matching the dashboard's
/// five-row widget.
pub const DEFAULT_DEADLINE_LIMIT: usize = 5;

/// Default look-ahead window for [`report`], in days.
pub const DEFAULT_HORIZON_DAYS: i64 = 30;

/// One row of the status distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSlice {
    /// The status
    pub status: ProjectStatus,

    /// Projects currently in this status
    pub count: usize,

    /// Rounded share of the collection, 0-100
    pub percentage: u8,
}

/// Count projects per lifecycle status.
///
/// Returns one slice per canonical status in lifecycle order, including
/// zero rows. An empty collection yields all-zero percentages.
pub fn status_distribution(items: &[ContentProject]) -> Vec<StatusSlice> {
    let total = items.len();
    ProjectStatus::ALL
        .into_iter()
        .map(|status| {
            let count = items.iter().filter(|p| p.status == status).count();
            let percentage = if total == 0 {
                0
            } else {
                (count as f64 / total as f64 * 100.0).round() as u8
            };
            StatusSlice { status, count, percentage }
        })
        .collect()
}

/// A project deadline inside the look-ahead window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingDeadline {
    /// The project
    pub project: ProjectId,

    /// Project title, for display
    pub title: String,

    /// The deadline: editing deadline if set, otherwise publish date
    pub due: Time,
}

/// Upcoming deadlines with the default limit of [`DEFAULT_DEADLINE_LIMIT`].
pub fn upcoming_deadlines(
    items: &[ContentProject],
    horizon_days: i64,
    now: Time,
) -> Vec<UpcomingDeadline> {
    upcoming_deadlines_with_limit(items, horizon_days, now, DEFAULT_DEADLINE_LIMIT)
}

/// Deadlines strictly after `now` and within `horizon_days`, ascending,
/// truncated to `limit`.
///
/// Each project contributes at most one entry: its editing deadline when
/// present, otherwise its publish date. Projects with neither are skipped.
pub fn upcoming_deadlines_with_limit(
    items: &[ContentProject],
    horizon_days: i64,
    now: Time,
    limit: usize,
) -> Vec<UpcomingDeadline> {
    let horizon = now + Duration::days(horizon_days);
    let mut deadlines: Vec<UpcomingDeadline> = items
        .iter()
        .filter_map(|p| {
            let due = p.schedule.editing_deadline.or(p.schedule.publish_date)?;
            (due > now && due <= horizon).then(|| UpcomingDeadline {
                project: p.id,
                title: p.title.clone(),
                due,
            })
        })
        .collect();
    deadlines.sort_by_key(|d| d.due);
    deadlines.truncate(limit);
    deadlines
}

/// Mean of `metrics.completion_days` over projects that have it.
///
/// Projects without a recorded completion time are excluded from both
/// numerator and denominator; no samples yields 0.0.
pub fn average_completion_days(items: &[ContentProject]) -> f64 {
    let samples: Vec<u32> = items
        .iter()
        .filter_map(|p| p.metrics.completion_days)
        .collect();
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&d| d as f64).sum::<f64>() / samples.len() as f64
}

/// Composite team score: `round(mean(comments + approvals) * 10)`.
///
/// A crude heuristic carried over from the dashboard, not a validated
/// KPI; it does no normalization against elapsed time.
pub fn team_productivity_score(items: &[ContentProject]) -> u32 {
    if items.is_empty() {
        return 0;
    }
    let mean = items
        .iter()
        .map(|p| (p.collaboration.comments + p.collaboration.approvals) as f64)
        .sum::<f64>()
        / items.len() as f64;
    (mean * 10.0).round() as u32
}

/// The full analytics snapshot served to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Per-status counts and shares
    pub status_distribution: Vec<StatusSlice>,

    /// Next deadlines, ascending
    pub upcoming_deadlines: Vec<UpcomingDeadline>,

    /// Mean completion time in days
    pub avg_completion_days: f64,

    /// Composite productivity score
    pub team_productivity: u32,
}

/// Build a full report as of `now`, with a [`DEFAULT_HORIZON_DAYS`]-day
/// deadline window.
pub fn report(items: &[ContentProject], now: Time) -> AnalyticsReport {
    AnalyticsReport {
        status_distribution: status_distribution(items),
        upcoming_deadlines: upcoming_deadlines(items, DEFAULT_HORIZON_DAYS, now),
        avg_completion_days: average_completion_days(items),
        team_productivity: team_productivity_score(items),
    }
}
