//! The two orderings the app shows: the ranked feed and the explore list.
//!
//! Both are recomputed from scratch on every call and both sort stably, so
//! ties keep the store's order.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::models::{Author, Poll};
use crate::scoring::{Tab, score};

/// Time windows offered by the explore screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExploreWindow {
    #[default]
    Week,
    Month,
    Year,
}

impl ExploreWindow {
    pub fn days(self) -> u32 {
        match self {
            ExploreWindow::Week => 7,
            ExploreWindow::Month => 30,
            ExploreWindow::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExploreWindow::Week => "Last 7 days",
            ExploreWindow::Month => "Last month",
            ExploreWindow::Year => "This year",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ExploreWindow::Week => ExploreWindow::Month,
            ExploreWindow::Month => ExploreWindow::Year,
            ExploreWindow::Year => ExploreWindow::Week,
        }
    }
}

/// Case-insensitive match against the title or the run-together tags.
pub fn matches_query(poll: &Poll, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    poll.title.to_lowercase().contains(&needle) || poll.tags.concat().to_lowercase().contains(&needle)
}

/// Polls matching `query`, paired with their score, best first.
pub fn rank<'a>(
    polls: &'a [Poll],
    query: &str,
    viewer: &Author,
    here: Coordinate,
    tab: Tab,
    now: DateTime<Utc>,
) -> Vec<(&'a Poll, f64)> {
    let mut ranked: Vec<_> = polls
        .iter()
        .filter(|p| matches_query(p, query))
        .map(|p| (p, score(p, viewer, here, tab, now)))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    ranked
}

pub fn ranked_feed<'a>(
    polls: &'a [Poll],
    query: &str,
    viewer: &Author,
    here: Coordinate,
    tab: Tab,
    now: DateTime<Utc>,
) -> Vec<&'a Poll> {
    rank(polls, query, viewer, here, tab, now)
        .into_iter()
        .map(|(poll, _)| poll)
        .collect()
}

/// Polls created within the last `window_days`, most voted first.
///
/// A window reaching past the earliest representable time keeps every poll.
pub fn top_by_votes(polls: &[Poll], window_days: u32, now: DateTime<Utc>) -> Vec<&Poll> {
    let cutoff = Duration::try_days(i64::from(window_days)).and_then(|w| now.checked_sub_signed(w));
    let mut top: Vec<_> = polls
        .iter()
        .filter(|p| cutoff.is_none_or(|c| p.created_at >= c))
        .collect();
    top.sort_by_key(|p| std::cmp::Reverse(p.total_votes()));
    top
}
