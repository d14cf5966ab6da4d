use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{OptionId, Poll, PollId, PollKind, ViewerId};

/// Share of `total` taken by `count`, as a whole percentage.
///
/// Zero votes in total means every option shows 0%.
pub fn percent(count: u64, total: u64) -> u32 {
    (count as f64 * 100.0 / total.max(1) as f64).round() as u32
}

/// Whole hours until `ends_at`, rounded up, never negative.
pub fn ends_in_hours(ends_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let hours = (ends_at - now).num_milliseconds() as f64 / 3_600_000.0;
    (hours.ceil() as i64).max(0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionView {
    pub id: OptionId,
    pub label: String,
    pub image_url: Option<String>,
    pub votes: u64,
    pub percent: u32,
    pub chosen: bool,
}

/// Everything a feed card needs, from the point of view of one viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollView {
    pub id: PollId,
    pub kind: PollKind,
    pub author: String,
    pub author_verified: bool,
    pub author_avatar: Option<String>,
    pub title: String,
    pub tags: Vec<String>,
    pub location: String,
    pub total_votes: u64,
    pub ends_in_hours: i64,
    pub chosen_option: Option<OptionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub options: Vec<OptionView>,
}

impl PollView {
    pub fn build(poll: &Poll, viewer: ViewerId, now: DateTime<Utc>) -> Self {
        let total = poll.total_votes();
        let chosen = poll.chosen_option(viewer);
        let tally = poll.tally();

        let options = poll
            .options
            .iter()
            .map(|option| {
                let votes = tally.get(&option.id).copied().unwrap_or(0);
                OptionView {
                    id: option.id,
                    label: option.label.clone(),
                    image_url: option.image_url.clone(),
                    votes,
                    percent: percent(votes, total),
                    chosen: chosen == Some(option.id),
                }
            })
            .collect();

        Self {
            id: poll.id,
            kind: poll.kind,
            author: poll.author.handle.clone(),
            author_verified: poll.author.verified,
            author_avatar: poll.author.avatar.clone(),
            title: poll.title.clone(),
            tags: poll.tags.clone(),
            location: poll.location.clone(),
            total_votes: total,
            ends_in_hours: ends_in_hours(poll.ends_at, now),
            chosen_option: chosen,
            score: None,
            options,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// A row in the explore list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollSummary {
    pub id: PollId,
    pub title: String,
    pub author: String,
    pub location: String,
    pub total_votes: u64,
    pub cover_image: Option<String>,
}

impl From<&Poll> for PollSummary {
    fn from(poll: &Poll) -> Self {
        Self {
            id: poll.id,
            title: poll.title.clone(),
            author: poll.author.handle.clone(),
            location: poll.location.clone(),
            total_votes: poll.total_votes(),
            cover_image: poll.options.first().and_then(|o| o.image_url.clone()),
        }
    }
}
