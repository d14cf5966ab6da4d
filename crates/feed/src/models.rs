use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinate;

pub type AuthorId = Uuid;
pub type PollId = Uuid;
pub type OptionId = Uuid;
/// Viewers are authors: whoever is looking at the feed can also post.
pub type ViewerId = AuthorId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub handle: String,
    pub avatar: Option<String>,
    pub verified: bool,
    pub location: String,
    pub followers: u32,
    pub interests: BTreeSet<String>,
}

impl Author {
    pub fn new(handle: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            handle: handle.into(),
            avatar: None,
            verified: false,
            location: location.into(),
            followers: 0,
            interests: BTreeSet::new(),
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    pub fn with_followers(mut self, followers: u32) -> Self {
        self.followers = followers;
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollKind {
    Image,
    Text,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: OptionId,
    pub label: String,
    pub image_url: Option<String>,
}

impl PollOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            image_url: None,
        }
    }

    pub fn with_image(label: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
            ..Self::new(label)
        }
    }
}

/// A poll together with every viewer's ballot on it.
///
/// The author is embedded by value so later profile edits never rewrite
/// history. Per-option vote counts are not stored; they are tallied from
/// the ballots on demand, so a count and a choice can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub kind: PollKind,
    pub author: Author,
    pub title: String,
    pub tags: Vec<String>,
    pub location: String,
    pub coordinate: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub options: Vec<PollOption>,
    #[serde(default)]
    ballots: BTreeMap<ViewerId, OptionId>,
}

impl Poll {
    /// Builds an unvoted poll. The location label defaults to the author's.
    pub fn new(
        kind: PollKind,
        author: Author,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        options: Vec<PollOption>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            location: author.location.clone(),
            author,
            title: title.into(),
            tags: Vec::new(),
            coordinate: None,
            created_at,
            ends_at,
            options,
            ballots: BTreeMap::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn at(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn has_option(&self, option_id: OptionId) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    pub fn chosen_option(&self, viewer: ViewerId) -> Option<OptionId> {
        self.ballots.get(&viewer).copied()
    }

    pub fn votes_for(&self, option_id: OptionId) -> u64 {
        self.ballots.values().filter(|&&o| o == option_id).count() as u64
    }

    /// Option id -> vote count. Options nobody picked are absent.
    pub fn tally(&self) -> BTreeMap<OptionId, u64> {
        let mut counts = BTreeMap::new();
        for option in self.ballots.values() {
            *counts.entry(*option).or_insert(0) += 1;
        }
        counts
    }

    pub fn total_votes(&self) -> u64 {
        self.ballots.len() as u64
    }

    pub(crate) fn record_ballot(&mut self, viewer: ViewerId, option_id: OptionId) {
        self.ballots.insert(viewer, option_id);
    }

    pub(crate) fn clear_ballot(&mut self, viewer: ViewerId) -> Option<OptionId> {
        self.ballots.remove(&viewer)
    }
}
