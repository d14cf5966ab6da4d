//! Feed ranking.
//!
//! Every poll is reduced to four signals in `0.0..=1.0`, and the active tab
//! blends them with a fixed set of weights. Each tab's weights sum to one, so
//! scores stay in `0.0..=1.0` as well.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::models::{Author, Poll};

/// Follower count at which the social signal saturates.
const FOLLOWER_SATURATION: f64 = 5000.0;
/// Age after which a poll no longer counts as recent.
const RECENCY_HORIZON_HOURS: f64 = 24.0;
/// Distance after which a poll no longer counts as nearby.
const PROXIMITY_RADIUS_KM: f64 = 24.0;
/// Proximity assumed for polls without a coordinate.
const UNKNOWN_PROXIMITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    ForYou,
    Nearby,
    Global,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::ForYou, Tab::Nearby, Tab::Global];

    pub fn weights(self) -> Weights {
        match self {
            Tab::ForYou => Weights {
                interest: 0.45,
                social: 0.15,
                proximity: 0.15,
                recency: 0.25,
            },
            Tab::Nearby => Weights {
                interest: 0.10,
                social: 0.0,
                proximity: 0.60,
                recency: 0.30,
            },
            Tab::Global => Weights {
                interest: 0.25,
                social: 0.15,
                proximity: 0.0,
                recency: 0.60,
            },
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Tab::ForYou => "for-you",
            Tab::Nearby => "nearby",
            Tab::Global => "global",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::ForYou => "For You",
            Tab::Nearby => "Nearby",
            Tab::Global => "Global",
        }
    }

    /// The tab to the right, wrapping around.
    pub fn next(self) -> Tab {
        match self {
            Tab::ForYou => Tab::Nearby,
            Tab::Nearby => Tab::Global,
            Tab::Global => Tab::ForYou,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTabError(String);

impl fmt::Display for ParseTabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown feed tab: {:?}", self.0)
    }
}

impl std::error::Error for ParseTabError {}

impl FromStr for Tab {
    type Err = ParseTabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.slug().eq_ignore_ascii_case(s) || tab.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTabError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub interest: f64,
    pub social: f64,
    pub proximity: f64,
    pub recency: f64,
}

impl Weights {
    pub fn apply(&self, signals: &Signals) -> f64 {
        self.interest * signals.interest
            + self.social * signals.social
            + self.proximity * signals.proximity
            + self.recency * signals.recency
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub interest: f64,
    pub social: f64,
    pub proximity: f64,
    pub recency: f64,
}

impl Signals {
    pub fn measure(poll: &Poll, viewer: &Author, here: Coordinate, now: DateTime<Utc>) -> Self {
        Self {
            interest: interest(poll, viewer),
            social: social(poll),
            proximity: proximity(poll, here),
            recency: recency(poll, now),
        }
    }
}

/// Ranks `poll` for `viewer` standing at `here` on the given tab.
pub fn score(poll: &Poll, viewer: &Author, here: Coordinate, tab: Tab, now: DateTime<Utc>) -> f64 {
    tab.weights().apply(&Signals::measure(poll, viewer, here, now))
}

fn interest(poll: &Poll, viewer: &Author) -> f64 {
    if poll.tags.iter().any(|t| viewer.interests.contains(t)) {
        1.0
    } else {
        0.0
    }
}

fn social(poll: &Poll) -> f64 {
    (f64::from(poll.author.followers) / FOLLOWER_SATURATION).min(1.0)
}

fn recency(poll: &Poll, now: DateTime<Utc>) -> f64 {
    let age_hours = ((now - poll.created_at).num_milliseconds() as f64 / 3_600_000.0).max(0.0);
    (1.0 - age_hours / RECENCY_HORIZON_HOURS).max(0.0)
}

fn proximity(poll: &Poll, here: Coordinate) -> f64 {
    let Some(coordinate) = poll.coordinate else {
        return UNKNOWN_PROXIMITY;
    };
    let km = here.distance_km(&coordinate);
    (1.0 - km.min(PROXIMITY_RADIUS_KM) / PROXIMITY_RADIUS_KM).max(0.0)
}
