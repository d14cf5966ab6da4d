use serde::{Deserialize, Serialize};
use settle_feed::{OptionId, PollId, PollView, Tab};

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub tab: Option<Tab>,
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub window_days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewerInfo {
    pub handle: String,
    pub verified: bool,
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub tab: Tab,
    pub viewer: ViewerInfo,
    pub polls: Vec<PollView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    pub option_id: OptionId,
}

/// `applied` is false when the vote or retraction had no effect.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub applied: bool,
    pub poll: PollView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedPoll {
    pub id: PollId,
}
