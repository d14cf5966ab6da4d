use serde::{Deserialize, Serialize};
use settle_feed::{OptionId, PollId, PollView, Tab};

#[derive(Debug, Deserialize)]
pub struct ViewerInfo {
    pub handle: String,
    pub verified: bool,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    pub tab: Tab,
    pub viewer: ViewerInfo,
    pub polls: Vec<PollView>,
}

#[derive(Debug, Serialize)]
pub struct VoteRequest {
    pub option_id: OptionId,
}

#[derive(Debug, Deserialize)]
pub struct VoteOutcome {
    pub applied: bool,
    pub poll: PollView,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPoll {
    pub id: PollId,
}
