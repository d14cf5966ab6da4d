//! Entry points for a display layer.
//!
//! Viewer identity and position are always passed in; nothing here reads
//! ambient state.

use chrono::{DateTime, Utc};

use crate::compose::{DraftError, PollDraft, compose};
use crate::geo::Coordinate;
use crate::models::{Author, OptionId, PollId};
use crate::pipeline::{rank, top_by_votes};
use crate::scoring::Tab;
use crate::store::PollStore;
use crate::view::{PollSummary, PollView};

pub fn compute_feed(
    store: &PollStore,
    query: &str,
    tab: Tab,
    viewer: &Author,
    here: Coordinate,
    now: DateTime<Utc>,
) -> Vec<PollView> {
    rank(store.polls(), query, viewer, here, tab, now)
        .into_iter()
        .map(|(poll, score)| PollView::build(poll, viewer.id, now).with_score(score))
        .collect()
}

pub fn compute_search_results(
    store: &PollStore,
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<PollSummary> {
    top_by_votes(store.polls(), window_days, now)
        .into_iter()
        .map(PollSummary::from)
        .collect()
}

pub fn cast_vote(store: &mut PollStore, poll_id: PollId, option_id: OptionId, viewer: &Author) -> bool {
    store.cast_vote(poll_id, option_id, viewer.id)
}

pub fn retract_vote(store: &mut PollStore, poll_id: PollId, viewer: &Author) -> bool {
    store.retract_vote(poll_id, viewer.id)
}

/// Validates `draft`, then puts the new poll at the top of the store.
pub fn create_poll(
    store: &mut PollStore,
    draft: &PollDraft,
    viewer: &Author,
    now: DateTime<Utc>,
) -> Result<PollId, DraftError> {
    let poll = compose(draft, viewer, now)?;
    let id = poll.id;
    store.insert(poll);
    tracing::info!(poll_id = %id, author = %viewer.handle, "poll created");
    Ok(id)
}
