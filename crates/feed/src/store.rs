use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{OptionId, Poll, PollId, ViewerId};

/// The ordered, in-memory collection of polls.
///
/// Callers only ever get shared references out; ballots change through
/// [`PollStore::cast_vote`] and [`PollStore::retract_vote`].
#[derive(Debug, Clone, Default)]
pub struct PollStore {
    polls: Vec<Poll>,
}

impl PollStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    pub fn get(&self, poll_id: PollId) -> Option<&Poll> {
        self.polls.iter().find(|p| p.id == poll_id)
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }

    /// Puts `poll` at the front, ahead of everything already stored.
    pub fn insert(&mut self, poll: Poll) {
        tracing::debug!(poll_id = %poll.id, title = %poll.title, "inserting poll");
        self.polls.insert(0, poll);
    }

    /// Records `viewer`'s vote for `option_id`.
    ///
    /// Returns `false` and changes nothing when the poll is unknown, the
    /// option does not belong to it, or the viewer already voted on it.
    pub fn cast_vote(&mut self, poll_id: PollId, option_id: OptionId, viewer: ViewerId) -> bool {
        let Some(poll) = self.get_mut(poll_id) else {
            tracing::debug!(%poll_id, "vote on unknown poll");
            return false;
        };
        if poll.chosen_option(viewer).is_some() {
            tracing::debug!(%poll_id, %viewer, "already voted");
            return false;
        }
        if !poll.has_option(option_id) {
            tracing::debug!(%poll_id, %option_id, "vote for foreign option");
            return false;
        }

        poll.record_ballot(viewer, option_id);
        tracing::info!(%poll_id, %option_id, %viewer, "vote cast");
        true
    }

    /// Withdraws `viewer`'s vote. Returns `false` if there was none.
    pub fn retract_vote(&mut self, poll_id: PollId, viewer: ViewerId) -> bool {
        let Some(poll) = self.get_mut(poll_id) else {
            tracing::debug!(%poll_id, "retract on unknown poll");
            return false;
        };
        let Some(option_id) = poll.chosen_option(viewer) else {
            return false;
        };
        if poll.votes_for(option_id) == 0 {
            tracing::warn!(%poll_id, %option_id, "ballot without a matching count");
            return false;
        }

        poll.clear_ballot(viewer);
        tracing::info!(%poll_id, %option_id, %viewer, "vote retracted");
        true
    }

    /// Reorders the feed at random, standing in for "new content" on refresh.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.polls.shuffle(rng);
    }

    fn get_mut(&mut self, poll_id: PollId) -> Option<&mut Poll> {
        self.polls.iter_mut().find(|p| p.id == poll_id)
    }
}

impl FromIterator<Poll> for PollStore {
    fn from_iter<I: IntoIterator<Item = Poll>>(iter: I) -> Self {
        Self {
            polls: iter.into_iter().collect(),
        }
    }
}
