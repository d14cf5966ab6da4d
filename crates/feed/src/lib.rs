//! Ranking and vote aggregation for the Settle polling feed.

pub mod api;
pub mod compose;
pub mod geo;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod seed;
pub mod store;
pub mod view;

pub use compose::{DraftError, PollDraft};
pub use geo::Coordinate;
pub use models::{Author, OptionId, Poll, PollId, PollKind, PollOption, ViewerId};
pub use pipeline::ExploreWindow;
pub use scoring::Tab;
pub use store::PollStore;
pub use view::{OptionView, PollSummary, PollView};
