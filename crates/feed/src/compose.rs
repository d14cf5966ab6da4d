use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Author, Poll, PollKind, PollOption};

const DEFAULT_DURATION_HOURS: u32 = 24;
const MAX_DURATION_HOURS: u32 = 24 * 365;

/// What the compose sheet hands over when the viewer taps "Post".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollDraft {
    pub title: String,
    pub tag: String,
    pub option_a_image: String,
    pub option_b_image: String,
    #[serde(default = "default_duration")]
    pub ends_in_hours: u32,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_HOURS
}

impl PollDraft {
    pub fn new(
        title: impl Into<String>,
        tag: impl Into<String>,
        option_a_image: impl Into<String>,
        option_b_image: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            tag: tag.into(),
            option_a_image: option_a_image.into(),
            option_b_image: option_b_image.into(),
            ends_in_hours: DEFAULT_DURATION_HOURS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    EmptyTitle,
    MissingImage(char),
    InvalidDuration,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::EmptyTitle => write!(f, "poll title is empty"),
            DraftError::MissingImage(option) => write!(f, "option {} has no image", option),
            DraftError::InvalidDuration => {
                write!(f, "poll must run between 1 and {} hours", MAX_DURATION_HOURS)
            }
        }
    }
}

impl std::error::Error for DraftError {}

/// Turns a draft into a fresh, unvoted image poll by `author`.
///
/// Composed polls have no coordinate and carry the author's home label.
pub fn compose(draft: &PollDraft, author: &Author, now: DateTime<Utc>) -> Result<Poll, DraftError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(DraftError::EmptyTitle);
    }
    for (label, image) in [('A', &draft.option_a_image), ('B', &draft.option_b_image)] {
        if image.trim().is_empty() {
            return Err(DraftError::MissingImage(label));
        }
    }
    if !(1..=MAX_DURATION_HOURS).contains(&draft.ends_in_hours) {
        return Err(DraftError::InvalidDuration);
    }
    let ends_at = Duration::try_hours(i64::from(draft.ends_in_hours))
        .and_then(|d| now.checked_add_signed(d))
        .ok_or(DraftError::InvalidDuration)?;

    let tag = draft.tag.trim().to_lowercase();
    let tags = if tag.is_empty() { Vec::new() } else { vec![tag] };

    Ok(Poll::new(
        PollKind::Image,
        author.clone(),
        title,
        now,
        ends_at,
        vec![
            PollOption::with_image("Option A", draft.option_a_image.trim()),
            PollOption::with_image("Option B", draft.option_b_image.trim()),
        ],
    )
    .with_tags(tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn jordan() -> Author {
        Author::new("jordan", "New York City").verified()
    }

    fn draft() -> PollDraft {
        PollDraft::new(
            "  Which jacket?  ",
            "Fashion",
            "file:///tmp/a.jpg",
            "file:///tmp/b.jpg",
        )
    }

    #[test]
    fn composes_two_option_image_poll() {
        let now = Utc::now();
        let poll = compose(&draft(), &jordan(), now).unwrap();

        assert_eq!(poll.kind, PollKind::Image);
        assert_eq!(poll.title, "Which jacket?");
        assert_eq!(poll.tags, vec!["fashion".to_string()]);
        assert_eq!(poll.location, "New York City");
        assert_eq!(poll.coordinate, None);
        assert_eq!(poll.created_at, now);
        assert_eq!(poll.ends_at, now + Duration::hours(24));
        assert_eq!(poll.author.handle, "jordan");
        assert_eq!(poll.total_votes(), 0);

        let labels: Vec<_> = poll.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Option A", "Option B"]);
        assert_eq!(poll.options[1].image_url.as_deref(), Some("file:///tmp/b.jpg"));
    }

    #[test]
    fn author_is_snapshotted() {
        let now = Utc::now();
        let mut author = jordan();
        let poll = compose(&draft(), &author, now).unwrap();

        author.followers = 9999;
        author.handle = "jordan.new".to_string();
        assert_eq!(poll.author.followers, 0);
        assert_eq!(poll.author.handle, "jordan");
        assert_eq!(poll.chosen_option(Uuid::new_v4()), None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft();
        d.title = " \n\t".to_string();
        assert_eq!(compose(&d, &jordan(), Utc::now()), Err(DraftError::EmptyTitle));
    }

    #[test]
    fn missing_image_is_rejected() {
        let mut d = draft();
        d.option_b_image = String::new();
        assert_eq!(compose(&d, &jordan(), Utc::now()), Err(DraftError::MissingImage('B')));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut d = draft();
        d.ends_in_hours = 0;
        assert_eq!(compose(&d, &jordan(), Utc::now()), Err(DraftError::InvalidDuration));
    }

    #[test]
    fn duration_beyond_a_year_is_rejected() {
        let now = Utc::now();
        let mut d = draft();
        d.ends_in_hours = u32::MAX;
        assert_eq!(compose(&d, &jordan(), now), Err(DraftError::InvalidDuration));

        d.ends_in_hours = MAX_DURATION_HOURS + 1;
        assert_eq!(compose(&d, &jordan(), now), Err(DraftError::InvalidDuration));

        d.ends_in_hours = MAX_DURATION_HOURS;
        let poll = compose(&d, &jordan(), now).unwrap();
        assert_eq!(poll.ends_at, now + Duration::days(365));
    }

    #[test]
    fn duration_near_the_end_of_time_is_rejected() {
        let mut d = draft();
        d.ends_in_hours = 2;
        assert_eq!(
            compose(&d, &jordan(), DateTime::<Utc>::MAX_UTC),
            Err(DraftError::InvalidDuration)
        );
    }

    #[test]
    fn duration_defaults_when_absent_from_json() {
        let json = r#"{"title":"t","tag":"food","option_a_image":"a","option_b_image":"b"}"#;
        let d: PollDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.ends_in_hours, 24);
    }
}
