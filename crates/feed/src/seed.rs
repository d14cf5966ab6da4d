//! Demo content: the signed-in viewer and a starter feed around New York.

use chrono::{DateTime, Duration, Utc};

use crate::geo::Coordinate;
use crate::models::{Author, Poll, PollKind, PollOption};

const UNSPLASH: &str = "https://images.unsplash.com/photo-";
const UNSPLASH_PARAMS: &str = "?q=80&w=1200&auto=format&fit=crop";

pub fn demo_viewer() -> Author {
    Author::new("jordan", "New York City")
        .with_avatar("https://i.pravatar.cc/100?img=12")
        .verified()
        .with_followers(2304)
        .with_interests(["food", "fashion", "tech", "fitness", "movies"])
}

/// Where the viewer is assumed to be until a real fix arrives.
pub fn demo_location() -> Coordinate {
    Coordinate::new(40.7128, -74.0060)
}

fn photo(id: &str) -> String {
    format!("{UNSPLASH}{id}{UNSPLASH_PARAMS}")
}

fn option(label: &str, photo_id: &str) -> PollOption {
    PollOption::with_image(label, photo(photo_id))
}

#[allow(clippy::too_many_arguments)]
fn image_poll(
    author: &Author,
    title: &str,
    tag: &str,
    coordinate: Coordinate,
    age: Duration,
    ends_in: Duration,
    options: [PollOption; 2],
    now: DateTime<Utc>,
) -> Poll {
    Poll::new(
        PollKind::Image,
        author.clone(),
        title,
        now - age,
        now + ends_in,
        options.into(),
    )
    .with_tags([tag])
    .at(coordinate)
}

/// The starter feed, timed relative to `now`.
pub fn demo_polls(now: DateTime<Utc>) -> Vec<Poll> {
    let aria = Author::new("aria.codes", "Lower East Side")
        .with_avatar("https://i.pravatar.cc/100?img=14")
        .with_followers(980)
        .with_interests(["fashion", "tech"]);
    let maya = Author::new("mayamakes", "Williamsburg")
        .with_avatar("https://i.pravatar.cc/100?img=32")
        .verified()
        .with_followers(5400)
        .with_interests(["food"]);
    let dev = Author::new("devvibes", "Brooklyn Heights")
        .with_avatar("https://i.pravatar.cc/100?img=25")
        .with_followers(2100)
        .with_interests(["tech"]);
    let sara = Author::new("sara.moves", "Bushwick")
        .with_avatar("https://i.pravatar.cc/100?img=5")
        .with_followers(1200)
        .with_interests(["fitness"]);

    let mut polls = vec![
        image_poll(
            &aria,
            "Everyday sneakers?",
            "fashion",
            Coordinate::new(40.715, -73.984),
            Duration::hours(5),
            Duration::hours(2),
            [
                option("Nike Air", "1525966222134-fcfa99b8ae77"),
                option("Adidas Stan Smith", "1542291026-7eec264c27ff"),
            ],
            now,
        ),
        image_poll(
            &maya,
            "Dinner date tonight?",
            "food",
            Coordinate::new(40.7081, -73.9571),
            Duration::minutes(35),
            Duration::hours(1),
            [
                option("Sushi", "1544025162-d76694265947"),
                option("Tacos", "1601924582971-b0c5be3bb2a1"),
            ],
            now,
        ),
        image_poll(
            &sara,
            "Leg day finisher?",
            "fitness",
            Coordinate::new(40.6943, -73.9213),
            Duration::minutes(200),
            Duration::hours(3),
            [
                option("Sled pushes", "1517832606299-7ae9b720a186"),
                option("Walking lunges", "1571388208497-71bedc66e932"),
            ],
            now,
        ),
        image_poll(
            &dev,
            "iPad for notes: Mini or Air?",
            "tech",
            Coordinate::new(40.6959, -73.9955),
            Duration::minutes(90),
            Duration::hours(6),
            [
                option("iPad mini (8.3)", "1546074177-ffdda98d214a"),
                option("iPad Air (11)", "1593642532400-2682810df593"),
            ],
            now,
        ),
    ];

    let extras = [
        ("Best Sunday brunch?", "food", "1551218808-94e220e084d2", "1490474418585-ba9bad8fd0ea"),
        ("Movie night vibe?", "movies", "1489599849927-2ee91cede3ba", "1517602302552-471fe67acf66"),
        ("Campus coffee?", "food", "1495474472287-4d71bcdd2085", "1445077100181-a33e9ac94db0"),
    ];
    for (i, (title, tag, a, b)) in (0i64..).zip(extras) {
        polls.push(
            image_poll(
                &aria,
                title,
                tag,
                Coordinate::new(40.7233, -74.0030),
                Duration::minutes(30 + i * 10),
                Duration::hours(5 + i),
                [option("A", a), option("B", b)],
                now,
            )
            .with_location("SoHo"),
        );
    }

    polls
}
