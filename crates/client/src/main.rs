mod models;

use colored::*;
use models::*;
use settle_feed::{ExploreWindow, OptionId, PollDraft, PollId, PollSummary, PollView, Tab};
use std::env;
use std::io::{self, Write};

const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
const BAR_WIDTH: usize = 20;

// ===== Commands =====

#[derive(Debug, PartialEq)]
enum Command {
    Vote { card: usize, option: usize },
    Retract(usize),
    NextTab,
    Query(String),
    Explore,
    Refresh,
    Compose,
    Quit,
    Invalid,
}

/// Cards are numbered from 1, options lettered from `a`.
fn parse_command(input: &str) -> Command {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "q" | "quit" => return Command::Quit,
        "t" | "tab" => return Command::NextTab,
        "r" | "refresh" => return Command::Refresh,
        "s" | "search" => return Command::Explore,
        "c" | "compose" => return Command::Compose,
        _ => {}
    }

    if let Some(query) = input.strip_prefix('/') {
        return Command::Query(query.trim().to_string());
    }
    if let Some(card) = input.strip_prefix('u') {
        return match card.parse::<usize>() {
            Ok(n) if n > 0 => Command::Retract(n - 1),
            _ => Command::Invalid,
        };
    }

    let digits = input.chars().take_while(|c| c.is_ascii_digit()).count();
    let (card, option) = input.split_at(digits);
    let mut letters = option.chars();
    match (card.parse::<usize>(), letters.next(), letters.next()) {
        (Ok(n), Some(letter), None) if n > 0 && letter.is_ascii_lowercase() => Command::Vote {
            card: n - 1,
            option: (letter as u8 - b'a') as usize,
        },
        _ => Command::Invalid,
    }
}

/// Only the first 26 options get a letter to vote with.
fn option_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| (b'a' + i) as char)
}

// ===== Main =====

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let backend = env::var("SETTLE_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
    let api = Api::new(backend);

    println!("{}", "=".repeat(60).bright_cyan());
    println!("{}", "    🗳️  SETTLE: ASK THE CROWD".bright_yellow().bold());
    println!("{}", "=".repeat(60).bright_cyan());
    println!();

    feed_loop(&api).await
}

// ===== Feed Loop =====

async fn feed_loop(api: &Api) -> anyhow::Result<()> {
    let mut tab = Tab::default();
    let mut query = String::new();

    loop {
        let feed = api.feed(tab, &query).await?;
        render_feed(&feed, &query);

        println!(
            "{}",
            "[1a] vote  [u1] undo  [t]ab  [/text] filter  [s]earch  [r]efresh  [c]ompose  [q]uit"
                .bright_black()
        );
        let input = prompt("")?;

        match parse_command(&input) {
            Command::Vote { card, option } => {
                let Some(poll) = feed.polls.get(card) else {
                    println!("{}", "No such poll.".red());
                    continue;
                };
                let Some(choice) = poll.options.get(option) else {
                    println!("{}", "No such option.".red());
                    continue;
                };
                let outcome = api.vote(poll.id, choice.id).await?;
                if outcome.applied {
                    let share = outcome
                        .poll
                        .options
                        .iter()
                        .find(|o| o.id == choice.id)
                        .map_or(0, |o| o.percent);
                    println!(
                        "{} {} {}",
                        "✓ Voted".green(),
                        choice.label.bright_white(),
                        format!("({}% agree)", share).bright_black()
                    );
                } else {
                    println!("{}", "⊘ You already voted on this one".yellow());
                }
            }
            Command::Retract(card) => {
                let Some(poll) = feed.polls.get(card) else {
                    println!("{}", "No such poll.".red());
                    continue;
                };
                let outcome = api.retract(poll.id).await?;
                if outcome.applied {
                    println!("{}", "↺ Vote removed".yellow());
                } else {
                    println!("{}", "Nothing to undo.".bright_black());
                }
            }
            Command::NextTab => tab = tab.next(),
            Command::Query(q) => query = q,
            Command::Explore => explore(api).await?,
            Command::Refresh => api.refresh().await?,
            Command::Compose => compose(api).await?,
            Command::Quit => {
                println!();
                println!("{}", "Thanks for settling things! 👋".bright_cyan().bold());
                return Ok(());
            }
            Command::Invalid => println!("{}", "Invalid choice. Please try again.".red()),
        }
    }
}

fn render_feed(feed: &FeedResponse, query: &str) {
    println!();
    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|&t| {
            if t == feed.tab {
                format!("[{}]", t).bright_yellow().bold().to_string()
            } else {
                t.to_string().bright_black().to_string()
            }
        })
        .collect();
    let check = if feed.viewer.verified { " ✔" } else { "" };
    println!(
        "{}  {}{}  {}",
        tabs.join(" "),
        format!("@{}", feed.viewer.handle).bright_white(),
        check.bright_white(),
        feed.viewer.location.bright_black()
    );
    if !query.is_empty() {
        println!("{} {}", "Filter:".bright_black(), query.bright_cyan());
    }
    if feed.polls.is_empty() {
        println!();
        println!("{}", "Nothing matches. Try another filter.".yellow());
    }

    for (i, poll) in feed.polls.iter().enumerate() {
        render_poll(i + 1, poll);
    }
    println!();
}

fn render_poll(number: usize, poll: &PollView) {
    println!("{}", "━".repeat(60).bright_black());
    let check = if poll.author_verified { " ✔" } else { "" };
    println!(
        "{}. {}{} · {}  {}",
        number.to_string().bright_cyan(),
        poll.author.bright_white().bold(),
        check,
        poll.location.bright_black(),
        format!("Ends in {}h", poll.ends_in_hours).bright_black()
    );
    println!("   {}", poll.title.bright_white().bold());

    for (j, option) in poll.options.iter().enumerate() {
        let letter = option_letter(j).unwrap_or('-');
        let filled = option.percent as usize * BAR_WIDTH / 100;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)));
        let line = format!("   [{}] {:<24} {} {:>3}%", letter, option.label, bar, option.percent);
        if option.chosen {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line);
        }
    }

    let noun = if poll.total_votes == 1 { "vote" } else { "votes" };
    println!(
        "   {}  {}",
        format!("{} {}", poll.total_votes, noun).bright_black(),
        poll.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ").cyan()
    );
}

// ===== Explore =====

async fn explore(api: &Api) -> anyhow::Result<()> {
    let mut window = ExploreWindow::default();
    loop {
        let results = api.search(window).await?;
        render_results(window, &results);

        println!("{}", "[w]indow  [b]ack".bright_black());
        match prompt("")?.trim().to_lowercase().as_str() {
            "w" | "window" => window = window.next(),
            "b" | "back" | "q" => return Ok(()),
            _ => println!("{}", "Invalid choice. Please try again.".red()),
        }
    }
}

fn render_results(window: ExploreWindow, results: &[PollSummary]) {
    println!();
    println!("{}", "=".repeat(60).bright_cyan());
    println!("{}", format!("    📊 TOP POLLS · {}", window.label()).bright_yellow().bold());
    println!("{}", "=".repeat(60).bright_cyan());
    println!();

    if results.is_empty() {
        println!("{}", "No polls in this window.".yellow());
    }
    for (i, summary) in results.iter().enumerate() {
        println!(
            "{}. {} ({} votes) {}",
            (i + 1).to_string().bright_cyan(),
            summary.title.bright_white().bold(),
            summary.total_votes.to_string().yellow(),
            format!("@{} · {}", summary.author, summary.location).bright_black()
        );
    }
    println!();
}

// ===== Compose =====

async fn compose(api: &Api) -> anyhow::Result<()> {
    println!();
    println!("{}", "NEW POLL".bright_yellow().bold());
    let title = prompt("Question")?;
    let tag = prompt("Tag (food, fashion, tech, fitness, movies)")?;
    let image_a = prompt("Image A (URL or path)")?;
    let image_b = prompt("Image B (URL or path)")?;

    let draft = PollDraft::new(title, tag, image_a, image_b);
    match api.create(&draft).await? {
        Ok(created) => println!(
            "{} {}",
            "✓ Posted! It's at the top of the pile.".green().bold(),
            created.id.to_string().bright_black()
        ),
        Err(reason) => println!("{} {}", "❌ Not posted:".red().bold(), reason),
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    if label.is_empty() {
        print!("{}", "> ".bright_green().bold());
    } else {
        print!("{} {}", label.bright_white(), "> ".bright_green().bold());
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

// ===== API Calls =====

struct Api {
    client: reqwest::Client,
    base: String,
}

impl Api {
    fn new(base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    async fn feed(&self, tab: Tab, query: &str) -> anyhow::Result<FeedResponse> {
        let response = self
            .client
            .get(format!("{}/feed", self.base))
            .query(&[("tab", tab.slug()), ("q", query)])
            .send()
            .await?;
        Ok(ensure_success(response, "Feed").await?.json().await?)
    }

    async fn search(&self, window: ExploreWindow) -> anyhow::Result<Vec<PollSummary>> {
        let response = self
            .client
            .get(format!("{}/search", self.base))
            .query(&[("window_days", window.days())])
            .send()
            .await?;
        Ok(ensure_success(response, "Search").await?.json().await?)
    }

    async fn vote(&self, poll_id: PollId, option_id: OptionId) -> anyhow::Result<VoteOutcome> {
        let response = self
            .client
            .post(format!("{}/polls/{}/vote", self.base, poll_id))
            .json(&VoteRequest { option_id })
            .send()
            .await?;
        Ok(ensure_success(response, "Vote").await?.json().await?)
    }

    async fn retract(&self, poll_id: PollId) -> anyhow::Result<VoteOutcome> {
        let response = self
            .client
            .delete(format!("{}/polls/{}/vote", self.base, poll_id))
            .send()
            .await?;
        Ok(ensure_success(response, "Undo").await?.json().await?)
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        let response = self
            .client
            .post(format!("{}/refresh", self.base))
            .send()
            .await?;
        ensure_success(response, "Refresh").await?;
        Ok(())
    }

    /// The inner `Err` carries the server's reason for refusing the draft.
    async fn create(&self, draft: &PollDraft) -> anyhow::Result<Result<CreatedPoll, String>> {
        let response = self
            .client
            .post(format!("{}/polls", self.base))
            .json(draft)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Ok(Err(response.text().await?));
        }
        Ok(Ok(ensure_success(response, "Post").await?.json().await?))
    }
}

async fn ensure_success(response: reqwest::Response, what: &str) -> anyhow::Result<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await?;
        anyhow::bail!("{} failed ({}): {}", what, status, text);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_votes() {
        assert_eq!(parse_command("1a"), Command::Vote { card: 0, option: 0 });
        assert_eq!(parse_command(" 12B "), Command::Vote { card: 11, option: 1 });
    }

    #[test]
    fn parses_retract() {
        assert_eq!(parse_command("u3"), Command::Retract(2));
        assert_eq!(parse_command("u0"), Command::Invalid);
        assert_eq!(parse_command("u"), Command::Invalid);
    }

    #[test]
    fn parses_query() {
        assert_eq!(parse_command("/Sneakers"), Command::Query("sneakers".into()));
        assert_eq!(parse_command("/"), Command::Query(String::new()));
    }

    #[test]
    fn parses_keywords() {
        assert_eq!(parse_command("t"), Command::NextTab);
        assert_eq!(parse_command("S"), Command::Explore);
        assert_eq!(parse_command("refresh"), Command::Refresh);
        assert_eq!(parse_command("c"), Command::Compose);
        assert_eq!(parse_command("quit"), Command::Quit);
    }

    #[test]
    fn letters_stop_at_z() {
        assert_eq!(option_letter(0), Some('a'));
        assert_eq!(option_letter(25), Some('z'));
        assert_eq!(option_letter(26), None);
        assert_eq!(option_letter(300), None);
        assert_eq!(parse_command("1z"), Command::Vote { card: 0, option: 25 });
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_command("0a"), Command::Invalid);
        assert_eq!(parse_command("1ab"), Command::Invalid);
        assert_eq!(parse_command("a"), Command::Invalid);
        assert_eq!(parse_command("1"), Command::Invalid);
        assert_eq!(parse_command(""), Command::Invalid);
    }
}
