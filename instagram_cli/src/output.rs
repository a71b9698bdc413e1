use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use instagram_api::types::{Comment, Media, User};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON of the decoded response
    Json,
    /// Rust debug rendering of the decoded response
    Debug,
    /// Response body exactly as the server sent it
    Raw,
    /// Summary table
    Table,
    /// Summary table in markdown
    Markdown,
}

impl OutputFormat {
    pub fn keeps_raw_body(self) -> bool {
        self == OutputFormat::Raw
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    full_name: String,
    #[tabled(rename = "Posts")]
    media: String,
    #[tabled(rename = "Following")]
    follows: String,
    #[tabled(rename = "Followers")]
    followed_by: String,
}

#[derive(Tabled)]
struct MediaRow {
    #[tabled(rename = "Posted")]
    posted: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    media_type: String,
    #[tabled(rename = "Likes")]
    likes: String,
    #[tabled(rename = "Comments")]
    comments: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Caption")]
    caption: String,
}

#[derive(Tabled)]
struct CommentRow {
    #[tabled(rename = "Posted")]
    posted: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Text")]
    text: String,
}

const CAPTION_WIDTH: usize = 40;

// -- Row builders --

fn build_user_rows(users: &[User]) -> Vec<UserRow> {
    users
        .iter()
        .map(|u| {
            let counts = u.counts.unwrap_or_default();
            UserRow {
                id: u.id.clone(),
                username: u.username.clone(),
                full_name: u.full_name.clone(),
                media: format_count(counts.media),
                follows: format_count(counts.follows),
                followed_by: format_count(counts.followed_by),
            }
        })
        .collect()
}

fn build_media_rows(media: &[Media]) -> Vec<MediaRow> {
    media
        .iter()
        .map(|m| MediaRow {
            posted: format_time(m.created_time),
            id: m.id.clone(),
            media_type: m.media_type.clone(),
            likes: format_count(m.likes.map(|l| l.count).unwrap_or(0)),
            comments: format_count(m.comments.map(|c| c.count).unwrap_or(0)),
            location: m
                .location
                .as_ref()
                .map(|l| l.name.clone())
                .unwrap_or_default(),
            caption: m
                .caption
                .as_ref()
                .map(|c| truncate(&c.text, CAPTION_WIDTH))
                .unwrap_or_default(),
        })
        .collect()
}

fn build_comment_rows(comments: &[Comment]) -> Vec<CommentRow> {
    comments
        .iter()
        .map(|c| CommentRow {
            posted: format_time(c.created_time),
            from: c
                .from
                .as_ref()
                .map(|u| u.username.clone())
                .unwrap_or_default(),
            text: c.text.clone(),
        })
        .collect()
}

// -- Rendering --

fn render<T: Tabled>(rows: Vec<T>, format: OutputFormat) -> String {
    let mut table = Table::new(rows);
    if format == OutputFormat::Markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

/// Prints a decoded response in `format`. `raw` is the captured body, which
/// is only present when the client was built with raw capture on.
fn print_response<T, R>(
    resp: &T,
    raw: Option<&str>,
    rows: impl FnOnce() -> Vec<R>,
    format: OutputFormat,
) -> Result<()>
where
    T: Serialize + std::fmt::Debug,
    R: Tabled,
{
    match format {
        OutputFormat::Json => print_json(resp),
        OutputFormat::Debug => println!("{:#?}", resp),
        OutputFormat::Raw => match raw {
            Some(body) => print!("{}", body),
            None => bail!("raw body was not captured"),
        },
        OutputFormat::Table | OutputFormat::Markdown => println!("{}", render(rows(), format)),
    }
    Ok(())
}

pub fn print_user<T>(resp: &T, user: Option<&User>, raw: Option<&str>, format: OutputFormat) -> Result<()>
where
    T: Serialize + std::fmt::Debug,
{
    print_response(
        resp,
        raw,
        || build_user_rows(user.map(std::slice::from_ref).unwrap_or_default()),
        format,
    )
}

pub fn print_media<T>(resp: &T, media: &[Media], raw: Option<&str>, format: OutputFormat) -> Result<()>
where
    T: Serialize + std::fmt::Debug,
{
    print_response(resp, raw, || build_media_rows(media), format)
}

pub fn print_comments<T>(
    resp: &T,
    comments: &[Comment],
    raw: Option<&str>,
    format: OutputFormat,
) -> Result<()>
where
    T: Serialize + std::fmt::Debug,
{
    print_response(resp, raw, || build_comment_rows(comments), format)
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_count(value: i64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 10_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn truncate(text: &str, width: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= width && line.len() == text.len() {
        return line.to_string();
    }
    let mut out: String = line.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
