use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Listing titles are capped at this many characters.
pub const TITLE_MAX_LEN: usize = 30;

// ── Database rows ────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
#[allow(dead_code)]
pub struct Note {
    pub uid: Uuid,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── API types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteResponse {
    pub uid: Uuid,
    /// Rich-text markup
    pub content: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NoteRef {
    pub uid: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveNoteRequest {
    pub uid: Uuid,
    /// Plain-text title; derived from `content` when omitted
    pub title: Option<String>,
    /// Rich-text markup, fully replaces the stored content
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteListItem {
    pub uid: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteListResponse {
    pub notes: Vec<NoteListItem>,
}

// ── Title derivation ─────────────────────────────────────────────────────────

/// Title stored at save time: the client's title if it sent one, else the
/// content, either way with markup stripped and truncated.
pub fn listing_title(title: Option<&str>, content: &str) -> String {
    derive_title(title.unwrap_or(content))
}

/// Title shown in listings: the text's plain form (tags stripped,
/// whitespace collapsed), truncated to `TITLE_MAX_LEN` characters.
pub fn derive_title(content: &str) -> String {
    truncate_title(&strip_markup(content))
}

pub fn truncate_title(title: &str) -> String {
    title.chars().take(TITLE_MAX_LEN).collect()
}

fn strip_markup(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                // A tag boundary separates words ("<p>a</p><p>b</p>").
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
