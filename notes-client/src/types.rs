use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
}

/// Login / session-check response: `{id, name}` when a session holds,
/// `{}` when it does not.
#[derive(Debug, Default, Deserialize)]
pub struct MaybeUser {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl MaybeUser {
    pub fn into_user(self) -> Option<UserInfo> {
        match (self.id, self.name) {
            (Some(id), Some(name)) => Some(UserInfo { id, name }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NoteSummary {
    pub uid: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteListResponse {
    pub notes: Vec<NoteSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotePayload {
    pub uid: String,
    /// Rich-text markup
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SaveNoteRequest {
    pub uid: String,
    /// Plain-text title; the server derives one from `content` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}
