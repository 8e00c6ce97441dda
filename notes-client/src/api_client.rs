use reqwest::Client;

use crate::types::*;

/// HTTP client for the notes API. The session cookie set at login or
/// registration lives in the cookie store and rides on every later call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Auth ────────────────────────────────────────────────────────────

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), String> {
        let resp = self
            .client
            .post(format!("{}/api/register", self.base_url))
            .json(&serde_json::json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo, String> {
        let resp = self
            .client
            .post(format!("{}/api/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        let user = resp
            .json::<MaybeUser>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;
        user.into_user().ok_or_else(|| "Malformed login response".to_string())
    }

    /// Session check: `Ok(None)` means "logged out", never an error.
    pub async fn check_session(&self) -> Result<Option<UserInfo>, String> {
        let resp = self
            .client
            .post(format!("{}/api/login", self.base_url))
            .json(&serde_json::json!({ "check": true }))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        let user = resp
            .json::<MaybeUser>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;
        Ok(user.into_user())
    }

    pub async fn logout(&self) -> Result<(), String> {
        let resp = self
            .client
            .get(format!("{}/api/logout", self.base_url))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        Ok(())
    }

    // ── Notes ───────────────────────────────────────────────────────────

    pub async fn create_note(&self) -> Result<NotePayload, String> {
        let resp = self
            .client
            .put(format!("{}/api/note", self.base_url))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        resp.json::<NotePayload>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    pub async fn get_note(&self, uid: &str) -> Result<NotePayload, String> {
        let resp = self
            .client
            .post(format!("{}/api/note", self.base_url))
            .json(&serde_json::json!({ "uid": uid }))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        resp.json::<NotePayload>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    pub async fn save_note(&self, req: &SaveNoteRequest) -> Result<(), String> {
        let resp = self
            .client
            .patch(format!("{}/api/note", self.base_url))
            .json(req)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        Ok(())
    }

    pub async fn delete_note(&self, uid: &str) -> Result<(), String> {
        let resp = self
            .client
            .delete(format!("{}/api/note", self.base_url))
            .json(&serde_json::json!({ "uid": uid }))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        Ok(())
    }

    pub async fn list_notes(&self) -> Result<Vec<NoteSummary>, String> {
        let resp = self
            .client
            .get(format!("{}/api/note-list", self.base_url))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(extract_error(&body));
        }

        let list = resp
            .json::<NoteListResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;
        Ok(list.notes)
    }
}

fn extract_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("err")?.as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| body.to_string())
}
