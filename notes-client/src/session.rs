use crate::api_client::ApiClient;
use crate::types::UserInfo;

/// Auth state as observed by the UI. `Unknown` lasts until the first
/// session check resolves; protected content must not render while in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unknown,
    Authenticated(UserInfo),
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Home,
    Login,
    Register,
}

/// Tab-scoped cache of "who is logged in", refreshed by a session check on
/// mount and after auth operations.
pub struct SessionContext {
    api: ApiClient,
    user: Option<UserInfo>,
    loading: bool,
}

impl SessionContext {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: None,
            loading: true,
        }
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> AuthState {
        auth_state(self.user.as_ref(), self.loading)
    }

    /// Run a session check. The first call resolves the `Unknown` state;
    /// a check failure of any kind reads as "logged out".
    pub async fn refresh(&mut self) {
        let result = self.api.check_session().await;
        self.apply_check(result);
    }

    fn apply_check(&mut self, result: Result<Option<UserInfo>, String>) {
        match result {
            Ok(user) => self.user = user,
            Err(e) => {
                log::warn!("Session check failed: {}", e);
                self.user = None;
            }
        }
        self.loading = false;
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserInfo, String> {
        let user = self.api.login(email, password).await?;
        self.user = Some(user.clone());
        self.loading = false;
        Ok(user)
    }

    /// Registration establishes a session server-side; re-check to pick up
    /// the new identity.
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<(), String> {
        self.api.register(name, email, password).await?;
        self.refresh().await;
        Ok(())
    }

    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            log::warn!("Error while logging out: {}", e);
            return;
        }
        self.user = None;
        self.loading = false;
    }
}

pub fn auth_state(user: Option<&UserInfo>, loading: bool) -> AuthState {
    if loading {
        return AuthState::Unknown;
    }
    match user {
        Some(user) => AuthState::Authenticated(user.clone()),
        None => AuthState::Anonymous,
    }
}

/// Route redirection as a pure function of auth state and the surface being
/// shown: anonymous users leave protected surfaces, signed-in users leave
/// the auth surfaces, and nothing moves while the state is still unknown.
pub fn redirect_for(state: &AuthState, surface: Surface) -> Option<Surface> {
    match state {
        AuthState::Unknown => None,
        AuthState::Anonymous => match surface {
            Surface::Home => Some(Surface::Login),
            Surface::Login | Surface::Register => None,
        },
        AuthState::Authenticated(_) => match surface {
            Surface::Home => None,
            Surface::Login | Surface::Register => Some(Surface::Home),
        },
    }
}
