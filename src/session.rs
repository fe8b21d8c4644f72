use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Authenticated backend session, created at sign-in and dropped at
/// sign-out. Passed explicitly to whatever needs authentication; there is
/// no ambient process-wide token store.
#[derive(Debug, Clone)]
pub struct SessionContext {
    token: String,
    pub user_id: Option<i64>,
}

impl SessionContext {
    pub fn new(token: impl Into<String>, user_id: Option<i64>) -> Self {
        Self {
            token: token.into(),
            user_id,
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Consumes the session. The token is dropped here; the backend's JWT
    /// simply expires server-side.
    pub fn sign_out(self) {
        tracing::info!(user_id = ?self.user_id, "Session ended");
    }
}

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupPayload<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    wallet_address: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(default)]
    user: Option<UserSummary>,
}

#[derive(Debug, Deserialize)]
struct UserSummary {
    #[serde(alias = "uid", alias = "user_id")]
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error: String,
}

/// Client for the backend identity endpoints.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionContext> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginPayload { email, password })
            .send()
            .await
            .context("login request failed")?;

        Self::session_from(response).await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        wallet_address: Option<&str>,
    ) -> Result<SessionContext> {
        let response = self
            .http
            .post(format!("{}/auth/signup", self.base_url))
            .json(&SignupPayload {
                name,
                email,
                password,
                wallet_address,
            })
            .send()
            .await
            .context("signup request failed")?;

        Self::session_from(response).await
    }

    async fn session_from(response: reqwest::Response) -> Result<SessionContext> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<AuthErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("backend returned {status}"));
            bail!("authentication failed: {message}");
        }

        let body: AuthResponse = response
            .json()
            .await
            .context("unreadable authentication response")?;

        let user_id = body.user.and_then(|user| user.id);
        tracing::info!(user_id = ?user_id, "Signed in");

        Ok(SessionContext::new(body.token, user_id))
    }
}
