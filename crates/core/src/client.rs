//! HTTP client for the remote opt-out service.
//!
//! One request per call, no retry, no timeout beyond the transport default.
//! Failures come back as composed error strings; recovery policy (fall back
//! to the local snapshot, surface to the caller) lives in [`crate::gate`].

use crate::error::{PrivacyError, Result};
use crate::identity::UserIdentity;
use crate::models::{OptOutResponse, PrivacyStatus, TokenData};

/// Production opt-out service.
pub const DEFAULT_BASE_URL: &str = "https://data-optout-service.uca.cloud.unity3d.com";

const OPT_OUT_PATH: &str = "/player/opt_out";
const TOKEN_PATH: &str = "/token";

/// HTTP client for the opt-out status and privacy token endpoints.
pub struct PrivacyClient {
    http: reqwest::Client,
    base_url: String,
}

impl PrivacyClient {
    /// Create a client targeting the production service.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn opt_out_url(&self) -> String {
        format!("{}{}", self.base_url, OPT_OUT_PATH)
    }

    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url, TOKEN_PATH)
    }

    /// Fetch the remote opt-out status for this app/user/device.
    ///
    /// Exactly one round trip; any transport, HTTP, empty-body, or parse
    /// failure is an `Err` carrying a human-readable composed message.
    pub async fn get_opt_out_status(
        &self,
        identity: &UserIdentity,
        user_agent: &str,
    ) -> Result<PrivacyStatus> {
        let request = self.http.get(self.opt_out_url()).query(&[
            ("appid", identity.appid.as_str()),
            ("userid", identity.userid.as_str()),
            ("deviceid", identity.deviceid.as_str()),
        ]);
        let request = with_user_agent(request, user_agent);

        let body = read_body(request, PrivacyError::OptOut).await?;
        let response: OptOutResponse = serde_json::from_str(&body)
            .map_err(|e| PrivacyError::OptOut(format!("parse failed: {e}")))?;
        Ok(response.status)
    }

    /// Request a privacy dashboard token for this identity.
    pub async fn post_token(
        &self,
        identity: &UserIdentity,
        user_agent: &str,
    ) -> Result<TokenData> {
        let request = self.http.post(self.token_url()).json(identity);
        let request = with_user_agent(request, user_agent);

        let body = read_body(request, PrivacyError::Token).await?;
        serde_json::from_str(&body).map_err(|e| PrivacyError::Token(format!("parse failed: {e}")))
    }
}

impl Default for PrivacyClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Web-sandboxed targets disallow custom User-Agent headers; everywhere else
/// the descriptive header is attached.
fn with_user_agent(request: reqwest::RequestBuilder, user_agent: &str) -> reqwest::RequestBuilder {
    #[cfg(not(target_arch = "wasm32"))]
    {
        request.header(reqwest::header::USER_AGENT, user_agent)
    }
    #[cfg(target_arch = "wasm32")]
    {
        let _ = user_agent;
        request
    }
}

/// Sends the request and returns a non-empty 2xx body, composing the error
/// message (with the response body appended when one exists) otherwise.
async fn read_body(
    request: reqwest::RequestBuilder,
    wrap: fn(String) -> PrivacyError,
) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| wrap(format!("request failed: {e}")))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        let mut message = format!("request rejected ({status})");
        if !body.is_empty() {
            message.push_str(": ");
            message.push_str(&body);
        }
        return Err(wrap(message));
    }

    if body.is_empty() {
        return Err(wrap("empty response".to_string()));
    }

    Ok(body)
}
