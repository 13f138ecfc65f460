// Backend HTTP client
//
// Wraps `reqwest::Client` with backend-specific URL construction and
// response decoding. Authentication is bearer-token: the token endpoint
// issues one, and every subsequent call takes it as an explicit argument.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{SessionToken, TokenGrant};
use crate::error::Error;
use crate::models::{ConnectRequest, SwitchSnapshot};
use crate::transport::TransportConfig;

/// HTTP client for the switch-diagnostics backend.
///
/// Stateless beyond the connection pool: it holds no token and no
/// session. Callers thread the [`SessionToken`] through each call, which
/// keeps auth visible at every call site and trivially mockable in tests.
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g. `https://switchdiag.internal:8000`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client` (used by tests).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(&format!("/api/{path}"))
            .map_err(Error::InvalidUrl)
    }

    // ── Operator authentication ──────────────────────────────────────

    /// Exchange operator credentials for a session token.
    ///
    /// The token endpoint speaks OAuth2 password flow, so the body is
    /// form-encoded rather than JSON.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        let url = self.api_url("token")?;
        debug!("requesting session token at {}", url);

        let resp = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password.expose_secret())])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let grant: TokenGrant = decode_json(resp).await?;
        debug!(token_type = %grant.token_type, "session token issued");
        Ok(grant.access_token)
    }

    /// Invalidate the session server-side. Best effort: the local token
    /// is discarded by the caller regardless of the outcome.
    pub async fn logout(&self, token: &SessionToken) -> Result<(), Error> {
        let url = self.api_url("logout")?;
        debug!("logging out at {}", url);

        let resp = self
            .http
            .post(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(Error::Transport)?;

        check_status(resp).await?;
        debug!("logout complete");
        Ok(())
    }

    // ── Switch lifecycle ─────────────────────────────────────────────

    /// Ask the backend to open an SSH session to the switch and return a
    /// full diagnostic snapshot.
    pub async fn connect(
        &self,
        token: &SessionToken,
        request: &ConnectRequest,
    ) -> Result<SwitchSnapshot, Error> {
        let url = self.api_url("connect")?;
        debug!(ip = %request.ip, "connecting to switch via {}", url);

        let resp = self
            .http
            .post(url)
            .bearer_auth(token.as_str())
            .json(request)
            .send()
            .await
            .map_err(Error::Transport)?;

        decode_json(check_status(resp).await?).await
    }

    /// Tear down the backend's switch session.
    ///
    /// The response carries no payload the client uses.
    pub async fn disconnect(&self, token: &SessionToken) -> Result<(), Error> {
        let url = self.api_url("disconnect")?;
        debug!("disconnecting switch session via {}", url);

        let resp = self
            .http
            .post(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(Error::Transport)?;

        check_status(resp).await?;
        Ok(())
    }
}

// ── Response helpers ─────────────────────────────────────────────────

/// Map non-success statuses to typed errors, capturing whatever detail
/// the body carried. 401 means the bearer token was rejected.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::SessionExpired);
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = extract_detail(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        });
        return Err(Error::Api {
            message,
            status: status.as_u16(),
        });
    }

    Ok(resp)
}

async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&body).map_err(|e| {
        let preview = &body[..body.len().min(200)];
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

/// The backend wraps error text as `{"detail": "..."}`; fall back to the
/// raw body when it doesn't.
fn extract_detail(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct Detail {
        detail: String,
    }

    if let Ok(d) = serde_json::from_str::<Detail>(body) {
        return Some(d.detail);
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed[..trimmed.len().min(200)].to_owned())
    }
}
