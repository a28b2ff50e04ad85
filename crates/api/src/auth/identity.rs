//! Third-party identity verification.
//!
//! A login submits an assertion obtained from the identity provider. The
//! server forwards it, together with its own audience, to a verifier
//! endpoint and trusts the email that comes back.

use async_trait::async_trait;
use serde::Deserialize;

/// Errors from verifying a login assertion.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The verifier looked at the assertion and refused it.
    #[error("Assertion rejected: {0}")]
    Rejected(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Verifier request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The verifier answered with something other than a verdict.
    #[error("Unexpected verifier response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

/// Turns a login assertion into a verified email address.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, assertion: &str) -> Result<String, IdentityError>;
}

/// Verdict returned by the remote verifier.
#[derive(Debug, Deserialize)]
struct Verdict {
    status: String,
    email: Option<String>,
    reason: Option<String>,
}

/// [`IdentityVerifier`] backed by a remote verification endpoint.
///
/// POSTs `assertion` and `audience` as a form and expects
/// `{"status": "okay", "email": "..."}` back.
pub struct RemoteVerifier {
    client: reqwest::Client,
    url: String,
    audience: String,
}

impl RemoteVerifier {
    pub fn new(url: String, audience: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            audience,
        }
    }
}

#[async_trait]
impl IdentityVerifier for RemoteVerifier {
    async fn verify(&self, assertion: &str) -> Result<String, IdentityError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("assertion", assertion), ("audience", self.audience.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let verdict: Verdict = match serde_json::from_str(&body) {
            Ok(verdict) if status.is_success() => verdict,
            _ => {
                return Err(IdentityError::UnexpectedResponse {
                    status: status.as_u16(),
                    body,
                })
            }
        };

        interpret(verdict)
    }
}

fn interpret(verdict: Verdict) -> Result<String, IdentityError> {
    match (verdict.status.as_str(), verdict.email) {
        ("okay", Some(email)) if !email.is_empty() => Ok(email),
        _ => Err(IdentityError::Rejected(
            verdict.reason.unwrap_or(verdict.status),
        )),
    }
}
