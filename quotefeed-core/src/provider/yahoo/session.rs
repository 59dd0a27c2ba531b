//! Cookie + crumb session for the quote summary endpoint.
//!
//! The cookie lands in the client's cookie store; the crumb is fetched once and reused for every
//! symbol of the batch.

use super::YahooProvider;
use crate::error::ProviderError;
use reqwest::StatusCode;
use tracing::{debug, warn};

impl YahooProvider {
    /// Crumb for the current session, fetching it on first use.
    pub(super) fn crumb(&self) -> Result<String, ProviderError> {
        let mut cached = self
            .crumb
            .lock()
            .map_err(|_| ProviderError::Other("crumb lock poisoned".into()))?;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = self.fetch_crumb()?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    fn fetch_crumb(&self) -> Result<String, ProviderError> {
        // Yahoo answers the cookie URL with an error page but still sets the cookie
        match self.client.get(&self.config.cookie_url).send() {
            Ok(resp) => debug!(status = %resp.status(), "primed session cookie"),
            Err(e) => warn!(error = %e, "session cookie request failed"),
        }

        let (status, body) = self.get(&self.config.crumb_url, &[])?;
        validate_crumb(status, &body)
    }
}

/// Accept a crumb body only if it looks like a token rather than an error page.
pub(super) fn validate_crumb(status: StatusCode, body: &str) -> Result<String, ProviderError> {
    let crumb = body.trim();
    if !status.is_success() {
        return Err(ProviderError::AuthenticationRequired(format!(
            "crumb request returned HTTP {status}"
        )));
    }
    if crumb.is_empty() || crumb.contains('<') || crumb.contains("Too Many Requests") {
        return Err(ProviderError::AuthenticationRequired(
            "crumb response did not contain a token".into(),
        ));
    }
    Ok(crumb.to_string())
}
