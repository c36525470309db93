use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use super::signature::SignatureScheme;
use crate::config::StreamConfig;
use crate::domain::AuthCredential;
use crate::error::RelayError;

/// Builds a fresh [`AuthCredential`] for each connection attempt.
#[derive(Clone)]
pub struct StreamAuthenticator {
    access_key: String,
    secret_key: String,
    signing_material: String,
    scheme: SignatureScheme,
    horizon: Duration,
}

impl StreamAuthenticator {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            signing_material: config.signing_material.clone(),
            scheme: config.signature_scheme,
            horizon: Duration::seconds(i64::try_from(config.credential_ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    /// How far past `now` the credential expires.
    pub fn horizon(&self) -> Duration {
        self.horizon
    }

    /// Build a credential expiring `horizon` after `now`.
    ///
    /// `now` is taken per attempt; never cache the result.
    pub fn build_credential(&self, now: OffsetDateTime) -> Result<AuthCredential, RelayError> {
        let expires_at = now
            .to_offset(UtcOffset::UTC)
            .replace_nanosecond(0)
            .ok()
            .and_then(|t| t.checked_add(self.horizon))
            .ok_or_else(|| {
                RelayError::UnexpectedFailure(format!(
                    "credential expiration overflows: {now} + {}",
                    self.horizon
                ))
            })?;

        let expiration = expires_at.format(&Rfc3339).map_err(|e| {
            RelayError::UnexpectedFailure(format!("Failed to format expiration: {e}"))
        })?;

        let signature = self.scheme.sign(
            &self.signing_material,
            &self.access_key,
            &self.secret_key,
            &self.scheme.expiration_key(expires_at, &expiration),
        );

        Ok(AuthCredential {
            expiration,
            access_key: self.access_key.clone(),
            signature,
        })
    }
}
