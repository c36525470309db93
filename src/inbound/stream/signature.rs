use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

type HmacSha256 = Hmac<Sha256>;

/// Which signing chain the vendor expects.
///
/// The two schemes produce different signatures for the same inputs; exactly
/// one is selected through configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// `HMAC(expiration, material) -> HMAC(access_key, ·) -> HMAC(secret_key, ·)`
    #[default]
    Chained,
    /// Same chain, but the signing material is replaced by its SHA-256 hex
    /// digest first and the chain is keyed by the expiration in Unix seconds.
    /// The credential still carries the RFC 3339 expiration.
    Prehashed,
}

impl SignatureScheme {
    /// The expiration text used as the first HMAC key.
    pub fn expiration_key(&self, expires_at: OffsetDateTime, rfc3339: &str) -> String {
        match self {
            SignatureScheme::Chained => rfc3339.to_string(),
            SignatureScheme::Prehashed => expires_at.unix_timestamp().to_string(),
        }
    }

    pub fn sign(
        &self,
        signing_material: &str,
        access_key: &str,
        secret_key: &str,
        expiration: &str,
    ) -> String {
        match self {
            SignatureScheme::Chained => sign(signing_material, access_key, secret_key, expiration),
            SignatureScheme::Prehashed => {
                sign_prehashed(signing_material, access_key, secret_key, expiration)
            }
        }
    }
}

/// Derive the stream signature.
///
/// Each step's lower-case hex digest is the message of the next step.
pub fn sign(signing_material: &str, access_key: &str, secret_key: &str, expiration: &str) -> String {
    let h1 = hmac_sha256_hex(expiration, signing_material);
    let h2 = hmac_sha256_hex(access_key, &h1);
    hmac_sha256_hex(secret_key, &h2)
}

/// Derive the stream signature over the SHA-256 digest of `params`.
pub fn sign_prehashed(params: &str, access_key: &str, secret_key: &str, expiration: &str) -> String {
    let params_hash = hex::encode(Sha256::digest(params.as_bytes()));
    sign(&params_hash, access_key, secret_key, expiration)
}

/// Compute HMAC-SHA256 and hex-encode it
fn hmac_sha256_hex(key: &str, message: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(key.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC key can be of any size, as per crate documentation"),
    };

    mac.update(message.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}
