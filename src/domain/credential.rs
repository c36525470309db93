/// Credential presented as the opening message of a stream.
///
/// A fresh credential is built for every connection attempt; `expiration`
/// is relative to the attempt, so a credential is never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCredential {
    /// RFC 3339 timestamp after which the vendor rejects the credential.
    pub expiration: String,

    pub access_key: String,

    /// 64-character lower-case hex HMAC-SHA256 chain output.
    pub signature: String,
}
