use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};

/// Claims
///
/// The payload structure expected inside the stored credential (a JSON Web Token
/// minted by the backend at login). The client never validates the signature —
/// it holds no signing secret — so these claims are trusted only for the local
/// "is this session worth keeping" decision. The server remains the authority
/// on every actual request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The numeric user id of the credential holder, matching the backend's
    /// primary key for users.
    pub user_id: i64,
    /// Expiration time (exp): seconds since the Unix epoch after which the
    /// credential is considered stale.
    pub exp: usize,
}

impl Claims {
    /// Returns true when the credential's expiry lies strictly before `now`
    /// (seconds since epoch). An expiry equal to `now` is still considered
    /// live; comparison is at second granularity.
    pub fn expired_at(&self, now: i64) -> bool {
        (self.exp as i64) < now
    }
}

/// decode
///
/// Parses the credential's payload and extracts the claims. This is a
/// client-side decode: signature verification is disabled and expiry is *not*
/// validated here (expiry is a separate, explicit check so the caller controls
/// the comparison semantics).
///
/// Returns `None` on any failure — malformed structure, unsupported encoding,
/// missing claims — and logs the reason for diagnostics. Never panics and
/// never propagates an error: an undecodable credential simply means "not
/// authenticated" to every caller.
pub fn decode_credential(token: &str) -> Option<Claims> {
    // The header is parsed first so the validation can mirror whatever
    // algorithm the backend stamped on the token. The signature itself is
    // never checked on this side.
    let header = match decode_header(token) {
        Ok(header) => header,
        Err(e) => {
            tracing::warn!(error = %e, "credential header failed to parse");
            return None;
        }
    };

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    // Expiry is compared explicitly in `is_expired`; the claim must still be
    // present for the token to be usable at all.
    validation.validate_exp = false;

    // The decoding key is a placeholder: with signature validation disabled it
    // is never consulted.
    let key = DecodingKey::from_secret(&[]);

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::warn!(error = %e, "credential payload failed to decode");
            None
        }
    }
}

/// is_expired
///
/// Returns true if the credential cannot be decoded at all, or if its decoded
/// expiry lies strictly before the current wall-clock time. A malformed
/// credential is therefore always "expired" — the two failure modes collapse
/// into the same "not authenticated" answer for the session layer.
pub fn is_expired(token: &str) -> bool {
    let Some(claims) = decode_credential(token) else {
        return true;
    };
    claims.expired_at(Utc::now().timestamp())
}
