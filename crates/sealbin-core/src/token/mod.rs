//! Delete-authorization tokens.
//!
//! A delete token is an HMAC-SHA256 over the paste payload using a
//! server-wide secret, truncated to 10 bytes and hex-encoded. Tokens are
//! never stored; they are derived on demand from the payload, so nothing
//! needs to be persisted alongside the paste.

use crate::error::{SealbinError, SealbinResult};
use ring::{constant_time, hmac};

/// Number of HMAC bytes kept in a token
pub const TOKEN_BYTES: usize = 10;

/// Issue the delete token for a payload under the server-wide secret.
pub fn issue(payload: &[u8], secret: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    let tag = hmac::sign(&key, payload);
    hex::encode(&tag.as_ref()[..TOKEN_BYTES])
}

/// Validate a delete token against a payload.
///
/// Returns `Ok(false)` for a well-formed but wrong token; that is a normal
/// authorization refusal, not an error. A token that is not valid hex is a
/// caller error and fails with `InvalidToken`. Comparison is constant-time.
pub fn validate(payload: &[u8], token: &str, secret: &[u8]) -> SealbinResult<bool> {
    let presented = hex::decode(token).map_err(|_| SealbinError::InvalidToken {
        token: token.to_string(),
    })?;

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    let tag = hmac::sign(&key, payload);

    Ok(constant_time::verify_slices_are_equal(&tag.as_ref()[..TOKEN_BYTES], &presented).is_ok())
}
