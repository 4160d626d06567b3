//! Webhook signature verification.
//!
//! Incoming webhooks carry a `Stripe-Signature` header of the form
//! `t=<unix-ts>,v1=<hex-hmac>[,v1=<hex-hmac>...]`. The signed payload is
//! `"{t}.{raw-body}"` keyed with the endpoint's signing secret. Multiple
//! `v1` entries appear during secret rotation; any one matching is enough.
//! Verification runs against the raw request bytes, before any JSON parse.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed skew between the signature timestamp and now, to
/// limit replay of captured deliveries.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// # Errors
///
/// Returns a [`SignatureError`] if the header is malformed, the
/// timestamp is outside the tolerance window, or no `v1` candidate
/// matches the expected HMAC.
pub fn verify_signature(
    secret: &SecretString,
    header: &str,
    body: &[u8],
) -> Result<(), SignatureError> {
    let (timestamp, candidates) = parse_signature_header(header)?;

    let now = chrono::Utc::now().timestamp();
    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(SignatureError::StaleTimestamp);
    }

    let expected = compute_signature(secret, timestamp, body)?;
    if candidates
        .iter()
        .any(|candidate| constant_time_compare(candidate, &expected))
    {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Split the header into its timestamp and all `v1` signature candidates.
fn parse_signature_header(header: &str) -> Result<(i64, Vec<String>), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates = Vec::new();

    for element in header.split(',') {
        let Some((key, value)) = element.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                let parsed = value.parse::<i64>().map_err(|_| {
                    SignatureError::Malformed(format!("non-numeric timestamp: {value}"))
                })?;
                timestamp = Some(parsed);
            }
            "v1" => candidates.push(value.to_string()),
            // v0 and future schemes are ignored.
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| SignatureError::Malformed("missing t= element".to_string()))?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed("missing v1= element".to_string()));
    }

    Ok((timestamp, candidates))
}

/// HMAC-SHA256 of `"{timestamp}.{body}"`, hex-encoded.
fn compute_signature(
    secret: &SecretString,
    timestamp: i64,
    body: &[u8],
) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| SignatureError::Malformed(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Compare two strings in constant time to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
