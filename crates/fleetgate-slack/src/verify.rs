//! Slack request-signature verification.
//!
//! Scheme: HMAC-SHA256 over `v0:{timestamp}:{raw body}`, hex-encoded
//! with a `v0=` prefix in the signature header. Verification is
//! constant-time and pure: the caller reads the raw body bytes once
//! and hands the same bytes to the verifier and to the event parser.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use fleetgate_core::Timestamp;

use crate::error::{SlackError, SlackResult};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";
/// Header carrying the request timestamp (Unix seconds).
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Maximum allowed clock skew between the request timestamp and now
/// (5 minutes), limiting replay of captured requests.
const REPLAY_WINDOW_SECONDS: u64 = 300;

const SIGNATURE_VERSION: &str = "v0";

/// Verify an inbound Slack request.
///
/// `timestamp` and `signature` are the raw header values (absent
/// headers pass `None`); `body` is the raw, unparsed request body.
/// Fails if the timestamp is missing, unparseable, or outside the
/// replay window; if the signature header is missing; or if the
/// recomputed signature does not match. No side effects on the body.
pub fn verify_slack_signature(
    timestamp: Option<&str>,
    signature: Option<&str>,
    body: &[u8],
    signing_secret: &str,
    now: Timestamp,
) -> SlackResult<()> {
    let timestamp = timestamp.ok_or(SlackError::MissingTimestamp)?;
    let ts_seconds: u64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SlackError::InvalidTimestamp)?;

    // Saturating: the header is attacker-controlled and may sit at the
    // edges of the u64 range.
    let now_seconds = now.seconds_since_epoch;
    if now_seconds > ts_seconds.saturating_add(REPLAY_WINDOW_SECONDS) {
        return Err(SlackError::StaleTimestamp); // too old
    }
    if ts_seconds > now_seconds.saturating_add(REPLAY_WINDOW_SECONDS) {
        return Err(SlackError::StaleTimestamp); // too far in the future
    }

    let signature = signature.ok_or(SlackError::MissingSignature)?;
    let sig_hex = signature
        .strip_prefix("v0=")
        .ok_or(SlackError::SignatureMismatch)?;
    let sig_bytes = hex::decode(sig_hex).map_err(|_| SlackError::SignatureMismatch)?;

    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|_| SlackError::InternalError)?;
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);

    // Constant-time comparison via the hmac crate
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SlackError::SignatureMismatch)
}

/// Compute the signature header value for a request. Exercised by the
/// gateway's tests to build well-signed fixtures.
pub fn sign_request(timestamp: u64, body: &[u8], signing_secret: &str) -> SlackResult<String> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|_| SlackError::InternalError)?;
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b":");
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    Ok(format!("v0={}", hex::encode(digest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

    fn fresh_now(ts: u64) -> Timestamp {
        Timestamp::from_seconds(ts + 30)
    }

    #[test]
    fn test_valid_signature_accepted() {
        let ts = 1_700_000_000u64;
        let body = b"{\"type\":\"event_callback\"}";
        let sig = sign_request(ts, body, SECRET).unwrap();

        verify_slack_signature(
            Some(&ts.to_string()),
            Some(&sig),
            body,
            SECRET,
            fresh_now(ts),
        )
        .unwrap();
    }

    #[test]
    fn test_missing_signature_header_rejected() {
        let ts = 1_700_000_000u64;
        let err = verify_slack_signature(
            Some(&ts.to_string()),
            None,
            b"body",
            SECRET,
            fresh_now(ts),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::MissingSignature);
    }

    #[test]
    fn test_missing_timestamp_header_rejected() {
        let err =
            verify_slack_signature(None, Some("v0=00"), b"body", SECRET, Timestamp::now())
                .unwrap_err();
        assert_eq!(err, SlackError::MissingTimestamp);
    }

    #[test]
    fn test_garbage_timestamp_rejected() {
        let err = verify_slack_signature(
            Some("not-a-number"),
            Some("v0=00"),
            b"body",
            SECRET,
            Timestamp::now(),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::InvalidTimestamp);
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let ts = 1_700_000_000u64;
        let body = b"body";
        let sig = sign_request(ts, body, SECRET).unwrap();

        // six minutes later: outside the replay window
        let err = verify_slack_signature(
            Some(&ts.to_string()),
            Some(&sig),
            body,
            SECRET,
            Timestamp::from_seconds(ts + 360),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::StaleTimestamp);
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let ts = 1_700_000_000u64;
        let sig = sign_request(ts, b"body", SECRET).unwrap();
        let err = verify_slack_signature(
            Some(&ts.to_string()),
            Some(&sig),
            b"body",
            SECRET,
            Timestamp::from_seconds(ts - 360),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::StaleTimestamp);
    }

    #[test]
    fn test_u64_max_timestamp_rejected_without_panic() {
        let err = verify_slack_signature(
            Some("18446744073709551615"),
            Some("v0=00"),
            b"body",
            SECRET,
            Timestamp::from_seconds(1_700_000_000),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::StaleTimestamp);
    }

    #[test]
    fn test_near_max_clock_does_not_panic_inside_window() {
        // ts and now both near the top of the range, 100s apart: the
        // window check must pass without wrapping and fall through to
        // the signature comparison.
        let err = verify_slack_signature(
            Some(&u64::MAX.to_string()),
            Some("v0=00"),
            b"body",
            SECRET,
            Timestamp::from_seconds(u64::MAX - 100),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::SignatureMismatch);
    }

    #[test]
    fn test_tampered_body_rejected() {
        let ts = 1_700_000_000u64;
        let sig = sign_request(ts, b"original body", SECRET).unwrap();
        let err = verify_slack_signature(
            Some(&ts.to_string()),
            Some(&sig),
            b"tampered body",
            SECRET,
            fresh_now(ts),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::SignatureMismatch);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let ts = 1_700_000_000u64;
        let sig = sign_request(ts, b"body", "other-secret").unwrap();
        let err = verify_slack_signature(
            Some(&ts.to_string()),
            Some(&sig),
            b"body",
            SECRET,
            fresh_now(ts),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::SignatureMismatch);
    }

    #[test]
    fn test_unversioned_signature_rejected() {
        let ts = 1_700_000_000u64;
        let err = verify_slack_signature(
            Some(&ts.to_string()),
            Some("abcdef"),
            b"body",
            SECRET,
            fresh_now(ts),
        )
        .unwrap_err();
        assert_eq!(err, SlackError::SignatureMismatch);
    }
}
