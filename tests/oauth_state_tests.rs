// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth state encoding/decoding tests.
//!
//! These tests verify that frontend URLs survive the signed
//! encode/decode roundtrip through the OAuth state parameter (mirrors
//! the routes/auth.rs logic).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Encode and sign a frontend URL into OAuth state (mirrors auth.rs logic).
fn encode_state(frontend_url: &str, secret: &[u8]) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret).unwrap();
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature).as_bytes())
}

/// Decode and verify the frontend URL (mirrors auth.rs logic).
fn decode_state_frontend(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = format!("{}|{}", parts[0], parts[1]);
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if parts[2] != expected {
        return None;
    }

    Some(parts[0].to_string())
}

#[test]
fn test_oauth_state_roundtrip_localhost() {
    let secret = b"test_state_key";
    let frontend_url = "http://localhost:5173";
    let state = encode_state(frontend_url, secret);

    assert_eq!(
        decode_state_frontend(&state, secret),
        Some(frontend_url.to_string())
    );
}

#[test]
fn test_oauth_state_roundtrip_production() {
    let secret = b"test_state_key";
    let frontend_url = "https://runstory.pages.dev";
    let state = encode_state(frontend_url, secret);

    assert_eq!(
        decode_state_frontend(&state, secret),
        Some(frontend_url.to_string())
    );
}

#[test]
fn test_oauth_state_rejected_with_wrong_secret() {
    let state = encode_state("https://example.com", b"test_state_key");
    assert_eq!(decode_state_frontend(&state, b"another_key"), None);
}

#[test]
fn test_oauth_state_decode_invalid() {
    let secret = b"test_state_key";

    // Invalid base64 should return None
    assert_eq!(decode_state_frontend("not-valid-base64!!!", secret), None);

    // Well-formed base64 but missing the signature part
    let unsigned = URL_SAFE_NO_PAD.encode("https://example.com|deadbeef");
    assert_eq!(decode_state_frontend(&unsigned, secret), None);
}

#[test]
fn test_oauth_state_base64_url_safe() {
    // Verify we're using URL-safe base64 (no + or /)
    let state = encode_state("https://example.com", b"test_state_key");

    assert!(!state.contains('+'), "State should not contain '+'");
    assert!(!state.contains('/'), "State should not contain '/'");
    assert!(!state.contains('='), "State should not contain '=' padding");
}
