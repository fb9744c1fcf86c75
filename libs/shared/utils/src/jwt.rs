use base64::{engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD}, Engine};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use shared_models::auth::TokenClaims;

const ROLE_KEYS: [&str; 2] = ["role", "user_type"];
const USER_ID_KEYS: [&str; 3] = ["userId", "id", "user_id"];
const NAME_KEYS: [&str; 3] = ["name", "fullName", "username"];
const EMAIL_KEYS: [&str; 3] = ["userEmail", "email", "sub"];

/// Decode the payload segment of a bearer token without verifying it.
///
/// Returns `None` unless the token has exactly three dot-separated segments
/// and the middle one is base64 (URL-safe or standard) encoded JSON object.
pub fn decode_payload(token: &str) -> Option<Map<String, Value>> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        debug!("Token has {} segments, expected 3", parts.len());
        return None;
    }

    let payload_b64 = parts[1].trim_end_matches('=');
    let bytes = match URL_SAFE_NO_PAD.decode(payload_b64) {
        Ok(bytes) => bytes,
        Err(_) => match STANDARD_NO_PAD.decode(payload_b64) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Failed to decode token payload: {}", e);
                return None;
            }
        },
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            debug!("Token payload is not a JSON object");
            None
        }
        Err(e) => {
            debug!("Failed to parse token payload: {}", e);
            None
        }
    }
}

/// Decode every claim the client cares about. Missing or malformed claims
/// come back as `None` individually.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = decode_payload(token)?;

    Some(TokenClaims {
        role: first_string(&payload, &ROLE_KEYS),
        user_id: first_id(&payload, &USER_ID_KEYS),
        name: first_string(&payload, &NAME_KEYS),
        email: first_string(&payload, &EMAIL_KEYS),
        issued_at: timestamp(&payload, "iat"),
        expires_at: timestamp(&payload, "exp"),
    })
}

pub fn extract_role(token: &str) -> Option<String> {
    decode_claims(token).and_then(|claims| claims.role)
}

pub fn extract_user_id(token: &str) -> Option<i64> {
    decode_claims(token).and_then(|claims| claims.user_id)
}

pub fn extract_user_name(token: &str) -> Option<String> {
    decode_claims(token).and_then(|claims| claims.name)
}

pub fn extract_user_email(token: &str) -> Option<String> {
    decode_claims(token).and_then(|claims| claims.email)
}

fn first_string(payload: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| payload.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
}

// The first non-empty candidate wins, even when it fails to parse.
fn first_id(payload: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    let value = keys
        .iter()
        .filter_map(|key| payload.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => n.as_f64() != Some(0.0),
            _ => true,
        })?;

    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn timestamp(payload: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    payload
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}
