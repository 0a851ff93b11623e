use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::use_cases::sessions::SESSION_TTL_SECONDS;

pub const SESSION_COOKIE_NAME: &str = "campers_yelp_session";

// Cookie value: "<uuid>.<base64url(sha256(secret || uuid))>". The store
// key is server-generated, so signing only guards against guessed or
// tampered identifiers.
pub fn sign(id: Uuid, secret: &str) -> String {
    format!("{id}.{}", signature(id, secret))
}

// Returns the session id when the value carries a valid signature.
pub fn verify(value: &str, secret: &str) -> Option<Uuid> {
    let (raw_id, sig) = value.split_once('.')?;
    let id = Uuid::parse_str(raw_id).ok()?;
    if sig == signature(id, secret) {
        Some(id)
    } else {
        None
    }
}

fn signature(id: Uuid, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(id.as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
}

// Set-Cookie header for a freshly issued session.
pub fn set_cookie_header(id: Uuid, secret: &str, secure: bool) -> String {
    let mut header = format!(
        "{SESSION_COOKIE_NAME}={}; Max-Age={SESSION_TTL_SECONDS}; Path=/; HttpOnly",
        sign(id, secret)
    );
    if secure {
        header.push_str("; Secure");
    }
    header
}
