use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

// Stored format: base64(salt) '$' base64(sha256(salt || password)).
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    encode(&salt, password)
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_b64, _)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = general_purpose::STANDARD.decode(salt_b64) else {
        return false;
    };
    encode(&salt, password) == stored
}

fn encode(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();

    format!(
        "{}${}",
        general_purpose::STANDARD.encode(salt),
        general_purpose::STANDARD.encode(digest)
    )
}
