//! Provider response envelope decryption.
//!
//! The provider wraps its source list in `{ encrypted, cin, mao, salt }`, all
//! hex encoded. The AES-256-GCM key is derived with PBKDF2-HMAC-SHA256 from a
//! fixed client secret and the per-response salt. `cin` is the GCM IV and
//! `mao` the detached authentication tag.
//!
//! The provider sends 16-byte IVs. GCM accepts non-96-bit IVs (they are
//! folded through GHASH), so the IV is used exactly as received.

use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

use crate::error::{Result, StreamError};

/// Password fed to PBKDF2, as text.
const ENVELOPE_SECRET: &str = "a1b2c3d4e4f6477658455678901477567890abcdef1234567890abcdef123456";
const PBKDF2_ROUNDS: u32 = 100_000;
const KEY_LEN: usize = 32;
const TAG_LEN: usize = 16;

type Aes256Gcm12 = AesGcm<Aes256, U12>;
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Encrypted payload as returned under `data` by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    #[serde(rename = "encrypted")]
    pub ciphertext: String,
    #[serde(rename = "cin")]
    pub iv: String,
    #[serde(rename = "mao")]
    pub auth_tag: String,
    pub salt: String,
}

/// Derive the 32-byte AES key for a given salt.
pub fn derive_key(salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(ENVELOPE_SECRET.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

/// Decrypt an envelope into its UTF-8 plaintext.
///
/// Fails with [`StreamError::Decryption`] on malformed hex, an unsupported IV
/// length, a tag mismatch, or non-UTF-8 plaintext.
pub fn decrypt(envelope: &EncryptedEnvelope) -> Result<String> {
    let mut buffer = decode_field("encrypted", &envelope.ciphertext)?;
    let iv = decode_field("cin", &envelope.iv)?;
    let tag = decode_field("mao", &envelope.auth_tag)?;
    let salt = decode_field("salt", &envelope.salt)?;

    if tag.len() != TAG_LEN {
        return Err(StreamError::Decryption(format!(
            "auth tag must be {TAG_LEN} bytes, got {}",
            tag.len()
        )));
    }

    debug!(
        ciphertext_len = buffer.len(),
        iv_len = iv.len(),
        "Decrypting provider envelope"
    );

    let key = derive_key(&salt);
    let tag = Tag::<U16>::from_slice(&tag);
    let outcome = match iv.len() {
        16 => Aes256Gcm16::new_from_slice(&key)
            .map_err(|e| StreamError::Decryption(e.to_string()))?
            .decrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer, tag),
        12 => Aes256Gcm12::new_from_slice(&key)
            .map_err(|e| StreamError::Decryption(e.to_string()))?
            .decrypt_in_place_detached(Nonce::<U12>::from_slice(&iv), b"", &mut buffer, tag),
        n => {
            return Err(StreamError::Decryption(format!(
                "unsupported IV length: {n} bytes"
            )))
        }
    };
    outcome.map_err(|_| {
        StreamError::Decryption("authentication tag mismatch (wrong key or tampered data)".into())
    })?;

    String::from_utf8(buffer)
        .map_err(|e| StreamError::Decryption(format!("plaintext is not UTF-8: {e}")))
}

/// Encrypt `plaintext` into an envelope, the inverse of [`decrypt`].
///
/// `iv` must be 12 or 16 bytes. The provider never needs this; it exists for
/// fixtures and the benchmark suite.
pub fn seal(plaintext: &str, salt: &[u8], iv: &[u8]) -> Result<EncryptedEnvelope> {
    let key = derive_key(salt);
    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = match iv.len() {
        16 => Aes256Gcm16::new_from_slice(&key)
            .map_err(|e| StreamError::Decryption(e.to_string()))?
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(iv), b"", &mut buffer),
        12 => Aes256Gcm12::new_from_slice(&key)
            .map_err(|e| StreamError::Decryption(e.to_string()))?
            .encrypt_in_place_detached(Nonce::<U12>::from_slice(iv), b"", &mut buffer),
        n => {
            return Err(StreamError::Decryption(format!(
                "unsupported IV length: {n} bytes"
            )))
        }
    }
    .map_err(|e| StreamError::Decryption(e.to_string()))?;

    Ok(EncryptedEnvelope {
        ciphertext: hex::encode(&buffer),
        iv: hex::encode(iv),
        auth_tag: hex::encode(tag),
        salt: hex::encode(salt),
    })
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| StreamError::Decryption(format!("invalid hex in `{name}`: {e}")))
}
