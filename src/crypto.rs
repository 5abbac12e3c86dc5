use argon2::{self, Config};
use chacha20poly1305::aead::{Aead, NewAead};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 24;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("unable to hash pin: {0}")]
    Hash(#[from] argon2::Error),
    #[error("vault key must be 32 bytes, got {0}")]
    KeyLength(usize),
    #[error("vault nonce must be 24 bytes, got {0}")]
    NonceLength(usize),
    #[error("encryption failure")]
    Encrypt,
    #[error("decryption failure (wrong key or tampered vault)")]
    Decrypt,
}

pub fn hash_pin(pin: &str) -> Result<String, CryptoError> {
    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);
    let config = Config::default();
    let hash = argon2::hash_encoded(pin.as_bytes(), &salt, &config)?;
    Ok(hash)
}

pub fn verify_pin(hash: &str, pin: &str) -> bool {
    argon2::verify_encoded(hash, pin.as_bytes()).unwrap_or(false)
}

pub fn generate_key() -> Vec<u8> {
    let mut dest = vec![0u8; KEY_LEN];
    OsRng.fill_bytes(&mut dest);
    dest
}

fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut dest = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut dest);
    dest
}

fn cipher(key: &[u8]) -> Result<XChaCha20Poly1305, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::KeyLength(key.len()));
    }
    Ok(XChaCha20Poly1305::new(Key::from_slice(key)))
}

/// Encrypt `text` under `key` with a fresh nonce, returns (ciphertext, nonce).
pub fn encrypt_string(text: &str, key: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
    let aead = cipher(key)?;

    let nonce_seed = generate_nonce();
    let nonce = XNonce::from_slice(&nonce_seed);
    let ciphertext = aead
        .encrypt(nonce, text.as_bytes())
        .map_err(|_| CryptoError::Encrypt)?;

    Ok((ciphertext, nonce.to_vec()))
}

pub fn decrypt_string(
    ciphertext: &[u8],
    key: &[u8],
    nonce_seed: &[u8],
) -> Result<Zeroizing<String>, CryptoError> {
    if nonce_seed.len() != NONCE_LEN {
        return Err(CryptoError::NonceLength(nonce_seed.len()));
    }
    let aead = cipher(key)?;
    let nonce = XNonce::from_slice(nonce_seed);

    let plaintext_bytes = aead
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::Decrypt)?;

    String::from_utf8(plaintext_bytes)
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::Decrypt)
}
