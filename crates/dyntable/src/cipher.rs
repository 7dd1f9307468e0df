//! Authenticated encryption of credentials at rest.
//!
//! Tokens are `base64(nonce || ciphertext || tag)` sealed with AES-256-GCM
//! under a fresh 96-bit nonce per call. A process-wide key is installed once
//! with [`init_from_env`] or [`set_key`]; the free [`encrypt`] and
//! [`decrypt`] functions use it and fail with an unavailable error until
//! then.

use crate::{Error, Result};

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use std::{fmt, sync::OnceLock};

/// Environment variable holding the base64 encoded key.
pub const KEY_ENV: &str = "DYNTABLE_ENCRYPTION_KEY";

/// Required key length in bytes.
pub const KEY_LEN: usize = 32;

/// Size of the nonce prefix of every token.
pub const NONCE_LEN: usize = 12;

static GLOBAL: OnceLock<Cipher> = OnceLock::new();

#[derive(Clone)]
pub struct Cipher {
    aead: Aes256Gcm,
    key: [u8; KEY_LEN],
}

impl Cipher {
    /// Creates a cipher from raw key material, which must be exactly 32 bytes.
    pub fn new(key: &[u8]) -> Result<Cipher> {
        let key: [u8; KEY_LEN] = key.try_into().map_err(|_| {
            Error::invalid_key(format!(
                "expected {KEY_LEN} bytes of key material, got {}",
                key.len()
            ))
        })?;

        let aead = Aes256Gcm::new_from_slice(&key)
            .map_err(|_| Error::invalid_key("key rejected by AES-256-GCM"))?;

        Ok(Cipher { aead, key })
    }

    /// Creates a cipher from a base64 encoded key.
    pub fn from_base64(encoded: &str) -> Result<Cipher> {
        let key = STANDARD
            .decode(encoded.trim())
            .map_err(|err| Error::invalid_key(format!("key is not valid base64: {err}")))?;
        Cipher::new(&key)
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .aead
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| dyntable_core::err!("encryption failed"))?;

        let mut token = Vec::with_capacity(NONCE_LEN + sealed.len());
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&sealed);

        Ok(STANDARD.encode(token))
    }

    pub fn decrypt(&self, token: &str) -> Result<String> {
        let decoded = STANDARD
            .decode(token.trim())
            .map_err(|_| Error::decryption_failed())?;

        if decoded.len() < NONCE_LEN {
            return Err(Error::ciphertext_too_short(decoded.len(), NONCE_LEN));
        }

        let (nonce, sealed) = decoded.split_at(NONCE_LEN);
        let plaintext = self
            .aead
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| Error::decryption_failed())?;

        String::from_utf8(plaintext).map_err(|_| Error::decryption_failed())
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher").finish_non_exhaustive()
    }
}

/// Installs the process-wide key from [`KEY_ENV`].
pub fn init_from_env() -> Result<()> {
    init_from_env_var(KEY_ENV)
}

/// Installs the process-wide key from the named environment variable.
pub fn init_from_env_var(name: &str) -> Result<()> {
    let Ok(encoded) = std::env::var(name) else {
        return Err(Error::unavailable(format!(
            "encryption not initialized: {name} is not set"
        )));
    };

    install(Cipher::from_base64(&encoded)?)
}

/// Installs the process-wide key from raw key material.
///
/// Installing the key that is already in place is a no-op; a different key
/// is rejected.
pub fn set_key(key: &[u8]) -> Result<()> {
    install(Cipher::new(key)?)
}

pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Encrypts with the process-wide key.
pub fn encrypt(plaintext: &str) -> Result<String> {
    global()?.encrypt(plaintext)
}

/// Decrypts with the process-wide key.
pub fn decrypt(token: &str) -> Result<String> {
    global()?.decrypt(token)
}

fn global() -> Result<&'static Cipher> {
    GLOBAL
        .get()
        .ok_or_else(|| Error::unavailable("encryption not initialized"))
}

fn install(cipher: Cipher) -> Result<()> {
    let installed = GLOBAL.get_or_init(|| cipher.clone());

    if installed.key != cipher.key {
        return Err(Error::conflict("a different encryption key is already installed"));
    }

    tracing::debug!("encryption key installed");
    Ok(())
}
