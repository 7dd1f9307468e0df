use super::Error;

/// Error raised by the credential cipher.
///
/// The three shapes are kept apart so callers can tell a truncated token from
/// one that fails authentication, and both from bad key material.
#[derive(Debug)]
pub(super) enum CipherError {
    /// The decoded token is shorter than the nonce prefix.
    TooShort { len: usize, min: usize },

    /// Base64 decoding, tag verification or UTF-8 decoding failed.
    DecryptionFailed,

    /// Key material is not exactly 32 bytes or could not be decoded.
    InvalidKey { message: Box<str> },
}

impl std::error::Error for CipherError {}

impl core::fmt::Display for CipherError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            CipherError::TooShort { len, min } => write!(
                f,
                "ciphertext too short: {len} bytes, expected at least {min}"
            ),
            CipherError::DecryptionFailed => f.write_str("decryption failed"),
            CipherError::InvalidKey { message } => write!(f, "invalid encryption key: {message}"),
        }
    }
}

impl Error {
    /// Creates an error for a ciphertext token shorter than the nonce.
    pub fn ciphertext_too_short(len: usize, min: usize) -> Error {
        Error::from(super::ErrorKind::Cipher(CipherError::TooShort { len, min }))
    }

    /// Creates an error for a token that fails to decode or authenticate.
    pub fn decryption_failed() -> Error {
        Error::from(super::ErrorKind::Cipher(CipherError::DecryptionFailed))
    }

    /// Creates an error for unusable key material.
    pub fn invalid_key(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Cipher(CipherError::InvalidKey {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if the token was shorter than the nonce prefix.
    pub fn is_ciphertext_too_short(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::Cipher(CipherError::TooShort { .. })
        )
    }

    /// Returns `true` if the token could not be decoded or authenticated.
    pub fn is_decryption_failed(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::Cipher(CipherError::DecryptionFailed)
        )
    }

    /// Returns `true` if the key material was rejected.
    pub fn is_invalid_key(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::Cipher(CipherError::InvalidKey { .. })
        )
    }
}
