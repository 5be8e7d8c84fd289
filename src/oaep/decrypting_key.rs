use super::decrypt;
use crate::{traits::Decryptor, Result, RsaPrivateKey};
use alloc::vec::Vec;
use zeroize::{ZeroizeOnDrop, Zeroizing};

/// Decryption key for SHA-256 OAEP decryption as described in [RFC8017 § 7.1].
///
/// Works with both exponent-form and CRT-form private keys.
///
/// [RFC8017 § 7.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.1
#[derive(Debug, Clone)]
pub struct DecryptingKey {
    inner: RsaPrivateKey,
}

impl DecryptingKey {
    /// Create a new decrypting key from an RSA private key.
    pub fn new(key: RsaPrivateKey) -> Self {
        Self { inner: key }
    }
}

impl From<RsaPrivateKey> for DecryptingKey {
    fn from(key: RsaPrivateKey) -> Self {
        Self::new(key)
    }
}

impl Decryptor for DecryptingKey {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        decrypt(&self.inner, ciphertext)
    }
}

impl ZeroizeOnDrop for DecryptingKey {}
