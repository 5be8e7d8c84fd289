use super::encrypt;
use crate::{traits::RandomizedEncryptor, Result, RsaPublicKey};
use alloc::vec::Vec;
use rand_core::CryptoRngCore;

/// Encryption key for SHA-256 OAEP encryption as described in [RFC8017 § 7.1].
///
/// [RFC8017 § 7.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptingKey {
    inner: RsaPublicKey,
}

impl EncryptingKey {
    /// Create a new encrypting key from an RSA public key.
    pub fn new(key: RsaPublicKey) -> Self {
        Self { inner: key }
    }

    /// Returns the wrapped public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.inner
    }
}

impl From<RsaPublicKey> for EncryptingKey {
    fn from(key: RsaPublicKey) -> Self {
        Self::new(key)
    }
}

impl RandomizedEncryptor for EncryptingKey {
    fn encrypt_with_rng<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        encrypt(rng, &self.inner, msg)
    }
}
