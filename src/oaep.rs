//! Encryption and decryption using [OAEP padding](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1)
//! with SHA-256 as both the label hash and the MGF1 digest, and an empty label.
//!
//! The largest plaintext for a `k`-byte modulus is `k - 2 * 32 - 2` bytes.
//! Ciphertexts are always exactly `k` bytes, big-endian.
//!
//! The `*_into` functions write into caller buffers and accept `None` as a
//! capacity probe: they then return the modulus size `k`, which bounds both
//! the ciphertext and the plaintext, without doing any work.

mod decrypting_key;
mod encrypting_key;

pub use self::{decrypting_key::DecryptingKey, encrypting_key::EncryptingKey};

use alloc::vec;
use alloc::vec::Vec;

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::oaep::{oaep_decode, oaep_encode, HASH_SIZE};
use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt};
use crate::buffer::{allocate_scratch, uint_to_buffer, SecretOutput};
use crate::config::ByteOrder;
use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Plaintexts of this many bytes or more are rejected outright.
pub const MAX_MESSAGE_LEN: usize = i32::MAX as usize;

/// Encrypts `msg` into `out` and returns the ciphertext length.
///
/// With `out = None` nothing is encrypted and the required buffer size is
/// returned. A buffer larger than the modulus size is accepted; only its
/// first `k` bytes are written.
pub fn encrypt_into<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key: &RsaPublicKey,
    msg: &[u8],
    out: Option<&mut [u8]>,
) -> Result<usize> {
    if msg.is_empty() || msg.len() >= MAX_MESSAGE_LEN {
        log::debug!("rejecting OAEP encryption of {} bytes", msg.len());
        return Err(Error::InvalidMessageLength);
    }

    let k = key.size();
    let out = match out {
        Some(out) => out,
        None => {
            log::trace!("OAEP encryption capacity probe: {k} bytes");
            return Ok(k);
        }
    };
    if out.len() < k {
        return Err(Error::InvalidBufferLength);
    }

    let mut seed = Zeroizing::new([0u8; HASH_SIZE]);
    rng.try_fill_bytes(&mut seed[..])?;

    encrypt_with_seed(key, msg, &seed, &mut out[..k])?;
    Ok(k)
}

/// Deterministic core of [`encrypt_into`]; `out` must be exactly `k` bytes.
pub(crate) fn encrypt_with_seed(
    key: &RsaPublicKey,
    msg: &[u8],
    seed: &[u8; HASH_SIZE],
    out: &mut [u8],
) -> Result<()> {
    let mut em = allocate_scratch(key.size())?;
    oaep_encode(&mut em, msg, seed)?;

    let m = Zeroizing::new(BigUint::from_bytes_be(&em));
    let c = rsa_encrypt(key, &m)?;

    uint_to_buffer(&c, out, ByteOrder::BigEndian)
}

/// Decrypts `ciphertext` into `out` and returns the plaintext length.
///
/// With `out = None` nothing is decrypted and the maximum plaintext size,
/// the modulus size, is returned. On any failure `out` is left zeroed.
pub fn decrypt_into(
    key: &RsaPrivateKey,
    ciphertext: &[u8],
    out: Option<&mut [u8]>,
) -> Result<usize> {
    if ciphertext.is_empty() {
        return Err(Error::InvalidMessageLength);
    }

    let k = key.size();
    let out = match out {
        Some(out) => out,
        None => {
            log::trace!("OAEP decryption capacity probe: {k} bytes");
            return Ok(k);
        }
    };
    let mut out = SecretOutput::new(out);

    if ciphertext.len() != k {
        return Err(Error::Decryption);
    }

    let c = BigUint::from_bytes_be(ciphertext);
    let m = Zeroizing::new(rsa_decrypt(key, &c)?);

    let mut em = allocate_scratch(k)?;
    uint_to_buffer(&m, &mut em, ByteOrder::BigEndian).map_err(|_| Error::Decryption)?;

    let index = Option::<usize>::from(oaep_decode(&mut em)?).ok_or(Error::Decryption)?;
    let plaintext = &em[index..];
    if out.len() < plaintext.len() {
        return Err(Error::InvalidBufferLength);
    }

    out[..plaintext.len()].copy_from_slice(plaintext);
    out.commit();
    Ok(plaintext.len())
}

/// Encrypts `msg` with a fresh random seed and returns the `k`-byte
/// ciphertext.
///
/// # Example
/// ```
/// use enclave_rsa::{oaep, Config, KeyPair};
///
/// let mut rng = rand::thread_rng();
/// let pair = KeyPair::generate(&mut rng, &Config::default(), 128, 3, &[1, 0, 1]).unwrap();
///
/// let ciphertext = oaep::encrypt(&mut rng, pair.public_key(), b"secret").unwrap();
/// assert_eq!(ciphertext.len(), 128);
///
/// let plaintext = oaep::decrypt(pair.private_key(), &ciphertext).unwrap();
/// assert_eq!(&plaintext[..], b"secret");
/// ```
pub fn encrypt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key: &RsaPublicKey,
    msg: &[u8],
) -> Result<Vec<u8>> {
    let mut out = vec![0u8; key.size()];
    let len = encrypt_into(rng, key, msg, Some(&mut out[..]))?;
    out.truncate(len);
    Ok(out)
}

/// Decrypts `ciphertext` into a buffer that is wiped when dropped.
pub fn decrypt(key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let mut out = allocate_scratch(key.size())?;
    let len = decrypt_into(key, ciphertext, Some(&mut out[..]))?;
    out.truncate(len);
    Ok(out)
}
