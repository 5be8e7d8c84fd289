//! EME-OAEP encoding and decoding with SHA-256 and an empty label,
//! as in [RFC 8017 § 7.1](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).

use digest::Digest;
use sha2::Sha256;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use super::mgf::mgf1_xor;
use crate::errors::{Error, Result};

/// SHA-256 output size, which is also the OAEP seed size.
pub(crate) const HASH_SIZE: usize = 32;

/// Encodes `msg` into `em`, whose length is the modulus size `k`.
///
/// Layout: `0x00 || maskedSeed || maskedDB`, where
/// `DB = lHash || PS || 0x01 || M`.
pub(crate) fn oaep_encode(em: &mut [u8], msg: &[u8], seed: &[u8; HASH_SIZE]) -> Result<()> {
    let k = em.len();
    if msg.len() + 2 * HASH_SIZE + 2 > k {
        return Err(Error::MessageTooLong);
    }

    em.fill(0);

    let (_, payload) = em.split_at_mut(1);
    let (masked_seed, db) = payload.split_at_mut(HASH_SIZE);
    masked_seed.copy_from_slice(seed);

    let db_len = k - HASH_SIZE - 1;
    let l_hash = Sha256::digest(b"");
    db[..HASH_SIZE].copy_from_slice(&l_hash);
    db[db_len - msg.len() - 1] = 1;
    db[db_len - msg.len()..].copy_from_slice(msg);

    let mut mgf_digest = Sha256::new();
    mgf1_xor(db, &mut mgf_digest, masked_seed);
    mgf1_xor(masked_seed, &mut mgf_digest, db);

    Ok(())
}

/// Decodes `em` in place and returns the offset of the message within it.
///
/// The structure checks run in constant time; the returned option is `None`
/// when any of them failed, without saying which one.
pub(crate) fn oaep_decode(em: &mut [u8]) -> Result<CtOption<usize>> {
    let k = em.len();
    if k < 11 || k < HASH_SIZE * 2 + 2 {
        return Err(Error::Decryption);
    }

    let expected_l_hash = Sha256::digest(b"");

    let first_byte_is_zero = em[0].ct_eq(&0u8);

    let (_, payload) = em.split_at_mut(1);
    let (seed, db) = payload.split_at_mut(HASH_SIZE);

    let mut mgf_digest = Sha256::new();
    mgf1_xor(seed, &mut mgf_digest, db);
    mgf1_xor(db, &mut mgf_digest, seed);

    let hash_are_equal = db[..HASH_SIZE].ct_eq(&expected_l_hash[..]);

    // The remainder of the plaintext must be zero or more 0x00, followed
    // by 0x01, followed by the message.
    //   looking_for_index: 1 if we are still looking for the 0x01
    //   index: the offset of the first 0x01 byte
    //   nonzero_before_one: 1 if we saw a non-zero byte before the 1
    let mut looking_for_index = Choice::from(1u8);
    let mut index = 0u32;
    let mut nonzero_before_one = Choice::from(0u8);

    for (i, el) in db.iter().skip(HASH_SIZE).enumerate() {
        let equals0 = el.ct_eq(&0u8);
        let equals1 = el.ct_eq(&1u8);
        index.conditional_assign(&(i as u32), looking_for_index & equals1);
        looking_for_index &= !equals1;
        nonzero_before_one |= looking_for_index & !equals0;
    }

    let valid = first_byte_is_zero & hash_are_equal & !nonzero_before_one & !looking_for_index;

    Ok(CtOption::new(index as usize + 2 + HASH_SIZE * 2, valid))
}
