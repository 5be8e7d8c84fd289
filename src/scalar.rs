//! Elliptic-curve private scalar derivation.
//!
//! Raw entropy `D` is mapped to `(D mod (order - 1)) + 1`, which always lies
//! in `[1, order - 1]`, so no rejection sampling is needed. The bias is
//! negligible when the entropy is at least 64 bits longer than the order.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use zeroize::Zeroizing;

use crate::buffer::{uint_from_buffer, uint_to_buffer, SecretOutput};
use crate::config::ByteOrder;
use crate::errors::{Error, Result};

/// Scalar width in bytes for NIST P-256.
pub const SCALAR_SIZE: usize = 32;

/// Group order of NIST P-256 minus one, big-endian.
pub const NISTP256_ORDER_MINUS_ONE: [u8; SCALAR_SIZE] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84, 0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63, 0x25, 0x50,
];

/// Derives a private scalar from `entropy` and writes it big-endian into
/// `out`.
///
/// `entropy` and `order_minus_one` are read in `byte_order`. Both
/// `order_minus_one` and `out` must be [`SCALAR_SIZE`] bytes. On any
/// failure `out` is zeroed.
///
/// # Example
/// ```
/// use enclave_rsa::scalar::{derive_scalar, NISTP256_ORDER_MINUS_ONE, SCALAR_SIZE};
/// use enclave_rsa::ByteOrder;
///
/// let mut scalar = [0u8; SCALAR_SIZE];
/// derive_scalar(&[0u8; 40], &NISTP256_ORDER_MINUS_ONE, ByteOrder::BigEndian, &mut scalar).unwrap();
///
/// let mut one = [0u8; SCALAR_SIZE];
/// one[SCALAR_SIZE - 1] = 1;
/// assert_eq!(scalar, one);
/// ```
pub fn derive_scalar(
    entropy: &[u8],
    order_minus_one: &[u8],
    byte_order: ByteOrder,
    out: &mut [u8],
) -> Result<()> {
    let mut out = SecretOutput::new(out);

    if entropy.is_empty() || order_minus_one.is_empty() {
        return Err(Error::InvalidBufferLength);
    }
    if order_minus_one.len() != SCALAR_SIZE || out.len() != SCALAR_SIZE {
        log::debug!(
            "rejecting scalar derivation: order {} bytes, output {} bytes",
            order_minus_one.len(),
            out.len()
        );
        return Err(Error::ScalarLength);
    }

    let modulus = uint_from_buffer(order_minus_one, byte_order)?;
    if modulus.is_zero() {
        return Err(Error::InvalidModulus);
    }

    let d = uint_from_buffer(entropy, byte_order)?;
    let reduced = Zeroizing::new(&*d % &*modulus);
    let scalar = Zeroizing::new(&*reduced + BigUint::one());

    uint_to_buffer(&scalar, &mut out, ByteOrder::BigEndian)?;
    out.commit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn derive(entropy: &[u8]) -> Result<[u8; SCALAR_SIZE]> {
        let mut out = [0u8; SCALAR_SIZE];
        derive_scalar(
            entropy,
            &NISTP256_ORDER_MINUS_ONE,
            ByteOrder::BigEndian,
            &mut out,
        )?;
        Ok(out)
    }

    fn be(value: &BigUint) -> [u8; SCALAR_SIZE] {
        let mut out = [0u8; SCALAR_SIZE];
        uint_to_buffer(value, &mut out, ByteOrder::BigEndian).unwrap();
        out
    }

    #[test]
    fn test_known_answers() {
        let entropy: Vec<u8> = (1..=40).collect();
        assert_eq!(
            derive(&entropy).unwrap(),
            hex!("0e101214070605041155b315cb1c6f28abec21cff529b6e3d4e248eb668b4769")
        );

        let mut order_le = NISTP256_ORDER_MINUS_ONE;
        order_le.reverse();
        let mut out = [0u8; SCALAR_SIZE];
        derive_scalar(&entropy, &order_le, ByteOrder::LittleEndian, &mut out).unwrap();
        assert_eq!(
            out,
            hex!("4442403dcfd0d1d3229d41b93ee9d08dda508d4e431f80a741da156b95484e22")
        );
    }

    #[test]
    fn test_boundaries() {
        let order_minus_one = BigUint::from_bytes_be(&NISTP256_ORDER_MINUS_ONE);
        let one = BigUint::one();

        assert_eq!(derive(&[0u8; 40]).unwrap(), be(&one));
        assert_eq!(derive(&[0u8]).unwrap(), be(&one));

        // order - 1 wraps to 1, order - 2 is the largest fixed point
        assert_eq!(derive(&NISTP256_ORDER_MINUS_ONE).unwrap(), be(&one));
        let below = &order_minus_one - &one;
        assert_eq!(derive(&be(&below)).unwrap(), be(&order_minus_one));

        // order wraps to 2
        let order = &order_minus_one + &one;
        assert_eq!(derive(&be(&order)).unwrap(), be(&BigUint::from(2u32)));

        let wide = BigUint::from_bytes_be(&derive(&[0xff; 64]).unwrap());
        assert!(wide >= one && wide <= order_minus_one);
    }

    #[test]
    fn test_failures_zero_output() {
        let mut out = [0xaau8; SCALAR_SIZE];
        assert_eq!(
            derive_scalar(&[1; 40], &[0xff; 31], ByteOrder::BigEndian, &mut out),
            Err(Error::ScalarLength)
        );
        assert_eq!(out, [0u8; SCALAR_SIZE]);

        let mut short = [0xaau8; 31];
        assert_eq!(
            derive_scalar(
                &[1; 40],
                &NISTP256_ORDER_MINUS_ONE,
                ByteOrder::BigEndian,
                &mut short
            ),
            Err(Error::ScalarLength)
        );
        assert_eq!(short, [0u8; 31]);

        out.fill(0xaa);
        assert_eq!(
            derive_scalar(&[1; 40], &[0; SCALAR_SIZE], ByteOrder::BigEndian, &mut out),
            Err(Error::InvalidModulus)
        );
        assert_eq!(out, [0u8; SCALAR_SIZE]);

        out.fill(0xaa);
        assert_eq!(
            derive_scalar(&[], &NISTP256_ORDER_MINUS_ONE, ByteOrder::BigEndian, &mut out),
            Err(Error::InvalidBufferLength)
        );
        assert_eq!(out, [0u8; SCALAR_SIZE]);
    }
}
