//! Generic RSA implementation

use num_bigint::{BigInt, BigUint, IntoBigUint, ModInverse, Sign};
use num_traits::{One, Zero};
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Error, Result};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Raw RSA encryption of m with the public key. No padding is performed.
#[inline]
pub(crate) fn rsa_encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> Result<BigUint> {
    if key.n().is_zero() {
        return Err(Error::InvalidModulus);
    }
    if m >= key.n() {
        return Err(Error::MessageTooLong);
    }

    Ok(m.modpow(key.e(), key.n()))
}

/// Performs raw RSA decryption with no padding.
///
/// CRT-form keys use Garner's recombination; exponent-form keys compute
/// `c^d mod n` directly. All intermediate values are wiped before returning.
#[inline]
pub(crate) fn rsa_decrypt(priv_key: &impl PrivateKeyParts, c: &BigUint) -> Result<BigUint> {
    if priv_key.n().is_zero() {
        return Err(Error::Decryption);
    }
    if c >= priv_key.n() {
        return Err(Error::Decryption);
    }

    match (
        priv_key.d(),
        priv_key.primes(),
        priv_key.dp(),
        priv_key.dq(),
        priv_key.qinv(),
    ) {
        (_, Some((p, q)), Some(dp), Some(dq), Some(qinv)) => {
            if p.is_zero() || q.is_zero() {
                return Err(Error::Decryption);
            }

            let m1 = Zeroizing::new(c.modpow(dp, p));
            let m2 = Zeroizing::new(c.modpow(dq, q));

            // h = qinv * (m1 - m2) mod p
            let m2p = Zeroizing::new(&*m2 % p);
            let diff = if *m1 >= *m2p {
                Zeroizing::new(&*m1 - &*m2p)
            } else {
                let lifted = Zeroizing::new(&*m1 + p);
                Zeroizing::new(&*lifted - &*m2p)
            };
            let prod = Zeroizing::new(&*diff * qinv);
            let h = Zeroizing::new(&*prod % p);
            let hq = Zeroizing::new(&*h * q);

            Ok(&*m2 + &*hq)
        }
        (Some(d), ..) => Ok(c.modpow(d, priv_key.n())),
        _ => Err(Error::Decryption),
    }
}

/// Computes the modulus `n = p * q`.
#[inline]
pub(crate) fn compute_modulus(p: &BigUint, q: &BigUint) -> BigUint {
    p * q
}

/// Computes `d = exp^-1 mod (p - 1)(q - 1)`.
///
/// Fails when `exp` is not invertible modulo the totient, i.e. when
/// `gcd(exp, (p - 1)(q - 1)) != 1`.
pub(crate) fn compute_private_exponent_euler_totient(
    p: &BigUint,
    q: &BigUint,
    exp: &BigUint,
) -> Result<BigUint> {
    if p.is_zero() || q.is_zero() {
        return Err(Error::InvalidPrime);
    }

    let p1 = Zeroizing::new(p - BigUint::one());
    let q1 = Zeroizing::new(q - BigUint::one());
    let totient = Zeroizing::new(&*p1 * &*q1);
    if totient.is_zero() {
        return Err(Error::InvalidPrime);
    }

    exp.mod_inverse(&*totient)
        .and_then(into_unsigned)
        .ok_or(Error::InvalidPrime)
}

/// Derives the CRT parameters `(d mod (p - 1), d mod (q - 1), q^-1 mod p)`.
pub(crate) fn compute_crt_params(
    d: &BigUint,
    p: &BigUint,
    q: &BigUint,
) -> Result<(BigUint, BigUint, BigUint)> {
    if p <= &BigUint::one() || q <= &BigUint::one() {
        return Err(Error::InvalidPrime);
    }

    let p1 = Zeroizing::new(p - BigUint::one());
    let q1 = Zeroizing::new(q - BigUint::one());
    let dp = d % &*p1;
    let dq = d % &*q1;
    let qinv = q
        .mod_inverse(p)
        .and_then(into_unsigned)
        .ok_or(Error::InvalidPrime)?;

    Ok((dp, dq, qinv))
}

/// Moves a modular inverse into a `BigUint` without copying its limbs.
/// A negative value is wiped and rejected.
fn into_unsigned(mut inverse: BigInt) -> Option<BigUint> {
    if inverse.sign() == Sign::Minus {
        inverse.zeroize();
        return None;
    }
    inverse.into_biguint()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{RsaPrivateKey, RsaPublicKey};
    use num_traits::FromPrimitive;

    fn uint(v: u64) -> BigUint {
        BigUint::from_u64(v).unwrap()
    }

    // p = 61, q = 53, n = 3233, e = 17, d = 2753
    fn toy_keys() -> (RsaPublicKey, RsaPrivateKey, RsaPrivateKey) {
        let public = RsaPublicKey::from_components(uint(3233), uint(17));
        let exponent = RsaPrivateKey::from_exponent_components(uint(3233), uint(2753));
        let (dp, dq, qinv) = compute_crt_params(&uint(2753), &uint(61), &uint(53)).unwrap();
        let crt = RsaPrivateKey::from_crt_components(uint(61), uint(53), dp, dq, qinv);
        (public, exponent, crt)
    }

    #[test]
    fn test_crt_params() {
        let (dp, dq, qinv) = compute_crt_params(&uint(2753), &uint(61), &uint(53)).unwrap();
        assert_eq!(dp, uint(53));
        assert_eq!(dq, uint(49));
        assert_eq!(qinv, uint(38));
    }

    #[test]
    fn test_private_exponent() {
        let d = compute_private_exponent_euler_totient(&uint(61), &uint(53), &uint(17)).unwrap();
        assert_eq!(d, uint(2753));

        // gcd(3, 60 * 52) != 1
        assert_eq!(
            compute_private_exponent_euler_totient(&uint(61), &uint(53), &uint(3)),
            Err(Error::InvalidPrime)
        );
    }

    #[test]
    fn test_into_unsigned() {
        assert_eq!(into_unsigned(BigInt::from(38)), Some(uint(38)));
        assert_eq!(into_unsigned(BigInt::from(0)), Some(uint(0)));
        assert_eq!(into_unsigned(BigInt::from(-38)), None);
    }

    #[test]
    fn test_encrypt_decrypt_both_forms() {
        let (public, exponent, crt) = toy_keys();
        assert_eq!(crt.n(), &uint(3233));

        for m in [0u64, 1, 2, 65, 1234, 3232] {
            let c = rsa_encrypt(&public, &uint(m)).unwrap();
            assert_eq!(rsa_decrypt(&exponent, &c).unwrap(), uint(m));
            assert_eq!(rsa_decrypt(&crt, &c).unwrap(), uint(m));
        }
    }

    #[test]
    fn test_out_of_range() {
        let (public, exponent, crt) = toy_keys();
        assert_eq!(rsa_encrypt(&public, &uint(3233)), Err(Error::MessageTooLong));
        assert_eq!(rsa_decrypt(&exponent, &uint(3233)), Err(Error::Decryption));
        assert_eq!(rsa_decrypt(&crt, &uint(4000)), Err(Error::Decryption));
    }
}
