//! Generate prime components for the RSA Private Key

use num_bigint::{BigUint, RandPrime};
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::{
    algorithms::rsa::{compute_modulus, compute_private_exponent_euler_totient},
    errors::{Error, Result},
};

/// Upper bound on prime pairs drawn for one key.
const MAX_ATTEMPTS: usize = 1000;

/// Raw output of the prime search. The secret parts are wiped on drop.
pub(crate) struct RsaPrivateKeyComponents {
    pub n: BigUint,
    pub d: Zeroizing<BigUint>,
    pub p: Zeroizing<BigUint>,
    pub q: Zeroizing<BigUint>,
}

/// Generates a two-prime RSA key of exactly `bit_size` bits for the public
/// exponent `exp`.
///
/// Primes are drawn with their top two bits set, so the product of a
/// `bit_size / 2` prime and a `bit_size - bits(p)` prime always has the full
/// length. Pairs are redrawn until `p != q` and `exp` is invertible modulo
/// `(p - 1)(q - 1)`, at most [`MAX_ATTEMPTS`] times.
pub(crate) fn generate_two_prime_key_with_exp<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
) -> Result<RsaPrivateKeyComponents> {
    const NPRIMES: usize = 2;

    if bit_size < 64 {
        let prime_limit = (1u64 << (bit_size / NPRIMES) as u64) as f64;

        // pi approximates the number of primes less than prime_limit

        // Calculate `log(prime_limit)` as `log(x) = log2(x) / log2(e) = log2(x) * log(2)`.
        let mut pi =
            prime_limit / ((bit_size / NPRIMES) as f64 * core::f64::consts::LN_2 - 1.);

        // Generated primes start with 0b11, so we can only use a quarter of them.
        pi /= 4f64;
        // Use a factor of two to ensure that key generation terminates in a
        // reasonable amount of time.
        pi /= 2f64;

        if pi < NPRIMES as f64 {
            return Err(Error::TooFewPrimes);
        }
    }

    for attempts in 1..=MAX_ATTEMPTS {
        let p = Zeroizing::new(rng.gen_prime(bit_size / NPRIMES));
        let q = Zeroizing::new(rng.gen_prime(bit_size - p.bits()));

        if *p == *q {
            continue;
        }

        let n = compute_modulus(&p, &q);
        if n.bits() != bit_size {
            // This should never happen because gen_prime sets the top two
            // bits in each prime.
            continue;
        }

        if let Ok(d) = compute_private_exponent_euler_totient(&p, &q, exp) {
            log::trace!("found {bit_size}-bit modulus after {attempts} prime pair(s)");
            return Ok(RsaPrivateKeyComponents {
                n,
                d: Zeroizing::new(d),
                p,
                q,
            });
        }
    }

    log::debug!("no usable {bit_size}-bit prime pair after {MAX_ATTEMPTS} attempts");
    Err(Error::PrimeSearch)
}
