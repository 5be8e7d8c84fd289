//! Traits related to the key components

use num_bigint::BigUint;

/// Components of an RSA public key.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> &BigUint;

    /// Returns the modulus size in bytes. Ciphertexts for this public key
    /// will have the same size.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}

/// Components of an RSA private key.
///
/// A key holds either the plain exponent form (`d` present) or the CRT form
/// (`primes`, `dp`, `dq` and `qinv` present), never both.
pub trait PrivateKeyParts {
    /// Returns the modulus of the key. For CRT keys this is `p * q`.
    fn n(&self) -> &BigUint;

    /// Returns the modulus size in bytes.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }

    /// Returns the private exponent of an exponent-form key.
    fn d(&self) -> Option<&BigUint>;

    /// Returns the prime factors `(p, q)` of a CRT-form key.
    fn primes(&self) -> Option<(&BigUint, &BigUint)>;

    /// Returns the precomputed dp value, D mod (P-1)
    fn dp(&self) -> Option<&BigUint>;

    /// Returns the precomputed dq value, D mod (Q-1)
    fn dq(&self) -> Option<&BigUint>;

    /// Returns the precomputed qinv value, Q^-1 mod P
    fn qinv(&self) -> Option<&BigUint>;
}
