use core::fmt;

use num_bigint::{prime::probably_prime, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRngCore, SeedableRng};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::algorithms::generate::generate_two_prime_key_with_exp;
use crate::algorithms::rsa::{compute_crt_params, compute_modulus, rsa_decrypt, rsa_encrypt};
use crate::buffer::{check_len, into_owned, uint_from_buffer, uint_to_buffer, SecretOutput};
use crate::config::{ByteOrder, Config};
use crate::errors::{Error, Result};
use crate::oaep::EncryptingKey;
use crate::traits::{EncryptingKeypair, PrivateKeyParts, PublicKeyParts};

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Modulus: product of prime numbers `p` and `q`
    n: BigUint,
    /// Public exponent: power to which a plaintext message is raised in
    /// order to encrypt it.
    e: BigUint,
}

/// Represents an RSA private key, in plain exponent form or in CRT form.
#[derive(Clone)]
pub struct RsaPrivateKey {
    /// Modulus. For CRT keys it is computed from the primes at construction.
    n: BigUint,
    form: PrivateForm,
}

#[derive(Clone)]
enum PrivateForm {
    Exponent {
        d: BigUint,
    },
    Crt {
        p: BigUint,
        q: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
    },
}

/// Representation used by an [`RsaPrivateKey`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum KeyForm {
    /// `(n, d)`, decrypts with a single exponentiation modulo `n`.
    Exponent,
    /// `(p, q, dmp1, dmq1, iqmp)`, decrypts with the Chinese remainder theorem.
    Crt,
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl RsaPublicKey {
    /// Create a new public key from its components.
    ///
    /// No mathematical checks are performed; see [`validate`] for that.
    pub fn from_components(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    /// Import a public key from fixed-length component buffers.
    pub fn import(n: &[u8], e: &[u8], order: ByteOrder) -> Result<Self> {
        if n.is_empty() || e.is_empty() {
            log::debug!(
                "rejecting public key import: n {} bytes, e {} bytes",
                n.len(),
                e.len()
            );
            return Err(Error::InvalidBufferLength);
        }

        let n = uint_from_buffer(n, order)?;
        let e = uint_from_buffer(e, order)?;

        Ok(Self::from_components(into_owned(n), into_owned(e)))
    }

    /// Wipe and release the key now rather than at the end of its scope.
    pub fn free(self) {
        drop(self)
    }
}

impl Zeroize for RsaPublicKey {
    fn zeroize(&mut self) {
        self.n.zeroize();
        self.e.zeroize();
    }
}

impl Drop for RsaPublicKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPublicKey {}

impl RsaPrivateKey {
    /// Constructs an exponent-form private key from `n` and `d`.
    pub fn from_exponent_components(n: BigUint, d: BigUint) -> Self {
        Self {
            n,
            form: PrivateForm::Exponent { d },
        }
    }

    /// Constructs a CRT-form private key. The modulus is taken to be `p * q`.
    ///
    /// No mathematical checks are performed; see [`validate`] for that.
    pub fn from_crt_components(
        p: BigUint,
        q: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
    ) -> Self {
        Self {
            n: compute_modulus(&p, &q),
            form: PrivateForm::Crt { p, q, dp, dq, qinv },
        }
    }

    /// Import an exponent-form private key from `n` and `d`.
    ///
    /// The public exponent buffer must be present but is not used.
    pub fn import_exponent(n: &[u8], e: &[u8], d: &[u8], order: ByteOrder) -> Result<Self> {
        if n.is_empty() || e.is_empty() || d.is_empty() {
            log::debug!(
                "rejecting private key import: n {} bytes, e {} bytes, d {} bytes",
                n.len(),
                e.len(),
                d.len()
            );
            return Err(Error::InvalidBufferLength);
        }

        let n = uint_from_buffer(n, order)?;
        let d = uint_from_buffer(d, order)?;

        Ok(Self::from_exponent_components(into_owned(n), into_owned(d)))
    }

    /// Import a CRT-form private key. All five buffers must have the same
    /// non-zero length, which is half the modulus length.
    pub fn import_crt(
        p: &[u8],
        q: &[u8],
        dmp1: &[u8],
        dmq1: &[u8],
        iqmp: &[u8],
        order: ByteOrder,
    ) -> Result<Self> {
        let half = p.len();
        for component in [p, q, dmp1, dmq1, iqmp] {
            if let Err(err) = check_len(component, half) {
                log::debug!("rejecting CRT key import: expected {half}-byte components");
                return Err(err);
            }
        }

        let p = uint_from_buffer(p, order)?;
        let q = uint_from_buffer(q, order)?;
        let dp = uint_from_buffer(dmp1, order)?;
        let dq = uint_from_buffer(dmq1, order)?;
        let qinv = uint_from_buffer(iqmp, order)?;

        Ok(Self::from_crt_components(
            into_owned(p),
            into_owned(q),
            into_owned(dp),
            into_owned(dq),
            into_owned(qinv),
        ))
    }

    /// Returns the representation of this key.
    pub fn form(&self) -> KeyForm {
        match self.form {
            PrivateForm::Exponent { .. } => KeyForm::Exponent,
            PrivateForm::Crt { .. } => KeyForm::Crt,
        }
    }

    /// Wipe and release the key now rather than at the end of its scope.
    pub fn free(self) {
        drop(self)
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn d(&self) -> Option<&BigUint> {
        match &self.form {
            PrivateForm::Exponent { d } => Some(d),
            PrivateForm::Crt { .. } => None,
        }
    }

    fn primes(&self) -> Option<(&BigUint, &BigUint)> {
        match &self.form {
            PrivateForm::Crt { p, q, .. } => Some((p, q)),
            PrivateForm::Exponent { .. } => None,
        }
    }

    fn dp(&self) -> Option<&BigUint> {
        match &self.form {
            PrivateForm::Crt { dp, .. } => Some(dp),
            PrivateForm::Exponent { .. } => None,
        }
    }

    fn dq(&self) -> Option<&BigUint> {
        match &self.form {
            PrivateForm::Crt { dq, .. } => Some(dq),
            PrivateForm::Exponent { .. } => None,
        }
    }

    fn qinv(&self) -> Option<&BigUint> {
        match &self.form {
            PrivateForm::Crt { qinv, .. } => Some(qinv),
            PrivateForm::Exponent { .. } => None,
        }
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("bits", &self.n.bits())
            .field("form", &self.form())
            .finish_non_exhaustive()
    }
}

impl Zeroize for PrivateForm {
    fn zeroize(&mut self) {
        match self {
            PrivateForm::Exponent { d } => d.zeroize(),
            PrivateForm::Crt { p, q, dp, dq, qinv } => {
                p.zeroize();
                q.zeroize();
                dp.zeroize();
                dq.zeroize();
                qinv.zeroize();
            }
        }
    }
}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        self.n.zeroize();
        self.form.zeroize();
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPrivateKey {}

/// Caller buffers receiving every component of a generated key pair.
///
/// `n` and `d` are the modulus length, `e` the exponent length, and the
/// five CRT buffers half the modulus length each.
pub struct KeyBuffers<'a> {
    /// Modulus.
    pub n: &'a mut [u8],
    /// Public exponent.
    pub e: &'a mut [u8],
    /// Private exponent.
    pub d: &'a mut [u8],
    /// First prime factor.
    pub p: &'a mut [u8],
    /// Second prime factor.
    pub q: &'a mut [u8],
    /// `d mod (p - 1)`
    pub dmp1: &'a mut [u8],
    /// `d mod (q - 1)`
    pub dmq1: &'a mut [u8],
    /// `q^-1 mod p`
    pub iqmp: &'a mut [u8],
}

impl KeyBuffers<'_> {
    fn check(&self, n_byte_size: usize) -> Result<()> {
        let half = n_byte_size / 2;
        check_len(&*self.n, n_byte_size)?;
        check_len(&*self.d, n_byte_size)?;
        if self.e.is_empty() {
            return Err(Error::InvalidBufferLength);
        }
        for component in [&*self.p, &*self.q, &*self.dmp1, &*self.dmq1, &*self.iqmp] {
            check_len(component, half)?;
        }
        Ok(())
    }
}

/// A freshly generated public key together with its CRT private key.
pub struct KeyPair {
    public: RsaPublicKey,
    private: RsaPrivateKey,
    d: Zeroizing<BigUint>,
}

impl KeyPair {
    /// Generate a new key pair with an `n_byte_size` modulus and the public
    /// exponent in `e`, which must be `e_byte_size` bytes in the configured
    /// byte order.
    ///
    /// The pair is checked with [`validate`] before it is returned; a pair
    /// that fails the check is discarded and [`Error::Validation`] returned.
    ///
    /// Randomness is taken from `rng` once, through its fallible interface,
    /// to seed the generator used for the prime search and the check. A
    /// failing source yields [`Error::Rng`].
    pub fn generate<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        config: &Config,
        n_byte_size: usize,
        e_byte_size: usize,
        e: &[u8],
    ) -> Result<Self> {
        Self::generate_checked(rng, config, n_byte_size, e_byte_size, e, validate::<ChaCha20Rng>)
    }

    /// [`KeyPair::generate`] with the final consistency check supplied by
    /// the caller.
    pub(crate) fn generate_checked<R, V>(
        rng: &mut R,
        config: &Config,
        n_byte_size: usize,
        e_byte_size: usize,
        e: &[u8],
        check: V,
    ) -> Result<Self>
    where
        R: CryptoRngCore + ?Sized,
        V: FnOnce(&mut ChaCha20Rng, &Config, &RsaPublicKey, &RsaPrivateKey) -> bool,
    {
        let bit_size = check_generation_args(n_byte_size, e_byte_size, e)?;

        let exp = uint_from_buffer(e, config.byte_order)?;
        if exp.is_even() || *exp <= BigUint::one() || exp.bits() >= bit_size {
            log::debug!("rejecting key generation: unusable public exponent");
            return Err(Error::InvalidExponent);
        }

        let mut rng = ChaCha20Rng::from_rng(rng)?;
        log::debug!("generating {bit_size}-bit RSA key pair");

        let components = generate_two_prime_key_with_exp(&mut rng, bit_size, &exp)?;
        let (dp, dq, qinv) = compute_crt_params(&components.d, &components.p, &components.q)?;
        let private = RsaPrivateKey::from_crt_components(
            into_owned(components.p),
            into_owned(components.q),
            dp,
            dq,
            qinv,
        );
        let public = RsaPublicKey::from_components(components.n, into_owned(exp));

        if !check(&mut rng, config, &public, &private) {
            log::warn!("generated {bit_size}-bit key pair failed validation");
            return Err(Error::Validation);
        }

        Ok(Self {
            public,
            private,
            d: components.d,
        })
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Returns the CRT private key.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    /// Returns the full private exponent.
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// Splits the pair into its public and private keys. The full private
    /// exponent is wiped.
    pub fn into_keys(self) -> (RsaPublicKey, RsaPrivateKey) {
        (self.public, self.private)
    }

    /// Writes every component into `out` using `order`.
    ///
    /// Buffer lengths are checked first; on a length mismatch nothing is
    /// written. If writing fails part way, every buffer is zeroed.
    pub fn write_components(&self, out: KeyBuffers<'_>, order: ByteOrder) -> Result<()> {
        out.check(self.public.size())?;

        let (p, q) = self.private.primes().ok_or(Error::InvalidPrime)?;
        let dp = self.private.dp().ok_or(Error::InvalidPrime)?;
        let dq = self.private.dq().ok_or(Error::InvalidPrime)?;
        let qinv = self.private.qinv().ok_or(Error::InvalidPrime)?;

        let mut n_out = SecretOutput::new(out.n);
        let mut e_out = SecretOutput::new(out.e);
        let mut d_out = SecretOutput::new(out.d);
        let mut p_out = SecretOutput::new(out.p);
        let mut q_out = SecretOutput::new(out.q);
        let mut dp_out = SecretOutput::new(out.dmp1);
        let mut dq_out = SecretOutput::new(out.dmq1);
        let mut qinv_out = SecretOutput::new(out.iqmp);

        uint_to_buffer(self.public.n(), &mut n_out, order)?;
        uint_to_buffer(self.public.e(), &mut e_out, order)?;
        uint_to_buffer(&self.d, &mut d_out, order)?;
        uint_to_buffer(p, &mut p_out, order)?;
        uint_to_buffer(q, &mut q_out, order)?;
        uint_to_buffer(dp, &mut dp_out, order)?;
        uint_to_buffer(dq, &mut dq_out, order)?;
        uint_to_buffer(qinv, &mut qinv_out, order)?;

        for out in [
            n_out, e_out, d_out, p_out, q_out, dp_out, dq_out, qinv_out,
        ] {
            out.commit();
        }
        Ok(())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &self.private)
            .finish_non_exhaustive()
    }
}

impl EncryptingKeypair for KeyPair {
    type EncryptingKey = EncryptingKey;

    fn encrypting_key(&self) -> EncryptingKey {
        EncryptingKey::new(self.public.clone())
    }
}

/// Generates a key pair and writes its components into `out`.
///
/// `out.e` carries the public exponent in and is rewritten with it on
/// success. All argument and buffer checks happen before any key material
/// is produced.
pub fn generate_into<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    config: &Config,
    n_byte_size: usize,
    e_byte_size: usize,
    out: KeyBuffers<'_>,
) -> Result<()> {
    generate_into_checked(rng, config, n_byte_size, e_byte_size, out, validate::<ChaCha20Rng>)
}

pub(crate) fn generate_into_checked<R, V>(
    rng: &mut R,
    config: &Config,
    n_byte_size: usize,
    e_byte_size: usize,
    out: KeyBuffers<'_>,
    check: V,
) -> Result<()>
where
    R: CryptoRngCore + ?Sized,
    V: FnOnce(&mut ChaCha20Rng, &Config, &RsaPublicKey, &RsaPrivateKey) -> bool,
{
    check_generation_args(n_byte_size, e_byte_size, &*out.e)?;
    out.check(n_byte_size)?;

    let pair = KeyPair::generate_checked(rng, config, n_byte_size, e_byte_size, &*out.e, check)?;
    pair.write_components(out, config.byte_order)
}

/// Returns the modulus bit size for valid generation arguments.
fn check_generation_args(n_byte_size: usize, e_byte_size: usize, e: &[u8]) -> Result<usize> {
    if n_byte_size == 0 || n_byte_size % 2 != 0 {
        log::debug!("rejecting key generation: modulus size {n_byte_size} bytes");
        return Err(Error::InvalidModulusSize);
    }
    if e_byte_size == 0 {
        log::debug!("rejecting key generation: empty exponent");
        return Err(Error::InvalidExponentSize);
    }
    check_len(e, e_byte_size)?;

    n_byte_size
        .checked_mul(8)
        .ok_or(Error::InvalidModulusSize)
}

/// Checks that `public` and `private` form a consistent key pair.
///
/// For CRT keys the primes are tested with `config.validation_rounds`
/// Miller-Rabin rounds and every CRT parameter is checked against its
/// definition. For both forms, `config.validation_rounds` random values are
/// encrypted and decrypted. Any failure, including an arithmetic error or
/// a failing random source, yields `false`.
pub fn validate<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    config: &Config,
    public: &RsaPublicKey,
    private: &RsaPrivateKey,
) -> bool {
    match check_pair(rng, config.validation_rounds, public, private) {
        Ok(()) => true,
        Err(err) => {
            log::debug!("key validation failed: {err}");
            false
        }
    }
}

fn check_pair<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    rounds: usize,
    public: &RsaPublicKey,
    private: &RsaPrivateKey,
) -> Result<()> {
    let rounds = rounds.max(1);
    let mut rng = ChaCha20Rng::from_rng(rng)?;
    let n = PublicKeyParts::n(public);
    let e = public.e();

    if n.is_zero() || n != PrivateKeyParts::n(private) {
        return Err(Error::InvalidModulus);
    }
    if e <= &BigUint::one() || e.is_even() || e >= n {
        return Err(Error::InvalidExponent);
    }

    if let PrivateForm::Crt { p, q, dp, dq, qinv } = &private.form {
        check_crt(rounds, e, p, q, dp, dq, qinv)?;
    }

    for _ in 0..rounds {
        let m = Zeroizing::new(rng.gen_biguint_below(n));
        let c = rsa_encrypt(public, &m)?;
        let recovered = Zeroizing::new(rsa_decrypt(private, &c)?);
        if *recovered != *m {
            return Err(Error::Validation);
        }
    }

    Ok(())
}

fn check_crt(
    rounds: usize,
    e: &BigUint,
    p: &BigUint,
    q: &BigUint,
    dp: &BigUint,
    dq: &BigUint,
    qinv: &BigUint,
) -> Result<()> {
    let one = BigUint::one();

    if p <= &one || q <= &one || p == q {
        return Err(Error::InvalidPrime);
    }
    if !probably_prime(p, rounds) || !probably_prime(q, rounds) {
        return Err(Error::InvalidPrime);
    }

    let p1 = Zeroizing::new(p - &one);
    let q1 = Zeroizing::new(q - &one);
    if dp >= &*p1 || dq >= &*q1 || qinv >= p {
        return Err(Error::Validation);
    }

    let edp = Zeroizing::new(e * dp);
    let edq = Zeroizing::new(e * dq);
    let qqinv = Zeroizing::new(q * qinv);
    let dp_check = Zeroizing::new(&*edp % &*p1);
    let dq_check = Zeroizing::new(&*edq % &*q1);
    let qinv_check = Zeroizing::new(&*qqinv % p);
    if !dp_check.is_one() || !dq_check.is_one() || !qinv_check.is_one() {
        return Err(Error::Validation);
    }

    Ok(())
}
