//! Error types.

use alloc::collections::TryReserveError;
use core::fmt;

/// Alias for [`core::result::Result`] with the `enclave-rsa` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
///
/// The `Display` output of every variant is fixed text; none of them carry
/// key material or values derived from it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Modulus byte size is zero or odd.
    InvalidModulusSize,

    /// Exponent byte size is zero.
    InvalidExponentSize,

    /// Public exponent is even, or not greater than one.
    InvalidExponent,

    /// A caller buffer does not have the length declared for it.
    InvalidBufferLength,

    /// Plaintext is empty or reaches the large-buffer sentinel.
    InvalidMessageLength,

    /// Too few primes of the requested length exist to build a key.
    TooFewPrimes,

    /// No usable prime pair was found within the attempt limit.
    PrimeSearch,

    /// Allocation of a secret working buffer failed.
    Allocation,

    /// The random source reported a failure.
    Rng,

    /// Message too long for the modulus.
    MessageTooLong,

    /// Decryption failed.
    Decryption,

    /// A value does not fit in its fixed-length output buffer.
    ValueTooLarge,

    /// Modulus or reduction base is zero.
    InvalidModulus,

    /// No private exponent exists for the chosen primes and exponent.
    InvalidPrime,

    /// Scalar width does not match the curve scalar size.
    ScalarLength,

    /// Generated key pair failed the consistency check.
    Validation,
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Caller contract violation, detected before any allocation.
    InvalidArgument,
    /// A secret working buffer could not be allocated.
    Allocation,
    /// An arithmetic, prime, random or hash primitive failed.
    Engine,
    /// A generated pair did not pass validation.
    Validation,
}

/// Status reported at the crate boundary.
///
/// Everything other than a caller mistake folds into [`Status::Unexpected`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Status {
    /// Operation completed.
    Success,
    /// Bad size or missing buffer.
    InvalidParameter,
    /// Allocation, engine or validation failure.
    Unexpected,
}

impl Error {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidModulusSize
            | Error::InvalidExponentSize
            | Error::InvalidExponent
            | Error::InvalidBufferLength
            | Error::InvalidMessageLength
            | Error::TooFewPrimes => ErrorKind::InvalidArgument,
            Error::Allocation => ErrorKind::Allocation,
            Error::Validation => ErrorKind::Validation,
            Error::Rng
            | Error::MessageTooLong
            | Error::Decryption
            | Error::ValueTooLarge
            | Error::InvalidModulus
            | Error::InvalidPrime
            | Error::PrimeSearch
            | Error::ScalarLength => ErrorKind::Engine,
        }
    }

    /// Returns the boundary status for this error.
    pub fn status(&self) -> Status {
        match self.kind() {
            ErrorKind::InvalidArgument => Status::InvalidParameter,
            _ => Status::Unexpected,
        }
    }
}

impl Status {
    /// Projects an operation result onto its boundary status.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(err) => err.status(),
        }
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        Status::of(result)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidModulusSize => write!(f, "invalid modulus size"),
            Error::InvalidExponentSize => write!(f, "invalid exponent size"),
            Error::InvalidExponent => write!(f, "invalid exponent"),
            Error::InvalidBufferLength => write!(f, "invalid buffer length"),
            Error::InvalidMessageLength => write!(f, "invalid message length"),
            Error::TooFewPrimes => {
                write!(f, "too few primes of given length to generate an RSA key")
            }
            Error::PrimeSearch => write!(f, "no usable prime pair found"),
            Error::Allocation => write!(f, "allocation failure"),
            Error::Rng => write!(f, "random source failure"),
            Error::MessageTooLong => write!(f, "message too long"),
            Error::Decryption => write!(f, "decryption error"),
            Error::ValueTooLarge => write!(f, "value too large for buffer"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::ScalarLength => write!(f, "scalar length mismatch"),
            Error::Validation => write!(f, "key validation failed"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::InvalidParameter => write!(f, "invalid parameter"),
            Status::Unexpected => write!(f, "unexpected error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<rand_core::Error> for Error {
    fn from(_err: rand_core::Error) -> Error {
        Error::Rng
    }
}

impl From<TryReserveError> for Error {
    fn from(_err: TryReserveError) -> Error {
        Error::Allocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_status() {
        assert_eq!(Error::InvalidBufferLength.status(), Status::InvalidParameter);
        assert_eq!(Error::TooFewPrimes.status(), Status::InvalidParameter);
        assert_eq!(Error::Allocation.status(), Status::Unexpected);
        assert_eq!(Error::Decryption.status(), Status::Unexpected);
        assert_eq!(Error::Validation.status(), Status::Unexpected);

        let ok: Result<()> = Ok(());
        assert_eq!(Status::of(&ok), Status::Success);
        let err: Result<()> = Err(Error::ScalarLength);
        assert_eq!(Status::from(&err), Status::Unexpected);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::Rng.kind(), ErrorKind::Engine);
        assert_eq!(Error::PrimeSearch.kind(), ErrorKind::Engine);
        assert_eq!(Error::PrimeSearch.status(), Status::Unexpected);
        assert_eq!(Error::Validation.kind(), ErrorKind::Validation);
        assert_eq!(Error::Allocation.kind(), ErrorKind::Allocation);
        assert_eq!(Error::InvalidExponent.kind(), ErrorKind::InvalidArgument);
    }
}
