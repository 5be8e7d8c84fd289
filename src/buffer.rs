//! Fixed-length component buffers.
//!
//! Multi-precision values cross the crate boundary as byte buffers whose
//! length is declared up front. Everything read from or written to such a
//! buffer passes through here, so the zeroization rules live in one place:
//!
//! - integers built from caller bytes come back as [`Zeroizing`] values;
//! - serialization goes through zeroizing temporaries;
//! - outputs are written through [`SecretOutput`], which wipes the caller's
//!   buffer unless the whole operation succeeded.

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use num_bigint::BigUint;
use zeroize::{Zeroize, Zeroizing};

use crate::config::ByteOrder;
use crate::errors::{Error, Result};

/// Checks that `buf` has exactly the declared non-zero `len`.
#[inline]
pub(crate) fn check_len(buf: &[u8], len: usize) -> Result<()> {
    if len == 0 || buf.len() != len {
        return Err(Error::InvalidBufferLength);
    }
    Ok(())
}

/// Reads an unsigned integer from a non-empty buffer.
pub(crate) fn uint_from_buffer(buf: &[u8], order: ByteOrder) -> Result<Zeroizing<BigUint>> {
    if buf.is_empty() {
        return Err(Error::InvalidBufferLength);
    }

    let value = match order {
        ByteOrder::BigEndian => BigUint::from_bytes_be(buf),
        ByteOrder::LittleEndian => BigUint::from_bytes_le(buf),
    };
    Ok(Zeroizing::new(value))
}

/// Moves an integer out of its wrapper into a key object, which then owns
/// the wipe.
#[inline]
pub(crate) fn into_owned(mut value: Zeroizing<BigUint>) -> BigUint {
    core::mem::take(&mut *value)
}

/// Writes `value` into the whole of `out`, zero padded at the most
/// significant end. Nothing is written if the value does not fit.
pub(crate) fn uint_to_buffer(value: &BigUint, out: &mut [u8], order: ByteOrder) -> Result<()> {
    let bytes = Zeroizing::new(match order {
        ByteOrder::BigEndian => value.to_bytes_be(),
        ByteOrder::LittleEndian => value.to_bytes_le(),
    });

    // `to_bytes_*` yields a single zero byte for zero.
    let len = if value.bits() == 0 { 0 } else { bytes.len() };
    if len > out.len() {
        return Err(Error::ValueTooLarge);
    }

    match order {
        ByteOrder::BigEndian => {
            let pad = out.len() - len;
            out[..pad].fill(0);
            out[pad..].copy_from_slice(&bytes[..len]);
        }
        ByteOrder::LittleEndian => {
            out[..len].copy_from_slice(&bytes[..len]);
            out[len..].fill(0);
        }
    }
    Ok(())
}

/// Allocates a zero-filled scratch buffer of `len` bytes.
///
/// The buffer is wiped when dropped. Allocation failure is reported instead
/// of aborting.
pub(crate) fn allocate_scratch(len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let mut scratch = Vec::new();
    scratch.try_reserve_exact(len)?;
    scratch.resize(len, 0);
    Ok(Zeroizing::new(scratch))
}

/// Caller output buffer that is wiped on drop unless [`commit`]ted.
///
/// [`commit`]: SecretOutput::commit
pub(crate) struct SecretOutput<'a> {
    buf: &'a mut [u8],
    armed: bool,
}

impl<'a> SecretOutput<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, armed: true }
    }

    /// Keeps the written contents.
    pub(crate) fn commit(mut self) {
        self.armed = false;
    }
}

impl Deref for SecretOutput<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &*self.buf
    }
}

impl DerefMut for SecretOutput<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut *self.buf
    }
}

impl Drop for SecretOutput<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.buf.zeroize();
        }
    }
}
