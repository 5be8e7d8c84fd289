//! Operation parameters.

/// Default number of primality and round-trip probes used by key validation.
pub const DEFAULT_VALIDATION_ROUNDS: usize = 10;

/// Byte order of multi-precision values exchanged through caller buffers.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first.
    #[default]
    BigEndian,
    /// Least significant byte first. This is the native word order of
    /// engines that store integers as little-endian 32-bit limbs.
    LittleEndian,
}

/// Parameters shared by key generation, import and validation.
///
/// ```
/// use enclave_rsa::{ByteOrder, Config};
///
/// let config = Config::default()
///     .with_byte_order(ByteOrder::LittleEndian)
///     .with_validation_rounds(20);
/// assert_eq!(config.validation_rounds, 20);
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Config {
    /// Byte order of every component buffer.
    pub byte_order: ByteOrder,

    /// Miller-Rabin rounds per prime, and number of random encrypt/decrypt
    /// probes, performed by [`validate`](crate::validate).
    pub validation_rounds: usize,
}

impl Config {
    /// Returns a copy using `byte_order` for component buffers.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Returns a copy performing `rounds` validation probes.
    pub fn with_validation_rounds(mut self, rounds: usize) -> Self {
        self.validation_rounds = rounds;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::default(),
            validation_rounds: DEFAULT_VALIDATION_ROUNDS,
        }
    }
}
