#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Usage
//!
//! ## Generating and exporting a key pair
//!
//! Every multi-precision value enters and leaves the crate as a fixed-length
//! byte buffer. [`generate_into`] takes the public exponent from `e` and
//! fills in the other components:
//!
//! ```
//! use enclave_rsa::{generate_into, Config, KeyBuffers};
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//! let config = Config::default();
//!
//! let (mut n, mut d) = ([0u8; 128], [0u8; 128]);
//! let mut e = [0x01, 0x00, 0x01];
//! let (mut p, mut q) = ([0u8; 64], [0u8; 64]);
//! let (mut dmp1, mut dmq1, mut iqmp) = ([0u8; 64], [0u8; 64], [0u8; 64]);
//!
//! generate_into(
//!     &mut rng,
//!     &config,
//!     128,
//!     3,
//!     KeyBuffers {
//!         n: &mut n,
//!         e: &mut e,
//!         d: &mut d,
//!         p: &mut p,
//!         q: &mut q,
//!         dmp1: &mut dmp1,
//!         dmq1: &mut dmq1,
//!         iqmp: &mut iqmp,
//!     },
//! )
//! .expect("failed to generate a key");
//! assert_eq!(e, [0x01, 0x00, 0x01]);
//! ```
//!
//! ## Importing keys and OAEP encryption
//!
//! ```
//! use enclave_rsa::{oaep, validate, Config, KeyPair};
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//! let config = Config::default();
//! let pair = KeyPair::generate(&mut rng, &config, 128, 3, &[1, 0, 1]).unwrap();
//!
//! let public_key = pair.public_key().clone();
//! let private_key = pair.private_key().clone();
//! assert!(validate(&mut rng, &config, &public_key, &private_key));
//!
//! // Encrypt
//! let data = b"hello world";
//! let enc_data = oaep::encrypt(&mut rng, &public_key, &data[..]).expect("failed to encrypt");
//! assert_eq!(enc_data.len(), 128);
//!
//! // Decrypt
//! let dec_data = oaep::decrypt(&private_key, &enc_data).expect("failed to decrypt");
//! assert_eq!(&data[..], &dec_data[..]);
//! ```
//!
//! ## Deriving an EC private scalar
//!
//! See [`scalar::derive_scalar`].

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use num_bigint::BigUint;
pub use rand_core;

mod algorithms;
mod buffer;
#[cfg(test)]
mod failing_rng;
pub mod config;
pub mod errors;
pub mod oaep;
pub mod scalar;
pub mod traits;

mod key;

pub use crate::{
    config::{ByteOrder, Config},
    errors::{Error, ErrorKind, Result, Status},
    key::{generate_into, validate, KeyBuffers, KeyForm, KeyPair, RsaPrivateKey, RsaPublicKey},
};
