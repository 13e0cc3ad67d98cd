//! Shared foundational types used across the Aion FPGA toolchain.
//!
//! This crate provides core types including interned identifiers, content hashing,
//! frequency values, 4-state logic values, packed logic vectors, and common result types.

#![warn(missing_docs)]

pub mod checksum;
pub mod frequency;
pub mod hash;
pub mod ident;
pub mod logic;
pub mod logic_vec;
pub mod place_strength;
pub mod property;
pub mod result;
pub mod rng;
pub mod yielding;

pub use checksum::Checksum;
pub use frequency::{Frequency, ParseFrequencyError};
pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use logic::Logic;
pub use logic_vec::LogicVec;
pub use place_strength::PlaceStrength;
pub use property::{Property, Tri};
pub use result::{AionResult, InternalError};
pub use rng::DeterministicRng;
pub use yielding::{NoopYield, Yield};
