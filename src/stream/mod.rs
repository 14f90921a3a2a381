//! Stream resolution for cinemaos
//!
//! A provider turns a resolved identity into playable stream descriptors.
//! `sources` holds the provider-independent normalization of decrypted
//! source trees.

pub mod provider;
pub mod providers;
pub mod sources;

pub use provider::{RequestHeaders, StreamDescriptor, StreamProvider, TransportHint};
pub use sources::{normalize, quality_from_label, try_normalize, SourceEntry};
