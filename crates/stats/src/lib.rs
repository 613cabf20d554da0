//! Aggregation over device and upgrade-event snapshots.
//!
//! Everything in this crate operates on collections that were already fetched
//! from the store. Nothing here performs I/O or reads the wall clock directly;
//! "now" comes from a [`clock::Clock`].

pub mod clock;
pub mod install;
pub mod led_range;
pub mod merge;
pub mod resolver;
pub mod running;
pub mod week;
