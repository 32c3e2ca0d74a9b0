//! Core modules for the sound scheme override.
//!
//! Each install step lives in its own module and talks to the per-user
//! store only through the [`hive::KeyStore`] capability.

pub mod asset;
pub mod banner;
pub mod config;
pub mod error;
pub mod hive;
pub mod paths;
pub mod pipeline;
pub mod propagate;
#[cfg(windows)]
pub mod registry;
pub mod scheme;
