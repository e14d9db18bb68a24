// src/lib.rs

//! Modsync
//!
//! Keeps a directory of mod archives deduplicated and up to date against a
//! remote catalog API.
//!
//! # Architecture
//!
//! - Local inventory: scan the mods directory, read embedded metadata,
//!   collapse duplicate copies of the same mod to the highest version
//! - Remote catalog: search + detail lookup with tolerant response parsing
//! - Reconciliation: per-mod decision (not found / up-to-date / no file /
//!   update), with atomic download-and-replace so the directory is never
//!   left without a valid copy of a mod

pub mod catalog;
pub mod config;
pub mod descriptor;
mod error;
pub mod inventory;
pub mod reconcile;
pub mod report;
pub mod version;

pub use error::{Error, Result};
