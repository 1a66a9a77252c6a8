//! Contract Logic for Blood Donor Match Admission
//!
//! This crate implements the contract layer of the donor match registry:
//! validating proposed donor-to-need matches, charging the match fee to the
//! authority, and indexing matches by donor and by need.
//!
//! # Modules
//! - `config`: Registry tunables and fixed admission limits
//! - `errors`: Contract-level error types
//! - `events`: Registry events
//! - `security`: One-time authority gate
//! - `transfer`: Fee transfer port and in-memory ledger
//! - `registry`: Match admission pipeline, indices and status updates
//! - `shared`: Lock-serialized handle for concurrent hosts
//!
//! # Version
//! v0.1.0 — initial implementation

pub mod config;
pub mod errors;
pub mod events;
pub mod security;
pub mod transfer;
pub mod registry;
pub mod shared;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
