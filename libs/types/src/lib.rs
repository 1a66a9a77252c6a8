//! Types library for the blood donor match registry
//!
//! This library provides the shared vocabulary of the registry: identities,
//! blood types with their compatibility relation, and the error taxonomy.
//!
//! # Version
//! v1.0.0 - Frozen error codes
//!
//! # Modules
//! - `ids`: Identifiers (AccountId, MatchId, NeedId)
//! - `blood`: ABO/Rh blood types and donation compatibility
//! - `errors`: Error taxonomy with stable codes

// Public modules
pub mod ids;
pub mod blood;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::blood::*;
    pub use crate::errors::*;
}
