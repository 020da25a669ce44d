//! Configuration loader and schema types.
//!
//! Settings drive the policy knobs of the album pipeline (cursor coupling,
//! slice overrun, encoder invocation, naming collisions). Everything has a
//! default, so a missing config file is never an error.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;
