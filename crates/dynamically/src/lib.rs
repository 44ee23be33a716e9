//! ## Crate layout
//! - `build`: the factory generator and its `build!` build-script helper.
//! - `schema`: the type catalog the generator reads.
//! - `Error`/`Value`: what generated factories take and return.
//!
//! Generated code only names items through `::dynamically::`, so a crate
//! using the factories needs this crate as both a dependency and a
//! build-dependency and nothing else.

pub use dynamically_build as build;
pub use dynamically_schema as schema;

mod error;

#[doc(hidden)]
pub mod __private;

pub use error::Error;
pub use serde_json::Value;

//
// Macros
//

pub use dynamically_build::build;
