mod location;
mod module;
mod type_def;
mod type_id;
mod type_ref;

pub use location::*;
pub use module::*;
pub use type_def::*;
pub use type_id::*;
pub use type_ref::*;
