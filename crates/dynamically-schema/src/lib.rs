pub mod catalog;
pub mod error;
pub mod node;
pub mod scan;
pub mod types;
pub mod validate;

/// Maximum length for type, field, and namespace identifiers.
pub const MAX_IDENT_LEN: usize = 128;

use crate::error::ErrorTree;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        catalog::{Catalog, CatalogBuilder, TypeCatalog},
        err,
        error::ErrorTree,
        node::*,
        types::{Accessibility, Scalar, TypeKind},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("catalog json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog validation failed: {0}")]
    Validation(ErrorTree),

    #[error("call-site scan failed in {file}: {error}")]
    Scan { file: String, error: syn::Error },
}
