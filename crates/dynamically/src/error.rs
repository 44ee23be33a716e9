use thiserror::Error as ThisError;

///
/// Error
///
/// Raised by generated factories while reading an untyped value. Nested
/// failures keep their path: `Field` and `Element` wrap the inner error, so
/// the rendered message reads outermost first.
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("[{index}]: {error}")]
    Element { index: usize, error: Box<Self> },

    #[error("expected an array, found {found}")]
    ExpectedArray { found: &'static str },

    #[error("expected an object, found {found}")]
    ExpectedObject { found: &'static str },

    #[error("{field}: {error}")]
    Field { field: String, error: Box<Self> },

    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("missing field '{field}'")]
    MissingField { field: String },
}

impl Error {
    /// Innermost error, past every `Field`/`Element` wrapper.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Element { error, .. } | Self::Field { error, .. } => error.root(),
            _ => self,
        }
    }

    /// Field names and indexes leading to the failure, outermost first.
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = String::new();
        let mut current = self;

        loop {
            match current {
                Self::Field { field, error } => {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(field);
                    current = error;
                }
                Self::Element { index, error } => {
                    path.push_str(&format!("[{index}]"));
                    current = error;
                }
                Self::InvalidField { field, .. } | Self::MissingField { field } => {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(field);
                    return path;
                }
                Self::ExpectedArray { .. } | Self::ExpectedObject { .. } => return path,
            }
        }
    }
}
