use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Placeholder used in error messages for a descriptor without a name.
pub const UNNAMED: &str = "<unnamed>";

/// Errors that abort a generation run. None of them leave partial output behind.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("method `{method}` declares {count} parameters, the limit is {max}")]
    ArityExceeded {
        method: String,
        count: usize,
        max: usize,
    },

    #[error("malformed method descriptor #{index} (`{method}`): {reason}")]
    MalformedDescriptor {
        index: usize,
        method: String,
        reason: String,
    },

    #[error("template failed for method `{method}`: {source}")]
    Template {
        method: String,
        #[source]
        source: anyhow::Error,
    },
}

impl GenerateError {
    /// Name of the method the error is about.
    pub fn method(&self) -> &str {
        match self {
            Self::ArityExceeded { method, .. } => method,
            Self::MalformedDescriptor { method, .. } => method,
            Self::Template { method, .. } => method,
        }
    }
}
