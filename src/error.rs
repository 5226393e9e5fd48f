use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum ReflowError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// A block manifest or translator response was not valid JSON
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    /// The HTTP client failed to reach the translator
    Http(#[from] reqwest::Error),

    #[error("translation failed (status {status}): {message}")]
    /// The translator answered with an error status
    Translation { status: u16, message: String },

    #[error("invalid configuration: {0}")]
    /// A configuration value could not be parsed
    Config(String),

    #[error("invalid font size {0}")]
    /// A font size was zero, negative, or not finite
    InvalidFontSize(f32),

    #[error("invalid block on page {page_index}: {reason}")]
    /// An extracted block violates the layout preconditions
    InvalidBlock { page_index: usize, reason: String },

    #[error("page {0} does not exist in the document")]
    /// A block referred to a page the document doesn't have
    PageMissing(usize),

    #[error("font `{0}` is not loaded")]
    /// A block referred to a font the document doesn't have
    FontMissing(String),
}

/// Shorthand for results carrying a [ReflowError]
pub type Result<T> = std::result::Result<T, ReflowError>;
