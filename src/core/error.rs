use thiserror::Error;

/// Errors that can abort a conversion or the setup of a renderer.
///
/// Translation misses and ledger persistence failures are deliberately
/// absent: the former fall back to the raw key, the latter are contained
/// inside the missing-key recorder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SzamlaError {
    /// The input is not well-formed XML.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// The template failed while evaluating the document.
    #[error("template error: {0}")]
    Template(String),

    /// A locale table resource could not be read or parsed.
    #[error("locale table error: {0}")]
    Locale(String),

    /// A settings or whitelist document could not be read or parsed.
    #[error("settings error: {0}")]
    Settings(String),
}

impl SzamlaError {
    /// Create a template error from anything printable.
    pub fn template(message: impl std::fmt::Display) -> Self {
        Self::Template(message.to_string())
    }
}
