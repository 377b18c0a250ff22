use roxmltree::Document;

/// A failure that stops validation before any tree walk happens.
///
/// These are the terminating errors: no reliable document tree exists, so
/// exactly one message is returned and no structural checks run.
#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
    #[error("Input markup is missing.")]
    Missing,

    #[error("Input markup cannot be only whitespace. Use <body></body> for empty content.")]
    WhitespaceOnly,

    #[error("Document is empty or lacks a root element. It must start with <body>.")]
    NoRoot,

    #[error("Markup is not well-formed: {0}")]
    Malformed(String),

    #[error("Root element must be <body>, but found <{0}>.")]
    WrongRoot(String),
}

/// Parse a markup string with strict XML semantics.
///
/// Whitespace-only input is rejected before the parser runs. The parser is
/// strict and case-sensitive, so mismatched or case-mangled tags come back
/// as [`ParseFailure::Malformed`] instead of being silently corrected the
/// way a lenient HTML parser would.
pub fn parse_markup(markup: &str) -> Result<Document<'_>, ParseFailure> {
    if markup.trim().is_empty() {
        return Err(ParseFailure::WhitespaceOnly);
    }

    Document::parse(markup).map_err(|error| match error {
        roxmltree::Error::NoRootNode => ParseFailure::NoRoot,
        other => ParseFailure::Malformed(other.to_string()),
    })
}
