//! Diagnostics reported while reading untrusted headers.
//!
//! Parsing and extraction never fail loudly. Instead they return `None` and tell a
//! [`DiagnosticSink`] what went wrong, so the caller decides where those reports go.

use std::fmt::{self, Display, Formatter};

/// Something noteworthy found while parsing a header or reading its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Input was absent or blank
    EmptyHeader,
    /// Header bytes that are not visible ASCII
    InvalidEncoding,
    /// Input does not start with `Digest` followed by whitespace
    MissingScheme,
    /// A parameter name of zero length at the given char offset
    EmptyName(usize),
    /// Parameter name not followed by `=`
    MissingEquals { name: String, at: usize },
    /// A bare token value of zero length
    EmptyValue { name: String, at: usize },
    /// Quoted string reached the end of input without a closing quote
    UnterminatedQuote { name: String, at: usize },
    /// Quoted string contains a character that can't appear in quoted text
    BadQuotedChar { name: String, at: usize, found: char },
    /// Something other than `,` after a parameter
    ExpectedComma { at: usize, found: char },
    /// Nothing after a trailing comma
    TrailingComma,
    /// A required parameter is missing from the map
    MissingParam(&'static str),
    /// A parameter this crate does not interpret
    UnexpectedParam(String),
    /// A parameter whose value is not supported
    UnsupportedValue { name: &'static str, value: String },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Diagnostic::*;
        match self {
            EmptyHeader => write!(f, "empty header"),
            InvalidEncoding => write!(f, "header is not visible ASCII"),
            MissingScheme => write!(f, "header does not start with \"Digest \""),
            EmptyName(at) => write!(f, "expected parameter name at {}", at),
            MissingEquals { name, at } => write!(f, "expected '=' after \"{}\" at {}", name, at),
            EmptyValue { name, at } => write!(f, "empty value for \"{}\" at {}", name, at),
            UnterminatedQuote { name, at } => {
                write!(f, "unterminated quoted value for \"{}\" starting at {}", name, at)
            }
            BadQuotedChar { name, at, found } => write!(
                f,
                "illegal character {:?} in quoted value for \"{}\" at {}",
                found, name, at
            ),
            ExpectedComma { at, found } => write!(f, "expected ',' at {}, found {:?}", at, found),
            TrailingComma => write!(f, "trailing comma"),
            MissingParam(name) => write!(f, "missing \"{}\" parameter", name),
            UnexpectedParam(name) => write!(f, "unexpected parameter \"{}\"", name),
            UnsupportedValue { name, value } => {
                write!(f, "unsupported {} value \"{}\"", name, value)
            }
        }
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("digest auth: {}", diagnostic);
    }
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&mut self, _: Diagnostic) {}
}

/// Collects diagnostics, handy for inspecting them after the fact
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects() {
        let mut diags: Vec<Diagnostic> = Vec::new();
        let mut sink = &mut diags;
        DiagnosticSink::report(&mut sink, Diagnostic::TrailingComma);
        diags.report(Diagnostic::MissingParam("nonce"));
        assert_eq!(
            diags,
            vec![Diagnostic::TrailingComma, Diagnostic::MissingParam("nonce")]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Diagnostic::MissingEquals {
                name: "realm".into(),
                at: 12
            }
            .to_string(),
            "expected '=' after \"realm\" at 12"
        );
        assert_eq!(
            Diagnostic::UnexpectedParam("charset".into()).to_string(),
            "unexpected parameter \"charset\""
        );
    }
}
