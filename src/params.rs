//! `Digest` header parameter parsing.
//!
//! The grammar is the RFC 2617 `auth-param` list:
//!
//! ```text
//! header  = "Digest" 1*LWS param *( *LWS "," *LWS param )
//! param   = token *LWS "=" *LWS ( token | quoted-string )
//! LWS     = SP | HT
//! ```
//!
//! Quoted strings are taken verbatim, there is no backslash escaping.

use crate::diag::{Diagnostic, Diagnostic::*, DiagnosticSink};
use indexmap::IndexMap;

const SCHEME: &str = "Digest";

/// RFC 2616 separators, including SP and HT
const SEPARATORS: &str = "()<>@,;:\\\"/[]?={} \t";

/// Parameter name to value, in order of first appearance.
///
/// Inserting a name that is already present replaces its value but keeps its position.
/// Two maps are equal only if their entries are in the same order.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    entries: IndexMap<String, String>,
}

impl PartialEq for ParamMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for ParamMap {}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the previous value if the name was already present
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for ParamMap {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn is_lws(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_token_char(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control() && !SEPARATORS.contains(c)
}

fn is_quoted_text(c: char) -> bool {
    c != '"' && (c == '\t' || !c.is_control())
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    /// chars consumed before `chars[0]`, for diagnostics
    base: usize,
}

impl Cursor {
    fn at(&self) -> usize {
        self.base + self.pos
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn skip_lws(&mut self) {
        while matches!(self.peek(), Some(c) if is_lws(c)) {
            self.pos += 1;
        }
    }

    /// Quoted string; the cursor is on the opening quote
    fn quoted(&mut self, name: &str, sink: &mut impl DiagnosticSink) -> Option<String> {
        let start = self.at();
        self.bump();
        let value = self.take_while(is_quoted_text);
        match self.peek() {
            Some('"') => {
                self.bump();
                Some(value)
            }
            None => {
                sink.report(UnterminatedQuote {
                    name: name.to_string(),
                    at: start,
                });
                None
            }
            Some(found) => {
                sink.report(BadQuotedChar {
                    name: name.to_string(),
                    at: self.at(),
                    found,
                });
                None
            }
        }
    }
}

/// Parse a `Digest k1=v1, k2="v2", ...` header value into its parameters.
///
/// Returns `None` when the header is absent, blank or malformed; the reason is given
/// to `sink`. A repeated name keeps its first position and takes the last value.
pub fn parse_header_map<S: DiagnosticSink>(
    header: Option<&str>,
    mut sink: S,
) -> Option<ParamMap> {
    let input = match header.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => {
            sink.report(EmptyHeader);
            return None;
        }
    };

    let rest = match input.strip_prefix(SCHEME) {
        Some(rest) if rest.starts_with(is_lws) => rest,
        _ => {
            sink.report(MissingScheme);
            return None;
        }
    };

    let mut cur = Cursor {
        chars: rest.chars().collect(),
        pos: 0,
        base: SCHEME.len(),
    };
    let mut params = ParamMap::new();

    loop {
        cur.skip_lws();

        let name_at = cur.at();
        let name = cur.take_while(is_token_char);
        if name.is_empty() {
            sink.report(EmptyName(name_at));
            return None;
        }

        cur.skip_lws();
        if cur.peek() != Some('=') {
            sink.report(MissingEquals { name, at: cur.at() });
            return None;
        }
        cur.bump();
        cur.skip_lws();

        let value = if cur.peek() == Some('"') {
            cur.quoted(&name, &mut sink)?
        } else {
            let value_at = cur.at();
            let value = cur.take_while(is_token_char);
            if value.is_empty() {
                sink.report(EmptyValue { name, at: value_at });
                return None;
            }
            value
        };

        params.insert(name, value);

        cur.skip_lws();
        match cur.peek() {
            None => return Some(params),
            Some(',') => {
                cur.bump();
                cur.skip_lws();
                if cur.peek().is_none() {
                    sink.report(TrailingComma);
                    return None;
                }
            }
            Some(found) => {
                sink.report(ExpectedComma { at: cur.at(), found });
                return None;
            }
        }
    }
}

/// Report every parameter name outside `known`, in header order
pub(crate) fn report_unexpected(
    params: &ParamMap,
    known: &[&str],
    sink: &mut impl DiagnosticSink,
) {
    for name in params.keys().filter(|n| !known.contains(n)) {
        sink.report(Diagnostic::UnexpectedParam(name.to_string()));
    }
}
