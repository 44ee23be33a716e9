use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use std::fmt;

///
/// RustPath
///
/// A `::`-separated item path assembled from plain segments. Path keywords
/// (`crate`, `self`, `super`) are valid leading segments.
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RustPath {
    pub leading_colon: bool,
    pub segments: Vec<String>,
}

impl RustPath {
    pub fn new<I, S>(leading_colon: bool, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            leading_colon,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Split `a::b::c` (optionally `::`-prefixed) into a path.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let (leading_colon, rest) = match path.strip_prefix("::") {
            Some(rest) => (true, rest),
            None => (false, path),
        };

        Self::new(leading_colon, rest.split("::").filter(|s| !s.is_empty()))
    }

    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(segment.into());

        path
    }

    #[must_use]
    pub fn join_all<S: AsRef<str>>(&self, segments: &[S]) -> Self {
        let mut path = self.clone();
        path.segments
            .extend(segments.iter().map(|s| s.as_ref().to_string()));

        path
    }
}

impl fmt::Display for RustPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leading_colon {
            write!(f, "::")?;
        }

        write!(f, "{}", self.segments.join("::"))
    }
}

impl ToTokens for RustPath {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let segments = self.segments.iter().map(|s| format_ident!("{s}"));

        if self.leading_colon {
            tokens.extend(quote!(#(:: #segments)*));
        } else {
            tokens.extend(quote!(#(#segments)::*));
        }
    }
}
