//! API path builder
//!
//! Routes are assembled from static segments and caller-supplied identifiers.
//! Identifiers and query values are percent-encoded, so an id such as
//! `a/b?c` cannot escape its segment. Empty, `.` and `..` identifiers would be
//! dropped or collapsed by URL normalization; the path records them and
//! [`ApiPath::validate`] refuses it.

use std::borrow::Cow;

use crate::error::Error;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
    trailing_slash: bool,
    query: Vec<(&'static str, String)>,
    rejected: Option<String>,
}

impl ApiPath {
    /// Path starting with a static segment, e.g. `ApiPath::root("organizations")`
    pub fn root(segment: &'static str) -> Self {
        Self::default().segment(segment)
    }

    /// Append static segments; `"chat/stream"` appends two segments
    pub fn segment(mut self, segment: &'static str) -> Self {
        self.segments.extend(
            segment
                .split('/')
                .filter(|part| !part.is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Append an identifier, percent-encoded
    pub fn id(mut self, id: impl AsRef<str>) -> Self {
        let id = id.as_ref();
        if matches!(id, "" | "." | "..") && self.rejected.is_none() {
            self.rejected = Some(id.to_string());
        }
        self.segments.push(urlencoding::encode(id).into_owned());
        self
    }

    /// Terminate the path with `/`
    pub fn trailing_slash(mut self) -> Self {
        self.trailing_slash = true;
        self
    }

    /// Append a query parameter, percent-encoding the value
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Fail if an identifier cannot stand as its own segment
    pub fn validate(&self) -> Result<()> {
        match &self.rejected {
            Some(id) => Err(Error::InvalidInput(format!(
                "Identifier {:?} is not a valid path segment",
                id
            ))),
            None => Ok(()),
        }
    }

    /// Render the path (with query) to append to the base URL
    pub fn render(&self) -> String {
        let mut out = String::from("/");
        out.push_str(&self.segments.join("/"));
        if self.trailing_slash && !self.segments.is_empty() {
            out.push('/');
        }

        for (i, (key, value)) in self.query.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(key);
            out.push('=');
            let encoded: Cow<'_, str> = urlencoding::encode(value);
            out.push_str(&encoded);
        }
        out
    }
}

impl std::fmt::Display for ApiPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
