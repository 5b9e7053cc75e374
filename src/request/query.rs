//! Query string handling for request URLs.
//!
//! Merging follows `URLSearchParams` semantics: a name that is already present is
//! replaced (every old occurrence is dropped and the new pair goes to the end), unless
//! the name ends in `[]`, in which case the pair is appended so array-style params
//! accumulate.

use url::form_urlencoded;

/// Splits an URL string into the part before the query and the raw query text.
///
/// The query is the text between the first `?` and the next `?` or `#`. The fragment is
/// always dropped.
pub(crate) fn split_url(url: &str) -> (&str, &str) {
    let before_query = url.split('?').next().unwrap_or_default();
    let path = before_query.split('#').next().unwrap_or_default();

    let query = url
        .split('?')
        .nth(1)
        .and_then(|q| q.split('#').next())
        .unwrap_or_default();

    (path, query)
}

/// Ordered multi-map of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub(crate) fn parse(query: &str) -> Self {
        Self {
            pairs: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, _)| n == name)
    }

    pub(crate) fn merge<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in entries {
            if self.contains(&name) && !name.ends_with("[]") {
                self.pairs.retain(|(n, _)| *n != name);
            }
            self.pairs.push((name, value));
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn serialize(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }
}
