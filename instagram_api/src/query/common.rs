//! Shared query infrastructure: the [`Params`] map and the [`Query`] trait.

use std::collections::btree_map::{self, BTreeMap};

use url::Url;

/// Query parameters for a single request.
///
/// Keys are unique and values are plain strings. Keys iterate in ascending
/// order, which is the order the signer needs. A `Params` value is owned by
/// the call that builds it and is moved through auth injection and signing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Params::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses the query string of `url`. Repeated keys keep the first value.
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::new();
        for (k, v) in url.query_pairs() {
            params.0.entry(k.into_owned()).or_insert_with(|| v.into_owned());
        }
        params
    }

    /// Form-encodes the parameters as a query string, keys sorted.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

/// Trait implemented by the typed query builders.
pub trait Query {
    /// Converts the query into an owned parameter map for a request.
    fn to_params(&self) -> Params;

    /// Returns a mutable reference to the extra, untyped parameters.
    fn extra_params(&mut self) -> &mut Params;

    /// Sets an arbitrary parameter not covered by the typed builder methods.
    fn with_param(mut self, key: &str, value: &str) -> Self
    where
        Self: Sized,
    {
        self.extra_params().set(key, value);
        self
    }
}
