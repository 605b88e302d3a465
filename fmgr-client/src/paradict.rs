//! Routing parameters addressing a remote object

use std::collections::BTreeMap;

use crate::client::{ClientError, ClientResult};

/// Routing parameters (device, vdom, adom, parent keys) of one call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paradict(BTreeMap<String, String>);

impl Paradict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert an object key, escaped so it stays a single path segment
    pub fn insert_key(&mut self, key: impl Into<String>, value: &str) {
        self.insert(key, escape_key(value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fill the `{name}` placeholders of a URL template
    pub fn render(&self, template: &str) -> ClientResult<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                ClientError::InvalidObject(format!("Unterminated placeholder in '{}'", template))
            })?;
            let name = &after[..end];
            match self.get(name) {
                Some(value) if !value.is_empty() => out.push_str(value),
                _ => return Err(ClientError::MissingParameter(name.to_string())),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

/// Escape '/' inside an object key so it stays a single path segment
pub fn escape_key(value: &str) -> String {
    value.replace('/', "\\/")
}
