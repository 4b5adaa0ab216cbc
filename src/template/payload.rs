//! Namespaced component payloads.
//!
//! Handlers build a flat map whose keys address a component field as
//! `component::field`; a bare key addresses the root component `main`. Pages
//! regroup that map into one object per component before embedding it.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flat `component::field -> value` map as produced by handlers.
pub type Payload = Map<String, Value>;

/// Component that owns bare keys and the version fields.
pub const ROOT_NAMESPACE: &str = "main";

/// Separator between component and field.
pub const SEPARATOR: &str = "::";

/// Split a key on its first separator; bare keys belong to [`ROOT_NAMESPACE`].
pub fn split_key(key: &str) -> (&str, &str) {
    key.split_once(SEPARATOR).unwrap_or((ROOT_NAMESPACE, key))
}

/// `component -> (field -> value)`, the shape embedded in rendered pages.
///
/// The root namespace is always present, even when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespaced(BTreeMap<String, Map<String, Value>>);

impl Default for Namespaced {
    fn default() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(ROOT_NAMESPACE.to_string(), Map::new());
        Self(groups)
    }
}

impl Namespaced {
    pub fn from_flat(payload: &Payload) -> Self {
        let mut out = Self::default();
        for (key, value) in payload {
            let (component, field) = split_key(key);
            out.insert(component, field, value.clone());
        }
        out
    }

    pub fn insert(&mut self, component: &str, field: &str, value: Value) {
        self.0
            .entry(component.to_string())
            .or_default()
            .insert(field.to_string(), value);
    }

    #[cfg(test)]
    pub fn get(&self, component: &str, field: &str) -> Option<&Value> {
        self.0.get(component)?.get(field)
    }
}

impl serde::Serialize for Namespaced {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Build a [`Payload`] from `key => value` pairs.
///
/// Values go through `serde_json::to_value`, so the macro evaluates to
/// `Result<Payload, serde_json::Error>`.
///
/// ```ignore
/// let payload = payload! {
///     "todoApp::todos" => &todos,
///     "todoApp::filter" => "all",
/// }?;
/// ```
#[macro_export]
macro_rules! payload {
    ($($key:expr => $value:expr),* $(,)?) => {
        (|| -> ::std::result::Result<$crate::template::Payload, ::serde_json::Error> {
            #[allow(unused_mut)]
            let mut map = $crate::template::Payload::new();
            $(map.insert(::std::string::String::from($key), ::serde_json::to_value($value)?);)*
            Ok(map)
        })()
    };
}
