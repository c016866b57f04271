use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Key that must never leave the credential store inside a profile.
pub const PASSWORD_HASH_KEY: &str = "password_hash";

/// Opaque, application-defined account data.
///
/// Carried through storage, token claims and responses without field-level
/// interpretation. The only key the library knows about is
/// [`PASSWORD_HASH_KEY`], which is stripped before a profile is embedded in a
/// token and again after a token is parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(BTreeMap<String, Value>);

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value under the same key.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
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

    /// Remove the reserved password hash key in place.
    pub fn strip_password_hash(&mut self) {
        self.0.remove(PASSWORD_HASH_KEY);
    }

    /// Consuming variant of [`Profile::strip_password_hash`].
    pub fn without_password_hash(mut self) -> Self {
        self.strip_password_hash();
        self
    }

    /// Build a profile from an arbitrary JSON value.
    ///
    /// Objects become profiles field by field, `null` becomes an empty
    /// profile. Anything else is not a key/value payload and yields `None`.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map.into_iter().collect())),
            Value::Null => Some(Self::new()),
            _ => None,
        }
    }
}
