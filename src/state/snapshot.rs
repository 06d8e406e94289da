use super::StateMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ops::Deref;
use std::sync::Arc;

/// An immutable view of the global state at one commit.
///
/// Snapshots are cheap to clone: every clone shares the same underlying
/// mapping. The state can only be replaced through the owning store's
/// `update`, never mutated through a snapshot.
///
/// # Examples
///
/// ```
/// use patchbay::Store;
/// use serde_json::json;
///
/// let store = Store::new(json!({ "loggedIn": false })).unwrap();
/// let snapshot = store.snapshot();
/// assert_eq!(snapshot.version(), 0);
/// assert_eq!(snapshot.get("loggedIn"), Some(&json!(false)));
/// ```
#[derive(Clone, Debug)]
pub struct Snapshot {
    state: Arc<StateMap>,
    version: u64,
}

impl Snapshot {
    pub(crate) fn initial(state: StateMap) -> Self {
        Self {
            state: Arc::new(state),
            version: 0,
        }
    }

    /// Shallow-merge `partial` over this snapshot, producing the next commit.
    ///
    /// Keys present in `partial` overwrite; every other key is carried over
    /// untouched. Nested objects are replaced wholesale, not merged.
    pub(crate) fn merge(&self, partial: StateMap) -> Self {
        let mut next = StateMap::clone(&self.state);
        for (key, value) in partial {
            next.insert(key, value);
        }
        Self {
            state: Arc::new(next),
            version: self.version + 1,
        }
    }

    /// Number of commits that led to this snapshot (0 for the initial state).
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &StateMap {
        &self.state
    }

    /// Deserialize the value stored under `key` into `T`.
    ///
    /// Returns `None` when the key is missing or the value does not have
    /// the shape of `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.state
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Copy the whole state out as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(StateMap::clone(&self.state))
    }

    /// Whether both snapshots are the very same commit.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Deref for Snapshot {
    type Target = StateMap;

    fn deref(&self) -> &StateMap {
        &self.state
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl PartialEq<Value> for Snapshot {
    fn eq(&self, other: &Value) -> bool {
        matches!(other, Value::Object(map) if *map == *self.state)
    }
}
