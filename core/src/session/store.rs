use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::StorageError;
use crate::session::storage::StorageRef;

/// Fixed storage key the session is persisted under
pub const SESSION_KEY: &str = "mini-tweeter-user";

/// Read-only view of the profile fields stored under `user`.
///
/// Fields that are missing or not strings read as `None`; everything else is in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub username: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub extra: Map<String, Value>,
}

impl Profile {
    fn from_map(map: &Map<String, Value>) -> Self {
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        let extra = map
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "username" | "name" | "lastName" | "email"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            username: text("username"),
            name: text("name"),
            last_name: text("lastName"),
            email: text("email"),
            extra,
        }
    }

    /// `name`, falling back to a server-supplied `firstName`
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.extra.get("firstName").and_then(Value::as_str))
    }
}

/// Persisted authenticated-user payload.
///
/// The JSON object is kept exactly as it was stored. Typed accessors read from
/// it leniently and never reject a session because a field has an odd shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(Map<String, Value>);

impl Session {
    /// Build a session from a raw response body, `None` unless the body is a JSON object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Bearer credential: `access`, else `accessToken`. Non-string and empty values are ignored.
    pub fn access_token(&self) -> Option<&str> {
        ["access", "accessToken"].iter().find_map(|key| {
            self.0
                .get(*key)
                .and_then(Value::as_str)
                .filter(|token| !token.is_empty())
        })
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.0.get("refresh").and_then(Value::as_str)
    }

    /// Profile view of `user`, `None` when `user` is absent or not an object
    pub fn profile(&self) -> Option<Profile> {
        self.0
            .get("user")
            .and_then(Value::as_object)
            .map(Profile::from_map)
    }

    /// Merge a profile update into the fields stored under `user`.
    ///
    /// Each key of `update` overwrites the field of the same name; other fields
    /// are kept. A `user` that is not an object is replaced. Anything other than
    /// a JSON object as `update` is ignored.
    pub fn merge_profile(&mut self, update: &Value) {
        let Some(fields) = update.as_object() else {
            return;
        };

        let user = self
            .0
            .entry("user")
            .or_insert_with(|| Value::Object(Map::new()));
        if !user.is_object() {
            *user = Value::Object(Map::new());
        }
        if let Value::Object(profile) = user {
            for (key, value) in fields {
                profile.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Single point of truth for the current user's credentials and profile.
///
/// At most one session is persisted, under a fixed key. Writes replace the
/// previous value wholesale; any merging happens before `set_session`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: StorageRef,
    key: String,
}

impl SessionStore {
    pub fn new(storage: StorageRef) -> Self {
        Self::with_key(storage, SESSION_KEY)
    }

    pub fn with_key(storage: StorageRef, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist `session`, overwriting whatever was stored
    pub fn set_session<T: Serialize + ?Sized>(&self, session: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(session)?;
        self.storage.set(&self.key, &encoded)?;
        debug!(key = %self.key, "Session stored");
        Ok(())
    }

    /// The stored session, or `None` when nothing is stored or the stored text
    /// is not a JSON object.
    ///
    /// Only a failure of the storage primitive itself is returned as an error.
    pub fn get_session(&self) -> Result<Option<Session>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => {
                let session = Session::from_value(value);
                if session.is_none() {
                    warn!(key = %self.key, "Ignoring stored session that is not an object");
                }
                Ok(session)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring malformed stored session");
                Ok(None)
            }
        }
    }

    /// Access token of the current session, if any
    pub fn access_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .get_session()?
            .and_then(|session| session.access_token().map(str::to_string)))
    }

    /// Delete the stored session. Removing when nothing is stored is a no-op.
    pub fn remove_session(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)?;
        debug!(key = %self.key, "Session removed");
        Ok(())
    }
}

/// Type alias for Arc-wrapped SessionStore handles shared with the gateway
pub type SessionStoreRef = Arc<SessionStore>;
