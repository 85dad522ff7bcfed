//! Session management for the client
//!
//! Holds the authenticated user's tokens and profile between runs. The
//! `SessionStore` persists a single session through a `KeyValueStorage`
//! backend, which can be swapped for an in-memory one in tests.

pub mod adapters;
pub mod storage;
pub mod store;

pub use adapters::{FileStorage, InMemoryStorage};
pub use storage::{KeyValueStorage, StorageRef};
pub use store::{Profile, Session, SessionStore, SessionStoreRef, SESSION_KEY};
