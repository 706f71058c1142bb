#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    ClientStore, CredentialStore, InMemoryStore, PreferenceStore, StorageError, StoredCredentials,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
