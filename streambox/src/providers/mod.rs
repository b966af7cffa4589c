//! Provider traits.
//!
//! Every external collaborator of the client is reached through one of these
//! traits: the durable key-value store, the identity backend and the movie
//! catalog. Reducers only ever see `Arc<dyn Trait>` handles from the
//! environment, so tests swap in the implementations from [`crate::mocks`]
//! and production wires the HTTP and file-backed ones.
//!
//! Methods return boxed futures to keep the traits dyn-compatible.

pub mod catalog;
pub mod identity;
pub mod storage;

pub use catalog::{CatalogClient, ListKind, TimeWindow};
pub use identity::{IdentityClient, Registration};
pub use storage::KeyValueStore;
