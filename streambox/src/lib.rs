//! # StreamBox
//!
//! Client sync core of the StreamBox movie browser: session, catalog
//! browsing, favorites and theme, kept in one Store and written through to
//! a persistent key-value store.
//!
//! ## Architecture
//!
//! ```text
//! UI intent → AppAction → AppReducer → (AppState, Effects)
//!                              ↑                     │
//!                              └── result actions ←──┘  (HTTP, storage)
//! ```
//!
//! - **Slices**: auth, movies, favorites and theme each own their state,
//!   actions and persisted keys
//! - **Resources**: every async value is a [`ResourceState`] that discards
//!   superseded responses and coalesces identical in-flight requests
//! - **Persistence**: slices write through on every change; [`StreamBox::start`]
//!   rehydrates once and decides the first route
//!
//! ## Example
//!
//! ```rust,ignore
//! use streambox::{AppEnvironment, ClientConfig, StreamBox};
//!
//! let env = AppEnvironment::production(&ClientConfig::from_env()?)?;
//! let client = StreamBox::new(env);
//!
//! let route = client.start().await?;
//! client.login("emilys", "emilyspass").await?;
//! ```
//!
//! [`ResourceState`]: streambox_core::ResourceState

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod app;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod http;
pub mod mocks;
pub mod movie;
pub mod providers;
pub mod reducers;
pub mod state;
pub mod stores;
pub mod validation;

// Re-export main types for convenience
pub use actions::{AppAction, AuthAction, BootstrapAction, FavoritesAction, MoviesAction, ThemeAction};
pub use app::{AppStore, StreamBox};
pub use config::ClientConfig;
pub use environment::AppEnvironment;
pub use error::{AuthError, CatalogError, ConfigError, StorageError};
pub use movie::{MovieDetail, MovieId, MoviePage, MovieSummary};
pub use providers::{ListKind, TimeWindow};
pub use reducers::AppReducer;
pub use state::{AppState, ColorScheme, Route, Session, SessionKind, ThemePreference};
pub use validation::RegisterForm;
