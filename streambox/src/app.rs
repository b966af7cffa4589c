//! The client facade: one Store over the whole application state.

use crate::actions::{AppAction, AuthAction, BootstrapAction, FavoritesAction, MoviesAction, ThemeAction};
use crate::environment::AppEnvironment;
use crate::movie::MovieId;
use crate::providers::ListKind;
use crate::reducers::AppReducer;
use crate::state::{AppState, ColorScheme, Route, ThemePreference};
use crate::validation::RegisterForm;
use std::time::Duration;
use streambox_runtime::{Store, StoreError};
use tokio::sync::broadcast;

/// Store type driving the client.
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// How long [`StreamBox::start`] waits for rehydration.
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle to a running client. Clones share the same Store.
#[derive(Clone)]
pub struct StreamBox {
    store: AppStore,
}

impl std::fmt::Debug for StreamBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamBox")
            .field("environment", self.store.environment())
            .field("pending_effects", &self.store.pending_effects())
            .finish()
    }
}

impl StreamBox {
    /// Client over `env`, not yet rehydrated.
    #[must_use]
    pub fn new(env: AppEnvironment) -> Self {
        let initial = AppState::new(env.system_appearance);
        Self {
            store: Store::new(initial, AppReducer::new(), env),
        }
    }

    /// Rehydrate from the persistent store and return the route to show.
    ///
    /// Calling this again after startup returns the current route.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if rehydration does not finish in
    /// [`DEFAULT_START_TIMEOUT`].
    pub async fn start(&self) -> Result<Route, StoreError> {
        self.start_with_timeout(DEFAULT_START_TIMEOUT).await
    }

    /// [`StreamBox::start`] with an explicit timeout.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::start`].
    pub async fn start_with_timeout(&self, timeout: Duration) -> Result<Route, StoreError> {
        if self.store.state(|s| s.bootstrap.started).await {
            // Started elsewhere; wait for it instead of issuing a second Start.
            let mut rx = self.store.subscribe_actions();
            if !self.store.state(|s| s.bootstrap.initialized).await {
                tokio::time::timeout(timeout, async {
                    loop {
                        match rx.recv().await {
                            Ok(action) if action.is_initialized() => return Ok(()),
                            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {},
                            Err(broadcast::error::RecvError::Closed) => return Err(StoreError::ChannelClosed),
                        }
                    }
                })
                .await
                .map_err(|_| StoreError::Timeout)??;
            }
        } else {
            self.store
                .send_and_wait_for(BootstrapAction::Start.into(), AppAction::is_initialized, timeout)
                .await?;
        }

        let route = self.route().await;
        tracing::info!(?route, "Client started");
        Ok(route)
    }

    /// Dispatch any action.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`StreamBox::shutdown`].
    pub async fn dispatch(&self, action: impl Into<AppAction>) -> Result<(), StoreError> {
        self.store.send(action.into()).await.map(|_| ())
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn login(&self, username: impl Into<String>, password: impl Into<String>) -> Result<(), StoreError> {
        self.dispatch(AuthAction::Login {
            username: username.into(),
            password: password.into(),
        })
        .await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn register(&self, form: RegisterForm) -> Result<(), StoreError> {
        self.dispatch(AuthAction::Register(form)).await
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.dispatch(AuthAction::Logout).await
    }

    /// Load one page of a list.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn fetch(&self, list: ListKind, page: u32) -> Result<(), StoreError> {
        self.dispatch(MoviesAction::Fetch { list, page }).await
    }

    /// Search by title.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn search(&self, query: impl Into<String>) -> Result<(), StoreError> {
        self.dispatch(MoviesAction::Search { query: query.into() }).await
    }

    /// Open a movie detail.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn load_detail(&self, id: MovieId) -> Result<(), StoreError> {
        self.dispatch(MoviesAction::LoadDetail(id)).await
    }

    /// Favorite or unfavorite a movie.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn toggle_favorite(&self, id: MovieId) -> Result<(), StoreError> {
        self.dispatch(FavoritesAction::Toggle(id)).await
    }

    /// Refetch every favorite detail.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn refresh_favorites(&self) -> Result<(), StoreError> {
        self.dispatch(FavoritesAction::RefreshAll).await
    }

    /// Store a theme preference.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn set_theme(&self, preference: ThemePreference) -> Result<(), StoreError> {
        self.dispatch(ThemeAction::Set(preference)).await
    }

    /// Report a host appearance change.
    ///
    /// # Errors
    ///
    /// See [`StreamBox::dispatch`].
    pub async fn system_appearance_changed(&self, scheme: ColorScheme) -> Result<(), StoreError> {
        self.dispatch(ThemeAction::SystemAppearanceChanged(scheme)).await
    }

    /// Copy of the whole state.
    pub async fn snapshot(&self) -> AppState {
        self.store.state(AppState::clone).await
    }

    /// Read part of the state.
    pub async fn select<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        self.store.state(f).await
    }

    /// Screen the UI should show.
    pub async fn route(&self) -> Route {
        self.store.state(AppState::route).await
    }

    /// Scheme the UI should render with.
    pub async fn color_scheme(&self) -> ColorScheme {
        self.store.state(|s| s.theme.resolved()).await
    }

    /// Wait until every running effect, including follow-ups, has finished.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SettleTimeout`] if effects are still running
    /// after `timeout`.
    pub async fn settle(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.settle(timeout).await
    }

    /// Actions produced by effects, as they happen.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppAction> {
        self.store.subscribe_actions()
    }

    /// The underlying Store.
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// Stop accepting actions and let in-flight writes finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
