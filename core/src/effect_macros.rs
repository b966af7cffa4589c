//! Declarative macros for ergonomic effect construction
//!
//! Reducers mostly return one of two shapes: an async block whose result is
//! fed back as an action, or an action that should be dispatched right after
//! the current one. These macros cover both.

/// Create an `Effect::Future` from an async block
///
/// The body is moved into an `async move` block and must evaluate to
/// `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use streambox_core::async_effect;
///
/// async_effect! {
///     let result = catalog.detail(id).await;
///     Some(MoviesAction::DetailLoaded { seq, result })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an effect that dispatches an action as soon as it runs
///
/// # Example
///
/// ```rust,ignore
/// use streambox_core::follow_up;
///
/// follow_up!(AppAction::Favorites(FavoritesAction::RefreshAll))
/// ```
#[macro_export]
macro_rules! follow_up {
    ($action:expr) => {{
        let action = $action;
        $crate::effect::Effect::Future(::std::boxed::Box::pin(async move { Some(action) }))
    }};
}
