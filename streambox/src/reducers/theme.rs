//! Theme slice reducer.

use crate::actions::ThemeAction;
use crate::environment::AppEnvironment;
use crate::state::{ColorScheme, ThemePreference, ThemeState};
use streambox_core::effect::Effect;
use streambox_core::reducer::Reducer;
use streambox_core::{SmallVec, async_effect, smallvec};

/// Theme slice reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeReducer;

impl ThemeReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ThemeReducer {
    type State = ThemeState;
    type Action = ThemeAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ThemeAction::Set(preference) => {
                if state.preference == preference {
                    return smallvec![Effect::None];
                }
                state.preference = preference;
                state.revision += 1;
                tracing::debug!(?preference, resolved = ?state.resolved(), "Theme preference changed");

                let revision = state.revision;
                let key = env.persisted.theme.clone();
                smallvec![async_effect! {
                    if let Err(error) = key.save(revision, &preference).await {
                        tracing::warn!(%error, "Theme write failed");
                    }
                    None
                }]
            },

            // Toggling always leaves Auto for an explicit choice.
            ThemeAction::Toggle => {
                let next = match state.resolved().inverted() {
                    ColorScheme::Light => ThemePreference::Light,
                    ColorScheme::Dark => ThemePreference::Dark,
                };
                self.reduce(state, ThemeAction::Set(next), env)
            },

            ThemeAction::SystemAppearanceChanged(scheme) => {
                state.system = scheme;
                smallvec![Effect::None]
            },
        }
    }
}
