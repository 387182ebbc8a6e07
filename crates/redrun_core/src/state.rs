//! Game-flow state machine.
//!
//! Each state maps to an explicit per-frame policy instead of an if/else
//! chain in the loop, so the reserved states stay additive: wiring up a
//! win/loss condition later means adding a transition, not editing the
//! driver.

/// Top-level game flow. Exactly one state is active per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    MainTitle,
    Playing,
    /// Reserved for future win detection; no transition reaches it yet.
    Winning,
    /// Reserved for future loss detection; no transition reaches it yet.
    GameOver,
}

/// What a state does each frame. The parallax background updates and
/// renders unconditionally in every state, so it carries no flag here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatePolicy {
    /// Update and render the player node.
    pub run_gameplay: bool,
    /// Draw the title screen with its blink effect.
    pub show_title: bool,
}

impl GameState {
    /// All states in display order.
    pub const ALL: &'static [GameState] = &[
        GameState::MainTitle,
        GameState::Playing,
        GameState::Winning,
        GameState::GameOver,
    ];

    pub fn policy(self) -> StatePolicy {
        match self {
            Self::MainTitle => StatePolicy {
                run_gameplay: false,
                show_title: true,
            },
            Self::Playing => StatePolicy {
                run_gameplay: true,
                show_title: false,
            },
            Self::Winning | Self::GameOver => StatePolicy {
                run_gameplay: false,
                show_title: false,
            },
        }
    }

    /// Advance the machine one tick. `confirm_pressed` must come from an
    /// edge-triggered query so a held confirm key fires exactly once.
    #[must_use]
    pub fn step(self, confirm_pressed: bool) -> Self {
        match self {
            Self::MainTitle if confirm_pressed => Self::Playing,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MainTitle => "Main Title",
            Self::Playing => "Playing",
            Self::Winning => "Winning",
            Self::GameOver => "Game Over",
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_main_title() {
        assert_eq!(GameState::default(), GameState::MainTitle);
    }

    #[test]
    fn confirm_moves_title_to_playing_exactly_once() {
        let mut state = GameState::MainTitle;
        state = state.step(true);
        assert_eq!(state, GameState::Playing);

        // An edge-triggered press only arrives once, but even a spurious
        // repeat must not move the machine anywhere else.
        state = state.step(true);
        assert_eq!(state, GameState::Playing);
    }

    #[test]
    fn no_transition_without_confirm() {
        assert_eq!(GameState::MainTitle.step(false), GameState::MainTitle);
    }

    #[test]
    fn non_title_states_ignore_confirm() {
        assert_eq!(GameState::Playing.step(true), GameState::Playing);
        assert_eq!(GameState::Winning.step(true), GameState::Winning);
        assert_eq!(GameState::GameOver.step(true), GameState::GameOver);
    }

    #[test]
    fn policy_gates_gameplay_to_playing() {
        for &state in GameState::ALL {
            let policy = state.policy();
            assert_eq!(policy.run_gameplay, state == GameState::Playing);
        }
    }

    #[test]
    fn policy_shows_title_only_on_main_title() {
        for &state in GameState::ALL {
            let policy = state.policy();
            assert_eq!(policy.show_title, state == GameState::MainTitle);
        }
    }

    #[test]
    fn display_matches_label() {
        for &state in GameState::ALL {
            assert_eq!(format!("{}", state), state.label());
        }
    }
}
