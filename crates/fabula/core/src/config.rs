//! Driver configuration and tick-broadcast policy.

/// When the driver broadcasts `tick` across the tree.
///
/// The source scenarios disagree on this, so it is carried as explicit
/// configuration instead of a rule hard-coded into `step`:
/// some broadcast on an explicit "tick" verb only, some after every
/// recognized verb, and some never broadcast and mutate inline in their
/// verb handlers instead.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TickPolicy {
    /// Only verbs that broadcast themselves (the built-in "tick") do so.
    #[default]
    Explicit,
    /// The driver broadcasts after every recognized verb.
    EveryStep,
    /// Never broadcast; handlers mutate entity state inline.
    Manual,
}

/// Tunable driver parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    pub tick_policy: TickPolicy,

    /// Re-invoke the action generator after every recognized step, for
    /// scenarios whose legal-action menu depends on current tree state.
    pub regenerate_actions: bool,
}

impl SimConfig {
    pub fn new() -> Self {
        Self {
            tick_policy: TickPolicy::Explicit,
            regenerate_actions: false,
        }
    }

    pub fn with_tick_policy(mut self, tick_policy: TickPolicy) -> Self {
        self.tick_policy = tick_policy;
        self
    }

    pub fn with_regenerate_actions(mut self, regenerate_actions: bool) -> Self {
        self.regenerate_actions = regenerate_actions;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tick_policy_round_trips_through_strings() {
        assert_eq!(TickPolicy::EveryStep.to_string(), "every_step");
        assert_eq!(TickPolicy::from_str("explicit").unwrap(), TickPolicy::Explicit);
        assert_eq!(TickPolicy::from_str("MANUAL").unwrap(), TickPolicy::Manual);
        assert!(TickPolicy::from_str("sometimes").is_err());
    }
}
