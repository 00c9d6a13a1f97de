use crate::Result;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the deterministic, episodic case with one agent and
/// a finite state space and action space. Environments hold no per-episode state:
/// the agent carries its own position and hands it back on every step.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Copy;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Copy;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the start state
    fn reset(&self) -> Self::State;

    /// Apply `action` in `state`, producing the resulting transition
    ///
    /// **Errors** if `state` is not part of the state space
    fn step(
        &self,
        state: Self::State,
        action: Self::Action,
    ) -> Result<Transition<Self::State, Self::Action>>;
}

/// An environment with a finite action set that is the same in every state
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions
    ///
    /// The returned slice should never be empty.
    fn actions(&self) -> &'static [Self::Action];
}

/// A single transition in the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<S, A> {
    /// The state of the environment before taking the action
    pub state: S,
    /// The action taken in the given state
    pub action: A,
    /// The reward received after taking the action
    pub reward: f64,
    /// The state of the environment after the action is taken
    pub next_state: S,
    /// Whether `next_state` is terminal
    pub done: bool,
}
