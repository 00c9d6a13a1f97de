use crate::{ensure_interval, gym::GridTransition, Result};

use super::ValueTable;

/// One-step tabular Q-learning (off-policy TD control)
///
/// Q(s,a) ← Q(s,a) + α[r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)]
///
/// The bootstrap uses the greedy value of the next state whatever the behaviour policy
/// does next. Terminal transitions use the reward alone as the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QLearning {
    alpha: f64, // learning rate
    gamma: f64, // discount factor
}

impl QLearning {
    /// ### Parameters
    /// - `alpha` - The learning rate - must be between 0 and 1
    /// - `gamma` - The discount factor - must be between 0 and 1
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(alpha: f64, gamma: f64) -> Result<Self> {
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        Ok(Self { alpha, gamma })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Apply `transition` to `table`
    ///
    /// **Returns** the new value of the transition's state-action pair
    pub fn update(&self, table: &mut ValueTable, transition: &GridTransition) -> Result<f64> {
        let &GridTransition {
            state,
            action,
            reward,
            next_state,
            done,
        } = transition;

        let q_predict = table.get(state, action)?;
        let q_target = if done {
            reward
        } else {
            reward + self.gamma * table.max_value(next_state)?
        };
        let q_new = q_predict + self.alpha * (q_target - q_predict);

        table.update(state, action, q_new)?;
        Ok(q_new)
    }
}

impl Default for QLearning {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gym::{Action, GridWorld},
        Error,
    };

    fn transition(state: (i32, i32), action: Action, next_state: (i32, i32)) -> GridTransition {
        let done = next_state == (4, 4);
        GridTransition {
            state,
            action,
            reward: if done { 1.0 } else { 0.0 },
            next_state,
            done,
        }
    }

    #[test]
    fn terminal_update_from_zero() {
        let mut table = ValueTable::new(GridWorld::default());
        let learner = QLearning::default();

        let v = learner
            .update(&mut table, &transition((3, 4), Action::Down, (4, 4)))
            .unwrap();
        assert_eq!(v, 0.1);
        assert_eq!(table.get((3, 4), Action::Down), Ok(0.1));
    }

    #[test]
    fn terminal_update_moves_toward_reward() {
        let mut table = ValueTable::new(GridWorld::default());
        table.update((4, 3), Action::Right, 0.5).unwrap();
        let learner = QLearning::default();

        let v = learner
            .update(&mut table, &transition((4, 3), Action::Right, (4, 4)))
            .unwrap();
        assert_eq!(v, 0.5 + 0.1 * (1.0 - 0.5));
    }

    #[test]
    fn terminal_target_ignores_next_state_value() {
        let mut table = ValueTable::new(GridWorld::default());
        table.update((4, 4), Action::Up, 10.0).unwrap();

        let v = QLearning::default()
            .update(&mut table, &transition((3, 4), Action::Down, (4, 4)))
            .unwrap();
        assert_eq!(v, 0.1, "no bootstrap from the goal");
    }

    #[test]
    fn non_terminal_update_bootstraps_from_greedy_value() {
        let mut table = ValueTable::new(GridWorld::default());
        table.update((2, 3), Action::Up, 0.2).unwrap();
        table.update((2, 3), Action::Right, 0.5).unwrap();
        let learner = QLearning::new(0.5, 0.9).unwrap();

        let v = learner
            .update(&mut table, &transition((2, 2), Action::Right, (2, 3)))
            .unwrap();
        assert_eq!(v, 0.5 * (0.9 * 0.5));
        assert!(table.values((2, 3)).is_some(), "next state is in the table");
    }

    #[test]
    fn hyperparameters_are_validated() {
        assert!(matches!(
            QLearning::new(1.1, 0.9),
            Err(Error::Config { field: "alpha", .. })
        ));
        assert!(matches!(
            QLearning::new(0.1, -0.1),
            Err(Error::Config { field: "gamma", .. })
        ));
        assert!(QLearning::new(0.0, 1.0).is_ok());
    }
}
