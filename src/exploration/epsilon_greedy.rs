use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use strum::VariantArray;

use crate::{
    algo::ValueTable,
    ensure_interval,
    gym::{Action, Pos},
    Result,
};

use super::Choice;

/// Epsilon greedy action selection over a [`ValueTable`]
///
/// With probability ε a uniformly random action is taken. Otherwise the greedy action is
/// taken, unless nothing has been learned in the state yet: then every action is tied at
/// zero and the greedy choice would always be the first one, so a random action is taken
/// instead.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    /// **Errors** if `epsilon` is not in the interval `[0,1]`
    pub fn new(epsilon: f64) -> Result<Self> {
        ensure_interval!(epsilon, 0.0, 1.0);
        Ok(Self {
            epsilon,
            rng: StdRng::from_entropy(),
        })
    }

    /// Like [`new`](Self::new) but with a reproducible random sequence
    pub fn with_seed(epsilon: f64, seed: u64) -> Result<Self> {
        let mut policy = Self::new(epsilon)?;
        policy.rng = StdRng::seed_from_u64(seed);
        Ok(policy)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Roll the dice for the exploration rate alone
    pub fn choose(&mut self) -> Choice {
        if self.rng.gen::<f64>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Select an action for `state`
    pub fn select(&mut self, state: Pos, table: &mut ValueTable) -> Result<Action> {
        let unvisited = table.is_unvisited(state)?;
        match self.choose() {
            Choice::Exploit if !unvisited => table.best_action(state),
            _ => Ok(self.random_action()),
        }
    }

    pub fn random_action(&mut self) -> Action {
        *Action::VARIANTS
            .choose(&mut self.rng)
            .expect("Action set is not empty")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{gym::GridWorld, Error};

    #[test]
    fn greedy_when_epsilon_is_zero() {
        let mut table = ValueTable::new(GridWorld::default());
        table.update((1, 1), Action::Left, 0.4).unwrap();
        let mut policy = EpsilonGreedy::with_seed(0.0, 7).unwrap();

        for _ in 0..100 {
            assert_eq!(policy.select((1, 1), &mut table), Ok(Action::Left));
        }
    }

    #[test]
    fn unvisited_state_is_explored() {
        let mut table = ValueTable::new(GridWorld::default());
        let mut policy = EpsilonGreedy::with_seed(0.0, 7).unwrap();

        let seen = (0..200)
            .map(|_| policy.select((0, 0), &mut table).unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(seen.len(), 4, "all actions tried despite epsilon = 0");
    }

    #[test]
    fn always_explores_when_epsilon_is_one() {
        let mut table = ValueTable::new(GridWorld::default());
        table.update((2, 2), Action::Up, 1.0).unwrap();
        let mut policy = EpsilonGreedy::with_seed(1.0, 3).unwrap();

        let seen = (0..200)
            .map(|_| policy.select((2, 2), &mut table).unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn exploration_rate_is_respected() {
        let mut policy = EpsilonGreedy::with_seed(0.1, 42).unwrap();
        let explored = (0..10_000)
            .filter(|_| policy.choose() == Choice::Explore)
            .count();
        assert!((800..1200).contains(&explored), "explored {explored} times");
    }

    #[test]
    fn seeded_policies_agree() {
        let mut table = ValueTable::new(GridWorld::default());
        let mut a = EpsilonGreedy::with_seed(0.5, 99).unwrap();
        let mut b = EpsilonGreedy::with_seed(0.5, 99).unwrap();
        for _ in 0..50 {
            assert_eq!(
                a.select((0, 0), &mut table).unwrap(),
                b.select((0, 0), &mut table).unwrap()
            );
        }
    }

    #[test]
    fn epsilon_is_validated() {
        assert!(matches!(
            EpsilonGreedy::new(-0.5),
            Err(Error::Config { field: "epsilon", .. })
        ));
    }
}
