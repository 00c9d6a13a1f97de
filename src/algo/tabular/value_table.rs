use std::collections::{hash_map::Entry, HashMap};

use strum::{EnumCount, VariantArray};

use crate::{
    gym::{Action, GridWorld, Pos},
    Result,
};

/// Action values of a single state, indexed by [`Action::index`]
pub type ActionValues = [f64; Action::COUNT];

/// A sparse table of action values over the cells of a [`GridWorld`]
///
/// Rows are created lazily: every operation that reads a state first inserts a
/// zero-initialized row for it, so a visited-but-never-updated state reads as `0.0`
/// for every action. States outside the grid are rejected with
/// [`OutOfBounds`](crate::Error::OutOfBounds) instead of being inserted.
#[derive(Debug, Clone)]
pub struct ValueTable {
    grid: GridWorld,
    values: HashMap<Pos, ActionValues>,
}

impl ValueTable {
    /// Create an empty table for the cells of `grid`
    pub fn new(grid: GridWorld) -> Self {
        Self {
            grid,
            values: HashMap::new(),
        }
    }

    /// Insert a zero-initialized row for `state` if it is absent
    ///
    /// Idempotent: an existing row is left untouched.
    pub fn ensure(&mut self, state: Pos) -> Result<&mut ActionValues> {
        self.grid.check(state)?;
        Ok(match self.values.entry(state) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert([0.0; Action::COUNT]),
        })
    }

    pub fn get(&mut self, state: Pos, action: Action) -> Result<f64> {
        Ok(self.ensure(state)?[action.index()])
    }

    /// The highest-valued action in `state`
    ///
    /// Ties go to the action that comes first in the order up, down, left, right.
    pub fn best_action(&mut self, state: Pos) -> Result<Action> {
        let row = self.ensure(state)?;
        let best = (1..row.len()).fold(0, |best, i| if row[i] > row[best] { i } else { best });
        Ok(Action::VARIANTS[best])
    }

    pub fn max_value(&mut self, state: Pos) -> Result<f64> {
        let row = self.ensure(state)?;
        Ok(row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Overwrite the value of `action` in `state`
    pub fn update(&mut self, state: Pos, action: Action, value: f64) -> Result<()> {
        self.ensure(state)?[action.index()] = value;
        Ok(())
    }

    /// True if every action value of `state` is exactly zero, i.e. nothing has been learned there yet
    pub fn is_unvisited(&mut self, state: Pos) -> Result<bool> {
        Ok(self.ensure(state)?.iter().all(|&v| v == 0.0))
    }

    /// Peek at the row of `state` without inserting it
    pub fn values(&self, state: Pos) -> Option<&ActionValues> {
        self.values.get(&state)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pos, &ActionValues)> {
        self.values.iter()
    }

    /// Number of states with a row in the table
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forget every learned value
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::Error;

    fn table() -> ValueTable {
        ValueTable::new(GridWorld::default())
    }

    #[test]
    fn unvisited_state_reads_zero() {
        let mut t = table();
        assert!(t.is_empty(), "initialized empty");
        for a in Action::iter() {
            assert_eq!(t.get((2, 3), a), Ok(0.0));
        }
        assert_eq!(t.is_unvisited((2, 3)), Ok(true));
        assert_eq!(t.len(), 1, "read inserted the state");
    }

    #[test]
    fn ensure_is_idempotent() {
        let mut t = table();
        t.ensure((1, 1)).unwrap();
        t.update((1, 1), Action::Left, 0.5).unwrap();
        t.ensure((1, 1)).unwrap();
        assert_eq!(t.values((1, 1)), Some(&[0.0, 0.0, 0.5, 0.0]), "no reset");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn best_action_and_max_value() {
        let mut t = table();
        t.update((0, 0), Action::Down, 0.3).unwrap();
        t.update((0, 0), Action::Right, 0.7).unwrap();
        assert_eq!(t.best_action((0, 0)), Ok(Action::Right));
        assert_eq!(t.max_value((0, 0)), Ok(0.7));
        assert_eq!(t.is_unvisited((0, 0)), Ok(false));
    }

    #[test]
    fn ties_break_in_canonical_order() {
        let mut t = table();
        assert_eq!(t.best_action((3, 3)), Ok(Action::Up), "all zero");

        t.update((3, 3), Action::Left, 0.2).unwrap();
        t.update((3, 3), Action::Right, 0.2).unwrap();
        assert_eq!(t.best_action((3, 3)), Ok(Action::Left));
    }

    #[test]
    fn negative_values_are_not_unvisited() {
        let mut t = table();
        t.update((0, 1), Action::Up, -0.1).unwrap();
        assert_eq!(t.is_unvisited((0, 1)), Ok(false));
        assert_eq!(t.max_value((0, 1)), Ok(0.0));
        assert_eq!(t.best_action((0, 1)), Ok(Action::Down));
    }

    #[test]
    fn out_of_bounds_states_are_rejected() {
        let mut t = table();
        assert!(matches!(
            t.get((5, 0), Action::Up),
            Err(Error::OutOfBounds { state: (5, 0), .. })
        ));
        assert!(t.update((0, -1), Action::Up, 1.0).is_err());
        assert!(t.is_empty(), "nothing inserted");
    }

    #[test]
    fn clear_forgets_everything() {
        let mut t = table();
        t.update((1, 2), Action::Up, 1.0).unwrap();
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.get((1, 2), Action::Up), Ok(0.0));
    }
}
