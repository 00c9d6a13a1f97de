use std::str::FromStr;

use strum::{Display, EnumCount, EnumIter, VariantArray};

use crate::{
    env::{DiscreteActionSpace, Environment, Transition},
    Error, Result,
};

/// A `(row, column)` cell, 0-indexed from the top-left corner
pub type Pos = (i32, i32);

pub type GridTransition = Transition<Pos, Action>;

/// A move to a neighbouring cell
///
/// The declaration order is the canonical order used for indexing and for breaking ties.
#[derive(
    Display, EnumCount, EnumIter, VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Position of this action in the canonical order
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Action::VARIANTS
            .get(value)
            .copied()
            .ok_or_else(|| Error::InvalidAction(value.to_string()))
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::VARIANTS
            .iter()
            .copied()
            .find(|a| a.to_string() == s)
            .ok_or_else(|| Error::InvalidAction(s.to_owned()))
    }
}

/// A rectangular maze with a fixed start in the top-left corner and a single absorbing
/// goal in the bottom-right corner
///
/// Moves that would leave the grid are clamped to the boundary. Reaching the goal pays `1.0`
/// and ends the episode, every other transition pays nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWorld {
    rows: i32,
    cols: i32,
}

impl GridWorld {
    /// **Errors** if either dimension is not positive
    pub fn new(rows: i32, cols: i32) -> Result<Self> {
        for (field, value) in [("rows", rows), ("cols", cols)] {
            if value <= 0 {
                return Err(Error::Config {
                    field,
                    reason: format!("grid dimensions must be positive, got {value}"),
                });
            }
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn start(&self) -> Pos {
        (0, 0)
    }

    pub fn goal(&self) -> Pos {
        (self.rows - 1, self.cols - 1)
    }

    pub fn contains(&self, (row, col): Pos) -> bool {
        (0..self.rows).contains(&row) && (0..self.cols).contains(&col)
    }

    /// Fails with [`Error::OutOfBounds`] if `pos` is not on the grid
    pub fn check(&self, pos: Pos) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                state: pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Number of steps on a shortest path from start to goal
    pub fn shortest_path_len(&self) -> u32 {
        ((self.rows - 1) + (self.cols - 1)) as u32
    }

    fn clamp_move(&self, (row, col): Pos, action: Action) -> Pos {
        match action {
            Action::Up => ((row - 1).max(0), col),
            Action::Down => ((row + 1).min(self.rows - 1), col),
            Action::Left => (row, (col - 1).max(0)),
            Action::Right => (row, (col + 1).min(self.cols - 1)),
        }
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self { rows: 5, cols: 5 }
    }
}

impl Environment for GridWorld {
    type State = Pos;
    type Action = Action;

    fn reset(&self) -> Self::State {
        self.start()
    }

    fn step(&self, state: Self::State, action: Self::Action) -> Result<GridTransition> {
        self.check(state)?;

        let next_state = self.clamp_move(state, action);
        let done = next_state == self.goal();

        Ok(Transition {
            state,
            action,
            reward: if done { 1.0 } else { 0.0 },
            next_state,
            done,
        })
    }
}

impl DiscreteActionSpace for GridWorld {
    fn actions(&self) -> &'static [Self::Action] {
        Action::VARIANTS
    }
}
