pub mod tabular;

pub use tabular::{QLearning, ValueTable};
