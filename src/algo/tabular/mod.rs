pub mod q_learning;
pub mod value_table;

pub use q_learning::QLearning;
pub use value_table::{ActionValues, ValueTable};
