pub mod bans;
pub mod conquest;
pub mod lhs;
pub mod solver;

pub use bans::{ban_matrix_bo3, ban_matrix_bo5, ban_matrix_bo5_fixed, ban_matrix_bo7};
pub use conquest::{conquest_bo3, conquest_bo5, conquest_bo5_fixed, conquest_recursive};
pub use lhs::{lhs_ban_matrix, lhs_first_pick, lhs_value};
pub use solver::{solve, PayoffMatrix, Solution, SolverError};
