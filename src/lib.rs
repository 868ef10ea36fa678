pub mod analysis;
pub mod calculator;
pub mod deck;
pub mod field;
pub mod progress;
pub mod rng;
