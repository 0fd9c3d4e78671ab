pub mod random_source;
pub mod shuffle;

#[cfg(test)]
mod property_tests;

pub use random_source::{ChaChaSource, RandomSource, ScriptedSource};
pub use shuffle::{validate_order, ConstrainedShuffle, ShuffleOptions};
