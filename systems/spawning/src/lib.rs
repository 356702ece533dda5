#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for emitting new tile commands.

use log::debug;
use rand::Rng;
use thiserror::Error;
use tile_merge_core::{Command, TileValue};
use tile_merge_world::Grid;

/// Probability of spawning a four used by a standard game.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    four_probability: f64,
}

impl Config {
    /// Creates a configuration that spawns a four with the provided probability.
    pub fn new(four_probability: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&four_probability) {
            return Err(ConfigError::InvalidFourProbability { four_probability });
        }
        Ok(Self { four_probability })
    }

    /// Probability that a spawned tile carries a four instead of a two.
    #[must_use]
    pub const fn four_probability(&self) -> f64 {
        self.four_probability
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            four_probability: DEFAULT_FOUR_PROBABILITY,
        }
    }
}

/// Errors raised while validating spawning configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The probability lies outside the unit interval.
    #[error("four probability must lie within 0.0..=1.0 (received {four_probability})")]
    InvalidFourProbability {
        /// Probability that failed validation.
        four_probability: f64,
    },
}

/// Pure system that picks where new tiles appear and what they carry.
///
/// Randomness is injected so callers decide between entropy and a fixed seed.
#[derive(Debug)]
pub struct Spawning<R> {
    four_probability: f64,
    rng: R,
}

impl<R: Rng> Spawning<R> {
    /// Creates a new spawning system drawing from the provided generator.
    #[must_use]
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            four_probability: config.four_probability,
            rng,
        }
    }

    /// Emits a command spawning one tile into a random empty cell.
    ///
    /// # Panics
    ///
    /// Panics when the grid has no empty cell.
    pub fn spawn(&mut self, grid: &Grid, out: &mut Vec<Command>) {
        let cell = grid.random_empty_cell(&mut self.rng).coord();
        let value = self.next_value();
        debug!("spawning {} at {cell:?}", value.get());
        out.push(Command::SpawnTile { cell, value });
    }

    fn next_value(&mut self) -> TileValue {
        if self.rng.gen_bool(self.four_probability) {
            TileValue::FOUR
        } else {
            TileValue::TWO
        }
    }
}
