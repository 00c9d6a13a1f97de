use std::time::Duration;

use crate::{ensure_interval, Error, Result};

/// Configuration for the [`Trainer`](crate::train::Trainer)
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// Number of grid rows
    ///
    /// **Default**: `5`
    pub rows: i32,
    /// Number of grid columns
    ///
    /// **Default**: `5`
    pub cols: i32,
    /// Episodes per training run
    ///
    /// **Default**: `50`
    pub max_episodes: u32,
    /// Exploration rate ε
    ///
    /// **Default**: `0.1`
    pub epsilon: f64,
    /// Learning rate α
    ///
    /// **Default**: `0.1`
    pub alpha: f64,
    /// Discount factor γ
    ///
    /// **Default**: `0.9`
    pub gamma: f64,
    /// Ends an episode as truncated once it has taken this many steps without reaching the goal
    ///
    /// **Default**: `None`, episodes run until the goal is reached
    pub max_steps_per_episode: Option<u32>,
    /// Seed for the exploration policy
    ///
    /// **Default**: `None`, seeded from the OS
    pub seed: Option<u64>,
    /// Wall-clock pacing of [`Trainer::run`](crate::train::Trainer::run)
    ///
    /// **Default**: [`Pacing::none`]
    pub pacing: Pacing,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            max_episodes: 50,
            epsilon: 0.1,
            alpha: 0.1,
            gamma: 0.9,
            max_steps_per_episode: None,
            seed: None,
            pacing: Pacing::none(),
        }
    }
}

impl TrainerConfig {
    /// Reject configurations that cannot be trained with
    pub fn validate(&self) -> Result<()> {
        let &Self {
            rows,
            cols,
            max_episodes,
            epsilon,
            alpha,
            gamma,
            max_steps_per_episode,
            ..
        } = self;

        for (field, value) in [("rows", rows), ("cols", cols)] {
            if value <= 0 {
                return Err(Error::Config {
                    field,
                    reason: format!("grid dimensions must be positive, got {value}"),
                });
            }
        }
        if max_episodes == 0 {
            return Err(Error::Config {
                field: "max_episodes",
                reason: "at least one episode is required".into(),
            });
        }
        if max_steps_per_episode == Some(0) {
            return Err(Error::Config {
                field: "max_steps_per_episode",
                reason: "step bound must be positive".into(),
            });
        }
        ensure_interval!(epsilon, 0.0, 1.0);
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);

        Ok(())
    }
}

/// Presentation-only pacing of a blocking training run
///
/// Never affects what is learned, only how fast it happens on the wall clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacing {
    /// Sleep after every step
    pub step_delay: Duration,
    /// Sleep after every completed episode
    pub episode_pause: Duration,
}

impl Pacing {
    /// Run flat out
    pub fn none() -> Self {
        Self::default()
    }

    /// Map a speed setting in `1..=100` to a step delay between 200 ms (slowest) and 20 ms
    /// (fastest), with a half second pause between episodes
    ///
    /// Out of range speeds are clamped.
    pub fn from_speed(speed: u8) -> Self {
        let speed = speed.clamp(1, 100) as f64;
        Self {
            step_delay: Duration::from_millis((200.0 - speed * 1.8).round() as u64),
            episode_pause: Duration::from_millis(500),
        }
    }
}
