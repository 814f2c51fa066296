//! Per-goal reconciliation rules and the injectable randomness they draw on.
//!
//! # Invariants
//! - Every rule yields a finite value `>= 0`.
//! - `Counter` never decreases a goal; its increment lies in `[100, 599]`.
//! - `Drift` moves a value by at most `0.1` and rounds to one decimal place.

use crate::model::goal::{AutoRule, Goal};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const COUNTER_BASE: f64 = 100.0;
const COUNTER_SPREAD: f64 = 500.0;
const DRIFT_SPAN: f64 = 0.2;

/// Uniform random source in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// Entropy- or seed-backed random source.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed cycle of values; for deterministic hosts and tests.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    /// Values are clamped into `[0, 1)`. An empty sequence always yields `0`.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|value| {
                if value.is_finite() {
                    value.clamp(0.0, 1.0 - f64::EPSILON)
                } else {
                    0.0
                }
            })
            .collect();
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Computes the next reading for an auto-tracked goal.
pub fn next_reading(goal: &Goal, rng: &mut dyn RandomSource) -> f64 {
    let sample = rng.next_unit();
    match goal.resolved_auto_rule() {
        AutoRule::Counter => goal.current + (sample * COUNTER_SPREAD).floor() + COUNTER_BASE,
        AutoRule::Drift => {
            let step = sample * DRIFT_SPAN - DRIFT_SPAN / 2.0;
            round_one_decimal(goal.current + step).max(0.0)
        }
        AutoRule::Toggle => {
            if sample < 0.5 {
                0.0
            } else {
                1.0
            }
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
