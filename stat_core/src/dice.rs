//! Random draws used by combat, spawning and rewards
//!
//! Everything that rolls goes through [`Roller`], so a seeded `ChaCha8Rng` and a scripted
//! [`FixedRolls`] are interchangeable.

use rand::Rng;
use std::collections::VecDeque;

pub trait Roller {
    /// Uniform integer in `low..=high`
    fn roll_range(&mut self, low: i32, high: i32) -> i32;
    /// Uniform float in `[0, 1)`
    fn roll_chance(&mut self) -> f64;
    /// Uniform index in `0..len`; `len` must be non-zero
    fn roll_index(&mut self, len: usize) -> usize;

    /// True with probability `p`
    fn check(&mut self, p: f64) -> bool {
        self.roll_chance() < p
    }
}

impl<R: Rng + ?Sized> Roller for R {
    fn roll_range(&mut self, low: i32, high: i32) -> i32 {
        if low >= high {
            return low;
        }
        self.gen_range(low..=high)
    }

    fn roll_chance(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn roll_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.gen_range(0..len)
    }
}

/// Chance value handed out once a script runs dry; fails every check
const EXHAUSTED_CHANCE: f64 = 0.999;

/// Scripted rolls for exact test scenarios
///
/// Each kind of draw has its own queue. Range results are clamped into the requested bounds;
/// an empty range queue yields 0 (clamped), so a bare `FixedRolls::new()` means
/// "no random delta, no proc".
#[derive(Debug, Clone, Default)]
pub struct FixedRolls {
    ranges: VecDeque<i32>,
    chances: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl FixedRolls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, value: i32) -> Self {
        self.ranges.push_back(value);
        self
    }

    pub fn chance(mut self, value: f64) -> Self {
        self.chances.push_back(value);
        self
    }

    pub fn index(mut self, value: usize) -> Self {
        self.indices.push_back(value);
        self
    }

    /// Draws still queued, across all kinds
    pub fn remaining(&self) -> usize {
        self.ranges.len() + self.chances.len() + self.indices.len()
    }
}

impl Roller for FixedRolls {
    fn roll_range(&mut self, low: i32, high: i32) -> i32 {
        let value = self.ranges.pop_front().unwrap_or(0);
        value.clamp(low, high.max(low))
    }

    fn roll_chance(&mut self) -> f64 {
        self.chances.pop_front().unwrap_or(EXHAUSTED_CHANCE)
    }

    fn roll_index(&mut self, len: usize) -> usize {
        let value = self.indices.pop_front().unwrap_or(0);
        value.min(len.saturating_sub(1))
    }
}
