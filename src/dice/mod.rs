//! Dice sources for skill checks
//!
//! Resolution never touches a global RNG. Callers inject a [`DiceSource`]:
//! a seeded ChaCha stream for play and replays, or a scripted queue of
//! forced results for tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Source of uniformly distributed die results
pub trait DiceSource {
    /// One six-sided die (1-6)
    fn d6(&mut self) -> i32;

    /// Two six-sided dice summed (2-12)
    fn roll_2d6(&mut self) -> i32 {
        self.d6() + self.d6()
    }
}

/// Deterministic dice seeded from a u64
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DiceSource for SeededDice {
    fn d6(&mut self) -> i32 {
        self.rng.gen_range(1..=6)
    }
}

/// Replays forced results: 2d6 totals and single d6 faces are queued
/// separately so a test can script each kind of roll independently
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    totals: VecDeque<i32>,
    faces: VecDeque<i32>,
    fallback_total: i32,
    fallback_face: i32,
}

impl ScriptedDice {
    /// Every roll passes ordinary checks: 12 on 2d6, 1 on a d6
    pub fn passing() -> Self {
        Self::new(12, 1)
    }

    pub fn new(fallback_total: i32, fallback_face: i32) -> Self {
        Self {
            totals: VecDeque::new(),
            faces: VecDeque::new(),
            fallback_total,
            fallback_face,
        }
    }

    /// Queue 2d6 totals, consumed in order
    pub fn with_totals(mut self, totals: &[i32]) -> Self {
        self.totals.extend(totals.iter().copied());
        self
    }

    /// Queue d6 faces, consumed in order
    pub fn with_faces(mut self, faces: &[i32]) -> Self {
        self.faces.extend(faces.iter().copied());
        self
    }

    pub fn remaining_totals(&self) -> usize {
        self.totals.len()
    }
}

impl DiceSource for ScriptedDice {
    fn d6(&mut self) -> i32 {
        self.faces.pop_front().unwrap_or(self.fallback_face)
    }

    fn roll_2d6(&mut self) -> i32 {
        self.totals.pop_front().unwrap_or(self.fallback_total)
    }
}
