#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic package generators that emit spawn commands on a tick cadence.

use std::fmt::Debug;

use logistico_core::{Command, Waypoint, MIN_ACCELERATING_GEN_RATE};

/// Source of new packages driven once per simulation tick.
pub trait PackageSource: Debug {
    /// Advances the generator by one tick, queueing spawn commands for `path`.
    fn update(&mut self, path: &[Waypoint], out: &mut Vec<Command>);

    /// Ticks counted by the generator, as it defines them.
    fn tick_count(&self) -> u64;
}

/// Generator that spawns on every exact multiple of its rate.
///
/// The tick counter is never reset, so spawns keep landing on multiples of
/// `gen_rate`. A rate of zero never spawns.
#[derive(Clone, Debug)]
pub struct Generator {
    gen_rate: u64,
    tick_count: u64,
}

impl Generator {
    /// Creates a generator spawning once every `gen_rate` ticks.
    #[must_use]
    pub const fn new(gen_rate: u64) -> Self {
        Self {
            gen_rate,
            tick_count: 0,
        }
    }

    /// Ticks between consecutive spawns.
    #[must_use]
    pub const fn gen_rate(&self) -> u64 {
        self.gen_rate
    }
}

impl PackageSource for Generator {
    fn update(&mut self, path: &[Waypoint], out: &mut Vec<Command>) {
        self.tick_count = self.tick_count.saturating_add(1);
        if self.gen_rate == 0 {
            return;
        }
        if self.tick_count % self.gen_rate == 0 {
            out.push(spawn(path));
        }
    }

    fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

/// Generator whose spawn interval shrinks geometrically after every spawn.
///
/// The interval is multiplied by `proportion` while it is at least
/// [`MIN_ACCELERATING_GEN_RATE`] ticks, then stays where it landed.
#[derive(Clone, Debug)]
pub struct ExponentialGenerator {
    gen_rate: f64,
    proportion: f64,
    tick_count: u64,
}

impl ExponentialGenerator {
    /// Creates a generator starting at `gen_rate` ticks and decaying by `proportion`.
    ///
    /// `proportion` is expected to lie strictly between zero and one.
    #[must_use]
    pub const fn new(gen_rate: f64, proportion: f64) -> Self {
        Self {
            gen_rate,
            proportion,
            tick_count: 0,
        }
    }

    /// Current number of ticks between spawns.
    #[must_use]
    pub const fn gen_rate(&self) -> f64 {
        self.gen_rate
    }
}

impl PackageSource for ExponentialGenerator {
    fn update(&mut self, path: &[Waypoint], out: &mut Vec<Command>) {
        self.tick_count = self.tick_count.saturating_add(1);
        if (self.tick_count as f64) < self.gen_rate {
            return;
        }

        out.push(spawn(path));
        if self.gen_rate >= MIN_ACCELERATING_GEN_RATE {
            self.gen_rate *= self.proportion;
        }
        self.tick_count = 0;
    }

    fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

fn spawn(path: &[Waypoint]) -> Command {
    Command::SpawnPackage {
        path: path.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_generator_never_spawns() {
        let mut generator = Generator::new(0);
        let mut out = Vec::new();
        for _ in 0..100 {
            generator.update(&[Waypoint::new(0, 0)], &mut out);
        }
        assert!(out.is_empty());
        assert_eq!(generator.tick_count(), 100);
    }

    #[test]
    fn exponential_rate_stops_decaying_below_floor() {
        let mut generator = ExponentialGenerator::new(31.0, 0.5);
        let mut out = Vec::new();
        for _ in 0..31 {
            generator.update(&[Waypoint::new(0, 0)], &mut out);
        }
        assert_eq!(out.len(), 1);
        assert_eq!(generator.gen_rate(), 15.5);

        for _ in 0..16 {
            generator.update(&[Waypoint::new(0, 0)], &mut out);
        }
        assert_eq!(out.len(), 2);
        assert_eq!(generator.gen_rate(), 15.5);
    }
}
