#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step game loop that drives the factory, the generator and the controller.
//!
//! Each tick runs strictly in order: spawn, move packages, let towers capture,
//! draw, then apply the player's input.

use anyhow::Result as AnyResult;
use logistico_core::{Command, Event};
use logistico_system_control::{Control, InputSource};
use logistico_system_spawning::PackageSource;
use logistico_world::{self as world, query, Factory};
use tracing::{debug, info};

/// Failed packages that end a session unless configured otherwise.
pub const DEFAULT_MAX_FAILED: u32 = 10;

/// Whether the session keeps running after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// More ticks may follow.
    Running,
    /// Too many packages failed.
    Lost,
    /// The player asked to quit.
    Quit,
}

impl TickOutcome {
    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Result of a single tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Zero-based index of the tick that just ran.
    pub tick: u64,
    /// Events emitted by the factory during the tick, in order.
    pub events: Vec<Event>,
    /// Session state after the tick.
    pub outcome: TickOutcome,
}

/// Draw sink invoked once per tick with the factory state after the simulation step.
pub trait Presenter {
    /// Presents the current factory state.
    fn present(&mut self, factory: &Factory) -> AnyResult<()>;
}

/// Summary of a [`Session::run`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed by this call.
    pub ticks: u64,
    /// Final outcome; `Running` when the tick cap was reached first.
    pub outcome: TickOutcome,
}

/// Owns every piece of game state and advances it one tick at a time.
#[derive(Debug)]
pub struct Session {
    factory: Factory,
    source: Box<dyn PackageSource>,
    control: Control,
    max_failed: u32,
    tick: u64,
}

impl Session {
    /// Creates a session ending once `max_failed` packages have failed.
    #[must_use]
    pub fn new(
        factory: Factory,
        source: Box<dyn PackageSource>,
        control: Control,
        max_failed: u32,
    ) -> Self {
        Self {
            factory,
            source,
            control,
            max_failed,
            tick: 0,
        }
    }

    /// Factory driven by the session.
    #[must_use]
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// Ticks executed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }

    /// Reports whether enough packages failed to end the session.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        query::failed(&self.factory) >= self.max_failed
    }

    /// Runs a single tick, presenting through `presenter` and reading one frame from `input`.
    ///
    /// The tick always runs to completion. A presenter failure is returned
    /// only after the input was applied and the tick counted.
    pub fn tick(
        &mut self,
        input: &mut dyn InputSource,
        presenter: &mut dyn Presenter,
    ) -> AnyResult<TickReport> {
        let tick = self.tick;
        let mut events = Vec::new();

        let mut commands = Vec::new();
        self.source.update(query::path(&self.factory), &mut commands);
        commands.push(Command::UpdatePackages);
        commands.push(Command::UpdateTowers);
        self.apply_all(commands, &mut events);

        let presented = presenter.present(&self.factory);

        let frame = input.poll();
        let mut commands = Vec::new();
        let factory = &self.factory;
        self.control.handle(
            &frame,
            query::placement_bounds(factory),
            |point| query::towers_at(factory, point),
            &mut commands,
        );
        self.apply_all(commands, &mut events);

        self.tick += 1;
        for event in &events {
            debug!(tick, ?event, "factory event");
        }
        presented?;

        let outcome = if self.is_lost() {
            TickOutcome::Lost
        } else if frame.quit_requested() {
            TickOutcome::Quit
        } else {
            TickOutcome::Running
        };

        Ok(TickReport {
            tick,
            events,
            outcome,
        })
    }

    /// Ticks until the session ends or `max_ticks` ticks have run.
    ///
    /// A session that already lost runs no tick at all.
    pub fn run(
        &mut self,
        max_ticks: Option<u64>,
        input: &mut dyn InputSource,
        presenter: &mut dyn Presenter,
    ) -> AnyResult<RunSummary> {
        info!(max_failed = self.max_failed, "session started");

        let mut ticks = 0;
        let mut outcome = if self.is_lost() {
            TickOutcome::Lost
        } else {
            TickOutcome::Running
        };

        while !outcome.is_finished() && max_ticks.map_or(true, |cap| ticks < cap) {
            outcome = self.tick(input, presenter)?.outcome;
            ticks += 1;
        }

        let scoreboard = query::scoreboard(&self.factory);
        info!(
            ticks,
            ?outcome,
            packed = scoreboard.packed,
            failed = scoreboard.failed,
            money = scoreboard.money,
            "session stopped"
        );
        Ok(RunSummary { ticks, outcome })
    }

    fn apply_all(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.factory, command, events);
        }
    }
}
