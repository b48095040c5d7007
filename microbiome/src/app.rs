use crate::config::{Config, ConfigError, PhaseOrder};
use crate::diffusion::DiffusionPass;
use crate::field::TrailField;
use crate::population::Population;
use crate::preset::{Cursor, Preset};
use crate::vecmath::Vector;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg as DetRng;
use sat_rgb::Rgb;
use std::time::Instant;

/// the steps of one tick. every phase is a rayon loop that only returns once all of its
/// work is done, so the next phase always sees the complete result of the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// agents read the field and move, the field is read only
    SenseAndMove,
    /// the field is blurred into the spare buffer, then the buffers swap
    Diffuse,
    /// agents add their colour at their new position
    Deposit,
    /// the frame buffer is refreshed and the tick ends
    Present,
}

impl Phase {
    pub fn schedule(order: PhaseOrder) -> [Phase; 4] {
        use Phase::*;
        match order {
            PhaseOrder::DiffuseThenDeposit => [SenseAndMove, Diffuse, Deposit, Present],
            PhaseOrder::DepositThenDiffuse => [SenseAndMove, Deposit, Diffuse, Present],
        }
    }
}

/// things that can happen between two ticks
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    NextPreset,
    PreviousPreset,
    /// a freshly rolled species, the same seed always gives the same one
    RandomPreset(u64),
    /// replaces everything with agents of `preset`, `radius` is the inclusive range the
    /// spawn disc radius is picked from
    #[cfg_attr(not(test), allow(dead_code))]
    Respawn {
        preset: Preset,
        center: Vector,
        radius: (f64, f64),
    },
}

#[derive(Debug)]
pub struct App {
    config: Config,
    field: TrailField,
    /// the other half of the double buffer, its contents are meaningless between ticks
    scratch: TrailField,
    population: Population,
    diffusion: DiffusionPass,
    cursor: Cursor,
    preset: Preset,
    rng: DetRng,
    tick: u64,
    frame: Vec<Rgb>,
}

impl App {
    /// validates `config` and spawns the first preset of the catalog around the canvas centre
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let mut rng = DetRng::seed_from_u64(config.seed);
        let cursor = Cursor::new(config.presets.len());
        let preset = config.presets[cursor.index()].clone();
        let population = Population::spawn(
            &mut rng,
            config.population,
            config.center(),
            (config.min_spawn_radius, config.max_spawn_radius),
            (config.width, config.height),
            &preset,
        );
        log::info!(
            "{}x{} canvas, {} agents of {}, seed {}",
            config.width,
            config.height,
            population.len(),
            preset.name,
            config.seed
        );
        let field = TrailField::new(config.width, config.height);
        let mut frame = Vec::with_capacity(config.width * config.height);
        field.snapshot_into(&mut frame);
        Ok(Self {
            scratch: TrailField::new(config.width, config.height),
            diffusion: DiffusionPass::new(config.decay_rate, config.diffuse_rate),
            field,
            population,
            cursor,
            preset,
            rng,
            tick: 0,
            frame,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn field(&self) -> &TrailField {
        &self.field
    }
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn population(&self) -> &Population {
        &self.population
    }
    /// the species currently on screen
    pub fn preset(&self) -> &Preset {
        &self.preset
    }
    pub fn tick(&self) -> u64 {
        self.tick
    }
    /// row major, width x height, refreshed once per completed tick
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    /// advances the simulation by one fixed step of 1 / frame rate seconds
    pub fn update(&mut self) {
        for phase in Phase::schedule(self.config.order) {
            let start = Instant::now();
            self.run(phase);
            log::trace!("tick {} {:?}: {:?}", self.tick, phase, start.elapsed());
        }
    }

    fn run(&mut self, phase: Phase) {
        let dt = self.config.dt();
        match phase {
            Phase::SenseAndMove => {
                self.population
                    .sense_and_move(&self.field, dt, self.config.border, self.tick)
            }
            Phase::Diffuse => {
                self.field
                    .diffuse_into(&mut self.scratch, &self.diffusion, dt);
                std::mem::swap(&mut self.field, &mut self.scratch);
            }
            Phase::Deposit => self.population.deposit(&self.field, self.config.deposit),
            Phase::Present => {
                self.field.snapshot_into(&mut self.frame);
                self.tick += 1;
            }
        }
    }

    pub fn apply(&mut self, command: Command) {
        let center = self.config.center();
        let radius = (self.config.min_spawn_radius, self.config.max_spawn_radius);
        match command {
            Command::NextPreset => {
                self.cursor = self.cursor.rotate();
                let preset = self.config.presets[self.cursor.index()].clone();
                self.respawn(preset, center, radius);
            }
            Command::PreviousPreset => {
                self.cursor = self.cursor.rotate_rev();
                let preset = self.config.presets[self.cursor.index()].clone();
                self.respawn(preset, center, radius);
            }
            Command::RandomPreset(seed) => {
                let preset = Preset::random(seed, &self.config.random_limits);
                self.respawn(preset, center, radius);
            }
            Command::Respawn {
                preset,
                center,
                radius,
            } => self.respawn(preset, center, radius),
        }
    }

    /// wipes the field and replaces the whole population.
    /// `radius` is sanitised by [`Population::spawn`], no range makes this fail.
    pub fn respawn(&mut self, preset: Preset, center: Vector, radius: (f64, f64)) {
        self.field.clear();
        self.population = Population::spawn(
            &mut self.rng,
            self.config.population,
            center,
            radius,
            (self.config.width, self.config.height),
            &preset,
        );
        self.field.snapshot_into(&mut self.frame);
        log::info!(
            "spawned {} agents of {} at tick {}: move {:.2} turn {:.2} sensor {} {:.2} {:.2} colour {:?}",
            self.population.len(),
            preset.name,
            self.tick,
            preset.move_speed,
            preset.turn_speed,
            preset.sensor_size,
            preset.sensor_distance,
            preset.sensor_offset_angle,
            preset.color.channels(),
        );
        self.preset = preset;
    }
}

impl PartialEq for App {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.preset == other.preset
            && self.population == other.population
            && self.field == other.field
            && self.frame == other.frame
    }
}
