use crate::preset::{self, Preset, RandomLimits};
use thiserror::Error;

pub const FRAME_RATE: f64 = 90.;
pub const CANVAS_WIDTH: usize = 700;
pub const CANVAS_HEIGHT: usize = 500;
/// room below the canvas for the info panel, in pixels
pub const PANEL_HEIGHT: usize = 80;

pub const TOTAL_AGENTS: usize = 80_000;
pub const MIN_SPAWN_RADIUS: f64 = 100.;
pub const MAX_SPAWN_RADIUS: f64 = 200.;
/// agents that leave the canvas get put back this far inside the edge
pub const BORDER_SIZE: f64 = 15.;

/// per second, subtracted from every blurred channel
pub const DECAY_RATE: f64 = 2000.;
/// per second, how fast a pixel approaches its blurred value
pub const DIFFUSE_RATE: f64 = 10.;

pub const SEED: u64 = 1234;

/// upper bounds for the random species
pub mod random {
    pub const MAX_MOVE_SPEED: f64 = 1500.;
    pub const MAX_TURN_SPEED: f64 = 1500.;
    pub const MAX_SENSOR_DISTANCE: f64 = 200.;
    pub const MAX_SENSOR_OFFSET_ANGLE: f64 = std::f64::consts::TAU;
    /// a third of full intensity
    pub const MAX_CHANNEL: u8 = 255 / 3;
}

/// how an agent marks the field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DepositMode {
    /// add the agent colour to the pixel, saturating at 255
    #[default]
    Add,
    /// replace the pixel with the agent colour
    Overwrite,
}

/// where the deposit phase sits relative to diffusion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PhaseOrder {
    #[default]
    DiffuseThenDeposit,
    DepositThenDiffuse,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: usize, height: usize },
    #[error("frame rate must be a positive whole number, got {0}")]
    FrameRate(f64),
    #[error("population must contain at least one agent")]
    EmptyPopulation,
    #[error("preset catalog is empty")]
    NoPresets,
    #[error("invalid spawn radius range {min}..={max}")]
    SpawnRadius { min: f64, max: f64 },
}

/// everything a simulation run needs to know up front.
///
/// the defaults mirror the constants above, the driver overrides some of them from the
/// command line. nothing here changes while the simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub frame_rate: f64,
    pub population: usize,
    pub min_spawn_radius: f64,
    pub max_spawn_radius: f64,
    pub border: f64,
    pub decay_rate: f64,
    pub diffuse_rate: f64,
    pub deposit: DepositMode,
    pub order: PhaseOrder,
    pub seed: u64,
    /// order defines what next/previous cycle through
    pub presets: Vec<Preset>,
    pub random_limits: RandomLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            frame_rate: FRAME_RATE,
            population: TOTAL_AGENTS,
            min_spawn_radius: MIN_SPAWN_RADIUS,
            max_spawn_radius: MAX_SPAWN_RADIUS,
            border: BORDER_SIZE,
            decay_rate: DECAY_RATE,
            diffuse_rate: DIFFUSE_RATE,
            deposit: DepositMode::default(),
            order: PhaseOrder::default(),
            seed: SEED,
            presets: preset::catalog(),
            random_limits: RandomLimits::default(),
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        // the negated comparison also catches nan. the event loop only ticks a whole
        // number of times per second, anything else would make dt drift from wall time
        if !(self.frame_rate > 0.) || !self.frame_rate.is_finite() || self.frame_rate.fract() != 0.
        {
            return Err(ConfigError::FrameRate(self.frame_rate));
        }
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.presets.is_empty() {
            return Err(ConfigError::NoPresets);
        }
        let (min, max) = (self.min_spawn_radius, self.max_spawn_radius);
        if !(min >= 0.) || !(min <= max) || !max.is_finite() {
            return Err(ConfigError::SpawnRadius { min, max });
        }
        Ok(self)
    }

    /// fixed step, one frame worth of seconds
    pub fn dt(&self) -> f64 {
        1. / self.frame_rate
    }

    pub fn center(&self) -> [f64; 2] {
        [self.width as f64 / 2., self.height as f64 / 2.]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = Config::default().validate().unwrap();
        assert!((c.dt() - 1. / 90.).abs() < 1e-12);
        assert_eq!(c.center(), [350., 250.]);
    }

    #[test]
    fn rejects_empty_canvas() {
        let c = Config {
            width: 0,
            ..Config::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::EmptyCanvas {
                width: 0,
                height: CANVAS_HEIGHT
            })
        );
        let c = Config {
            height: 0,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::EmptyCanvas { .. })));
    }

    #[test]
    fn rejects_bad_frame_rate() {
        for rate in [0., -30., f64::NAN, f64::INFINITY, 0.4, 59.5] {
            let c = Config {
                frame_rate: rate,
                ..Config::default()
            };
            assert!(matches!(c.validate(), Err(ConfigError::FrameRate(_))));
        }
    }

    #[test]
    fn rejects_empty_population() {
        let c = Config {
            population: 0,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn rejects_empty_catalog() {
        let c = Config {
            presets: Vec::new(),
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::NoPresets));
    }

    #[test]
    fn rejects_inverted_radius() {
        let c = Config {
            min_spawn_radius: 50.,
            max_spawn_radius: 10.,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::SpawnRadius { .. })));
        let c = Config {
            min_spawn_radius: -1.,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::SpawnRadius { .. })));
    }
}
