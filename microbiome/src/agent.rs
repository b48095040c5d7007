use crate::config::DepositMode;
use crate::field::TrailField;
use crate::preset::Preset;
use crate::vecmath;
use crate::vecmath::Vector;
use sat_rgb::Rgb;
use std::f64::consts::TAU;

/// things that never change during the lifetime of an agent,
/// copied from the preset it was spawned with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Traits {
    pub move_speed: f64,
    pub turn_speed: f64,
    pub sensor_size: u32,
    pub sensor_distance: f64,
    /// angle between the forward sensor and each side sensor
    pub sensor_offset_angle: f64,
    pub color: Rgb,
}

impl From<&Preset> for Traits {
    fn from(p: &Preset) -> Self {
        Self {
            move_speed: p.move_speed,
            turn_speed: p.turn_speed,
            sensor_size: p.sensor_size,
            sensor_distance: p.sensor_distance,
            sensor_offset_angle: p.sensor_offset_angle,
            color: p.color,
        }
    }
}

/// what the three sensors see
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readings {
    pub forward: u64,
    pub left: u64,
    pub right: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    pub pos: Vector,
    /// radians, never wrapped, only its sine and cosine matter
    pub heading: f64,
    pub traits: Traits,
}

impl Agent {
    pub fn new(pos: Vector, heading: f64, traits: Traits) -> Self {
        Self {
            pos,
            heading,
            traits,
        }
    }

    /// brightness around the point `sensor_distance` ahead of the agent,
    /// rotated by `offset_angle` from its heading
    pub fn sense(&self, field: &TrailField, offset_angle: f64) -> u64 {
        let sensor = vecmath::project(
            self.pos,
            self.heading + offset_angle,
            self.traits.sensor_distance,
        );
        field.sample_sum(sensor[0], sensor[1], self.traits.sensor_size)
    }

    pub fn readings(&self, field: &TrailField) -> Readings {
        let offset = self.traits.sensor_offset_angle;
        Readings {
            forward: self.sense(field, 0.),
            left: self.sense(field, offset),
            right: self.sense(field, -offset),
        }
    }

    /// turns towards the stronger trail, `random` is in 0..1
    pub fn steer(&mut self, field: &TrailField, random: f64, dt: f64) {
        let readings = self.readings(field);
        self.heading += steer_delta(readings, random, self.traits.turn_speed, dt);
    }

    /// one step: steer, then move along the heading the agent had before steering.
    ///
    /// an agent whose next position would leave the field is put back inside,
    /// `border` away from the edge, and faces a new random direction instead.
    /// `random` is the single random draw for this tick, used for both decisions.
    pub fn tick(&mut self, field: &TrailField, dt: f64, random: f64, border: f64) {
        let next = vecmath::project(self.pos, self.heading, self.traits.move_speed * dt);
        self.steer(field, random, dt);

        let (width, height) = (field.width() as f64, field.height() as f64);
        if next[0] < 0. || next[0] >= width || next[1] < 0. || next[1] >= height {
            self.pos = [
                (width - border).min(border.max(next[0])),
                (height - border).min(border.max(next[1])),
            ];
            self.heading = random * TAU;
        } else {
            self.pos = next;
        }
    }

    /// the pixel the agent is on
    pub fn cell(&self) -> (i64, i64) {
        (self.pos[0].floor() as i64, self.pos[1].floor() as i64)
    }

    pub fn deposit(&self, field: &TrailField, mode: DepositMode) {
        let (x, y) = self.cell();
        match mode {
            DepositMode::Add => field.deposit_add(x, y, self.traits.color),
            DepositMode::Overwrite => field.deposit_overwrite(x, y, self.traits.color),
        }
    }
}

/// how far to turn, a pure function of what the sensors saw.
///
/// forward strongest: keep going. forward weakest: turn a random amount either way.
/// otherwise turn towards the stronger side. exact ties fall through to no turn.
pub fn steer_delta(r: Readings, random: f64, turn_speed: f64, dt: f64) -> f64 {
    if r.forward > r.left && r.forward > r.right {
        0.
    } else if r.forward < r.left && r.forward < r.right {
        (random - 0.5) * 2. * turn_speed * dt
    } else if r.left < r.right {
        -random * turn_speed * dt
    } else if r.left > r.right {
        random * turn_speed * dt
    } else {
        0.
    }
}
