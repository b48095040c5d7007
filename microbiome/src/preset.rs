use crate::config;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg as DetRng;
use sat_rgb::Rgb;
use std::f64::consts::PI;

/// one species: how its agents move, sense and what colour they leave behind
#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    pub name: String,
    pub move_speed: f64,
    pub turn_speed: f64,
    /// half width of the square each sensor samples, 0 samples a single pixel
    pub sensor_size: u32,
    pub sensor_distance: f64,
    pub sensor_offset_angle: f64,
    pub color: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomLimits {
    pub max_move_speed: f64,
    pub max_turn_speed: f64,
    pub max_sensor_distance: f64,
    pub max_sensor_offset_angle: f64,
    pub max_channel: u8,
}

impl Default for RandomLimits {
    fn default() -> Self {
        use config::random::*;
        Self {
            max_move_speed: MAX_MOVE_SPEED,
            max_turn_speed: MAX_TURN_SPEED,
            max_sensor_distance: MAX_SENSOR_DISTANCE,
            max_sensor_offset_angle: MAX_SENSOR_OFFSET_ANGLE,
            max_channel: MAX_CHANNEL,
        }
    }
}

impl Preset {
    /// rolls a new species, every value uniform within `limits`.
    /// the same seed always gives the same species.
    pub fn random(seed: u64, limits: &RandomLimits) -> Self {
        let mut rng = DetRng::seed_from_u64(seed);
        let tag: u32 = rng.random_range(0..1000);
        let mut channel = || rng.random_range(0..=limits.max_channel);
        let color = Rgb::new(channel(), channel(), channel());
        Self {
            name: format!("Random Species RAND-{}", tag),
            move_speed: rng.random_range(0.0..=limits.max_move_speed),
            turn_speed: rng.random_range(0.0..=limits.max_turn_speed),
            sensor_size: 1,
            sensor_distance: rng.random_range(0.0..=limits.max_sensor_distance),
            sensor_offset_angle: rng.random_range(0.0..=limits.max_sensor_offset_angle),
            color,
        }
    }
}

// name, move speed, turn speed, sensor size, sensor distance, sensor offset, colour
type Row = (&'static str, f64, f64, u32, f64, f64, [u8; 3]);

const CATALOG: [Row; 17] = [
    ("Default", 100., 80., 1, 8., PI / 4., [255, 255, 255]),
    ("Bread Bug", 60., 40., 1, 20., PI / 3., [40, 28, 10]),
    ("Vein", 200., 300., 1, 30., PI / 8., [80, 5, 5]),
    ("Venom", 150., 600., 2, 12., PI / 2., [20, 60, 10]),
    ("Star Dust", 400., 900., 0, 3., PI / 6., [30, 30, 60]),
    ("Liquid Gem", 120., 50., 1, 45., PI / 5., [5, 40, 55]),
    ("Water Bug", 90., 200., 1, 10., PI * 0.75, [10, 25, 60]),
    ("Blood Stealer", 300., 120., 2, 60., PI / 10., [90, 0, 10]),
    ("Gene", 80., 400., 1, 6., PI / 2.5, [50, 20, 70]),
    ("Virus", 500., 1200., 1, 25., PI / 1.5, [15, 80, 30]),
    ("Alpha", 250., 250., 1, 15., PI / 4., [70, 70, 20]),
    ("Beta", 250., 250., 1, 15., PI / 12., [20, 70, 70]),
    ("Fire Fly", 700., 1000., 0, 40., PI / 3., [85, 45, 0]),
    ("Flour Bug", 40., 30., 2, 5., PI / 6., [60, 55, 45]),
    ("Parallel", 180., 20., 1, 100., PI / 16., [40, 40, 85]),
    ("COVID", 350., 700., 1, 18., PI * 0.9, [75, 10, 40]),
    ("Cell", 70., 150., 1, 9., PI / 2., [30, 85, 60]),
];

/// the built-in species, in cycling order
pub fn catalog() -> Vec<Preset> {
    CATALOG
        .iter()
        .map(
            |&(name, move_speed, turn_speed, sensor_size, sensor_distance, sensor_offset_angle, color)| {
                Preset {
                    name: name.to_owned(),
                    move_speed,
                    turn_speed,
                    sensor_size,
                    sensor_distance,
                    sensor_offset_angle,
                    color: color.into(),
                }
            },
        )
        .collect()
}

/// position in the preset catalog, wrapping around at both ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    /// len must not be 0, a validated config guarantees that
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0);
        Self { index: 0, len }
    }
    pub fn index(self) -> usize {
        self.index
    }
    pub fn rotate(self) -> Self {
        Self {
            index: (self.index + 1) % self.len,
            ..self
        }
    }
    pub fn rotate_rev(self) -> Self {
        let index = if self.index == 0 {
            self.len - 1
        } else {
            self.index - 1
        };
        Self { index, ..self }
    }
}

#[test]
fn catalog_is_sane() {
    let c = catalog();
    assert_eq!(c.len(), 17);
    assert_eq!(c[0].name, "Default");
    for p in &c {
        assert!(p.move_speed >= 0.);
        assert!(p.turn_speed >= 0.);
        assert!(p.sensor_distance >= 0.);
    }
}

#[test]
fn cursor_wraps() {
    let c = Cursor::new(3);
    assert_eq!(c.rotate().index(), 1);
    assert_eq!(c.rotate().rotate().rotate().index(), 0);
    assert_eq!(c.rotate_rev().index(), 2);
    assert_eq!(c.rotate_rev().rotate().index(), 0);
}

#[test]
fn random_within_limits() {
    let limits = RandomLimits::default();
    for seed in 0..200 {
        let p = Preset::random(seed, &limits);
        assert!(p.name.starts_with("Random Species RAND-"));
        assert!((0.0..=limits.max_move_speed).contains(&p.move_speed));
        assert!((0.0..=limits.max_turn_speed).contains(&p.turn_speed));
        assert!((0.0..=limits.max_sensor_distance).contains(&p.sensor_distance));
        assert!((0.0..=limits.max_sensor_offset_angle).contains(&p.sensor_offset_angle));
        assert_eq!(p.sensor_size, 1);
        assert!(p.color.channels().iter().all(|&c| c <= 85));
    }
}

#[test]
fn random_is_seeded() {
    let limits = RandomLimits::default();
    assert_eq!(Preset::random(7, &limits), Preset::random(7, &limits));
    assert_ne!(Preset::random(7, &limits), Preset::random(8, &limits));
}
