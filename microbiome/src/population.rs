use crate::agent::{Agent, Traits};
use crate::config::DepositMode;
use crate::field::TrailField;
use crate::preset::Preset;
use crate::vecmath;
use crate::vecmath::Vector;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg as DetRng;
use rayon::prelude::IndexedParallelIterator;
use rayon::prelude::IntoParallelRefIterator;
use rayon::prelude::IntoParallelRefMutIterator;
use rayon::prelude::ParallelIterator;
use std::f64::consts::TAU;

/// all agents of one species, spawned together and replaced together
#[derive(Clone, Debug, PartialEq)]
pub struct Population {
    agents: Vec<Agent>,
    /// root of the per agent random streams
    seed: u64,
}

impl Population {
    /// scatters `count` agents uniformly by angle and distance inside a disc around `center`,
    /// each facing away from it.
    ///
    /// the disc radius is rolled once for the whole batch from `radius` (inclusive).
    /// both ends are first brought into 0..=half the smaller canvas side, nan counts as 0,
    /// and an inverted range is swapped, so any pair of numbers is accepted.
    pub fn spawn<R: Rng>(
        rng: &mut R,
        count: usize,
        center: Vector,
        radius: (f64, f64),
        canvas: (usize, usize),
        preset: &Preset,
    ) -> Self {
        let limit = canvas.0.min(canvas.1) as f64 / 2.;
        let bound = |r: f64| if r.is_nan() { 0. } else { r.clamp(0., limit) };
        let (a, b) = (bound(radius.0), bound(radius.1));
        let area_radius = rng.random_range(a.min(b)..=a.max(b));
        let traits = Traits::from(preset);
        let agents = (0..count)
            .map(|_| {
                let angle = rng.random_range(0.0..TAU);
                let distance = rng.random_range(0.0..=area_radius);
                Agent::new(vecmath::project(center, angle, distance), angle, traits)
            })
            .collect();
        Self {
            agents,
            seed: rng.random(),
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// every agent senses `field` and moves, in parallel.
    ///
    /// each agent gets its own generator seeded from the population seed, the tick and its
    /// index, so the outcome does not depend on how rayon splits the work.
    pub fn sense_and_move(&mut self, field: &TrailField, dt: f64, border: f64, tick: u64) {
        let seed = self.seed ^ tick.to_le().rotate_left(32);
        self.agents
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, agent)| {
                let mut rng = DetRng::seed_from_u64(seed ^ (index as u64));
                agent.tick(field, dt, rng.random(), border);
            });
    }

    /// every agent marks its current pixel, in parallel
    pub fn deposit(&self, field: &TrailField, mode: DepositMode) {
        self.agents
            .par_iter()
            .for_each(|agent| agent.deposit(field, mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset;
    use sat_rgb::Rgb;

    #[test]
    fn spawn_disc() {
        let mut rng = DetRng::seed_from_u64(3);
        let center = [350., 250.];
        let p = Population::spawn(
            &mut rng,
            1000,
            center,
            (50., 50.),
            (700, 500),
            &preset::catalog()[0],
        );
        assert_eq!(p.len(), 1000);
        for a in p.agents() {
            let d = vecmath::dist(a.pos, center);
            assert!(d <= 50. + 1e-9, "agent {:?} is {} away", a.pos, d);
            assert!((0.0..TAU).contains(&a.heading));
            if d > 1e-6 {
                // facing straight away from the centre
                let back = vecmath::project(a.pos, a.heading, -d);
                assert!(vecmath::dist(back, center) < 1e-6);
            }
        }
    }

    #[test]
    fn spawn_radius_is_capped() {
        let mut rng = DetRng::seed_from_u64(4);
        let p = Population::spawn(
            &mut rng,
            500,
            [50., 20.],
            (100., 300.),
            (100, 40),
            &preset::catalog()[1],
        );
        for a in p.agents() {
            assert!(vecmath::dist(a.pos, [50., 20.]) <= 20. + 1e-9);
        }
    }

    #[test]
    fn spawn_accepts_any_radius() {
        let preset = &preset::catalog()[0];
        let center = [50., 50.];
        // (range, largest possible distance)
        let cases = [
            ((8., 3.), 8.),
            ((-8., -3.), 0.),
            ((-5., 4.), 4.),
            ((f64::NAN, 2.), 2.),
            ((1., f64::INFINITY), 50.),
        ];
        for (seed, (radius, max)) in cases.into_iter().enumerate() {
            let mut rng = DetRng::seed_from_u64(seed as u64);
            let p = Population::spawn(&mut rng, 200, center, radius, (100, 100), preset);
            assert_eq!(p.len(), 200);
            for a in p.agents() {
                assert!(
                    vecmath::dist(a.pos, center) <= max + 1e-9,
                    "radius {:?}: agent at {:?}",
                    radius,
                    a.pos
                );
            }
        }
    }

    #[test]
    fn spawn_copies_traits() {
        let mut rng = DetRng::seed_from_u64(5);
        let preset = &preset::catalog()[3];
        let p = Population::spawn(&mut rng, 10, [10., 10.], (0., 5.), (20, 20), preset);
        assert!(p.agents().iter().all(|a| a.traits == Traits::from(preset)));
    }

    #[test]
    fn moves_reproducibly() {
        let mut field = TrailField::new(80, 60);
        field.set(40, 20, [200, 0, 0]);
        field.set(30, 35, [0, 90, 90]);
        let spawn = || {
            Population::spawn(
                &mut DetRng::seed_from_u64(9),
                2000,
                [40., 30.],
                (5., 25.),
                (80, 60),
                &preset::catalog()[0],
            )
        };
        let mut a = spawn();
        for tick in 0..30 {
            a.sense_and_move(&field, 1. / 90., 15., tick);
        }
        // the same work on a single thread
        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let b = single.install(|| {
            let mut b = spawn();
            for tick in 0..30 {
                b.sense_and_move(&field, 1. / 90., 15., tick);
            }
            b
        });
        assert_eq!(a, b);
        assert_ne!(a, spawn());
        assert!(a.agents().iter().all(|a| {
            (0.0..80.).contains(&a.pos[0]) && (0.0..60.).contains(&a.pos[1])
        }));
    }

    #[test]
    fn deposits_everyone() {
        let field = TrailField::new(30, 30);
        let mut preset = preset::catalog()[0].clone();
        preset.color = Rgb::new(1, 0, 0);
        let p = Population::spawn(
            &mut DetRng::seed_from_u64(1),
            200,
            [15., 15.],
            (3., 3.),
            (30, 30),
            &preset,
        );
        p.deposit(&field, DepositMode::Add);
        let total: u64 = (0..30)
            .flat_map(|y| (0..30).map(move |x| (x, y)))
            .map(|(x, y)| field.get(x, y).map_or(0, |c| c.r as u64))
            .sum();
        assert_eq!(total, 200);
    }
}
