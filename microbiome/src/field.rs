use crate::diffusion::DiffusionPass;
use atomic::{Atomic, Ordering};
use rayon::prelude::IntoParallelRefIterator;
use rayon::prelude::IntoParallelRefMutIterator;
use rayon::prelude::ParallelExtend;
use rayon::prelude::ParallelIterator;
use sat_rgb::Rgb;

#[test]
fn rgb_atomic() {
    assert!(Atomic::<Rgb>::is_lock_free());
}

/// the shared trail grid, row major.
///
/// cells are atomic so that any number of agents can deposit through a shared reference
/// at the same time. there is no synchronization between the writers other than the
/// per-cell operation, and every phase that reads the field runs after the phase that
/// wrote it has been joined, so relaxed ordering is enough everywhere.
pub struct TrailField {
    width: usize,
    height: usize,
    cells: Vec<Atomic<Rgb>>,
}

impl TrailField {
    /// an all black field
    pub fn new(width: usize, height: usize) -> Self {
        let cells = (0..width * height)
            .map(|_| Atomic::new(Rgb::BLACK))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Rgb> {
        self.index(x, y)
            .map(|i| self.cells[i].load(Ordering::Relaxed))
    }

    /// stores the clamped channels, returns false if (x, y) is outside the field
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set(&mut self, x: i64, y: i64, channels: [i32; 3]) -> bool {
        match self.index(x, y) {
            Some(i) => {
                *self.cells[i].get_mut() = Rgb::from_channels(channels);
                true
            }
            None => false,
        }
    }

    /// sums r + g + b over the square of side `2 * half_width + 1` around (cx, cy).
    /// cells outside the field count as black.
    pub fn sample_sum(&self, cx: f64, cy: f64, half_width: u32) -> u64 {
        let (cx, cy) = (cx.floor() as i64, cy.floor() as i64);
        let hw = half_width as i64;
        let mut sum = 0;
        for y in (cy - hw)..=(cy + hw) {
            for x in (cx - hw)..=(cx + hw) {
                if let Some(c) = self.get(x, y) {
                    sum += c.brightness() as u64;
                }
            }
        }
        sum
    }

    /// adds `color` onto the cell, saturating. safe to call from many threads at once,
    /// the outcome does not depend on the order of concurrent deposits.
    pub fn deposit_add(&self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            // never fails, the closure never gives up
            let _ = self.cells[i].fetch_update(Ordering::Relaxed, Ordering::Relaxed, |old| {
                Some(old.saturating_add(color))
            });
        }
    }

    pub fn deposit_overwrite(&self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.cells[i].store(color, Ordering::Relaxed);
        }
    }

    pub fn clear(&mut self) {
        self.cells
            .par_iter_mut()
            .for_each(|c| *c.get_mut() = Rgb::BLACK);
    }

    /// replaces the contents of `buf` with a row major copy of the field
    pub fn snapshot_into(&self, buf: &mut Vec<Rgb>) {
        buf.clear();
        buf.par_extend(self.cells.par_iter().map(|c| c.load(Ordering::Relaxed)));
    }

    /// one blur + decay step into a freshly allocated field, see [`DiffusionPass`].
    /// the simulation uses [`TrailField::diffuse_into`] on a reused buffer instead.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn diffuse(&self, decay_per_second: f64, diffuse_per_second: f64, dt: f64) -> Self {
        let mut out = Self::new(self.width, self.height);
        self.diffuse_into(
            &mut out,
            &DiffusionPass::new(decay_per_second, diffuse_per_second),
            dt,
        );
        out
    }

    /// overwrites every cell of `out`, which must have the same size
    pub fn diffuse_into(&self, out: &mut Self, pass: &DiffusionPass, dt: f64) {
        pass.apply(self, out, dt);
    }

    /// unchecked read for callers that iterate the field themselves
    pub(crate) fn cell(&self, x: usize, y: usize) -> Rgb {
        self.cells[y * self.width + x].load(Ordering::Relaxed)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Atomic<Rgb>] {
        &mut self.cells
    }
}

impl PartialEq for TrailField {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(s, o)| s.load(Ordering::Relaxed) == o.load(Ordering::Relaxed))
    }
}

impl std::fmt::Debug for TrailField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self
            .cells
            .iter()
            .filter(|c| c.load(Ordering::Relaxed) != Rgb::BLACK)
            .count();
        f.debug_struct("TrailField")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("lit", &lit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::IntoParallelIterator;

    #[test]
    fn get_set_bounds() {
        let mut f = TrailField::new(4, 3);
        assert!(f.set(3, 2, [1, 2, 3]));
        assert_eq!(f.get(3, 2), Some(Rgb::new(1, 2, 3)));
        assert!(!f.set(4, 0, [1, 1, 1]));
        assert!(!f.set(0, -1, [1, 1, 1]));
        assert_eq!(f.get(0, 3), None);
        assert_eq!(f.get(-1, 0), None);
    }

    #[test]
    fn set_clamps() {
        let mut f = TrailField::new(2, 2);
        f.set(0, 0, [-40, 999, 255]);
        assert_eq!(f.get(0, 0), Some(Rgb::new(0, 255, 255)));
    }

    #[test]
    fn sample_sum_square() {
        let mut f = TrailField::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                f.set(x, y, [1, 1, 1]);
            }
        }
        // 3x3 fully inside
        assert_eq!(f.sample_sum(2.5, 2.9, 1), 27);
        // half width 0 is a single pixel
        assert_eq!(f.sample_sum(2., 2., 0), 3);
        // corner, only 2x2 of the 3x3 is inside
        assert_eq!(f.sample_sum(0., 0., 1), 12);
        // completely outside
        assert_eq!(f.sample_sum(-10., 40., 2), 0);
        // just left of the edge floors to -1
        assert_eq!(f.sample_sum(-0.5, 2., 0), 0);
    }

    #[test]
    fn deposit_saturates() {
        let f = TrailField::new(1, 1);
        f.deposit_add(0, 0, Rgb::new(200, 100, 0));
        f.deposit_add(0, 0, Rgb::new(100, 100, 1));
        assert_eq!(f.get(0, 0), Some(Rgb::new(255, 200, 1)));
        // out of range is ignored
        f.deposit_add(1, 0, Rgb::WHITE);
        f.deposit_overwrite(0, 5, Rgb::WHITE);
        f.deposit_overwrite(0, 0, Rgb::new(9, 9, 9));
        assert_eq!(f.get(0, 0), Some(Rgb::new(9, 9, 9)));
    }

    #[test]
    fn deposit_order_does_not_matter() {
        let a = Rgb::new(200, 3, 70);
        let b = Rgb::new(90, 250, 70);
        let ab = TrailField::new(1, 1);
        ab.deposit_add(0, 0, a);
        ab.deposit_add(0, 0, b);
        let ba = TrailField::new(1, 1);
        ba.deposit_add(0, 0, b);
        ba.deposit_add(0, 0, a);
        assert_eq!(ab, ba);
        assert_eq!(ab.get(0, 0), Some(Rgb::new(255, 253, 140)));
    }

    #[test]
    fn parallel_deposits() {
        let f = TrailField::new(2, 1);
        (0..10_000).into_par_iter().for_each(|i| {
            f.deposit_add(i % 2, 0, Rgb::new(0, 0, 1));
        });
        assert_eq!(f.get(0, 0), Some(Rgb::new(0, 0, 255)));
        assert_eq!(f.get(1, 0), Some(Rgb::new(0, 0, 255)));

        let f = TrailField::new(1, 1);
        (0..100).into_par_iter().for_each(|_| {
            f.deposit_add(0, 0, Rgb::new(1, 0, 0));
        });
        assert_eq!(f.get(0, 0), Some(Rgb::new(100, 0, 0)));
    }

    #[test]
    fn clear_and_snapshot() {
        let mut f = TrailField::new(3, 2);
        f.set(1, 1, [5, 6, 7]);
        let mut buf = vec![Rgb::WHITE; 100];
        f.snapshot_into(&mut buf);
        assert_eq!(buf.len(), 6);
        assert_eq!(buf[4], Rgb::new(5, 6, 7));
        f.clear();
        f.snapshot_into(&mut buf);
        assert!(buf.iter().all(|&c| c == Rgb::BLACK));
    }
}
