use crate::field::TrailField;
use rayon::prelude::IndexedParallelIterator;
use rayon::prelude::ParallelIterator;
use rayon::prelude::ParallelSliceMut;
use sat_rgb::Rgb;

/// the per-frame blur, decay and smoothing step.
///
/// every output pixel is the 3x3 box mean of the source around it, darkened by the decay
/// and then blended with the old value. the mean always divides by 9, so edge and corner
/// pixels come out darker than interior ones.
///
/// output only ever depends on the source field, so rows are computed in parallel
/// and the scan order can not leak into the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionPass {
    decay_per_second: f64,
    diffuse_per_second: f64,
}

impl DiffusionPass {
    pub fn new(decay_per_second: f64, diffuse_per_second: f64) -> Self {
        Self {
            decay_per_second,
            diffuse_per_second,
        }
    }

    /// writes the diffused version of `src` into `dst`, both need the same size
    pub fn apply(&self, src: &TrailField, dst: &mut TrailField, dt: f64) {
        debug_assert_eq!(
            (src.width(), src.height()),
            (dst.width(), dst.height()),
            "diffusion buffers differ in size"
        );
        let width = src.width();
        let decay = (self.decay_per_second * dt).floor() as i32;
        let blend = self.diffuse_per_second * dt;
        dst.cells_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    *out.get_mut() = blur_pixel(src, x, y, decay, blend);
                }
            });
    }
}

fn blur_pixel(src: &TrailField, x: usize, y: usize, decay: i32, blend: f64) -> Rgb {
    let mut sum = [0i32; 3];
    // out of bounds neighbours are simply skipped, they count as 0
    for sy in y.saturating_sub(1)..=(y + 1).min(src.height() - 1) {
        for sx in x.saturating_sub(1)..=(x + 1).min(src.width() - 1) {
            let c = src.cell(sx, sy);
            sum[0] += c.r as i32;
            sum[1] += c.g as i32;
            sum[2] += c.b as i32;
        }
    }
    let decayed = sum.map(|s| s / 9 - decay);
    src.cell(x, y).lerp_towards(decayed, blend)
}
