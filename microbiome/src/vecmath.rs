/// contains some very simple helpers for moving points around

pub type Vector = [f64; 2];

/// the unit vector pointing at `angle` radians
pub fn from_angle(angle: f64) -> Vector {
    let (s, c) = angle.sin_cos();
    [c, s]
}

/// componet-wise addition
pub fn add(mut a: Vector, b: Vector) -> Vector {
    a[0] += b[0];
    a[1] += b[1];
    a
}

/// scales a vector by a scalar
pub fn scale(mut a: Vector, scalar: f64) -> Vector {
    a[0] *= scalar;
    a[1] *= scalar;
    a
}

/// moves `steps` units from `base` into the direction of `angle`
pub fn project(base: Vector, angle: f64, steps: f64) -> Vector {
    add(base, scale(from_angle(angle), steps))
}

/// euclidean distance between two points
#[cfg(test)]
pub fn dist(a: Vector, b: Vector) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

#[test]
fn projection() {
    let p = project([10., 10.], std::f64::consts::FRAC_PI_2, 5.);
    assert!(dist(p, [10., 15.]) < 1e-9);
    let p = project([0., 0.], 0., 3.);
    assert_eq!(p, [3., 0.]);
}
