extern crate std;
use crate::Rgb;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use std::boxed::Box;

impl Arbitrary for Rgb {
    fn arbitrary(g: &mut Gen) -> Self {
        Rgb::new(u8::arbitrary(g), u8::arbitrary(g), u8::arbitrary(g))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let [r, g, b] = self.channels();
        Box::new(
            r.shrink()
                .map(move |r| Rgb::new(r, g, b))
                .chain(g.shrink().map(move |g| Rgb::new(r, g, b)))
                .chain(b.shrink().map(move |b| Rgb::new(r, g, b))),
        )
    }
}

#[quickcheck]
fn clamped_matches_integer_clamp(r: i32, g: i32, b: i32) -> bool {
    let c = Rgb::clamped(r, g, b);
    c.r as i32 == r.clamp(0, 255) && c.g as i32 == g.clamp(0, 255) && c.b as i32 == b.clamp(0, 255)
}

#[quickcheck]
fn add_commutes(a: Rgb, b: Rgb) -> bool {
    a.saturating_add(b) == b.saturating_add(a)
}

#[quickcheck]
fn add_associates(a: Rgb, b: Rgb, c: Rgb) -> bool {
    a.saturating_add(b).saturating_add(c) == a.saturating_add(b.saturating_add(c))
}

#[quickcheck]
fn add_never_darkens(a: Rgb, b: Rgb) -> bool {
    let s = a.saturating_add(b);
    s.r >= a.r && s.g >= a.g && s.b >= a.b
}

#[quickcheck]
fn lerp_stays_between(old: Rgb, target: (i16, i16, i16), t: f64) -> bool {
    let target = [target.0 as i32, target.1 as i32, target.2 as i32];
    let new = old.lerp_towards(target, t);
    new.channels()
        .iter()
        .zip(old.channels())
        .zip(target)
        .all(|((&n, o), t)| {
            let lo = (o as i32).min(t).max(0);
            let hi = (o as i32).max(t).min(255);
            (lo..=hi).contains(&(n as i32))
        })
}
