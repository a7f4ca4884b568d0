//! Time-bounded interpolation for the shared-element morph and tile dimming.
//!
//! A [`Tween`] is advanced by runtime ticks and never gates input. Retargeting
//! mid-flight restarts from the currently displayed value, so interrupted
//! transitions cannot leave geometry or opacity stranded.

use std::time::Duration;

use crate::Rect;

/// Values that can be blended between two endpoints.
pub trait Lerp: Copy + PartialEq {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Rect {
    fn lerp(self, to: Self, t: f32) -> Self {
        fn mix(a: u16, b: u16, t: f32) -> u16 {
            let value = a as f32 + (b as f32 - a as f32) * t;
            value.round().clamp(0.0, u16::MAX as f32) as u16
        }
        Rect::new(
            mix(self.x, to.x, t),
            mix(self.y, to.y, t),
            mix(self.width, to.width, t),
            mix(self.height, to.height, t),
        )
    }
}

/// Evaluate the CSS `cubic-bezier(x1, y1, x2, y2)` timing function at `t`.
pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }

    let curve = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };
    let slope = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
    };

    // Newton first, bisection when the slope flattens out.
    let mut s = t;
    for _ in 0..8 {
        let err = curve(x1, x2, s) - t;
        if err.abs() < 1e-5 {
            return curve(y1, y2, s);
        }
        let d = slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = t;
    for _ in 0..32 {
        let x = curve(x1, x2, s);
        if (x - t).abs() < 1e-5 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    curve(y1, y2, s)
}

/// The panel easing, `cubic-bezier(0.25, 0.1, 0.25, 1)`.
pub fn ease_standard(t: f32) -> f32 {
    cubic_bezier(0.25, 0.1, 0.25, 1.0, t)
}

#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    elapsed: Duration,
    duration: Duration,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// A tween already resting at `value`.
    pub fn settled(value: T) -> Self {
        Self::new(value, value, Duration::ZERO)
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.duration || self.from == self.to
    }

    /// Eased progress in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.is_settled() {
            return 1.0;
        }
        let linear = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        ease_standard(linear)
    }

    pub fn current(&self) -> T {
        if self.is_settled() {
            return self.to;
        }
        self.from.lerp(self.to, self.progress())
    }

    /// Move time forward. Returns true while the displayed value changes.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.is_settled() {
            return false;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
        true
    }

    /// Head for `to`, starting from whatever is displayed right now.
    /// Retargeting to the current target keeps the flight untouched.
    pub fn retarget(&mut self, to: T, duration: Duration) {
        if to == self.to {
            return;
        }
        self.from = self.current();
        self.to = to;
        self.elapsed = Duration::ZERO;
        self.duration = duration;
    }

    /// Jump straight to `value` without animating.
    pub fn snap(&mut self, value: T) {
        *self = Self::settled(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn easing_hits_endpoints_and_is_monotonic() {
        assert_eq!(ease_standard(0.0), 0.0);
        assert_eq!(ease_standard(1.0), 1.0);
        let mut last = 0.0;
        for step in 1..=20 {
            let value = ease_standard(step as f32 / 20.0);
            assert!(value >= last - 1e-4, "easing went backwards at {step}");
            last = value;
        }
        // The curve front-loads motion.
        assert!(ease_standard(0.5) > 0.7);
    }

    #[test]
    fn tween_reaches_target_exactly() {
        let mut tween = Tween::new(Rect::new(0, 0, 10, 4), Rect::new(20, 10, 60, 20), 400 * MS);
        assert!(tween.advance(150 * MS));
        let mid = tween.current();
        assert!(mid.width > 10 && mid.width < 60);
        tween.advance(400 * MS);
        assert!(tween.is_settled());
        assert_eq!(tween.current(), Rect::new(20, 10, 60, 20));
        assert!(!tween.advance(16 * MS));
    }

    #[test]
    fn retarget_starts_from_displayed_value() {
        let mut tween = Tween::new(1.0f32, 0.4, 250 * MS);
        tween.advance(100 * MS);
        let shown = tween.current();
        tween.retarget(1.0, 250 * MS);
        assert!((tween.current() - shown).abs() < 1e-6);
        tween.advance(250 * MS);
        assert_eq!(tween.current(), 1.0);
    }

    #[test]
    fn rapid_retargets_settle_on_last_target() {
        let mut tween = Tween::settled(Rect::new(0, 0, 10, 10));
        let panel = Rect::new(5, 2, 70, 20);
        let tile = Rect::new(0, 0, 10, 10);
        for i in 0..10 {
            let target = if i % 2 == 0 { panel } else { tile };
            tween.retarget(target, 400 * MS);
            tween.advance(30 * MS);
        }
        tween.retarget(tile, 400 * MS);
        tween.advance(Duration::from_secs(1));
        assert_eq!(tween.current(), tile);
    }

    #[test]
    fn zero_duration_is_immediate() {
        let tween = Tween::new(0.0f32, 1.0, Duration::ZERO);
        assert!(tween.is_settled());
        assert_eq!(tween.current(), 1.0);
    }
}
