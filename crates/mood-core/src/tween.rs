//! Time-based interpolation used for every preset transition.

use crate::color::{Gradient, Rgba};

pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: f32, t: f32) -> f32 {
        self + (to - self) * t
    }
}

impl Lerp for Rgba {
    fn lerp(self, to: Rgba, t: f32) -> Rgba {
        Rgba::lerp(self, to, t)
    }
}

impl Lerp for Gradient {
    fn lerp(self, to: Gradient, t: f32) -> Gradient {
        Gradient::lerp(&self, &to, t)
    }
}

/// Smoothstep-style ease-in-out.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// A value that eases toward its latest target over a fixed duration.
///
/// Retargeting mid-flight starts the new ease from the current value, so
/// there is never a jump.
#[derive(Clone, Copy, Debug)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    start_sec: f64,
    duration_sec: f64,
}

impl<T: Lerp> Tween<T> {
    pub fn new(value: T, duration_sec: f64) -> Self {
        Self {
            from: value,
            to: value,
            start_sec: 0.0,
            duration_sec,
        }
    }

    pub fn retarget(&mut self, to: T, now_sec: f64) {
        self.from = self.value(now_sec);
        self.to = to;
        self.start_sec = now_sec;
    }

    pub fn progress(&self, now_sec: f64) -> f32 {
        if self.duration_sec <= 0.0 {
            return 1.0;
        }
        ((now_sec - self.start_sec) / self.duration_sec).clamp(0.0, 1.0) as f32
    }

    /// Exactly the target once the ease has finished.
    pub fn value(&self, now_sec: f64) -> T {
        let p = self.progress(now_sec);
        if p >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, ease_in_out(p))
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_settled(&self, now_sec: f64) -> bool {
        self.progress(now_sec) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retarget_continues_from_current_value() {
        let mut t = Tween::new(0.0_f32, 1.0);
        t.retarget(1.0, 0.0);
        let mid = t.value(0.5);
        assert!((mid - 0.5).abs() < 1e-6);
        t.retarget(0.0, 0.5);
        assert!((t.value(0.5) - mid).abs() < 1e-6);
        assert_eq!(t.value(2.0), 0.0);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut t = Tween::new(2.0_f32, 0.0);
        t.retarget(5.0, 1.0);
        assert_eq!(t.value(1.0), 5.0);
    }
}
