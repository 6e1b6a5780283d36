// src/animator.rs
use crate::geometry::Anchor;

/// Duration of an animated zoom change, in milliseconds.
pub const ZOOM_ANIMATION_MS: f64 = 180.0;

pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// One in-flight zoom transition. The anchor is resolved once, at start, so
/// every frame preserves the original focus point.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomAnimation {
    pub from_zoom: f64,
    pub to_zoom: f64,
    pub start_time: f64,
    pub duration: f64,
    pub anchor: Option<Anchor>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub zoom: f64,
    pub finished: bool,
}

impl ZoomAnimation {
    pub fn new(from_zoom: f64, to_zoom: f64, start_time: f64, anchor: Option<Anchor>) -> Self {
        Self {
            from_zoom,
            to_zoom,
            start_time,
            duration: ZOOM_ANIMATION_MS,
            anchor,
        }
    }

    /// Interpolated zoom at `now`. Snaps exactly to `to_zoom` once the
    /// duration has elapsed.
    pub fn sample(&self, now: f64) -> FrameSample {
        let elapsed = now - self.start_time;
        if self.duration <= 0.0 || elapsed >= self.duration {
            return FrameSample {
                zoom: self.to_zoom,
                finished: true,
            };
        }
        let t = ease_out_cubic(elapsed / self.duration);
        FrameSample {
            zoom: self.from_zoom + (self.to_zoom - self.from_zoom) * t,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_sample_progression() {
        let anim = ZoomAnimation::new(1.0, 2.0, 100.0, None);
        let start = anim.sample(100.0);
        assert_eq!(start.zoom, 1.0);
        assert!(!start.finished);

        let mid = anim.sample(100.0 + ZOOM_ANIMATION_MS / 2.0);
        assert!(mid.zoom > 1.5 && mid.zoom < 2.0);
        assert!(!mid.finished);

        let end = anim.sample(100.0 + ZOOM_ANIMATION_MS);
        assert_eq!(end, FrameSample { zoom: 2.0, finished: true });
    }

    #[test]
    fn test_zoom_out_stays_between_endpoints() {
        let anim = ZoomAnimation::new(3.0, 1.0, 0.0, None);
        for step in 0..10 {
            let sample = anim.sample(step as f64 * 20.0);
            assert!(sample.zoom <= 3.0 && sample.zoom >= 1.0);
        }
    }
}
