//! Web Animations API
//!
//! Keyframe animations of an element's `filter: brightness()` value, the
//! subset `element.animate()` needs for placeholder effects.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::NodeId;

/// Animation playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPlayState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Keyframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Offset in 0.0..=1.0
    pub offset: f64,
    /// `filter: brightness(..)` value
    pub brightness: f64,
}

impl Keyframe {
    pub fn new(offset: f64, brightness: f64) -> Self {
        Self { offset, brightness }
    }

    /// Distribute keyframes evenly, like keyframes given without offsets
    pub fn evenly_spaced(values: &[f64]) -> Vec<Keyframe> {
        let last = values.len().saturating_sub(1).max(1) as f64;
        values
            .iter()
            .enumerate()
            .map(|(i, &brightness)| Keyframe::new(i as f64 / last, brightness))
            .collect()
    }
}

/// Animation timing options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTiming {
    /// Iteration duration in milliseconds
    pub duration: f64,
    pub delay: f64,
    /// `f64::INFINITY` repeats forever
    pub iterations: f64,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            duration: 0.0,
            delay: 0.0,
            iterations: 1.0,
        }
    }
}

/// Web animation
#[derive(Debug)]
pub struct Animation {
    id: u64,
    target: NodeId,
    keyframes: Vec<Keyframe>,
    timing: AnimationTiming,
    play_state: AnimationPlayState,
    start_time: Option<f64>,
}

static NEXT_ANIMATION_ID: AtomicU64 = AtomicU64::new(1);

impl Animation {
    pub fn new(target: NodeId, mut keyframes: Vec<Keyframe>, timing: AnimationTiming) -> Self {
        keyframes.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self {
            id: NEXT_ANIMATION_ID.fetch_add(1, Ordering::Relaxed),
            target,
            keyframes,
            timing,
            play_state: AnimationPlayState::Idle,
            start_time: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn play_state(&self) -> AnimationPlayState {
        self.play_state
    }

    pub fn is_running(&self) -> bool {
        self.play_state == AnimationPlayState::Running
    }

    /// Start playing at `time` (ms)
    pub fn play(&mut self, time: f64) {
        self.start_time = Some(time);
        self.play_state = AnimationPlayState::Running;
    }

    /// Cancel: drop all effects and return to idle
    pub fn cancel(&mut self) {
        self.start_time = None;
        self.play_state = AnimationPlayState::Idle;
    }

    /// Brightness applied to the target at `time` (ms). Idle animations
    /// have no effect and report the neutral value `1.0`.
    pub fn brightness_at(&mut self, time: f64) -> f64 {
        let Some(start) = self.start_time else {
            return 1.0;
        };
        if self.keyframes.is_empty() {
            return 1.0;
        }

        let local = time - start - self.timing.delay;
        if local < 0.0 {
            return 1.0;
        }

        let total = self.timing.duration * self.timing.iterations;
        if self.timing.duration <= 0.0 || local >= total {
            self.play_state = AnimationPlayState::Finished;
            return 1.0;
        }

        let progress = (local % self.timing.duration) / self.timing.duration;
        self.interpolate(progress)
    }

    /// CSS `filter` value at `time`
    pub fn filter_at(&mut self, time: f64) -> String {
        format!("brightness({})", self.brightness_at(time))
    }

    fn interpolate(&self, progress: f64) -> f64 {
        let first = self.keyframes[0];
        if progress <= first.offset {
            return first.brightness;
        }
        for pair in self.keyframes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if progress <= to.offset {
                let span = to.offset - from.offset;
                if span <= 0.0 {
                    return to.brightness;
                }
                let t = (progress - from.offset) / span;
                return from.brightness + (to.brightness - from.brightness) * t;
            }
        }
        self.keyframes[self.keyframes.len() - 1].brightness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse() -> Animation {
        Animation::new(
            NodeId(1),
            Keyframe::evenly_spaced(&[1.0, 1.5, 1.0]),
            AnimationTiming {
                duration: 2000.0,
                iterations: f64::INFINITY,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_evenly_spaced() {
        let frames = Keyframe::evenly_spaced(&[1.0, 1.5, 1.0]);
        let offsets: Vec<f64> = frames.iter().map(|k| k.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_infinite_pulse() {
        let mut animation = pulse();
        assert_eq!(animation.brightness_at(0.0), 1.0);

        animation.play(0.0);
        assert!(animation.is_running());
        assert!((animation.brightness_at(500.0) - 1.25).abs() < 1e-9);
        assert!((animation.brightness_at(1000.0) - 1.5).abs() < 1e-9);
        // Repeats every 2s
        assert!((animation.brightness_at(101_000.0) - 1.5).abs() < 1e-9);
        assert!(animation.is_running());
    }

    #[test]
    fn test_cancel_removes_effect() {
        let mut animation = pulse();
        animation.play(0.0);
        animation.cancel();

        assert_eq!(animation.play_state(), AnimationPlayState::Idle);
        assert_eq!(animation.filter_at(1000.0), "brightness(1)");
    }

    #[test]
    fn test_finite_animation_finishes() {
        let mut animation = Animation::new(
            NodeId(2),
            Keyframe::evenly_spaced(&[1.0, 2.0]),
            AnimationTiming { duration: 100.0, ..Default::default() },
        );
        animation.play(10.0);
        assert!((animation.brightness_at(60.0) - 1.5).abs() < 1e-9);
        assert_eq!(animation.brightness_at(200.0), 1.0);
        assert_eq!(animation.play_state(), AnimationPlayState::Finished);
    }
}
