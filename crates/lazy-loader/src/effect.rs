//! Placeholder pulse effect

use lazy_dom::{Animation, AnimationTiming, Keyframe, NodeId};

use crate::config::PulseConfig;

/// Start an endless brightness pulse (1 -> peak -> 1) on `target`
pub fn start_pulse(target: NodeId, pulse: &PulseConfig, now: f64) -> Animation {
    let mut animation = Animation::new(
        target,
        Keyframe::evenly_spaced(&[1.0, pulse.peak_brightness, 1.0]),
        AnimationTiming {
            duration: pulse.duration_ms,
            iterations: f64::INFINITY,
            ..Default::default()
        },
    );
    animation.play(now);
    tracing::trace!("Started placeholder pulse {} on {:?}", animation.id(), target);
    animation
}
