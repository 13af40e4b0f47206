//! Segment factory: one easing descriptor + window -> a two-key segment
//! (quartic/quintic easings reduce to a short cubic-Hermite chain instead).
//!
//! Shaped easings are first built on the normalized unit domain and then
//! affinely rescaled onto the real window; Instant and Linear need no shaping
//! and are built in place.

use crate::config::SynthConfig;
use crate::curve::{Curve, Keyframe, TangentMode, DEFAULT_WEIGHT};
use crate::data::{Easing, Window};
use crate::error::CurveError;
use crate::hermite;

/// Build one interpolation segment covering `window`.
///
/// Returns `CurveError::DegenerateWindow` when the window has no positive
/// duration; callers skip such spans rather than evaluating them.
pub fn build_segment(
    easing: Easing,
    window: Window,
    cfg: &SynthConfig,
) -> Result<Curve, CurveError> {
    if window.is_degenerate() {
        return Err(CurveError::DegenerateWindow {
            start: window.start_time,
            end: window.end_time,
        });
    }
    match easing {
        Easing::Instant => Ok(instant_segment(window)),
        Easing::Linear => Ok(linear_segment(window)),
        Easing::Quadratic { c1 } => Ok(scale_and_offset(quadratic_unit(c1), window)),
        Easing::Cubic { c1, c2 } => Ok(scale_and_offset(cubic_unit(c1, c2), window)),
        Easing::Bezier { x1, y1, x2, y2 } => Ok(scale_and_offset(
            bezier_unit(x1, y1, x2, y2, cfg.weight_epsilon),
            window,
        )),
        Easing::Quartic { c1, c2, c3 } => {
            let unit = hermite::reduce(
                &[0.0, c1, c2, c3, 1.0],
                cfg.reduce_tolerance,
                cfg.reduce_max_depth,
            )?;
            Ok(scale_and_offset(unit, window))
        }
        Easing::Quintic { c1, c2, c3, c4 } => {
            let unit = hermite::reduce(
                &[0.0, c1, c2, c3, c4, 1.0],
                cfg.reduce_tolerance,
                cfg.reduce_max_depth,
            )?;
            Ok(scale_and_offset(unit, window))
        }
    }
}

/// Value holds at `start_value` until `end_time`, then jumps to `end_value`.
fn instant_segment(window: Window) -> Curve {
    let mut k0 = Keyframe::new(window.start_time, window.start_value);
    k0.right_mode = TangentMode::Constant;
    k0.broken = true;
    let mut k1 = Keyframe::new(window.end_time, window.end_value);
    k1.left_mode = TangentMode::Constant;
    k1.broken = true;
    Curve::from_keys(vec![k0, k1])
}

fn linear_segment(window: Window) -> Curve {
    let mut k0 = Keyframe::new(window.start_time, window.start_value);
    k0.right_mode = TangentMode::Linear;
    k0.broken = true;
    let mut k1 = Keyframe::new(window.end_time, window.end_value);
    k1.left_mode = TangentMode::Linear;
    k1.broken = true;
    Curve::from_keys(vec![k0, k1])
}

/// Two-key segment on the unit domain from explicit endpoint tangents, with
/// the fixed 1/3 weighting (the unweighted Free case).
fn shaped_unit(out_tangent: f32, in_tangent: f32, out_weight: f32, in_weight: f32) -> Curve {
    let k0 = Keyframe {
        time: 0.0,
        value: 0.0,
        in_tangent: 0.0,
        out_tangent,
        in_weight: 0.0,
        out_weight,
        left_mode: TangentMode::Free,
        right_mode: TangentMode::Free,
        broken: true,
    };
    let k1 = Keyframe {
        time: 1.0,
        value: 1.0,
        in_tangent,
        out_tangent: 0.0,
        in_weight,
        out_weight: 0.0,
        left_mode: TangentMode::Free,
        right_mode: TangentMode::Free,
        broken: true,
    };
    Curve::from_keys(vec![k0, k1])
}

fn quadratic_unit(c1: f32) -> Curve {
    let out_tangent = 2.0 * c1;
    let in_tangent = 2.0 - out_tangent;
    shaped_unit(out_tangent, in_tangent, DEFAULT_WEIGHT, DEFAULT_WEIGHT)
}

fn cubic_unit(c1: f32, c2: f32) -> Curve {
    let out_tangent = 3.0 * c1;
    let in_tangent = 3.0 - 3.0 * c2;
    shaped_unit(out_tangent, in_tangent, DEFAULT_WEIGHT, DEFAULT_WEIGHT)
}

/// Cartesian bezier control points mapped to weighted tangents:
/// `out_weight = x1`, `out_tangent = y1 / out_weight`, `in_weight = 1 - x2`,
/// `in_tangent = (1 - y2) / in_weight`. Weights of exactly zero are nudged to
/// `weight_epsilon` before taking the reciprocal.
fn bezier_unit(x1: f32, y1: f32, x2: f32, y2: f32, weight_epsilon: f32) -> Curve {
    let out_weight = if x1 == 0.0 { weight_epsilon } else { x1 };
    let out_tangent = y1 / out_weight;
    let in_weight = if x2 == 1.0 { weight_epsilon } else { 1.0 - x2 };
    let in_tangent = (1.0 - y2) / in_weight;
    shaped_unit(out_tangent, in_tangent, out_weight, in_weight)
}

/// Affinely map a curve from the unit domain onto `window`.
///
/// Times and values scale and offset; tangents scale by value-span over
/// time-span (left at 1 when the time span is not positive). Weights are
/// fractions of the segment duration and need no rescaling.
pub fn scale_and_offset(curve: Curve, window: Window) -> Curve {
    if window.is_unit() {
        return curve;
    }
    let time_scale = window.duration();
    let value_scale = window.value_span();
    let tangent_scale = if time_scale <= 0.0 {
        1.0
    } else {
        value_scale / time_scale
    };

    let mut out = curve;
    for key in &mut out.keys {
        key.time = time_scale * key.time + window.start_time;
        key.value = value_scale * key.value + window.start_value;
        key.in_tangent *= tangent_scale;
        key.out_tangent *= tangent_scale;
    }
    out
}
