//! Output curve model and the internal sampling evaluator.
//!
//! The evaluator implements the Constant / Linear / Free-weighted-cubic-Hermite
//! subset the synthesized keys rely on. It exists for sampling *during*
//! synthesis (nested blending evaluates intermediate curves); the consuming
//! runtime must evaluate the emitted keys with numerically matching semantics,
//! or playback will visibly diverge from what was sampled here. Treat the
//! semantics below as an external contract:
//! - a Constant side holds the left key's value until the next key;
//! - a Linear side uses the chord slope of the segment;
//! - a Free side evaluates a weighted cubic Hermite from the stored tangent
//!   and weight (weight 1/3 is the unweighted case).

use serde::{Deserialize, Serialize};

/// Weight assigned to tangent sides that carry no explicit weight. A weighted
/// Hermite with this weight is exactly the plain cubic Hermite.
pub const DEFAULT_WEIGHT: f32 = 1.0 / 3.0;

/// How a key's incoming or outgoing side shapes its segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TangentMode {
    /// Hold the left value until the next key.
    Constant,
    Linear,
    #[default]
    Free,
}

/// Behavior of a curve outside its keyed time range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    #[default]
    Once,
    Loop,
    PingPong,
    ClampForever,
}

/// One key of a flattened curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    pub in_tangent: f32,
    pub out_tangent: f32,
    /// Fraction of the segment duration the incoming tangent reaches back
    /// over, in (0, 1). Only meaningful on a weighted Free side.
    pub in_weight: f32,
    pub out_weight: f32,
    pub left_mode: TangentMode,
    pub right_mode: TangentMode,
    /// Whether the two sides were authored independently.
    pub broken: bool,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
            in_weight: DEFAULT_WEIGHT,
            out_weight: DEFAULT_WEIGHT,
            left_mode: TangentMode::Free,
            right_mode: TangentMode::Free,
            broken: false,
        }
    }
}

/// An ordered sequence of keyframes with strictly increasing times, plus
/// extrapolation modes for either side of the keyed range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    pub keys: Vec<Keyframe>,
    pub pre_wrap: WrapMode,
    pub post_wrap: WrapMode,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: Vec<Keyframe>) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn start_time(&self) -> Option<f32> {
        self.keys.first().map(|k| k.time)
    }

    pub fn end_time(&self) -> Option<f32> {
        self.keys.last().map(|k| k.time)
    }

    /// Sample the curve at `time`.
    ///
    /// An empty curve returns a neutral 0.0 (fail-soft); a single key returns
    /// its value everywhere. Outside the keyed range the pre/post wrap mode
    /// applies: Once and ClampForever clamp, Loop wraps, PingPong reflects.
    pub fn evaluate(&self, time: f32) -> f32 {
        let n = self.keys.len();
        if n == 0 {
            return 0.0;
        }
        if n == 1 {
            return self.keys[0].value;
        }

        let first = &self.keys[0];
        let last = &self.keys[n - 1];
        let t = self.wrap_time(time, first.time, last.time);
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        for i in 0..n - 1 {
            if t < self.keys[i + 1].time {
                return evaluate_segment(&self.keys[i], &self.keys[i + 1], t);
            }
        }
        last.value
    }

    fn wrap_time(&self, time: f32, start: f32, end: f32) -> f32 {
        let duration = end - start;
        if duration <= 0.0 {
            return start;
        }
        let mode = if time < start {
            self.pre_wrap
        } else if time > end {
            self.post_wrap
        } else {
            return time;
        };
        match mode {
            WrapMode::Once | WrapMode::ClampForever => time.clamp(start, end),
            WrapMode::Loop => start + (time - start).rem_euclid(duration),
            WrapMode::PingPong => {
                let phase = (time - start).rem_euclid(2.0 * duration);
                if phase > duration {
                    start + 2.0 * duration - phase
                } else {
                    start + phase
                }
            }
        }
    }
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic bezier basis on scalars.
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the (monotonic) time axis of a bezier whose normalized x control
/// points are `u1`/`u2`, by bisection.
#[inline]
fn invert_time_axis(x: f32, u1: f32, u2: f32) -> f32 {
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = x;
    for _ in 0..24 {
        let probe = cubic_bezier(0.0, u1, u2, 1.0, mid);
        if (probe - x).abs() < 1e-6 {
            break;
        }
        if probe < x {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    mid
}

fn evaluate_segment(left: &Keyframe, right: &Keyframe, t: f32) -> f32 {
    if left.right_mode == TangentMode::Constant || right.left_mode == TangentMode::Constant {
        return left.value;
    }
    let dt = right.time - left.time;
    if dt <= f32::EPSILON {
        return right.value;
    }
    let u = (t - left.time) / dt;
    if left.right_mode == TangentMode::Linear && right.left_mode == TangentMode::Linear {
        return lerp(left.value, right.value, u);
    }

    let chord = (right.value - left.value) / dt;
    let (out_tangent, out_weight) = match left.right_mode {
        TangentMode::Linear => (chord, DEFAULT_WEIGHT),
        _ => (left.out_tangent, left.out_weight),
    };
    let (in_tangent, in_weight) = match right.left_mode {
        TangentMode::Linear => (chord, DEFAULT_WEIGHT),
        _ => (right.in_tangent, right.in_weight),
    };

    // Hermite-with-weights expressed as a 2D bezier: x controls are the
    // weights, y controls derive from tangent * weight * dt.
    let y1 = left.value + out_tangent * out_weight * dt;
    let y2 = right.value - in_tangent * in_weight * dt;

    // Unweighted (1/3, 1/3) keys have an identity time axis.
    let s = if (out_weight - DEFAULT_WEIGHT).abs() < 1e-6
        && (in_weight - DEFAULT_WEIGHT).abs() < 1e-6
    {
        u
    } else {
        invert_time_axis(u, out_weight, 1.0 - in_weight)
    };
    cubic_bezier(left.value, y1, y2, right.value, s)
}

/// Export a curve as a stable JSON shape for FFI/serialization.
pub fn export_curve_json(curve: &Curve) -> serde_json::Value {
    serde_json::to_value(curve).unwrap_or(serde_json::Value::Null)
}
