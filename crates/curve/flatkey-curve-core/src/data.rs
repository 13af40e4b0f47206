//! Input data model: easing descriptors, key windows, and the two-level
//! (container + channel) keyed timeline that curve synthesis consumes.

use serde::{Deserialize, Serialize};

/// Easing descriptor for the span that starts at a key.
///
/// Each variant carries exactly the control parameters it needs, so an
/// inapplicable parameter combination cannot be represented. Control values
/// describe a normalized curve: both axes run 0..1 across the span, and the
/// x-components of `Bezier` control points are restricted to [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Easing {
    /// Hold the start value for the whole span, then jump.
    Instant,
    #[default]
    Linear,
    Quadratic {
        c1: f32,
    },
    Cubic {
        c1: f32,
        c2: f32,
    },
    Quartic {
        c1: f32,
        c2: f32,
        c3: f32,
    },
    Quintic {
        c1: f32,
        c2: f32,
        c3: f32,
        c4: f32,
    },
    /// Cartesian control points (x1, y1) and (x2, y2) of a cubic bezier.
    Bezier {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

impl Easing {
    #[inline]
    pub fn is_linear(&self) -> bool {
        matches!(self, Easing::Linear)
    }

    #[inline]
    pub fn is_instant(&self) -> bool {
        matches!(self, Easing::Instant)
    }
}

/// Time/value extent of one interpolation span.
///
/// Invariant: `end_time > start_time`. A non-positive duration is degenerate
/// and is rejected by the segment factory, never evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub start_time: f32,
    pub end_time: f32,
    pub start_value: f32,
    pub end_value: f32,
}

impl Window {
    /// The normalized domain every shaped easing is first built on.
    pub const UNIT: Window = Window {
        start_time: 0.0,
        end_time: 1.0,
        start_value: 0.0,
        end_value: 1.0,
    };

    pub fn new(start_time: f32, end_time: f32, start_value: f32, end_value: f32) -> Self {
        Self {
            start_time,
            end_time,
            start_value,
            end_value,
        }
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.end_time - self.start_time
    }

    #[inline]
    pub fn value_span(&self) -> f32 {
        self.end_value - self.start_value
    }

    #[inline]
    pub fn is_unit(&self) -> bool {
        *self == Self::UNIT
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.duration().is_finite() || self.duration() <= 0.0
    }
}

/// Outer-timeline key shared by every property of one animation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerKey {
    pub time: f32,
    #[serde(default)]
    pub easing: Easing,
}

/// Per-property key carrying the animated value and its own easing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelKey {
    pub time: f32,
    pub value: f32,
    /// Authored rotation direction for the span starting here: negative is
    /// clockwise. Only rotation channels consume this (see `angles`).
    #[serde(default = "default_spin")]
    pub spin: i32,
    #[serde(default)]
    pub easing: Easing,
}

fn default_spin() -> i32 {
    1
}

impl ContainerKey {
    pub fn new(time: f32, easing: Easing) -> Self {
        Self { time, easing }
    }
}

impl ChannelKey {
    pub fn new(time: f32, value: f32, easing: Easing) -> Self {
        Self {
            time,
            value,
            spin: 1,
            easing,
        }
    }
}

/// One property's full keyed track, ordered by time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelTrack {
    pub keys: Vec<ChannelKey>,
    /// Value of the authoring tool's auxiliary key at t=0, when the track
    /// carries one. Takes precedence when inferring the animation-final value.
    #[serde(default)]
    pub time_zero_aux_value: Option<f32>,
}

impl ChannelTrack {
    pub fn new(keys: Vec<ChannelKey>) -> Self {
        Self {
            keys,
            time_zero_aux_value: None,
        }
    }

    /// Validate basic invariants (finite, non-negative, non-decreasing times).
    pub fn validate_basic(&self) -> Result<(), String> {
        let mut last = -f32::INFINITY;
        for key in &self.keys {
            if !key.time.is_finite() || key.time < 0.0 {
                return Err(format!(
                    "ChannelKey time must be finite and non-negative, got {}",
                    key.time
                ));
            }
            if key.time < last {
                return Err("ChannelKey times must be non-decreasing".into());
            }
            if !key.value.is_finite() {
                return Err(format!("ChannelKey value must be finite, got {}", key.value));
            }
            last = key.time;
        }
        Ok(())
    }

    /// Value this track should reach at the animation's end when its last key
    /// does not land exactly on the total duration. The auxiliary time-zero
    /// key wins; otherwise a looping animation whose track starts at t=0
    /// returns to its first value, and anything else holds the last value.
    /// Returns None for an empty track.
    pub fn final_frame_value(&self, ctx: &AnimationContext) -> Option<f32> {
        if let Some(aux) = self.time_zero_aux_value {
            return Some(aux);
        }
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if ctx.looping && first.time == 0.0 {
            Some(first.value)
        } else {
            Some(last.value)
        }
    }
}

/// Animation-wide facts needed while flattening a single property.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationContext {
    /// Total animation length in seconds.
    pub total_duration: f32,
    pub looping: bool,
}

impl AnimationContext {
    pub fn new(total_duration: f32, looping: bool) -> Self {
        Self {
            total_duration,
            looping,
        }
    }
}
