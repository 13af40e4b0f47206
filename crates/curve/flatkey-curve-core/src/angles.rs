//! Spin-aware rotation unwinding.
//!
//! Rotation channels store absolute angles in degrees plus a per-key spin
//! direction. Before curve synthesis the track is rewritten so consecutive
//! values follow the commanded sweep, possibly the long way around, and an
//! inferred final key is appended when the last key does not land on the
//! animation's end.

use crate::data::{AnimationContext, ChannelTrack};

/// Deltas below this (degrees) are left alone; float imprecision would
/// otherwise turn a tiny change into a full revolution.
const MIN_DELTA_DEG: f32 = 0.01;

/// Shortest signed difference from `current` to `target` in degrees, in
/// (-180, 180]. Positive is counter-clockwise.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Rotate from `current` toward `destination` strictly along the chosen
/// direction and return the resulting absolute angle (may leave [0, 360)).
///
/// With `shortest`, the direction flag is ignored and the shortest sweep is
/// taken.
pub fn rotate_angle(current: f32, destination: f32, clockwise: bool, shortest: bool) -> f32 {
    let mut delta = delta_angle(current, destination);
    if delta.abs() < MIN_DELTA_DEG {
        return current;
    }
    if !shortest {
        if clockwise && delta > 0.0 {
            // Shortest path is counter-clockwise; go the long clockwise way.
            delta -= 360.0;
        } else if !clockwise && delta < 0.0 {
            delta += 360.0;
        }
    }
    current + delta
}

/// Rewrite a rotation track so each key's angle honors the previous key's
/// spin, and append an inferred shortest-path final key when the track does
/// not reach `ctx.total_duration`.
///
/// Returns a new track; the input is untouched. The appended key (if any)
/// sits exactly on the animation's end, where it supplies the last span's
/// end value without starting a span of its own.
pub fn unwind_spin_angles(track: &ChannelTrack, ctx: &AnimationContext) -> ChannelTrack {
    let mut out = track.clone();

    for i in 1..out.keys.len() {
        let prev = out.keys[i - 1];
        let unwound = rotate_angle(prev.value, out.keys[i].value, prev.spin < 0, false);
        out.keys[i].value = unwound;
    }

    if let (Some(last), Some(destination)) = (out.keys.last().copied(), out.final_frame_value(ctx))
    {
        if last.time != ctx.total_duration {
            let mut key = last;
            key.time = ctx.total_duration;
            key.value = rotate_angle(last.value, destination, false, true);
            out.keys.push(key);
        }
    }

    out
}
