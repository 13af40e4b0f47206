//! Reduction of dense sample arrays to piecewise-linear keyframes.

use crate::curve::{lerp, Curve, Keyframe, TangentMode};
use crate::error::CurveError;

/// One Linear-mode key per sample, evenly spaced over `duration`.
pub fn from_raw_samples(
    samples: &[f32],
    duration: f32,
    time_offset: f32,
) -> Result<Curve, CurveError> {
    if samples.len() < 2 {
        return Err(CurveError::NotEnoughSamples {
            count: samples.len(),
        });
    }
    let dt = duration / (samples.len() - 1) as f32;
    let keys = samples
        .iter()
        .enumerate()
        .map(|(i, &value)| linear_key(time_offset + i as f32 * dt, value))
        .collect();
    Ok(Curve::from_keys(keys))
}

/// Greedily grow linear windows over the samples, emitting a key whenever
/// extending the window would put some spanned sample further than
/// `max_error` from the window's chord.
///
/// The first and last samples are always kept exactly; emitted key times are
/// strictly increasing and cover `[time_offset, time_offset + duration]`.
pub fn fit_adaptive(
    samples: &[f32],
    duration: f32,
    time_offset: f32,
    max_error: f32,
) -> Result<Curve, CurveError> {
    let total = samples.len();
    if total < 2 {
        return Err(CurveError::NotEnoughSamples { count: total });
    }
    let dt = duration / (total - 1) as f32;

    let mut keys = vec![linear_key(time_offset, samples[0])];
    let mut i0 = 0usize;
    while i0 < total - 1 {
        let p0 = samples[i0];
        let mut i1 = i0 + 1;
        while i1 < total - 1 {
            let candidate = i1 + 1;
            let span = (candidate - i0) as f32;
            let p_candidate = samples[candidate];
            let fits = (i0 + 1..candidate).all(|j| {
                let estimate = lerp(p0, p_candidate, (j - i0) as f32 / span);
                (samples[j] - estimate).abs() <= max_error
            });
            if !fits {
                break;
            }
            i1 = candidate;
        }
        keys.push(linear_key(time_offset + i1 as f32 * dt, samples[i1]));
        i0 = i1;
    }

    Ok(Curve::from_keys(keys))
}

fn linear_key(time: f32, value: f32) -> Keyframe {
    let mut key = Keyframe::new(time, value);
    key.left_mode = TangentMode::Linear;
    key.right_mode = TangentMode::Linear;
    key.broken = true;
    key
}
