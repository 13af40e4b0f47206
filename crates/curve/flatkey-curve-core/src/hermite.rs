//! Reduction of a one-dimensional quartic/quintic bezier to a minimal chain
//! of cubic-Hermite segments within a deviation tolerance.
//!
//! Works on the normalized unit domain; rescaling onto a real window happens
//! in the segment factory afterwards.

use crate::curve::{lerp, Curve, Keyframe};
use crate::error::CurveError;

/// Interior sample count per candidate segment when estimating deviation.
const ERROR_SAMPLES: usize = 12;

/// One accepted cubic-Hermite piece over a global parameter range.
#[derive(Clone, Copy, Debug)]
struct HermiteSegment {
    t0: f32,
    t1: f32,
    p0: f32,
    p1: f32,
    d0: f32,
    d1: f32,
}

/// Sub-interval still awaiting a fit decision.
#[derive(Clone, Copy, Debug)]
struct Interval {
    t0: f32,
    t1: f32,
    depth: u32,
}

/// Approximate the bezier described by `control` with a chain of C1-matched
/// cubic-Hermite keys, splitting intervals until each candidate deviates by
/// at most `tolerance` (or `max_depth` is reached).
///
/// Accepts any degree >= 1; the curve synthesis paths feed it the 5- or
/// 6-point quartic/quintic control arrays.
pub fn reduce(control: &[f32], tolerance: f32, max_depth: u32) -> Result<Curve, CurveError> {
    if control.len() < 2 {
        return Err(CurveError::ControlPolygonTooShort {
            count: control.len(),
        });
    }
    let order = control.len() - 1;

    // Derivative control polygon: dC[i] = n * (Q[i+1] - Q[i]).
    let d_control: Vec<f32> = (0..order)
        .map(|i| order as f32 * (control[i + 1] - control[i]))
        .collect();

    // Bisection over an explicit worklist instead of recursion, so the stack
    // depth stays bounded no matter the depth limit. Right halves are pushed
    // first, which keeps emission left-to-right.
    let mut work = vec![Interval {
        t0: 0.0,
        t1: 1.0,
        depth: 0,
    }];
    let mut segments: Vec<HermiteSegment> = Vec::new();

    while let Some(iv) = work.pop() {
        let p0 = de_casteljau(control, iv.t0);
        let p1 = de_casteljau(control, iv.t1);
        let d0 = de_casteljau(&d_control, iv.t0);
        let d1 = de_casteljau(&d_control, iv.t1);

        let err = estimate_error(control, p0, p1, d0, d1, iv.t0, iv.t1);
        if err <= tolerance || iv.depth >= max_depth {
            segments.push(HermiteSegment {
                t0: iv.t0,
                t1: iv.t1,
                p0,
                p1,
                d0,
                d1,
            });
        } else {
            let tm = 0.5 * (iv.t0 + iv.t1);
            work.push(Interval {
                t0: tm,
                t1: iv.t1,
                depth: iv.depth + 1,
            });
            work.push(Interval {
                t0: iv.t0,
                t1: tm,
                depth: iv.depth + 1,
            });
        }
    }

    segments.sort_by(|a, b| a.t0.total_cmp(&b.t0));

    let mut keys = Vec::with_capacity(segments.len() + 1);
    for (i, seg) in segments.iter().enumerate() {
        if i == 0 {
            keys.push(hermite_key(seg.t0, seg.p0, seg.d0));
        }
        keys.push(hermite_key(seg.t1, seg.p1, seg.d1));
    }
    Ok(Curve::from_keys(keys))
}

/// Adjacent segments share endpoint slope, so the chain is C1 and each key
/// carries the slope on both sides.
fn hermite_key(time: f32, value: f32, slope: f32) -> Keyframe {
    let mut key = Keyframe::new(time, value);
    key.in_tangent = slope;
    key.out_tangent = slope;
    key
}

/// Max |bezier(t) - hermite(t)| over uniformly spaced parameters in
/// [t0, t1], including the endpoints.
fn estimate_error(control: &[f32], p0: f32, p1: f32, d0: f32, d1: f32, t0: f32, t1: f32) -> f32 {
    let mut max_err = 0.0f32;
    let dt = t1 - t0;

    for i in 0..=ERROR_SAMPLES {
        let u = i as f32 / ERROR_SAMPLES as f32;
        let t = lerp(t0, t1, u);

        let exact = de_casteljau(control, t);

        // Hermite basis on [0,1], tangents scaled by the interval length.
        let u2 = u * u;
        let u3 = u2 * u;
        let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10 = u3 - 2.0 * u2 + u;
        let h01 = -2.0 * u3 + 3.0 * u2;
        let h11 = u3 - u2;
        let candidate = h00 * p0 + h10 * (dt * d0) + h01 * p1 + h11 * (dt * d1);

        max_err = max_err.max((exact - candidate).abs());
    }

    max_err
}

/// 1-D de Casteljau evaluation; works for any-degree control array.
pub fn de_casteljau(control: &[f32], t: f32) -> f32 {
    let mut tmp = control.to_vec();
    let n = tmp.len();
    for r in 1..n {
        for i in 0..n - r {
            tmp[i] = tmp[i] * (1.0 - t) + tmp[i + 1] * t;
        }
    }
    tmp[0]
}
