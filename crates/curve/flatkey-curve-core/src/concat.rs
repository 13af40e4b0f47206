//! Concatenation of per-span curve fragments into one continuous curve.

use crate::curve::Curve;

/// Merge time-ordered fragments, collapsing duplicate boundary keys.
///
/// At a merged boundary the previously emitted key keeps its incoming
/// tangent, weight and left mode, while the value, outgoing tangent/weight
/// and right mode come from the new fragment; `broken` flags are OR'd. The
/// approach into a junction and the departure out of it may therefore ease
/// differently, which is what the two-sided authoring format expresses.
/// Wrap modes are inherited from the first non-empty fragment.
pub fn concatenate(fragments: &[Curve]) -> Curve {
    let mut out = Curve::new();
    let mut wrap_inherited = false;

    for fragment in fragments {
        if fragment.keys.is_empty() {
            continue;
        }
        if !wrap_inherited {
            out.pre_wrap = fragment.pre_wrap;
            out.post_wrap = fragment.post_wrap;
            wrap_inherited = true;
        }
        for (i, key) in fragment.keys.iter().enumerate() {
            if i == 0 {
                if let Some(last) = out.keys.last_mut() {
                    if approximately(last.time, key.time) {
                        // Duplicate boundary: merge into the previous key.
                        last.value = key.value;
                        last.out_tangent = key.out_tangent;
                        last.out_weight = key.out_weight;
                        last.right_mode = key.right_mode;
                        last.broken |= key.broken;
                        continue;
                    }
                }
            }
            out.keys.push(*key);
        }
    }

    out
}

/// Relative float comparison with an absolute floor, for boundary times.
#[inline]
fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0)
}
