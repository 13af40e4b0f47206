//! Property-curve assembly: walks a channel track's keys (and, when a
//! container key eases non-linearly, the container spans) and flattens the
//! two easing levels into one curve.
//!
//! Container keys with non-linear easing "blend" with the channel keys: the
//! container easing's output is fed as the time input to the channel key's
//! own easing. No closed form exists for that composition, so such spans are
//! sampled and refit; everything else goes through the segment factory
//! directly.

use crate::concat::concatenate;
use crate::config::SynthConfig;
use crate::curve::{lerp, Curve};
use crate::data::{AnimationContext, ChannelTrack, ContainerKey, Easing, Window};
use crate::fitter::fit_adaptive;
use crate::segment::build_segment;

/// Flatten one property's container + channel keys into its final curve.
///
/// This is the main entry point. Malformed spans (degenerate windows,
/// missing bracket keys) are logged and skipped, never escalated: a single
/// bad key costs its span, not the property.
pub fn build_property_curve(
    container_keys: &[ContainerKey],
    track: &ChannelTrack,
    ctx: &AnimationContext,
    cfg: &SynthConfig,
) -> Curve {
    let needs_blending = container_keys.iter().any(|k| !k.easing.is_linear());
    if needs_blending {
        build_blended_curve(container_keys, track, ctx, cfg)
    } else {
        build_channel_curve(track, ctx, cfg)
    }
}

/// Build the curve from the channel keys alone (the common case, when no
/// container key eases non-linearly).
pub fn build_channel_curve(
    track: &ChannelTrack,
    ctx: &AnimationContext,
    cfg: &SynthConfig,
) -> Curve {
    build_channel_curve_with(track, ctx, cfg, None)
}

/// Like [`build_channel_curve`], but force every span onto `easing`,
/// ignoring the per-key easing. Used for properties that must step (sort
/// order, pivots, parent switches) regardless of how they were authored.
pub fn build_channel_curve_overriding(
    track: &ChannelTrack,
    ctx: &AnimationContext,
    cfg: &SynthConfig,
    easing: Easing,
) -> Curve {
    build_channel_curve_with(track, ctx, cfg, Some(easing))
}

fn build_channel_curve_with(
    track: &ChannelTrack,
    ctx: &AnimationContext,
    cfg: &SynthConfig,
    override_easing: Option<Easing>,
) -> Curve {
    let mut fragments = Vec::new();

    for (i, key) in track.keys.iter().enumerate() {
        if key.time >= ctx.total_duration {
            // Key on the animation's last frame; the previous span already
            // produced its keyframe.
            break;
        }
        let next = track.keys.get(i + 1);
        let end_time = next.map(|k| k.time).unwrap_or(ctx.total_duration);
        let end_value = next
            .map(|k| k.value)
            .or_else(|| track.final_frame_value(ctx))
            .unwrap_or(key.value);
        let easing = override_easing.unwrap_or(key.easing);
        let window = Window::new(key.time, end_time, key.value, end_value);

        match build_segment(easing, window, cfg) {
            Ok(curve) => fragments.push(curve),
            Err(err) => log::warn!(
                "skipping channel span [{}, {}]: {err}",
                window.start_time,
                window.end_time
            ),
        }
    }

    concatenate(&fragments)
}

fn build_blended_curve(
    container_keys: &[ContainerKey],
    track: &ChannelTrack,
    ctx: &AnimationContext,
    cfg: &SynthConfig,
) -> Curve {
    // The plain channel curve, used both as the override path's value source
    // and to pin nested-span boundary samples to exact values.
    let channel_curve = build_channel_curve(track, ctx, cfg);
    let mut fragments = Vec::new();

    for (i, container) in container_keys.iter().enumerate() {
        if container.time >= ctx.total_duration {
            break;
        }
        let span_start = container.time;
        let span_end = container_keys
            .get(i + 1)
            .map(|k| k.time)
            .unwrap_or(ctx.total_duration);

        // Bracketing channel keys for this container span.
        let bracket = track.keys.iter().rev().find(|k| k.time <= span_start);
        let next_bracket = track.keys.iter().find(|k| k.time > span_start);

        // An instant channel key overrides any blending, and a linear channel
        // key is fully replaced by the container easing. Either way the span
        // needs no nested sampling.
        let effective = match bracket {
            Some(k) if k.easing.is_instant() => Easing::Instant,
            _ => container.easing,
        };
        if effective.is_instant() || bracket.is_some_and(|k| k.easing.is_linear()) {
            let window = Window::new(
                span_start,
                span_end,
                channel_curve.evaluate(span_start),
                channel_curve.evaluate(span_end),
            );
            match build_segment(effective, window, cfg) {
                Ok(curve) => fragments.push(curve),
                Err(err) => log::warn!(
                    "skipping container span [{span_start}, {span_end}]: {err}"
                ),
            }
            continue;
        }

        let Some(bracket) = bracket else {
            log::warn!(
                "no channel key at or before container key at {span_start}s; skipping span"
            );
            continue;
        };

        let bracket_end = next_bracket.map(|k| k.time).unwrap_or(ctx.total_duration);
        let span_duration = span_end - span_start;
        let bracket_duration = bracket_end - bracket.time;
        if span_duration <= 0.0 || bracket_duration <= 0.0 {
            log::warn!(
                "degenerate container span [{span_start}, {span_end}] over channel span [{}, {bracket_end}]; skipping",
                bracket.time
            );
            continue;
        }

        match sample_nested_span(
            NestedSpan {
                container_easing: container.easing,
                channel_easing: bracket.easing,
                span_start,
                span_duration,
                channel_start: bracket.time,
                channel_duration: bracket_duration,
            },
            &channel_curve,
            cfg,
        ) {
            Ok(curve) => fragments.push(curve),
            Err(err) => log::warn!(
                "nested sampling failed over [{span_start}, {span_end}]: {err}"
            ),
        }
    }

    concatenate(&fragments)
}

struct NestedSpan {
    container_easing: Easing,
    channel_easing: Easing,
    span_start: f32,
    span_duration: f32,
    channel_start: f32,
    channel_duration: f32,
}

/// Sample the container easing feeding the channel easing over one span and
/// refit the samples to linear keys.
fn sample_nested_span(
    span: NestedSpan,
    channel_curve: &Curve,
    cfg: &SynthConfig,
) -> Result<Curve, crate::error::CurveError> {
    // Unit-domain easing curves for the two levels.
    let container_unit = build_segment(span.container_easing, Window::UNIT, cfg)?;
    let channel_unit = build_segment(span.channel_easing, Window::UNIT, cfg)?;

    let channel_end = span.channel_start + span.channel_duration;
    let start_value = channel_curve.evaluate(span.channel_start);
    let end_value = channel_curve.evaluate(channel_end);

    // Where the container span sits within the channel span, in the channel
    // span's normalized time.
    let scale = span.span_duration / span.channel_duration;
    let offset = (span.span_start - span.channel_start) / span.channel_duration;

    let count = ((span.span_duration * cfg.samples_per_second).ceil() as usize + 1).max(2);
    let mut samples = Vec::with_capacity(count);
    for s in 0..count {
        let u = s as f32 / (count - 1) as f32;
        let container_eased = container_unit.evaluate(u);
        let channel_t = offset + container_eased * scale;
        let channel_eased = channel_unit.evaluate(channel_t);
        samples.push(lerp(start_value, end_value, channel_eased));
    }

    // Pin the boundary samples to the exact un-nested values so neighboring
    // spans concatenate without a seam.
    let last = samples.len() - 1;
    samples[0] = channel_curve.evaluate(span.span_start);
    samples[last] = channel_curve.evaluate(span.span_start + span.span_duration);

    fit_adaptive(&samples, span.span_duration, span.span_start, cfg.fit_max_error)
}
