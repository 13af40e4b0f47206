use std::collections::HashMap;

use serde::Deserialize;

use flatkey_curve_core::{
    build_channel_curve, build_channel_curve_overriding, build_property_curve, rotate_angle,
    unwind_spin_angles, AnimationContext, ChannelKey, ChannelTrack, ContainerKey, Easing,
    SynthConfig,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn cfg() -> SynthConfig {
    SynthConfig::default()
}

fn linear_containers(times: &[f32]) -> Vec<ContainerKey> {
    times
        .iter()
        .map(|&t| ContainerKey::new(t, Easing::Linear))
        .collect()
}

/// it should build the plain channel curve when every container key is linear
#[test]
fn linear_containers_take_direct_path() {
    let ctx = AnimationContext::new(2.0, false);
    let track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 0.0, Easing::Linear),
        ChannelKey::new(1.0, 4.0, Easing::Linear),
    ]);
    let containers = linear_containers(&[0.0, 1.0]);

    let property = build_property_curve(&containers, &track, &ctx, &cfg());
    let direct = build_channel_curve(&track, &ctx, &cfg());
    assert_eq!(property, direct);

    // Two spans, merged junction: three keys.
    assert_eq!(property.len(), 3);
    approx(property.evaluate(0.5), 2.0, 1e-6);
    // Non-looping: the final span holds the last key's value.
    approx(property.evaluate(1.5), 4.0, 1e-6);
    approx(property.evaluate(2.0), 4.0, 1e-6);
}

/// it should return to the first key's value at the end of a looping animation
#[test]
fn looping_infers_first_value_at_end() {
    let ctx = AnimationContext::new(2.0, true);
    let track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 1.0, Easing::Linear),
        ChannelKey::new(1.0, 3.0, Easing::Linear),
    ]);
    let curve = build_channel_curve(&track, &ctx, &cfg());
    approx(curve.evaluate(2.0), 1.0, 1e-6);
    approx(curve.evaluate(1.5), 2.0, 1e-6);
}

/// it should prefer the time-zero auxiliary value when inferring the end value
#[test]
fn aux_value_wins_final_inference() {
    let ctx = AnimationContext::new(2.0, true);
    let mut track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 1.0, Easing::Linear),
        ChannelKey::new(1.0, 3.0, Easing::Linear),
    ]);
    track.time_zero_aux_value = Some(7.0);
    let curve = build_channel_curve(&track, &ctx, &cfg());
    approx(curve.evaluate(2.0), 7.0, 1e-6);
}

/// it should not start a span for a key sitting on the animation's last frame
#[test]
fn key_on_last_frame_starts_no_span() {
    let ctx = AnimationContext::new(1.0, false);
    let track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 0.0, Easing::Linear),
        ChannelKey::new(1.0, 5.0, Easing::Linear),
    ]);
    let curve = build_channel_curve(&track, &ctx, &cfg());
    assert_eq!(curve.len(), 2);
    assert_eq!(curve.end_time(), Some(1.0));
}

/// it should force every span onto the override easing
#[test]
fn easing_override_steps_every_span() {
    let ctx = AnimationContext::new(2.0, false);
    let track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 1.0, Easing::Quadratic { c1: 0.5 }),
        ChannelKey::new(1.0, 2.0, Easing::Linear),
    ]);
    let curve = build_channel_curve_overriding(&track, &ctx, &cfg(), Easing::Instant);
    assert_eq!(curve.evaluate(0.5), 1.0);
    assert_eq!(curve.evaluate(0.999), 1.0);
    assert_eq!(curve.evaluate(1.0), 2.0);
    assert_eq!(curve.evaluate(1.5), 2.0);
}

/// it should let a non-linear container easing override a linear channel span
#[test]
fn container_easing_overrides_linear_channel() {
    let ctx = AnimationContext::new(1.0, false);
    let track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 0.0, Easing::Linear),
        ChannelKey::new(1.0, 1.0, Easing::Linear),
    ]);
    let containers = vec![ContainerKey::new(0.0, Easing::Instant)];

    let curve = build_property_curve(&containers, &track, &ctx, &cfg());
    // The container's instant easing replaces the linear channel easing.
    assert_eq!(curve.evaluate(0.5), 0.0);
    assert_eq!(curve.evaluate(1.0), 1.0);
}

/// it should match the non-nested output when the container easing is linear
#[test]
fn nested_linear_container_matches_direct_path() {
    let ctx = AnimationContext::new(2.0, false);
    // A cubic channel easing so the nested path actually samples.
    let track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 0.0, Easing::Cubic { c1: 0.1, c2: 0.9 }),
        ChannelKey::new(2.0, 1.0, Easing::Linear),
    ]);
    // The quadratic key at t=0 switches the whole property into blended mode;
    // the second span's container easing is linear.
    let containers = vec![
        ContainerKey::new(0.0, Easing::Quadratic { c1: 0.5 }),
        ContainerKey::new(1.0, Easing::Linear),
    ];

    let blended = build_property_curve(&containers, &track, &ctx, &cfg());
    let direct = build_channel_curve(&track, &ctx, &cfg());

    // Over the linear-container span the sampled reconstruction must agree
    // with the plain channel curve within the fit tolerance.
    for i in 0..=20 {
        let t = 1.0 + i as f32 / 20.0;
        approx(blended.evaluate(t), direct.evaluate(t), 0.02);
    }
    // Span boundaries are pinned to the exact direct values.
    approx(blended.evaluate(1.0), direct.evaluate(1.0), 1e-4);
    approx(blended.evaluate(2.0), direct.evaluate(2.0), 1e-4);
}

/// it should modulate the channel easing with a quadratic container easing
#[test]
fn nested_quadratic_container_modulates() {
    let ctx = AnimationContext::new(1.0, false);
    let track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 0.0, Easing::Cubic { c1: 0.0, c2: 1.0 }),
        ChannelKey::new(1.0, 1.0, Easing::Linear),
    ]);
    let containers = vec![ContainerKey::new(0.0, Easing::Quadratic { c1: 0.0 })];

    let blended = build_property_curve(&containers, &track, &ctx, &cfg());
    let direct = build_channel_curve(&track, &ctx, &cfg());

    // Boundaries agree...
    approx(blended.evaluate(0.0), direct.evaluate(0.0), 1e-4);
    approx(blended.evaluate(1.0), direct.evaluate(1.0), 1e-4);
    // ...but an ease-in container easing drags the midpoint below the
    // un-nested curve.
    let mid_blended = blended.evaluate(0.5);
    let mid_direct = direct.evaluate(0.5);
    assert!(
        mid_blended < mid_direct - 0.05,
        "expected modulation: blended {mid_blended} vs direct {mid_direct}"
    );
}

/// it should skip container spans with no bracketing channel key
#[test]
fn missing_bracket_key_skips_span() {
    let ctx = AnimationContext::new(2.0, false);
    // First channel key arrives at t=1; the first container span has nothing
    // to bracket it.
    let track = ChannelTrack::new(vec![ChannelKey::new(
        1.0,
        5.0,
        Easing::Cubic { c1: 0.2, c2: 0.8 },
    )]);
    let containers = vec![
        ContainerKey::new(0.0, Easing::Quadratic { c1: 0.3 }),
        ContainerKey::new(1.0, Easing::Quadratic { c1: 0.3 }),
    ];

    let curve = build_property_curve(&containers, &track, &ctx, &cfg());
    assert!(!curve.is_empty());
    // Nothing was emitted before the first channel key.
    assert_eq!(curve.start_time(), Some(1.0));
}

/// it should sweep the long way around when the spin demands it
#[test]
fn rotate_angle_directions() {
    // Shortest from 350 to 10 is +20 (counter-clockwise).
    approx(rotate_angle(350.0, 10.0, false, false), 370.0, 1e-4);
    // Forcing clockwise goes the long way: -340.
    approx(rotate_angle(350.0, 10.0, true, false), 10.0, 1e-4);
    // Shortest ignores the direction flag.
    approx(rotate_angle(350.0, 10.0, true, true), 370.0, 1e-4);
    // Near-equal angles stay put.
    assert_eq!(rotate_angle(90.0, 90.004, true, false), 90.0);
}

/// it should unwind spins and append the inferred final key
#[test]
fn unwind_appends_final_key() {
    let ctx = AnimationContext::new(2.0, true);
    let mut track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 0.0, Easing::Linear),
        ChannelKey::new(1.0, 270.0, Easing::Linear),
    ]);
    // Clockwise spin on the first span: 0 -> 270 becomes 0 -> -90.
    track.keys[0].spin = -1;

    let unwound = unwind_spin_angles(&track, &ctx);
    assert_eq!(unwound.keys[0].value, 0.0);
    approx(unwound.keys[1].value, -90.0, 1e-4);
    // Looping animation starting at t=0: the appended key returns to the
    // first value by the shortest path from -90, which is 0.
    assert_eq!(unwound.keys.len(), 3);
    approx(unwound.keys[2].time, 2.0, 1e-6);
    approx(unwound.keys[2].value, 0.0, 1e-4);
    // Input track untouched.
    assert_eq!(track.keys.len(), 2);
}

/// it should leave tracks that already end on the last frame alone
#[test]
fn unwind_no_final_key_when_on_duration() {
    let ctx = AnimationContext::new(1.0, false);
    let track = ChannelTrack::new(vec![
        ChannelKey::new(0.0, 10.0, Easing::Linear),
        ChannelKey::new(1.0, 30.0, Easing::Linear),
    ]);
    let unwound = unwind_spin_angles(&track, &ctx);
    assert_eq!(unwound.keys.len(), 2);
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureDoc {
    context: AnimationContext,
    container_keys: Vec<ContainerKey>,
    tracks: HashMap<String, ChannelTrack>,
}

fn load_fixture(name: &str) -> FixtureDoc {
    let raw = flatkey_test_fixtures::animations::json(name).expect("fixture should load");
    serde_json::from_str(&raw).expect("fixture should parse")
}

/// it should build a curve for every track of every fixture animation
#[test]
fn fixtures_build_property_curves() {
    for name in flatkey_test_fixtures::animations::keys() {
        let doc = load_fixture(&name);
        for (path, track) in &doc.tracks {
            track
                .validate_basic()
                .unwrap_or_else(|e| panic!("{name}/{path}: {e}"));
            let curve =
                build_property_curve(&doc.container_keys, track, &doc.context, &cfg());
            assert!(!curve.is_empty(), "{name}/{path} built an empty curve");
            let first = track.keys.first().unwrap();
            approx(curve.evaluate(first.time), first.value, 1e-4);
        }
    }
}

/// it should land looping fixture tracks back on their first value
#[test]
fn bounce_fixture_loops_back() {
    let doc = load_fixture("bounce");
    assert!(doc.context.looping);
    let track = &doc.tracks["ball.x"];
    let curve = build_property_curve(&doc.container_keys, track, &doc.context, &cfg());
    approx(curve.evaluate(doc.context.total_duration), -1.0, 1e-4);
}

/// it should modulate the nested fixture without breaking boundary continuity
#[test]
fn nested_fixture_stays_continuous() {
    let doc = load_fixture("nested-ease");
    let track = &doc.tracks["arm.angle"];
    let blended = build_property_curve(&doc.container_keys, track, &doc.context, &cfg());
    let direct = build_channel_curve(track, &doc.context, &cfg());

    // The nested reconstruction is pinned to the direct curve at container
    // span boundaries.
    for t in [0.0, 0.5, 1.0] {
        approx(blended.evaluate(t), direct.evaluate(t), 1e-3);
    }
    // Keys stay strictly ordered after concatenation.
    for pair in blended.keys.windows(2) {
        assert!(pair[0].time < pair[1].time);
    }
}
