use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::{
    allocate::pool::PoolKind,
    foundation::core::Dimensions,
    model::segment::{RenderParams, SegmentKind},
};

#[derive(Default)]
struct FixedProber {
    durations: HashMap<String, f64>,
    dimensions: HashMap<String, Dimensions>,
    calls: AtomicUsize,
}

impl FixedProber {
    fn duration(mut self, location: &str, secs: f64) -> Self {
        self.durations.insert(location.to_string(), secs);
        self
    }

    fn image(mut self, location: &str, width: u32, height: u32) -> Self {
        self.dimensions
            .insert(location.to_string(), Dimensions::new(width, height));
        self
    }
}

impl Prober for FixedProber {
    fn probe_duration(&self, source: &Source) -> StitchResult<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.durations
            .get(&source.location)
            .copied()
            .ok_or_else(|| StitchError::probe(format!("unknown '{}'", source.location)))
    }

    fn probe_dimensions(&self, source: &Source) -> StitchResult<Dimensions> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dimensions
            .get(&source.location)
            .copied()
            .ok_or_else(|| StitchError::probe(format!("unknown '{}'", source.location)))
    }
}

fn durations(a: &Allocation) -> Vec<f64> {
    a.timeline.segments.iter().map(|s| s.duration).collect()
}

#[test]
fn single_long_clip_is_trimmed_to_target() {
    let prober = FixedProber::default().duration("a.mp4", 12.0);
    let pools = [Pool::clips(["a.mp4"])];
    let a = allocate(10.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    assert_eq!(durations(&a), vec![10.0]);
    assert_eq!(a.actual_duration, 10.0);
    assert!(a.timeline.segments[0].is_trimmed());
    assert!(a.is_complete());
}

#[test]
fn clips_then_scrolling_image_fill_exactly() {
    let prober = FixedProber::default()
        .duration("a.mp4", 4.0)
        .duration("b.mp4", 3.0)
        .image("tall.png", 1000, 2000);
    let pools = [
        Pool::clips(["a.mp4", "b.mp4"]),
        Pool::images(["tall.png"]),
    ];
    let a = allocate(10.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    assert_eq!(durations(&a), vec![4.0, 3.0, 3.0]);
    assert_eq!(a.timeline.segments[2].kind, SegmentKind::ScrollingImage);
    assert_eq!(a.actual_duration, 10.0);
}

#[test]
fn all_pools_empty_is_an_error() {
    let prober = FixedProber::default();
    let pools = [
        Pool::clips(Vec::<String>::new()),
        Pool::images(Vec::<String>::new()),
        Pool::fillers(Vec::<String>::new()),
    ];
    let err = allocate(10.0, &pools, &prober, &AllocatorConfig::default()).unwrap_err();
    assert!(matches!(err, StitchError::NoSourcesAvailable));

    let err = allocate(10.0, &[], &prober, &AllocatorConfig::default()).unwrap_err();
    assert!(matches!(err, StitchError::NoSourcesAvailable));
}

#[test]
fn every_source_failing_is_no_sources_available() {
    let prober = FixedProber::default().image("icon.png", 100, 100);
    let pools = [Pool::clips(["missing.mp4"]), Pool::images(["icon.png"])];
    let err = allocate(10.0, &pools, &prober, &AllocatorConfig::default()).unwrap_err();
    assert!(matches!(err, StitchError::NoSourcesAvailable));
}

#[test]
fn probe_failure_is_skipped_and_reported() {
    let prober = FixedProber::default().duration("good.mp4", 5.0);
    let pools = [Pool::clips(["bad.mp4", "good.mp4"])];
    let a = allocate(5.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    assert_eq!(durations(&a), vec![5.0]);
    assert_eq!(a.diagnostics.len(), 1);
    assert!(matches!(
        &a.diagnostics[0],
        Diagnostic::SourceProbeFailed { location, .. } if location == "bad.mp4"
    ));
}

#[test]
fn small_images_are_reported_not_allocated() {
    let prober = FixedProber::default()
        .image("icon.png", 320, 320)
        .image("wide.png", 1920, 1080);
    let pools = [Pool::images(["icon.png", "wide.png"])];
    let a = allocate(5.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    assert_eq!(a.timeline.len(), 1);
    assert_eq!(a.timeline.segments[0].kind, SegmentKind::StaticImage);
    assert!(matches!(
        &a.diagnostics[0],
        Diagnostic::ImageTooSmall { dimensions, .. } if *dimensions == Dimensions::new(320, 320)
    ));
}

#[test]
fn shortfall_returns_partial_timeline() {
    let prober = FixedProber::default().duration("a.mp4", 4.0);
    let pools = [Pool::clips(["a.mp4"])];
    let a = allocate(10.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    assert_eq!(a.actual_duration, 4.0);
    assert_eq!(a.shortfall(), Some(6.0));
}

#[test]
fn pools_are_consumed_in_priority_order_regardless_of_input_order() {
    let prober = FixedProber::default()
        .duration("clip.mp4", 2.0)
        .duration("filler.mp4", 30.0)
        .image("wide.png", 1920, 1080);
    let pools = [
        Pool::fillers(["filler.mp4"]),
        Pool::images(["wide.png"]),
        Pool::clips(["clip.mp4"]),
    ];
    let a = allocate(10.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    let order: Vec<&str> = a
        .timeline
        .segments
        .iter()
        .map(|s| s.source.location.as_str())
        .collect();
    assert_eq!(order, vec!["clip.mp4", "wide.png", "filler.mp4"]);
    assert_eq!(durations(&a), vec![2.0, 5.0, 3.0]);
}

#[test]
fn sequential_probing_stops_once_the_budget_is_filled() {
    let prober = FixedProber::default()
        .duration("a.mp4", 20.0)
        .duration("b.mp4", 20.0);
    let pools = [Pool::clips(["a.mp4", "b.mp4"]), Pool::fillers(["c.mp4"])];
    let a = allocate(10.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    assert_eq!(a.timeline.len(), 1);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn caller_supplied_measurements_skip_the_prober() {
    let prober = FixedProber::default();
    let pools = [Pool::new(
        "known",
        PoolKind::Clip,
        vec![Source::clip("a.mp4").with_duration(6.0)],
    )];
    let a = allocate(5.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    assert_eq!(durations(&a), vec![5.0]);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn parallel_probing_preserves_input_order() {
    let mut prober = FixedProber::default();
    let names: Vec<String> = (0..16).map(|i| format!("c{i}.mp4")).collect();
    for (i, n) in names.iter().enumerate() {
        prober = prober.duration(n, 1.0 + i as f64 * 0.25);
    }
    let pools = [Pool::clips(names.clone())];
    let cfg = AllocatorConfig {
        probe_mode: ProbeMode::Parallel { threads: Some(4) },
        ..AllocatorConfig::default()
    };
    let par = allocate(20.0, &pools, &prober, &cfg).unwrap();
    let seq = allocate(20.0, &pools, &prober, &AllocatorConfig::default()).unwrap();
    assert_eq!(par.timeline, seq.timeline);
    assert_eq!(par.timeline.segments[0].source.location, "c0.mp4");
}

#[test]
fn identical_inputs_give_identical_timelines() {
    let prober = FixedProber::default()
        .duration("a.mp4", 3.3)
        .duration("b.mp4", 7.1)
        .image("tall.png", 1080, 5000);
    let pools = [Pool::clips(["a.mp4", "b.mp4"]), Pool::images(["tall.png"])];
    let cfg = AllocatorConfig::default();
    let first = allocate(25.0, &pools, &prober, &cfg).unwrap();
    let second = allocate(25.0, &pools, &prober, &cfg).unwrap();
    assert_eq!(first, second);
}

#[test]
fn never_overshoots_and_fills_exactly_when_content_suffices() {
    let cfg = AllocatorConfig::default();
    let clip_lengths = [0.7, 1.3, 2.9, 4.1, 0.4, 3.3];
    for target in [0.5, 1.0, 2.2, 5.0, 9.99, 12.7] {
        let mut prober = FixedProber::default();
        let names: Vec<String> = (0..clip_lengths.len()).map(|i| format!("{i}.mp4")).collect();
        for (n, secs) in names.iter().zip(clip_lengths) {
            prober = prober.duration(n, secs);
        }
        let pools = [Pool::clips(names)];
        let a = allocate(target, &pools, &prober, &cfg).unwrap();
        let total: f64 = clip_lengths.iter().sum();
        assert!(a.actual_duration <= target + 1e-9, "target {target}");
        if total >= target {
            assert!((a.actual_duration - target).abs() < 1e-9, "target {target}");
        }
        assert!(a.timeline.segments.iter().all(|s| s.duration > 0.0));
    }
}

#[test]
fn mismatched_pool_is_a_validation_error() {
    let prober = FixedProber::default();
    let pools = [Pool::new("clips", PoolKind::Clip, vec![Source::image("a.png")])];
    let err = allocate(10.0, &pools, &prober, &AllocatorConfig::default()).unwrap_err();
    assert!(matches!(err, StitchError::Validation(_)));
}

#[test]
fn invalid_target_is_rejected() {
    let prober = FixedProber::default();
    let pools = [Pool::clips(["a.mp4"])];
    for target in [0.0, -3.0, f64::NAN, f64::INFINITY] {
        assert!(allocate(target, &pools, &prober, &AllocatorConfig::default()).is_err());
    }
}

fn clip_segment(location: &str, secs: f64) -> Segment {
    let cfg = AllocatorConfig::default();
    let render = RenderParams {
        frame: cfg.frame,
        fps: cfg.fps,
        scroll_distance: None,
        scaled_height: None,
    };
    Segment::new(Source::clip(location), SegmentKind::Clip, secs, render).unwrap()
}

fn state_with(target: f64, secs: &[f64]) -> AllocState {
    let mut state = AllocState::new(target);
    for (i, &d) in secs.iter().enumerate() {
        state.push(clip_segment(&format!("{i}.mp4"), d));
    }
    state
}

#[test]
fn overshoot_trims_only_the_last_segment() {
    let mut state = state_with(10.0, &[4.0, 3.0, 5.0]);
    state.trim_overshoot();
    let got: Vec<f64> = state.timeline.segments.iter().map(|s| s.duration).collect();
    assert_eq!(got, vec![4.0, 3.0, 3.0]);
    assert!(state.timeline.segments[2].is_trimmed());
    assert!(!state.timeline.segments[0].is_trimmed());
    assert!(state.diagnostics.is_empty());
    assert_eq!(state.elapsed, 10.0);
}

#[test]
fn last_segment_trimmed_to_nothing_is_dropped() {
    let mut state = state_with(7.0, &[4.0, 3.0, 2.0]);
    state.trim_overshoot();
    assert_eq!(state.timeline.len(), 2);
    assert_eq!(state.timeline.total_duration(), 7.0);
    assert_eq!(
        state.diagnostics,
        vec![Diagnostic::ZeroLengthDropped {
            pool: "timeline".to_string(),
            location: "2.mp4".to_string(),
        }]
    );
}

#[test]
fn exact_fit_is_left_alone() {
    let mut state = state_with(7.0, &[4.0, 3.0]);
    state.trim_overshoot();
    assert_eq!(state.timeline.total_duration(), 7.0);
    assert!(state.timeline.segments.iter().all(|s| !s.is_trimmed()));
}

#[test]
fn candidate_with_no_budget_left_is_dropped() {
    let cfg = AllocatorConfig::default();
    let pool = Pool::clips(["late.mp4"]);
    let mut state = state_with(5.0, &[5.0]);
    let late = Source::clip("late.mp4");
    state.consume(&pool, &late, Ok(late.clone().with_duration(2.0)), &cfg);
    assert_eq!(state.timeline.len(), 1);
    assert_eq!(
        state.diagnostics,
        vec![Diagnostic::ZeroLengthDropped {
            pool: "clip".to_string(),
            location: "late.mp4".to_string(),
        }]
    );
}
