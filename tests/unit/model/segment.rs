use super::*;

fn params() -> RenderParams {
    RenderParams {
        frame: FrameSize::default(),
        fps: Fps::default(),
        scroll_distance: None,
        scaled_height: None,
    }
}

fn clip_segment(location: &str, secs: f64) -> Segment {
    Segment::new(Source::clip(location), SegmentKind::Clip, secs, params()).unwrap()
}

#[test]
fn new_rejects_non_positive_duration() {
    assert!(Segment::new(Source::clip("a.mp4"), SegmentKind::Clip, 0.0, params()).is_err());
    assert!(Segment::new(Source::clip("a.mp4"), SegmentKind::Clip, -1.0, params()).is_err());
    assert!(Segment::new(Source::clip("a.mp4"), SegmentKind::Clip, f64::NAN, params()).is_err());
}

#[test]
fn truncated_shortens_but_never_lengthens() {
    let seg = clip_segment("a.mp4", 12.0);
    let short = seg.truncated(10.0).unwrap();
    assert_eq!(short.duration, 10.0);
    assert_eq!(short.natural_duration, 12.0);
    assert!(short.is_trimmed());

    let same = seg.truncated(20.0).unwrap();
    assert_eq!(same.duration, 12.0);
    assert!(!same.is_trimmed());

    assert!(seg.truncated(0.0).is_none());
}

#[test]
fn timeline_total_and_validate() {
    let mut tl = Timeline::new(10.0);
    tl.segments.push(clip_segment("a.mp4", 4.0));
    tl.segments.push(clip_segment("b.mp4", 3.0));
    tl.segments.push(clip_segment("c.mp4", 3.0));
    assert_eq!(tl.total_duration(), 10.0);
    assert!(tl.validate(Fps::default()).is_ok());
}

#[test]
fn timeline_validate_rejects_overshoot_beyond_one_frame() {
    let mut tl = Timeline::new(10.0);
    tl.segments.push(clip_segment("a.mp4", 10.5));
    assert!(tl.validate(Fps::default()).is_err());

    let mut tl = Timeline::new(10.0);
    tl.segments.push(clip_segment("a.mp4", 10.02));
    assert!(tl.validate(Fps::default()).is_ok());
}
