use super::*;

fn segment(n: Normalized) -> Segment {
    match n {
        Normalized::Segment(s) => s,
        other => panic!("expected segment, got {other:?}"),
    }
}

#[test]
fn clip_keeps_probed_duration() {
    let cfg = AllocatorConfig::default();
    let seg = segment(normalize_source(&Source::clip("a.mp4").with_duration(12.0), &cfg).unwrap());
    assert_eq!(seg.kind, SegmentKind::Clip);
    assert_eq!(seg.duration, 12.0);
    assert_eq!(seg.render.frame, cfg.frame);
    assert_eq!(seg.render.scroll_distance, None);
}

#[test]
fn unprobed_clip_is_rejected() {
    let cfg = AllocatorConfig::default();
    assert!(normalize_source(&Source::clip("a.mp4"), &cfg).is_err());
}

#[test]
fn tall_image_scrolls_with_three_second_floor() {
    let cfg = AllocatorConfig::default();
    // 1000x2000 scaled to width 1080 is 2160 tall; 240px at 100px/s is 2.4s, floored to 3s.
    let src = Source::image("tall.png").with_dimensions(1000, 2000);
    let seg = segment(normalize_source(&src, &cfg).unwrap());
    assert_eq!(seg.kind, SegmentKind::ScrollingImage);
    assert_eq!(seg.render.scaled_height, Some(2160));
    assert_eq!(seg.render.scroll_distance, Some(240));
    assert_eq!(seg.duration, 3.0);
}

#[test]
fn very_tall_image_scrolls_at_configured_rate() {
    let cfg = AllocatorConfig::default();
    // 1080x3920 keeps its size; 2000px at 100px/s is 20s.
    let src = Source::image("long.png").with_dimensions(1080, 3920);
    let seg = segment(normalize_source(&src, &cfg).unwrap());
    assert_eq!(seg.kind, SegmentKind::ScrollingImage);
    assert!((seg.duration - 20.0).abs() < 1e-9);
}

#[test]
fn short_image_is_static_for_default_duration() {
    let cfg = AllocatorConfig::default();
    let src = Source::image("wide.png").with_dimensions(1920, 1080);
    let seg = segment(normalize_source(&src, &cfg).unwrap());
    assert_eq!(seg.kind, SegmentKind::StaticImage);
    assert_eq!(seg.duration, 5.0);
    assert_eq!(seg.render.scroll_distance, None);
    assert_eq!(seg.render.scaled_height, Some(608));
}

#[test]
fn small_images_are_filtered() {
    let cfg = AllocatorConfig::default();
    let src = Source::image("icon.png").with_dimensions(499, 1200);
    assert_eq!(
        normalize_source(&src, &cfg).unwrap(),
        Normalized::ImageTooSmall(Dimensions::new(499, 1200))
    );
    let src = Source::image("strip.png").with_dimensions(1200, 300);
    assert!(matches!(
        normalize_source(&src, &cfg).unwrap(),
        Normalized::ImageTooSmall(_)
    ));
}
