use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30, 1).unwrap().to_ff_ratio(), "30/1");
}

#[test]
fn fps_rounds_seconds_to_nearest_frame() {
    let fps = Fps::new(30000, 1001).unwrap();
    assert_eq!(fps.secs_to_frames_round(123.0 * 1001.0 / 30000.0), 123);
    assert_eq!(fps.secs_to_frames_round(-1.0), 0);
    assert!((fps.frame_duration_secs() - 1001.0 / 30000.0).abs() < 1e-12);
}

#[test]
fn frame_size_requires_even_non_zero() {
    assert!(FrameSize::new(1080, 1920).is_ok());
    assert!(FrameSize::new(0, 1920).is_err());
    assert!(FrameSize::new(1081, 1920).is_err());
}

#[test]
fn scaled_height_preserves_aspect() {
    let d = Dimensions::new(1000, 2000);
    assert_eq!(d.scaled_height_for_width(1080), Some(2160));
    assert_eq!(Dimensions::new(0, 10).scaled_height_for_width(1080), None);
}

#[test]
fn positive_duration_rejects_degenerate_values() {
    assert!(is_positive_duration(0.5));
    assert!(!is_positive_duration(0.0));
    assert!(!is_positive_duration(-1.0));
    assert!(!is_positive_duration(f64::NAN));
    assert!(!is_positive_duration(f64::INFINITY));
}
