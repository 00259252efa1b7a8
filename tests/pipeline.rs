//! End-to-end pipeline tests with synthetic video.

use pulse_cam::{
    Camera, CaptureConfig, MockCamera, Phase, PulseConfig, PulseProcessor, Rect, StaticDetector,
    TrackerState,
};

fn face_detector() -> StaticDetector {
    StaticDetector::new(vec![Rect::new(200, 120, 240, 240)])
}

/// 10 s of 30 fps frames pulsing at 1.2 Hz (72 BPM) must converge to
/// 72 ± 3 after warm-up.
#[test]
fn synthetic_pulse_converges_to_72_bpm() {
    let mut camera = MockCamera::with_pulse(128.0, 5.0, 1.2);
    camera.open(&CaptureConfig::default()).unwrap();

    let mut processor =
        PulseProcessor::new(PulseConfig::default(), Box::new(face_detector())).unwrap();

    for _ in 0..300 {
        let frame = camera.capture().unwrap();
        processor.run(&frame, 0).unwrap();
    }

    assert_eq!(processor.phase(), Phase::Stable);
    let bpm = processor.bpm().expect("stable pipeline must report bpm");
    assert!((bpm - 72.0).abs() <= 3.0, "expected 72 ± 3, got {bpm}");

    let estimate = processor.estimate().unwrap();
    assert!(estimate.peak_amplitude > 0.0);
}

/// A different pulse rate lands near its own target, not 72.
#[test]
fn synthetic_pulse_tracks_96_bpm() {
    let mut camera = MockCamera::with_pulse(128.0, 5.0, 1.6);
    camera.open(&CaptureConfig::default()).unwrap();

    let mut processor =
        PulseProcessor::new(PulseConfig::default(), Box::new(face_detector())).unwrap();

    for _ in 0..300 {
        let frame = camera.capture().unwrap();
        processor.run(&frame, 0).unwrap();
    }

    let bpm = processor.bpm().unwrap();
    assert!((bpm - 96.0).abs() <= 3.0, "expected 96 ± 3, got {bpm}");
}

/// With zero detections the pipeline keeps running and never reports.
#[test]
fn zero_detections_never_fail() {
    let mut camera = MockCamera::new();
    camera.open(&CaptureConfig::default()).unwrap();

    let mut processor =
        PulseProcessor::new(PulseConfig::default(), Box::new(StaticDetector::none())).unwrap();

    for _ in 0..100 {
        let frame = camera.capture().unwrap();
        let out = processor.run(&frame, 0).unwrap();
        assert!(out.is_valid());
    }

    assert_eq!(processor.phase(), Phase::Init);
    assert!(processor.bpm().is_none());
    assert!(processor.face().is_none());
    assert!(processor.times().is_empty());
}

/// Locking the tracker mid-stream does not disturb accumulation.
#[test]
fn locked_tracker_keeps_accumulating() {
    let mut camera = MockCamera::with_pulse(128.0, 5.0, 1.2);
    camera.open(&CaptureConfig::default()).unwrap();

    let mut processor =
        PulseProcessor::new(PulseConfig::default(), Box::new(face_detector())).unwrap();

    for _ in 0..30 {
        let frame = camera.capture().unwrap();
        processor.run(&frame, 0).unwrap();
    }

    assert_eq!(processor.toggle_tracking(), TrackerState::Locked);
    let face_before = processor.face().unwrap();

    for _ in 0..270 {
        let frame = camera.capture().unwrap();
        processor.run(&frame, 0).unwrap();
    }

    assert_eq!(processor.face().unwrap(), face_before);
    let bpm = processor.bpm().unwrap();
    assert!((bpm - 72.0).abs() <= 3.0, "expected 72 ± 3, got {bpm}");
}

/// The annotated output frame carries the face and forehead outlines.
#[test]
fn annotated_frame_has_boxes_drawn() {
    let mut camera = MockCamera::new();
    camera.open(&CaptureConfig::default()).unwrap();

    let mut processor =
        PulseProcessor::new(PulseConfig::default(), Box::new(face_detector())).unwrap();

    let frame = camera.capture().unwrap();
    let annotated = processor.run(&frame, 0).unwrap();

    let face = processor.face().unwrap();
    let idx = ((face.y as usize * annotated.width() as usize) + face.x as usize) * 3;
    let corner = &annotated.pixels()[idx..idx + 3];
    assert_eq!(corner, [0, 255, 0], "face outline missing at corner");
    assert_ne!(annotated.pixels(), frame.pixels());
}
