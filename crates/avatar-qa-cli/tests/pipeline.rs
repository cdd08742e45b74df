//! End-to-end pipeline tests using synthetic images and stand-in detectors.
//!
//! Exercises decode, extraction and policy together without model weights.

#![allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::expect_used,
    clippy::missing_panics_doc
)]

use std::sync::Arc;

use avatar_qa_core::{
    DecodeError, FaceDetector, FailureReason, PipelineConfig, ProgressEvent, ProgressSink,
    QualityError, QualityPipeline, ResultOutput, Stage, Thresholds, UploadSource,
};
use avatar_qa_test_support::{
    FailingFaceDetector, MockProgressSink, MockResultOutput, MockUploadSource,
    StubFaceDetector, SyntheticImageBuilder,
};

fn pipeline(detector: impl FaceDetector + 'static) -> QualityPipeline {
    QualityPipeline::new(Arc::new(detector), PipelineConfig::default())
}

fn reasons_for(
    pipeline: &QualityPipeline,
    bytes: &[u8],
    thresholds: Option<&Thresholds>,
) -> Vec<FailureReason> {
    pipeline.evaluate_bytes(bytes, thresholds).unwrap().verdict.reasons
}

// === Acceptance ===

#[test]
fn test_large_sharp_frontal_portrait_accepted() {
    let bytes = SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::portrait(1024, 768));
    let evaluation = pipeline(StubFaceDetector::frontal())
        .evaluate_bytes(&bytes, None)
        .unwrap();

    assert!(evaluation.verdict.accepted, "{:?}", evaluation.verdict);
    assert!(evaluation.verdict.reasons.is_empty());
    assert_eq!(evaluation.metrics.resolution, 768);
    assert!(evaluation.metrics.face_detected);
    assert!(evaluation.metrics.pose_angle.unwrap().abs() < 1e-3);
}

#[test]
fn test_small_photo_only_low_resolution() {
    let bytes = SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::portrait(200, 150));
    let reasons = reasons_for(&pipeline(StubFaceDetector::frontal()), &bytes, None);
    assert_eq!(reasons, vec![FailureReason::LowResolution]);
}

#[test]
fn test_jpeg_upload_evaluates_like_png() {
    let image = SyntheticImageBuilder::portrait(640, 640);
    let jpeg = SyntheticImageBuilder::encode(&image, image::ImageFormat::Jpeg);
    let evaluation = pipeline(StubFaceDetector::frontal())
        .evaluate_bytes(&jpeg, None)
        .unwrap();
    assert_eq!(evaluation.dimensions.width, 640);
    assert!(!evaluation.verdict.has(FailureReason::LowResolution));
}

// === Individual checks ===

#[test]
fn test_uniform_image_always_too_blurry() {
    for value in [0u8, 128, 255] {
        let bytes =
            SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::uniform_gray(512, 512, value));
        let evaluation = pipeline(StubFaceDetector::frontal())
            .evaluate_bytes(&bytes, None)
            .unwrap();
        assert_eq!(evaluation.metrics.blur_score, 0.0);
        assert!(evaluation.verdict.has(FailureReason::TooBlurry));
    }
}

#[test]
fn test_no_face_never_not_frontal() {
    let bytes = SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::portrait(800, 600));
    let evaluation = pipeline(StubFaceDetector::none())
        .evaluate_bytes(&bytes, None)
        .unwrap();

    assert_eq!(evaluation.verdict.reasons, vec![FailureReason::NoFace]);
    assert!(evaluation.metrics.pose_angle.is_none());
}

#[test]
fn test_tilted_face_not_frontal() {
    let bytes = SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::portrait(800, 600));
    let reasons = reasons_for(&pipeline(StubFaceDetector::tilted(35.0)), &bytes, None);
    assert_eq!(reasons, vec![FailureReason::NotFrontal]);

    let reasons = reasons_for(&pipeline(StubFaceDetector::tilted(-10.0)), &bytes, None);
    assert!(reasons.is_empty());
}

#[test]
fn test_dark_photo_bad_brightness() {
    let bytes =
        SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::dark_image(640, 640, 30));
    let reasons = reasons_for(&pipeline(StubFaceDetector::frontal()), &bytes, None);
    assert!(reasons.contains(&FailureReason::BadBrightness), "{reasons:?}");
}

#[test]
fn test_brightness_bounds_inclusive() {
    let pipeline = pipeline(StubFaceDetector::frontal());
    let image = SyntheticImageBuilder::portrait(640, 640);
    let brightness = pipeline.measure(&image).unwrap().brightness;

    let at_low = Thresholds {
        brightness_low: brightness,
        ..Thresholds::default()
    };
    let at_high = Thresholds {
        brightness_high: brightness,
        ..Thresholds::default()
    };
    let above_high = Thresholds {
        brightness_high: brightness - 1.0,
        ..Thresholds::default()
    };

    let verdict = |t: &Thresholds| pipeline.evaluate_image(&image, Some(t)).unwrap().verdict;
    assert!(verdict(&at_low).accepted);
    assert!(verdict(&at_high).accepted);
    assert_eq!(verdict(&above_high).reasons, vec![FailureReason::BadBrightness]);
}

#[test]
fn test_everything_wrong_reports_in_order() {
    let bytes =
        SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::uniform_gray(100, 80, 5));
    let reasons = reasons_for(&pipeline(StubFaceDetector::none()), &bytes, None);
    assert_eq!(
        reasons,
        vec![
            FailureReason::TooBlurry,
            FailureReason::NoFace,
            FailureReason::BadBrightness,
            FailureReason::LowResolution,
        ]
    );
}

// === Thresholds ===

#[test]
fn test_per_call_override_beats_pipeline_defaults() {
    let bytes = SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::portrait(500, 500));
    let pipeline = pipeline(StubFaceDetector::frontal());

    assert!(reasons_for(&pipeline, &bytes, None).is_empty());

    let strict = Thresholds::preset(avatar_qa_core::Preset::Strict);
    let reasons = reasons_for(&pipeline, &bytes, Some(&strict));
    assert!(reasons.contains(&FailureReason::LowResolution));
}

#[test]
fn test_identical_input_identical_verdict() {
    let bytes = SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::portrait(700, 500));
    let pipeline = pipeline(StubFaceDetector::tilted(12.0));

    let first = pipeline.evaluate_bytes(&bytes, None).unwrap();
    let second = pipeline.evaluate_bytes(&bytes, None).unwrap();
    assert_eq!(first.verdict, second.verdict);
    assert_eq!(first.metrics, second.metrics);
}

// === Errors ===

#[test]
fn test_corrupt_bytes_decode_error_before_metrics() {
    let detector = Arc::new(StubFaceDetector::frontal());
    let pipeline = QualityPipeline::new(detector.clone(), PipelineConfig::default());

    let bytes = SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::portrait(300, 300));
    let truncated = &bytes[..bytes.len() / 3];

    let err = pipeline.evaluate_bytes(truncated, None).unwrap_err();
    assert!(err.is_decode(), "{err}");
    assert_eq!(detector.calls(), 0, "no metric should run on undecodable input");

    let jpeg = SyntheticImageBuilder::encode(
        &SyntheticImageBuilder::portrait(640, 480),
        image::ImageFormat::Jpeg,
    );
    for cut in [2, 3, 4] {
        let err = pipeline
            .evaluate_bytes(&jpeg[..jpeg.len() / cut], None)
            .unwrap_err();
        assert!(matches!(err, QualityError::Decode(DecodeError::Corrupt(_))), "{err}");
    }
    assert_eq!(detector.calls(), 0, "truncated JPEG must not reach the extractors");

    let err = pipeline.evaluate_bytes(b"not an image", None).unwrap_err();
    assert!(matches!(err, QualityError::Decode(DecodeError::UnknownFormat)));
}

#[test]
fn test_failing_detector_isolated() {
    let bytes = SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::portrait(640, 480));
    let evaluation = pipeline(FailingFaceDetector)
        .evaluate_bytes(&bytes, None)
        .unwrap();

    assert_eq!(evaluation.metrics.failed_stages, vec![Stage::FaceDetection]);
    assert_eq!(evaluation.verdict.reasons, vec![FailureReason::NoFace]);
    assert!(evaluation.metrics.blur_score > 0.0);
}

// === Batch flow through the ports ===

#[test]
fn test_batch_through_ports() {
    let source = MockUploadSource::new(vec![
        SyntheticImageBuilder::png_upload("good.png", &SyntheticImageBuilder::portrait(640, 640)),
        SyntheticImageBuilder::png_upload("tiny.png", &SyntheticImageBuilder::portrait(120, 90)),
    ])
    .with_unreadable("missing.png");

    let pipeline = pipeline(StubFaceDetector::frontal());
    let output = MockResultOutput::new();
    let progress = MockProgressSink::new();

    let mut processed = 0;
    let mut skipped = 0;
    for upload in source.uploads() {
        match upload {
            Ok(upload) => {
                let report = pipeline
                    .evaluate_upload(&upload, None)
                    .unwrap()
                    .into_report(upload.name, "2024-01-01T00:00:00Z");
                output.write(&report).unwrap();
                progress.on_event(ProgressEvent::Completed { report });
                processed += 1;
            }
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    name: "missing.png".into(),
                    reason: e.to_string(),
                });
                skipped += 1;
            }
        }
    }
    progress.on_event(ProgressEvent::Finished { processed, skipped });

    let reports = output.reports();
    assert_eq!(reports.len(), 2);
    assert!(reports[0].is_acceptable);
    assert!(!reports[1].is_acceptable);
    assert_eq!(reports[1].reasons[0].code, FailureReason::LowResolution);
    assert_eq!(progress.completed_count(), 2);
    assert_eq!(progress.skipped_count(), 1);
    assert_eq!(progress.finished_counts(), Some((2, 1)));
}
