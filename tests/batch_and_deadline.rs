use pivcorr::{FieldStatus, Frame, PivConfig, PivEngine, PivError};
use std::time::Duration;

/// Texture translated by `shift` pixels to the right.
fn texture(shift: usize) -> Frame {
    let mut data = Vec::with_capacity(80 * 64);
    for y in 0..64usize {
        for x in 0..80usize {
            let sx = x + 32 - shift;
            data.push((((sx * 37) ^ (y * 11) ^ (sx * y * 3)) & 0xFF) as u8);
        }
    }
    Frame::from_u8(&data, 80, 64).unwrap()
}

fn config() -> PivConfig {
    PivConfig {
        window_width: 16,
        window_height: 16,
        search_range: 6,
        subpixel: false,
        max_pairs_in_flight: 2,
        ..PivConfig::default()
    }
}

#[test]
fn batch_returns_fields_in_pair_order() {
    let frames = vec![texture(0), texture(1), texture(3), texture(6), texture(10)];
    let engine = PivEngine::new(config()).unwrap();
    let fields = engine.process_batch(&frames, None).unwrap();
    assert_eq!(fields.len(), 4);
    for (field, expected) in fields.iter().zip([1.0f32, 2.0, 3.0, 4.0]) {
        assert_eq!(field.status, FieldStatus::Complete);
        assert!(field.statistics.valid_vectors > field.len() / 2);
        assert!((field.statistics.mean_u - expected).abs() < 1e-6);
    }
}

#[test]
fn explicit_pairs_match_consecutive_batch() {
    let frames = vec![texture(0), texture(2), texture(5)];
    let engine = PivEngine::new(config()).unwrap();
    let batch = engine.process_batch(&frames, None).unwrap();
    let pairs = engine
        .process_pairs(&[(&frames[0], &frames[1]), (&frames[1], &frames[2])], None)
        .unwrap();
    assert_eq!(batch, pairs);
}

#[test]
fn batch_needs_at_least_two_frames() {
    let engine = PivEngine::new(config()).unwrap();
    assert_eq!(
        engine.process_batch(&[], None).unwrap_err(),
        PivError::InsufficientData { needed: 2, got: 0 }
    );
    let err = engine.process_batch(&[texture(0)], None).unwrap_err();
    assert_eq!(err, PivError::InsufficientData { needed: 2, got: 1 });
    assert!(!err.is_invalid_input());
}

#[test]
fn batch_aborts_on_invalid_pair() {
    let odd = Frame::from_u8(&vec![0u8; 40 * 40], 40, 40).unwrap();
    let frames = vec![texture(0), texture(1), odd];
    let engine = PivEngine::new(config()).unwrap();
    let err = engine.process_batch(&frames, None).unwrap_err();
    assert!(matches!(err, PivError::DimensionMismatch { .. }));
}

#[test]
fn expired_deadline_returns_degraded_field() {
    let engine = PivEngine::new(config()).unwrap();
    let (a, b) = (texture(0), texture(2));
    let field = engine
        .process_pair_with_deadline(&a, &b, None, Duration::ZERO)
        .unwrap();
    let total = field.len();
    assert_eq!(field.status, FieldStatus::Degraded { processed: 0, total });
    assert!(field.vectors.iter().all(|v| !v.valid && v.u == 0.0 && v.v == 0.0));
    assert_eq!(field.statistics.valid_vectors, 0);
    assert_eq!(field.statistics.mean_u, 0.0);
}

#[test]
fn generous_deadline_completes() {
    let engine = PivEngine::new(config()).unwrap();
    let (a, b) = (texture(0), texture(2));
    let timed = engine
        .process_pair_with_deadline(&a, &b, None, Duration::from_secs(600))
        .unwrap();
    let untimed = engine.process_pair(&a, &b, None).unwrap();
    assert_eq!(timed.status, FieldStatus::Complete);
    assert_eq!(timed, untimed);
}
