use pivcorr::{
    process_pair, CorrelationStrategy, Frame, OutlierPolicy, PivConfig, PivEngine, PivError, Roi,
    Spacing,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn particle_frame(width: usize, height: usize, particles: &[(f32, f32)]) -> Frame {
    let mut data = vec![8.0f32; width * height];
    for &(cx, cy) in particles {
        for y in 0..height {
            let dy = y as f32 - cy;
            if dy.abs() > 4.0 {
                continue;
            }
            for x in 0..width {
                let dx = x as f32 - cx;
                if dx.abs() <= 4.0 {
                    data[y * width + x] += 180.0 * (-(dx * dx + dy * dy) / 2.0).exp();
                }
            }
        }
    }
    Frame::from_f32(data, width, height).unwrap()
}

fn random_particles(width: usize, height: usize, seed: u64) -> Vec<(f32, f32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width * height / 40)
        .map(|_| {
            (
                rng.random_range(0.0..width as f32),
                rng.random_range(0.0..height as f32),
            )
        })
        .collect()
}

/// Background 10 with a 16x16 square of 200 whose top-left corner is `(x, y)`.
fn square_frame(x: usize, y: usize) -> Frame {
    let mut data = vec![10u8; 128 * 128];
    for row in y..y + 16 {
        for col in x..x + 16 {
            data[row * 128 + col] = 200;
        }
    }
    Frame::from_u8(&data, 128, 128).unwrap()
}

fn overlaps_square(cx: f32, cy: f32) -> bool {
    // Window centre +-16 against the square in frame A at 56..72.
    cx - 16.0 < 72.0 && cx + 16.0 > 56.0 && cy - 16.0 < 72.0 && cy + 16.0 > 56.0
}

#[test]
fn identity_pair_has_zero_displacement() {
    let frame = particle_frame(128, 128, &random_particles(128, 128, 11));
    for strategy in [CorrelationStrategy::Normalized, CorrelationStrategy::Apodized] {
        let cfg = PivConfig {
            strategy,
            subpixel: false,
            ..PivConfig::default()
        };
        let field = process_pair(&frame, &frame, &cfg, None).unwrap();
        assert!(!field.is_empty());
        for vec in &field.vectors {
            assert!(vec.valid, "{strategy:?} window at ({}, {})", vec.x, vec.y);
            assert_eq!((vec.u, vec.v), (0.0, 0.0));
            assert!((vec.correlation - 1.0).abs() < 1e-4);
        }
        assert_eq!(field.statistics.valid_vectors, field.len());
        assert_eq!(field.statistics.max_velocity, 0.0);
    }
}

#[test]
fn known_integer_shift_is_recovered() {
    let a = square_frame(56, 56);
    let b = square_frame(60, 54);
    let cfg = PivConfig {
        window_width: 32,
        window_height: 32,
        spacing: Spacing::Overlap(0.5),
        search_range: 16,
        subpixel: false,
        ..PivConfig::default()
    };
    let field = process_pair(&a, &b, &cfg, None).unwrap();
    assert_eq!(field.len(), 49);

    let mut on_square = 0;
    for vec in &field.vectors {
        if overlaps_square(vec.x, vec.y) {
            on_square += 1;
            assert!(vec.valid);
            assert_eq!((vec.u, vec.v), (4.0, -2.0));
            assert!(vec.correlation > 0.9);
        } else {
            assert!(!vec.valid);
            assert!(vec.correlation < cfg.min_correlation);
        }
    }
    assert_eq!(on_square, 9);
    assert_eq!(field.statistics.valid_vectors, 9);
    assert!((field.statistics.mean_u - 4.0).abs() < 1e-6);
    assert!((field.statistics.mean_v + 2.0).abs() < 1e-6);
}

#[test]
fn apodized_strategy_recovers_shift_on_padded_grid() {
    let a = square_frame(56, 56);
    let b = square_frame(60, 54);
    let cfg = PivConfig {
        strategy: CorrelationStrategy::Apodized,
        search_range: 16,
        subpixel: false,
        outlier_policy: OutlierPolicy::LocalMedian,
        ..PivConfig::default()
    };
    let field = process_pair(&a, &b, &cfg, None).unwrap();
    // Padding lets windows centre on the frame border: 9 x 9 windows.
    assert_eq!(field.len(), 81);
    let valid: Vec<_> = field.valid_vectors().collect();
    assert_eq!(valid.len(), 9);
    for vec in valid {
        assert!(overlaps_square(vec.x, vec.y));
        assert_eq!((vec.u, vec.v), (4.0, -2.0));
        assert!(vec.correlation > 0.9);
        assert!(!vec.replaced);
    }
}

#[test]
fn oversized_window_is_an_input_error() {
    let frame = square_frame(56, 56);
    let cfg = PivConfig {
        window_width: 256,
        window_height: 256,
        ..PivConfig::default()
    };
    let err = process_pair(&frame, &frame, &cfg, None).unwrap_err();
    assert!(matches!(err, PivError::WindowTooLarge { .. }));
    assert!(err.is_invalid_input());
}

#[test]
fn mismatched_pair_is_an_input_error() {
    let a = square_frame(56, 56);
    let b = Frame::from_u8(&vec![0u8; 128 * 64], 128, 64).unwrap();
    let err = process_pair(&a, &b, &PivConfig::default(), None).unwrap_err();
    assert_eq!(
        err,
        PivError::DimensionMismatch {
            a_width: 128,
            a_height: 128,
            b_width: 128,
            b_height: 64,
        }
    );
}

#[test]
fn roi_limits_window_centres() {
    let frame = particle_frame(128, 128, &random_particles(128, 128, 3));
    let roi = Roi {
        x: 32,
        y: 32,
        width: 48,
        height: 40,
    };
    let cfg = PivConfig {
        roi: Some(roi),
        ..PivConfig::default()
    };
    let field = process_pair(&frame, &frame, &cfg, None).unwrap();
    // Centres 32, 48, 64 on x; 32, 48, 64 on y.
    assert_eq!(field.len(), 9);
    for vec in &field.vectors {
        assert!(roi.contains(vec.x, vec.y));
    }
}

#[test]
fn engine_and_free_function_agree() {
    let particles = random_particles(96, 96, 5);
    let a = particle_frame(96, 96, &particles);
    let shifted: Vec<(f32, f32)> = particles.iter().map(|&(x, y)| (x + 2.0, y + 1.0)).collect();
    let b = particle_frame(96, 96, &shifted);
    let cfg = PivConfig {
        search_range: 6,
        workers: 1,
        ..PivConfig::default()
    };
    let engine = PivEngine::new(cfg.clone()).unwrap();
    let from_engine = engine.process_pair(&a, &b, None).unwrap();
    let from_fn = process_pair(&a, &b, &cfg, None).unwrap();
    assert_eq!(from_engine, from_fn);
    let median_u = {
        let mut us: Vec<f32> = from_engine.valid_vectors().map(|v| v.u).collect();
        us.sort_by(f32::total_cmp);
        us[us.len() / 2]
    };
    assert!((median_u - 2.0).abs() < 0.1);
}
