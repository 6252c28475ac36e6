#![cfg(feature = "serde")]

use pivcorr::{Calibration, Frame, PivConfig, PivEngine};
use serde_json::Value;
use std::time::Duration;

fn gradient_pair() -> (Frame, Frame) {
    let make = |shift: usize| {
        let mut data = Vec::with_capacity(64 * 64);
        for y in 0..64usize {
            for x in 0..64usize {
                let sx = x + 8 - shift;
                data.push((((sx * 29) ^ (y * 13) ^ (sx * y)) & 0xFF) as u8);
            }
        }
        Frame::from_u8(&data, 64, 64).unwrap()
    };
    (make(0), make(2))
}

fn small_config() -> PivConfig {
    PivConfig {
        window_width: 16,
        window_height: 16,
        search_range: 4,
        ..PivConfig::default()
    }
}

#[test]
fn field_serializes_to_wire_shape() {
    let (a, b) = gradient_pair();
    let engine = PivEngine::new(small_config()).unwrap();
    let field = engine.process_pair(&a, &b, None).unwrap();
    let json = serde_json::to_value(&field).unwrap();

    let obj = json.as_object().unwrap();
    let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["statistics", "vectors"]);

    let vectors = obj["vectors"].as_array().unwrap();
    assert_eq!(vectors.len(), field.len());
    let first = vectors[0].as_object().unwrap();
    let mut vec_keys: Vec<_> = first.keys().map(String::as_str).collect();
    vec_keys.sort_unstable();
    assert_eq!(vec_keys, ["correlation", "u", "v", "valid", "x", "y"]);
    assert!(first["valid"].is_boolean());

    let stats = obj["statistics"].as_object().unwrap();
    for key in [
        "totalVectors",
        "validVectors",
        "meanU",
        "meanV",
        "stdU",
        "stdV",
        "maxVelocity",
        "avgVelocity",
        "pixelsPerUnit",
        "maxVelocityPhysical",
        "avgVelocityPhysical",
    ] {
        assert!(stats.contains_key(key), "missing {key}");
    }
    assert_eq!(stats.len(), 11);
    assert_eq!(stats["totalVectors"], Value::from(field.len()));
    assert!(stats["pixelsPerUnit"].is_null());
    assert!(stats["maxVelocityPhysical"].is_null());
    assert!(stats["avgVelocityPhysical"].is_null());
}

#[test]
fn calibrated_field_carries_physical_values() {
    let (a, b) = gradient_pair();
    let engine = PivEngine::new(small_config()).unwrap();
    let calibration = Calibration::new(4.0).unwrap();
    let field = engine.process_pair(&a, &b, Some(calibration)).unwrap();
    let json = serde_json::to_value(&field).unwrap();
    let stats = &json["statistics"];
    assert_eq!(stats["pixelsPerUnit"].as_f64(), Some(4.0));
    let max_px = stats["maxVelocity"].as_f64().unwrap();
    let max_phys = stats["maxVelocityPhysical"].as_f64().unwrap();
    assert!((max_phys - max_px / 4.0).abs() < 1e-6);
}

#[test]
fn degraded_field_reports_status() {
    let (a, b) = gradient_pair();
    let engine = PivEngine::new(small_config()).unwrap();
    let field = engine
        .process_pair_with_deadline(&a, &b, None, Duration::ZERO)
        .unwrap();
    let json = serde_json::to_value(&field).unwrap();
    assert_eq!(json["status"]["state"], "degraded");
    assert_eq!(json["status"]["processed"], 0);
    assert_eq!(json["status"]["total"], Value::from(field.len()));
}

#[test]
fn vector_round_trips_without_internal_flags() {
    let (a, b) = gradient_pair();
    let field = pivcorr::process_pair(&a, &b, &small_config(), None).unwrap();
    let text = serde_json::to_string(&field.vectors[0]).unwrap();
    assert!(!text.contains("replaced"));
    let back: pivcorr::DisplacementVector = serde_json::from_str(&text).unwrap();
    assert_eq!(back, field.vectors[0]);
}
