use super::*;

#[test]
fn default_config_validates() {
    ReelConfig::default().validate().unwrap();
}

#[test]
fn rejects_odd_canvas_dimensions() {
    let cfg = ReelConfig {
        canvas: Canvas {
            width: 1921,
            height: 1080,
        },
        ..ReelConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_min_scale_outside_unit_interval() {
    for bad in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
        let cfg = ReelConfig {
            min_scale: bad,
            ..ReelConfig::default()
        };
        assert!(cfg.validate().is_err(), "min_scale {bad} should be rejected");
    }
}

#[test]
fn json_roundtrip_preserves_policy() {
    let cfg = ReelConfig {
        slide: SlidePolicy::TwoCanvas,
        seed: 42,
        ..ReelConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("two_canvas"));
    let back: ReelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let cfg: ReelConfig = serde_json::from_str(r#"{ "seed": 9 }"#).unwrap();
    assert_eq!(cfg.seed, 9);
    assert_eq!(cfg.canvas.width, 1920);
    assert_eq!(cfg.slide, SlidePolicy::OneCanvas);
}
