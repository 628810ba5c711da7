use super::*;

#[test]
fn hex_colors_parse_all_widths() {
    let c = Rgba::from_hex("#ff0000").unwrap();
    assert_eq!(c, Rgba::rgb(1.0, 0.0, 0.0));

    let short = Rgba::from_hex("#fff").unwrap();
    assert_eq!(short, Rgba::WHITE);

    let alpha = Rgba::from_hex("#00000080").unwrap();
    assert!((alpha.a - 128.0 / 255.0).abs() < 1e-6);
}

#[test]
fn hex_colors_reject_garbage() {
    assert!(Rgba::from_hex("ff0000").is_err());
    assert!(Rgba::from_hex("#ff00").is_err());
    assert!(Rgba::from_hex("#gg0000").is_err());
}

#[test]
fn transform_affine_roundtrip_preserves_components() {
    let t = Transform {
        position: Vec3::new(1.0, -2.0, 3.0),
        rotation: Vec3::new(0.0, 0.0, 0.5),
        scale: Vec3::new(2.0, 2.0, 1.0),
        uniform_scale: None,
    };
    let back = Transform::from_affine(t.to_affine());
    assert!((back.position - t.position).length() < 1e-5);
    assert!((back.scale - t.scale).length() < 1e-5);
    assert!((back.rotation.z - 0.5).abs() < 1e-5);
}

#[test]
fn uniform_scale_multiplies_axes() {
    let t = Transform {
        scale: Vec3::new(1.0, 2.0, 3.0),
        uniform_scale: Some(2.0),
        ..Transform::default()
    };
    assert_eq!(t.effective_scale(), Vec3::new(2.0, 4.0, 6.0));
}

#[test]
fn aabb_transform_tracks_translation_and_scale() {
    let b = Aabb::centered(Vec3::splat(1.0));
    let m = Affine3A::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::IDENTITY,
        Vec3::new(10.0, 0.0, 0.0),
    );
    let t = b.transformed(&m);
    assert!((t.min - Vec3::new(8.0, -2.0, -2.0)).length() < 1e-5);
    assert!((t.max - Vec3::new(12.0, 2.0, 2.0)).length() < 1e-5);
    assert!((t.center() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn seconds_validation() {
    assert!(check_seconds("duration", 0.0).is_ok());
    assert!(check_seconds("duration", -0.1).is_err());
    assert!(check_seconds("duration", f64::NAN).is_err());
}

#[test]
fn colors_deserialize_from_hex_or_channels() {
    #[derive(serde::Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_color")]
        c: Rgba,
        #[serde(default, deserialize_with = "deserialize_opt_color")]
        o: Option<Rgba>,
    }

    let h: Holder = serde_json::from_str(r##"{"c":"#00ff00","o":{"r":1,"g":0,"b":0}}"##).unwrap();
    assert_eq!(h.c, Rgba::rgb(0.0, 1.0, 0.0));
    assert_eq!(h.o, Some(Rgba::rgb(1.0, 0.0, 0.0)));

    let h: Holder = serde_json::from_str(r#"{"c":{"r":0,"g":0,"b":1,"a":0.5}}"#).unwrap();
    assert_eq!(h.c.a, 0.5);
    assert!(h.o.is_none());
    assert!(serde_json::from_str::<Holder>(r#"{"c":"red"}"#).is_err());
}
