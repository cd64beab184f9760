use super::*;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape::Rectangle { x, y, width: w, height: h }
}

#[test]
fn translate_moves_rectangle_origin() {
    let mut s = rect(10.0, 20.0, 30.0, 40.0);
    s.translate(5.0, -5.0);
    assert_eq!(s, rect(15.0, 15.0, 30.0, 40.0));
}

#[test]
fn translate_moves_both_line_endpoints() {
    let mut s = Shape::Line { x1: 0.0, y1: 0.0, x2: 10.0, y2: 10.0 };
    s.translate(3.0, 4.0);
    assert_eq!(s, Shape::Line { x1: 3.0, y1: 4.0, x2: 13.0, y2: 14.0 });
}

#[test]
fn translate_moves_circle_center_keeps_radius() {
    let mut s = Shape::Circle { cx: 1.0, cy: 2.0, radius: 5.0 };
    s.translate(-1.0, -2.0);
    assert_eq!(s, Shape::Circle { cx: 0.0, cy: 0.0, radius: 5.0 });
}

#[test]
fn translate_moves_every_path_point() {
    let mut s = Shape::Path {
        points: vec![Point { x: 0.0, y: 0.0 }, Point { x: 1.0, y: 1.0 }],
    };
    s.translate(2.0, 3.0);
    let Shape::Path { points } = s else { panic!("variant changed") };
    assert_eq!(points[0], Point { x: 2.0, y: 3.0 });
    assert_eq!(points[1], Point { x: 3.0, y: 4.0 });
}

#[test]
fn normalize_flips_negative_extents() {
    let mut s = rect(100.0, 50.0, -30.0, -20.0);
    s.normalize();
    assert_eq!(s, rect(70.0, 30.0, 30.0, 20.0));
}

#[test]
fn normalize_leaves_positive_extents_alone() {
    let mut s = rect(1.0, 2.0, 3.0, 4.0);
    s.normalize();
    assert_eq!(s, rect(1.0, 2.0, 3.0, 4.0));
}

#[test]
fn normalize_ignores_linear_variants() {
    let mut s = Shape::Line { x1: 10.0, y1: 10.0, x2: 0.0, y2: 0.0 };
    s.normalize();
    assert_eq!(s, Shape::Line { x1: 10.0, y1: 10.0, x2: 0.0, y2: 0.0 });
}

#[test]
fn cloned_offset_gets_fresh_id_and_moves() {
    let e = Element::new(rect(0.0, 0.0, 10.0, 10.0), Style::default());
    let d = e.cloned_offset(20.0, 20.0);
    assert_ne!(d.id, e.id);
    assert_eq!(d.shape, rect(20.0, 20.0, 10.0, 10.0));
    assert_eq!(d.style, e.style);
}

#[test]
fn transparent_fill_is_not_a_fill() {
    let mut style = Style::default();
    assert!(!style.has_fill());
    style.fill = "#FF0000".to_owned();
    assert!(style.has_fill());
}

#[test]
fn solid_stroke_has_no_dash_pattern() {
    assert!(StrokeStyle::Solid.dash_pattern(2.0).is_empty());
    assert_eq!(StrokeStyle::Dashed.dash_pattern(2.0), vec![8.0, 4.0]);
    assert_eq!(StrokeStyle::Dotted.dash_pattern(2.0), vec![2.0, 4.0]);
}

#[test]
fn serde_tags_variant_and_flattens_fields() {
    let e = Element::new(rect(1.0, 2.0, 3.0, 4.0), Style::default());
    let json = serde_json::to_value(&e).unwrap();
    assert_eq!(json["type"], "rectangle");
    assert_eq!(json["x"], 1.0);
    assert_eq!(json["stroke"], "#1F1A17");
    let back: Element = serde_json::from_value(json).unwrap();
    assert_eq!(back, e);
}

#[test]
fn serde_round_trips_text_decorations() {
    let shape = Shape::Text {
        x: 0.0,
        y: 0.0,
        text: "hello".to_owned(),
        font_size: 24.0,
        font_family: "sans-serif".to_owned(),
        bold: true,
        italic: false,
        underline: true,
        strikethrough: false,
    };
    let e = Element::new(shape.clone(), Style::default());
    let json = serde_json::to_string(&e).unwrap();
    let back: Element = serde_json::from_str(&json).unwrap();
    assert_eq!(back.shape, shape);
}
