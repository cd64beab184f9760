use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point { x, y }
}

#[test]
fn same_seed_yields_identical_strokes() {
    let opts = RoughOptions::default();
    let a = Rough::new(7).line(pt(0.0, 0.0), pt(100.0, 0.0), &opts);
    let b = Rough::new(7).line(pt(0.0, 0.0), pt(100.0, 0.0), &opts);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_diverge() {
    let opts = RoughOptions::default();
    let a = Rough::new(1).line(pt(0.0, 0.0), pt(100.0, 0.0), &opts);
    let b = Rough::new(2).line(pt(0.0, 0.0), pt(100.0, 0.0), &opts);
    assert_ne!(a, b);
}

#[test]
fn zero_roughness_line_is_the_ideal_segment() {
    let opts = RoughOptions { roughness: 0.0, ..RoughOptions::default() };
    let line = Rough::new(7).line(pt(0.0, 0.0), pt(100.0, 50.0), &opts);
    assert_eq!(line, vec![pt(0.0, 0.0), pt(100.0, 50.0)]);
}

#[test]
fn line_stays_near_the_ideal_segment() {
    let opts = RoughOptions::default();
    let line = Rough::new(3).line(pt(0.0, 0.0), pt(100.0, 0.0), &opts);
    assert!(line.len() > 2);
    for p in &line {
        assert!(p.y.abs() < 15.0, "point strayed: {p:?}");
        assert!(p.x > -15.0 && p.x < 115.0, "point strayed: {p:?}");
    }
}

#[test]
fn rectangle_double_strokes_four_edges() {
    let opts = RoughOptions::default();
    let strokes = Rough::new(5).rectangle(pt(0.0, 0.0), 50.0, 30.0, &opts);
    assert_eq!(strokes.len(), 8);
}

#[test]
fn zero_roughness_rectangle_single_strokes() {
    let opts = RoughOptions { roughness: 0.0, ..RoughOptions::default() };
    let strokes = Rough::new(5).rectangle(pt(0.0, 0.0), 50.0, 30.0, &opts);
    assert_eq!(strokes.len(), 4);
    assert_eq!(strokes[0], vec![pt(0.0, 0.0), pt(50.0, 0.0)]);
}

#[test]
fn diamond_vertices_are_edge_midpoints() {
    let opts = RoughOptions { roughness: 0.0, ..RoughOptions::default() };
    let strokes = Rough::new(5).diamond(pt(0.0, 0.0), 100.0, 60.0, &opts);
    assert_eq!(strokes[0], vec![pt(50.0, 0.0), pt(100.0, 30.0)]);
    assert_eq!(strokes[2], vec![pt(50.0, 60.0), pt(0.0, 30.0)]);
}

#[test]
fn ellipse_emits_two_passes_that_hug_the_radii() {
    let opts = RoughOptions::default();
    let strokes = Rough::new(9).ellipse(pt(0.0, 0.0), 100.0, 60.0, &opts);
    assert_eq!(strokes.len(), 2);
    for stroke in &strokes {
        assert!(stroke.len() >= 16);
        for p in stroke {
            assert!(p.x.abs() < 60.0 && p.y.abs() < 40.0, "point strayed: {p:?}");
        }
    }
}

#[test]
fn zero_roughness_ellipse_is_one_closed_pass() {
    let opts = RoughOptions { roughness: 0.0, ..RoughOptions::default() };
    let strokes = Rough::new(9).ellipse(pt(0.0, 0.0), 100.0, 60.0, &opts);
    assert_eq!(strokes.len(), 1);
    let first = strokes[0].first().unwrap();
    let last = strokes[0].last().unwrap();
    assert!((first.x - last.x).abs() < 1e-9);
    assert!((first.y - last.y).abs() < 1e-9);
}

#[test]
fn arrow_adds_two_head_strokes() {
    let opts = RoughOptions::default();
    let strokes = Rough::new(4).arrow(pt(0.0, 0.0), pt(100.0, 0.0), &opts);
    // Two shaft passes plus two head strokes.
    assert_eq!(strokes.len(), 4);
}

#[test]
fn degenerate_arrow_skips_the_head() {
    let opts = RoughOptions::default();
    let strokes = Rough::new(4).arrow(pt(10.0, 10.0), pt(10.0, 10.0), &opts);
    assert_eq!(strokes.len(), 2);
}

#[test]
fn options_for_carries_the_style_roughness() {
    let opts = options_for(2.5);
    assert_eq!(opts.roughness, 2.5);
    assert_eq!(opts.bowing, 1.0);
}
