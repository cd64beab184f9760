use super::*;
use crate::consts::{DUPLICATE_OFFSET, MIN_ELEMENT_SIZE};

fn pt(x: f64, y: f64) -> Point {
    Point { x, y }
}

fn none() -> Modifiers {
    Modifiers::default()
}

fn shift() -> Modifiers {
    Modifiers { shift: true, ..Modifiers::default() }
}

fn ctrl() -> Modifiers {
    Modifiers { ctrl: true, ..Modifiers::default() }
}

/// Drag the primary button from `from` to `to` in one move step.
fn drag(core: &mut EngineCore, from: Point, to: Point) {
    core.on_pointer_down(from, Button::Primary, none());
    core.on_pointer_move(to, none());
    core.on_pointer_up(to, Button::Primary, none());
}

fn draw_rect(core: &mut EngineCore, from: Point, to: Point) -> ElementId {
    core.set_tool(Tool::Rectangle);
    drag(core, from, to);
    core.set_tool(Tool::Select);
    core.doc.elements().last().map(|e| e.id).unwrap()
}

#[test]
fn dragging_the_rectangle_tool_creates_a_rectangle() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    drag(&mut core, pt(100.0, 100.0), pt(220.0, 170.0));
    assert_eq!(core.doc.len(), 1);
    let Shape::Rectangle { x, y, width, height } = core.doc.elements()[0].shape else {
        panic!("variant")
    };
    assert_eq!((x, y, width, height), (100.0, 100.0, 120.0, 70.0));
    // The fresh element is selected.
    assert!(core.doc.is_selected(core.doc.elements()[0].id));
}

#[test]
fn dragging_up_and_left_normalizes_the_rectangle() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    drag(&mut core, pt(100.0, 100.0), pt(40.0, 60.0));
    let Shape::Rectangle { x, y, width, height } = core.doc.elements()[0].shape else {
        panic!("variant")
    };
    assert_eq!((x, y, width, height), (40.0, 60.0, 60.0, 40.0));
}

#[test]
fn a_click_without_extent_creates_nothing() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    drag(&mut core, pt(100.0, 100.0), pt(100.0, 100.0));
    assert!(core.doc.is_empty());
    core.set_tool(Tool::Pen);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, none());
    core.on_pointer_up(pt(10.0, 10.0), Button::Primary, none());
    assert!(core.doc.is_empty());
}

#[test]
fn the_pen_collects_points_along_the_drag() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Pen);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, none());
    core.on_pointer_move(pt(10.0, 5.0), none());
    core.on_pointer_move(pt(20.0, 10.0), none());
    core.on_pointer_up(pt(20.0, 10.0), Button::Primary, none());
    let Shape::Path { points } = &core.doc.elements()[0].shape else { panic!("variant") };
    assert_eq!(points.len(), 4);
    assert_eq!(points[0], pt(0.0, 0.0));
}

#[test]
fn circle_radius_follows_the_pointer_distance() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Circle);
    drag(&mut core, pt(100.0, 100.0), pt(130.0, 140.0));
    let Shape::Circle { cx, cy, radius } = core.doc.elements()[0].shape else {
        panic!("variant")
    };
    assert_eq!((cx, cy), (100.0, 100.0));
    assert_eq!(radius, 50.0);
}

#[test]
fn clicking_an_element_selects_it_clicking_empty_space_clears() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.doc.clear_selection();
    drag(&mut core, pt(25.0, 25.0), pt(25.0, 25.0));
    assert!(core.doc.is_selected(id));
    drag(&mut core, pt(500.0, 500.0), pt(500.0, 500.0));
    assert_eq!(core.doc.selection_len(), 0);
}

#[test]
fn shift_click_toggles_membership() {
    let mut core = EngineCore::new();
    let a = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    let b = draw_rect(&mut core, pt(100.0, 0.0), pt(150.0, 50.0));
    core.doc.select_only(a);
    core.on_pointer_down(pt(125.0, 25.0), Button::Primary, shift());
    core.on_pointer_up(pt(125.0, 25.0), Button::Primary, shift());
    assert!(core.doc.is_selected(a));
    assert!(core.doc.is_selected(b));
    core.on_pointer_down(pt(125.0, 25.0), Button::Primary, shift());
    core.on_pointer_up(pt(125.0, 25.0), Button::Primary, shift());
    assert!(!core.doc.is_selected(b));
}

#[test]
fn shape_tool_press_on_an_element_moves_it_instead_of_drawing() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(100.0, 100.0));
    core.doc.clear_selection();
    core.set_tool(Tool::Rectangle);
    drag(&mut core, pt(50.0, 50.0), pt(70.0, 60.0));
    assert_eq!(core.doc.len(), 1);
    assert!(core.doc.is_selected(id));
    let Shape::Rectangle { x, y, .. } = core.doc.get(id).unwrap().shape else { panic!("variant") };
    assert_eq!((x, y), (20.0, 10.0));
}

#[test]
fn text_tool_press_on_an_element_selects_instead_of_opening_a_caret() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(100.0, 100.0));
    core.doc.clear_selection();
    core.set_tool(Tool::Text);
    let actions = core.on_pointer_down(pt(50.0, 50.0), Button::Primary, none());
    assert!(!actions.iter().any(|a| matches!(a, Action::TextEditRequested { .. })));
    assert!(core.doc.is_selected(id));
    core.on_pointer_up(pt(50.0, 50.0), Button::Primary, none());
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn shift_click_drag_moves_the_extended_selection_in_one_gesture() {
    let mut core = EngineCore::new();
    let a = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    let b = draw_rect(&mut core, pt(100.0, 0.0), pt(150.0, 50.0));
    core.doc.select_only(a);
    core.on_pointer_down(pt(125.0, 25.0), Button::Primary, shift());
    core.on_pointer_move(pt(135.0, 45.0), shift());
    core.on_pointer_up(pt(135.0, 45.0), Button::Primary, shift());
    let Shape::Rectangle { x, y, .. } = core.doc.get(a).unwrap().shape else { panic!("variant") };
    assert_eq!((x, y), (10.0, 20.0));
    let Shape::Rectangle { x, y, .. } = core.doc.get(b).unwrap().shape else { panic!("variant") };
    assert_eq!((x, y), (110.0, 20.0));
}

#[test]
fn dragging_a_selected_element_moves_the_whole_selection() {
    let mut core = EngineCore::new();
    let a = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    let b = draw_rect(&mut core, pt(100.0, 0.0), pt(150.0, 50.0));
    core.doc.select_only(a);
    core.doc.toggle_selected(b);
    drag(&mut core, pt(25.0, 25.0), pt(35.0, 45.0));
    let Shape::Rectangle { x, y, .. } = core.doc.get(a).unwrap().shape else { panic!("variant") };
    assert_eq!((x, y), (10.0, 20.0));
    let Shape::Rectangle { x, y, .. } = core.doc.get(b).unwrap().shape else { panic!("variant") };
    assert_eq!((x, y), (110.0, 20.0));
}

#[test]
fn a_selection_click_without_movement_records_no_history() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.doc.select_only(id);
    assert!(core.can_undo());
    drag(&mut core, pt(25.0, 25.0), pt(25.0, 25.0));
    // One undo step: the creation, not the click.
    core.undo();
    assert!(core.doc.is_empty());
}

#[test]
fn marquee_selects_fully_contained_elements_only() {
    let mut core = EngineCore::new();
    let inside = draw_rect(&mut core, pt(10.0, 10.0), pt(40.0, 40.0));
    let partial = draw_rect(&mut core, pt(90.0, 90.0), pt(150.0, 150.0));
    core.doc.clear_selection();
    drag(&mut core, pt(0.0, 0.0), pt(100.0, 100.0));
    assert!(core.doc.is_selected(inside));
    assert!(!core.doc.is_selected(partial));
}

#[test]
fn resizing_by_the_se_handle_grows_both_dimensions() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(100.0, 50.0));
    core.doc.select_only(id);
    // Padded selection box corner sits 5 units outside the element.
    drag(&mut core, pt(105.0, 55.0), pt(125.0, 75.0));
    let Shape::Rectangle { x, y, width, height } = core.doc.get(id).unwrap().shape else {
        panic!("variant")
    };
    assert_eq!((x, y, width, height), (0.0, 0.0, 120.0, 70.0));
}

#[test]
fn resizing_by_an_edge_handle_changes_one_dimension() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(100.0, 50.0));
    core.doc.select_only(id);
    // East handle midpoint of the padded box.
    drag(&mut core, pt(105.0, 25.0), pt(155.0, 90.0));
    let Shape::Rectangle { width, height, .. } = core.doc.get(id).unwrap().shape else {
        panic!("variant")
    };
    assert_eq!((width, height), (150.0, 50.0));
}

#[test]
fn resize_clamps_at_the_minimum_size() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(100.0, 50.0));
    core.doc.select_only(id);
    drag(&mut core, pt(105.0, 55.0), pt(-300.0, -300.0));
    let Shape::Rectangle { x, y, width, height } = core.doc.get(id).unwrap().shape else {
        panic!("variant")
    };
    assert_eq!((width, height), (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    assert_eq!((x, y), (0.0, 0.0));
}

#[test]
fn image_corner_resize_keeps_the_aspect_ratio() {
    let mut core = EngineCore::new();
    core.set_viewport(1000.0, 800.0, 1.0);
    core.insert_image("data:image/png;base64,AAAA".to_owned(), 200.0, 100.0);
    let id = core.doc.elements()[0].id;
    core.set_tool(Tool::Select);
    let b = crate::geometry::bounds(&core.doc.get(id).unwrap().shape, &core.text).unwrap();
    let corner = pt(b.right() + 5.0, b.bottom() + 5.0);
    drag(&mut core, corner, pt(corner.x + 10.0, corner.y + 100.0));
    let Shape::Image { width, height, .. } = core.doc.get(id).unwrap().shape else {
        panic!("variant")
    };
    assert!((width / height - 2.0).abs() < 1e-9);
    assert_eq!(height, 200.0);
}

#[test]
fn the_eraser_removes_the_topmost_element_under_the_click() {
    let mut core = EngineCore::new();
    let bottom = draw_rect(&mut core, pt(0.0, 0.0), pt(100.0, 100.0));
    // Reversed drag so the press lands on empty canvas, not on `bottom`.
    let top = draw_rect(&mut core, pt(150.0, 150.0), pt(50.0, 50.0));
    core.set_tool(Tool::Eraser);
    core.on_pointer_down(pt(75.0, 75.0), Button::Primary, none());
    core.on_pointer_up(pt(75.0, 75.0), Button::Primary, none());
    assert!(core.doc.get(top).is_none());
    assert!(core.doc.get(bottom).is_some());
    // Empty space erases nothing.
    core.on_pointer_down(pt(500.0, 500.0), Button::Primary, none());
    core.on_pointer_up(pt(500.0, 500.0), Button::Primary, none());
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn delete_removes_the_selection_and_is_undoable() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.doc.select_only(id);
    core.on_key_down("Delete", none());
    assert!(core.doc.is_empty());
    core.on_key_down("z", ctrl());
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn escape_discards_an_in_flight_draft() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, none());
    core.on_pointer_move(pt(50.0, 50.0), none());
    core.on_key_down("Escape", none());
    assert!(core.input.is_idle());
    core.on_pointer_up(pt(50.0, 50.0), Button::Primary, none());
    assert!(core.doc.is_empty());
}

#[test]
fn escape_mid_resize_reverts_the_element() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(100.0, 50.0));
    core.doc.select_only(id);
    core.on_pointer_down(pt(105.0, 55.0), Button::Primary, none());
    core.on_pointer_move(pt(125.0, 75.0), none());
    core.on_key_down("Escape", none());
    assert!(core.input.is_idle());
    let Shape::Rectangle { width, height, .. } = core.doc.get(id).unwrap().shape else {
        panic!("variant")
    };
    assert_eq!((width, height), (100.0, 50.0));
    // The cancelled gesture left no history entry behind.
    core.undo();
    assert!(core.doc.is_empty());
}

#[test]
fn escape_mid_move_restores_positions() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.on_pointer_down(pt(25.0, 25.0), Button::Primary, none());
    core.on_pointer_move(pt(45.0, 35.0), none());
    core.on_key_down("Escape", none());
    assert!(core.input.is_idle());
    let Shape::Rectangle { x, y, .. } = core.doc.get(id).unwrap().shape else { panic!("variant") };
    assert_eq!((x, y), (0.0, 0.0));
}

#[test]
fn escape_mid_pan_keeps_the_selection() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.on_pointer_down(pt(300.0, 300.0), Button::Middle, none());
    core.on_key_down("Escape", none());
    assert!(core.input.is_idle());
    assert!(core.doc.is_selected(id));
}

#[test]
fn escape_clears_the_selection_when_idle() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.doc.select_only(id);
    core.on_key_down("Escape", none());
    assert_eq!(core.doc.selection_len(), 0);
}

#[test]
fn undo_redo_walk_the_edit_history() {
    let mut core = EngineCore::new();
    draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    draw_rect(&mut core, pt(100.0, 0.0), pt(150.0, 50.0));
    core.on_key_down("z", ctrl());
    assert_eq!(core.doc.len(), 1);
    core.on_key_down("z", Modifiers { ctrl: true, shift: true, ..Modifiers::default() });
    assert_eq!(core.doc.len(), 2);
    core.on_key_down("z", ctrl());
    core.on_key_down("y", ctrl());
    assert_eq!(core.doc.len(), 2);
}

#[test]
fn copy_then_paste_clones_with_offset_and_fresh_ids() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(10.0, 10.0), pt(60.0, 60.0));
    core.doc.select_only(id);
    core.on_key_down("c", ctrl());
    core.on_key_down("v", ctrl());
    assert_eq!(core.doc.len(), 2);
    let pasted = core.doc.elements().last().cloned().unwrap();
    assert_ne!(pasted.id, id);
    let Shape::Rectangle { x, y, .. } = pasted.shape else { panic!("variant") };
    assert_eq!((x, y), (10.0 + DUPLICATE_OFFSET, 10.0 + DUPLICATE_OFFSET));
    assert!(core.doc.is_selected(pasted.id));
}

#[test]
fn paste_with_an_empty_clipboard_does_nothing() {
    let mut core = EngineCore::new();
    core.on_key_down("v", ctrl());
    assert!(core.doc.is_empty());
    assert!(!core.can_undo());
}

#[test]
fn duplicate_offsets_the_selection_diagonally() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.doc.select_only(id);
    core.on_key_down("d", ctrl());
    assert_eq!(core.doc.len(), 2);
}

#[test]
fn middle_drag_pans_the_camera() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(100.0, 100.0), Button::Middle, none());
    core.on_pointer_move(pt(130.0, 80.0), none());
    core.on_pointer_up(pt(130.0, 80.0), Button::Middle, none());
    assert_eq!(core.camera.pan_x, 30.0);
    assert_eq!(core.camera.pan_y, -20.0);
}

#[test]
fn ctrl_primary_drag_pans_instead_of_selecting() {
    let mut core = EngineCore::new();
    draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.doc.clear_selection();
    core.on_pointer_down(pt(25.0, 25.0), Button::Primary, ctrl());
    core.on_pointer_move(pt(45.0, 25.0), ctrl());
    core.on_pointer_up(pt(45.0, 25.0), Button::Primary, ctrl());
    assert_eq!(core.camera.pan_x, 20.0);
    assert_eq!(core.doc.selection_len(), 0);
}

#[test]
fn wheel_up_zooms_in_about_the_cursor() {
    let mut core = EngineCore::new();
    let cursor = pt(400.0, 300.0);
    let before = core.camera.screen_to_world(cursor);
    core.on_wheel(cursor, WheelDelta { dx: 0.0, dy: -100.0 }, none());
    assert_eq!(core.camera.zoom, 1.1);
    let after = core.camera.screen_to_world(cursor);
    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
}

#[test]
fn text_tool_requests_an_editor_and_commits_an_element() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    let actions = core.on_pointer_down(pt(200.0, 150.0), Button::Primary, none());
    assert!(actions.iter().any(|a| matches!(a, Action::TextEditRequested { .. })));
    core.on_pointer_up(pt(200.0, 150.0), Button::Primary, none());
    core.commit_text("hello");
    assert_eq!(core.doc.len(), 1);
    let Shape::Text { x, y, ref text, font_size, .. } = core.doc.elements()[0].shape else {
        panic!("variant")
    };
    assert_eq!((x, y), (200.0, 150.0));
    assert_eq!(text, "hello");
    assert_eq!(font_size, 24.0);
}

#[test]
fn whitespace_only_text_is_discarded() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, none());
    core.on_pointer_up(pt(0.0, 0.0), Button::Primary, none());
    core.commit_text("   ");
    assert!(core.doc.is_empty());
    assert!(core.input.is_idle());
}

#[test]
fn a_press_elsewhere_abandons_the_text_caret() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, none());
    core.on_pointer_up(pt(0.0, 0.0), Button::Primary, none());
    core.on_pointer_down(pt(300.0, 300.0), Button::Middle, none());
    // Commit after abandonment creates nothing.
    core.commit_text("late");
    assert!(core.doc.is_empty());
}

#[test]
fn inserted_images_are_scaled_to_fit_and_centered() {
    let mut core = EngineCore::new();
    core.set_viewport(1000.0, 800.0, 1.0);
    core.insert_image("data:image/png;base64,AAAA".to_owned(), 2000.0, 1000.0);
    let Shape::Image { x, y, width, height, .. } = core.doc.elements()[0].shape.clone() else {
        panic!("variant")
    };
    // Fit within 80% of the viewport: scale 0.4, centered on (500, 400).
    assert_eq!((width, height), (800.0, 400.0));
    assert_eq!((x, y), (100.0, 200.0));
}

#[test]
fn small_images_keep_their_natural_size() {
    let mut core = EngineCore::new();
    core.set_viewport(1000.0, 800.0, 1.0);
    core.insert_image("data:image/png;base64,AAAA".to_owned(), 100.0, 60.0);
    let Shape::Image { width, height, .. } = core.doc.elements()[0].shape.clone() else {
        panic!("variant")
    };
    assert_eq!((width, height), (100.0, 60.0));
}

#[test]
fn style_setters_restyle_the_selection_and_future_elements() {
    let mut core = EngineCore::new();
    let id = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    core.doc.select_only(id);
    core.set_stroke_color("#FF0000");
    assert_eq!(core.doc.get(id).unwrap().style.stroke, "#FF0000");
    core.doc.clear_selection();
    let other = draw_rect(&mut core, pt(100.0, 0.0), pt(150.0, 50.0));
    assert_eq!(core.doc.get(other).unwrap().style.stroke, "#FF0000");
}

#[test]
fn restyling_with_nothing_selected_only_changes_defaults() {
    let mut core = EngineCore::new();
    let actions = core.set_opacity(0.5);
    assert!(actions.is_empty());
    assert_eq!(core.style.opacity, 0.5);
}

#[test]
fn font_setters_restyle_selected_text_but_not_shapes() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    core.on_pointer_down(pt(10.0, 20.0), Button::Primary, none());
    core.commit_text("hello");
    core.set_bold(true);
    core.set_font_size(40.0);
    let Shape::Text { bold, font_size, .. } = core.doc.elements()[0].shape.clone() else {
        panic!("variant")
    };
    assert!(bold);
    assert_eq!(font_size, 40.0);
    assert!(core.style.bold);

    core.doc.clear_selection();
    let rect = draw_rect(&mut core, pt(300.0, 100.0), pt(350.0, 150.0));
    core.doc.select_only(rect);
    let actions = core.set_italic(true);
    assert!(actions.is_empty());
    assert!(core.style.italic);
}

#[test]
fn load_without_history_seeds_a_baseline_from_the_document() {
    let mut core = EngineCore::new();
    let elements = vec![Element::new(
        Shape::Rectangle { x: 0.0, y: 0.0, width: 10.0, height: 10.0 },
        Style::default(),
    )];
    core.load(Some(elements), None, None, None);
    assert_eq!(core.doc.len(), 1);
    assert!(!core.can_undo());
    draw_rect(&mut core, pt(100.0, 100.0), pt(150.0, 150.0));
    core.undo();
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn fresh_drafts_carry_distinct_seeds() {
    let mut core = EngineCore::new();
    let a = draw_rect(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    let b = draw_rect(&mut core, pt(100.0, 0.0), pt(150.0, 50.0));
    let sa = core.doc.get(a).unwrap().style.seed;
    let sb = core.doc.get(b).unwrap().style.seed;
    assert_ne!(sa, sb);
}
