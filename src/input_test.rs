use super::*;

#[test]
fn select_is_the_default_tool() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn drawing_tools_are_the_shape_makers() {
    for tool in [
        Tool::Pen,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Ellipse,
        Tool::Diamond,
        Tool::Line,
        Tool::Arrow,
    ] {
        assert!(tool.is_drawing(), "{tool:?}");
    }
    for tool in [Tool::Select, Tool::Hand, Tool::Text, Tool::Eraser] {
        assert!(!tool.is_drawing(), "{tool:?}");
    }
}

#[test]
fn command_accepts_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
    assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
    assert!(!Modifiers { shift: true, ..Modifiers::default() }.command());
}

#[test]
fn default_state_is_idle() {
    assert!(InputState::default().is_idle());
    let drawing = InputState::Drawing {
        draft: crate::element::Element::new(
            crate::element::Shape::Rectangle { x: 0.0, y: 0.0, width: 0.0, height: 0.0 },
            crate::element::Style::default(),
        ),
    };
    assert!(!drawing.is_idle());
}
