use fomtrace_canvas::*;

fn canvas() -> Canvas<RecordingSurface> {
    Canvas::new(RecordingSurface::new(), 1000.0, 500.0)
}

#[test]
fn test_rect_inside_drawn() {
    let mut c = canvas();
    c.draw_rect(10.0, 20.0, 5.0, 30.0, Rgb::BLACK);
    assert_eq!(c.drawn(), 1);
    assert_eq!(
        c.surface().shapes[0],
        Shape::Rect { x: 10.0, y: 20.0, width: 5.0, height: 30.0, fill: Rgb::BLACK }
    );
}

#[test]
fn test_rect_outside_window_culled() {
    let mut c = canvas();
    c.draw_rect(10.0, -50.0, 5.0, 20.0, Rgb::BLACK); // ends at -30
    c.draw_rect(10.0, 500.0, 5.0, 20.0, Rgb::BLACK); // starts at the bottom edge
    assert_eq!(c.culled(), 2);
    assert!(c.surface().shapes.is_empty());
}

#[test]
fn test_rect_partially_visible_kept() {
    let mut c = canvas();
    c.draw_rect(10.0, -50.0, 5.0, 60.0, Rgb::BLACK);
    c.draw_rect(10.0, 490.0, 5.0, 60.0, Rgb::BLACK);
    assert_eq!(c.drawn(), 2);
}

#[test]
fn test_negative_height_flipped() {
    let mut c = canvas();
    c.draw_rect(0.0, 40.0, 5.0, -10.0, Rgb::BLACK);
    assert_eq!(
        c.surface().shapes[0],
        Shape::Rect { x: 0.0, y: 30.0, width: 5.0, height: 10.0, fill: Rgb::BLACK }
    );
}

#[test]
fn test_line_culling_uses_both_ends() {
    let mut c = canvas();
    let s = Stroke::solid(Rgb::BLACK, 1.0);
    c.draw_line(Point::new(0.0, -10.0), Point::new(0.0, -1.0), &s);
    c.draw_line(Point::new(0.0, -10.0), Point::new(0.0, 600.0), &s);
    assert_eq!(c.culled(), 1);
    assert_eq!(c.drawn(), 1);
}

#[test]
fn test_free_cell_text_placed_as_asked() {
    let mut c = canvas();
    let at = Point::new(100.0, 100.0);
    assert_eq!(c.draw_text("a", at), at);
    assert_eq!(c.surface().texts(), vec!["a"]);
    assert_eq!(c.surface().lines().count(), 0);
}

#[test]
fn test_colliding_text_moves_down_with_connector() {
    let mut c = canvas();
    c.draw_text("first", Point::new(100.0, 100.0));
    let placed = c.draw_text("second", Point::new(110.0, 101.0));
    assert_eq!(placed, Point::new(110.0, 101.0 + TEXT_ROW_HEIGHT));
    let third = c.draw_text("third", Point::new(100.0, 100.0));
    assert_eq!(third.y, 100.0 + 2.0 * TEXT_ROW_HEIGHT);

    let connectors: Vec<_> = c.surface().lines().collect();
    assert_eq!(connectors.len(), 2);
    match connectors[0] {
        Shape::Line { from, to, .. } => {
            assert_eq!(*from, Point::new(110.0, 101.0));
            assert_eq!(*to, placed);
        }
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn test_different_columns_do_not_collide() {
    let mut c = canvas();
    c.draw_text("a", Point::new(0.0, 100.0));
    let b = c.draw_text("b", Point::new(TEXT_CELL_WIDTH, 100.0));
    assert_eq!(b.y, 100.0);
}

#[test]
fn test_placement_is_order_dependent_but_deterministic() {
    let run = |labels: &[(&str, f64, f64)]| {
        let mut c = canvas();
        labels
            .iter()
            .map(|(t, x, y)| c.draw_text(t, Point::new(*x, *y)))
            .collect::<Vec<_>>()
    };
    let input = [("a", 10.0, 10.0), ("b", 12.0, 14.0), ("c", 15.0, 10.0)];
    assert_eq!(run(&input), run(&input));
}

#[test]
fn test_offscreen_text_still_claims_cell() {
    let mut c = canvas();
    c.draw_text("hidden", Point::new(0.0, -30.0));
    assert_eq!(c.culled(), 1);
    let moved = c.draw_text("also hidden", Point::new(0.0, -30.0));
    assert_eq!(moved.y, -30.0 + TEXT_ROW_HEIGHT);
}

#[test]
fn test_custom_text_grid() {
    let mut c = canvas().with_text_grid(10.0, 20.0);
    c.draw_text("a", Point::new(0.0, 0.0));
    assert_eq!(c.draw_text("b", Point::new(5.0, 5.0)).y, 25.0);
    assert_eq!(c.draw_text("c", Point::new(15.0, 5.0)).y, 5.0);
}

#[test]
fn test_finish_saves_surface() {
    let c = canvas();
    let surface = c.finish().unwrap();
    assert!(surface.saved);
}

#[test]
fn test_collision_far_below_image_terminates() {
    // 2^60: adding one row height no longer changes the f64.
    let far = 2f64.powi(60);
    let mut c = canvas();
    c.draw_text("a", Point::new(0.0, far));
    c.draw_text("b", Point::new(0.0, far));
    c.draw_text("c", Point::new(0.0, far));
    assert_eq!(c.culled(), 3);
    assert!(c.surface().texts().is_empty());
}

#[test]
fn test_collision_in_saturated_cell_gives_up() {
    // Beyond i64 range every label maps to the last row.
    let mut c = canvas();
    c.draw_text("a", Point::new(0.0, 1e30));
    let b = c.draw_text("b", Point::new(0.0, 1e30));
    assert_eq!(b.y, 1e30);
    assert_eq!(c.culled(), 2);
}
