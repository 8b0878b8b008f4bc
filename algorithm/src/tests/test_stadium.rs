use super::{assert_point_eq, get_stadium};
use crate::{Boundary, Point, Stadium};
use std::f64::consts::PI;

#[test]
fn perimeter_of_reference_track() {
    let stadium = get_stadium();
    assert_eq!(stadium.straight_length(), 200.0);
    assert_eq!(stadium.semicircle_length(), 100.0 * PI);
    assert_eq!(stadium.perimeter(), 400.0 + 200.0 * PI);
}

#[test]
fn radius_of_boundaries() {
    let stadium = get_stadium();
    assert_eq!(stadium.radius(Boundary::Outer), 100.0);
    assert_eq!(stadium.radius(Boundary::Inner), 65.0);
}

#[test]
fn lap_starts_at_bottom_center() {
    let stadium = get_stadium();
    assert_point_eq(
        stadium.position_on_track(0.0, Boundary::Outer),
        Point::new(250.0, 325.0),
    );
    assert_point_eq(
        stadium.position_on_track(0.0, Boundary::Inner),
        Point::new(250.0, 290.0),
    );
}

#[test]
fn lap_is_closed() {
    let stadium = get_stadium();
    for boundary in [Boundary::Outer, Boundary::Inner] {
        assert_point_eq(
            stadium.position_on_track(100.0, boundary),
            stadium.position_on_track(0.0, boundary),
        );
    }
}

#[test]
fn quarter_points_of_reference_track() {
    let stadium = get_stadium();
    // 25% ends in the middle of the right cap, 75% in the middle of the left cap.
    assert_point_eq(
        stadium.position_on_track(25.0, Boundary::Outer),
        Point::new(450.0, 225.0),
    );
    assert_point_eq(
        stadium.position_on_track(75.0, Boundary::Outer),
        Point::new(50.0, 225.0),
    );
    assert_point_eq(
        stadium.position_on_track(25.0, Boundary::Inner),
        Point::new(415.0, 225.0),
    );
}

#[test]
fn half_lap_is_top_center() {
    let stadium = get_stadium();
    assert_point_eq(
        stadium.position_on_track(50.0, Boundary::Outer),
        Point::new(250.0, 125.0),
    );
    assert_point_eq(
        stadium.position_on_track(50.0, Boundary::Inner),
        Point::new(250.0, 160.0),
    );
}

#[test]
fn point_on_bottom_straight_moves_right() {
    let stadium = get_stadium();
    // 50 units of the 100 unit half straight.
    let percent = 50.0 / stadium.perimeter() * 100.0;
    assert_point_eq(
        stadium.position_on_track(percent, Boundary::Outer),
        Point::new(300.0, 325.0),
    );
}

#[test]
fn point_on_top_straight_moves_left() {
    let stadium = get_stadium();
    let distance = 100.0 + stadium.semicircle_length() + 150.0;
    let percent = distance / stadium.perimeter() * 100.0;
    assert_point_eq(
        stadium.position_on_track(percent, Boundary::Outer),
        Point::new(200.0, 125.0),
    );
}

#[test]
fn outer_and_inner_share_vertical_line_on_straights() {
    let stadium = get_stadium();
    for percent in [1.0, 5.0, 45.0, 50.0, 55.0, 95.0, 99.0] {
        let outer = stadium.position_on_track(percent, Boundary::Outer);
        let inner = stadium.position_on_track(percent, Boundary::Inner);
        assert!((outer.x - inner.x).abs() < 1e-9, "percent {percent}");
        assert!(((outer.y - inner.y).abs() - 35.0).abs() < 1e-9, "percent {percent}");
    }
}

#[test]
fn outer_and_inner_share_radius_on_caps() {
    let stadium = get_stadium();
    let right_cap = Point::new(350.0, 225.0);
    let left_cap = Point::new(150.0, 225.0);
    for (percent, cap) in [(15.0, right_cap), (30.0, right_cap), (70.0, left_cap), (85.0, left_cap)] {
        let outer = stadium.position_on_track(percent, Boundary::Outer);
        let inner = stadium.position_on_track(percent, Boundary::Inner);
        assert!((outer.distance(&cap) - 100.0).abs() < 1e-9, "percent {percent}");
        assert!((inner.distance(&cap) - 65.0).abs() < 1e-9, "percent {percent}");
        // Collinear with the cap center: the cross product vanishes.
        let cross = (outer.x - cap.x) * (inner.y - cap.y) - (outer.y - cap.y) * (inner.x - cap.x);
        assert!(cross.abs() < 1e-6, "percent {percent}");
        // And on the same side of it.
        let dot = (outer.x - cap.x) * (inner.x - cap.x) + (outer.y - cap.y) * (inner.y - cap.y);
        assert!(dot > 0.0, "percent {percent}");
    }
}

#[test]
fn traversal_is_monotonic() {
    let stadium = get_stadium();
    let steps = 2000;
    let mut previous = stadium.position_on_track(0.0, Boundary::Outer);
    let mut walked = 0.0;
    for step in 1..=steps {
        let percent = step as f64 * 100.0 / steps as f64;
        let point = stadium.position_on_track(percent, Boundary::Outer);
        let chord = previous.distance(&point);
        let arc = stadium.perimeter() / steps as f64;
        assert!(chord > 0.0, "no progress at {percent}%");
        assert!(chord <= arc + 1e-9, "jump at {percent}%");
        walked += chord;
        previous = point;
    }
    // Chords undercut the arcs slightly, but no segment is counted twice.
    assert!((walked - stadium.perimeter()).abs() < 0.01);
}

#[test]
fn percent_outside_a_lap_is_clamped() {
    let stadium = get_stadium();
    assert_point_eq(
        stadium.position_on_track(-10.0, Boundary::Outer),
        stadium.position_on_track(0.0, Boundary::Outer),
    );
    assert_point_eq(
        stadium.position_on_track(150.0, Boundary::Outer),
        stadium.position_on_track(100.0, Boundary::Outer),
    );
}

#[test]
fn circle_has_no_straights() {
    let stadium = Stadium::new(Point::new(0.0, 0.0), 100.0, 100.0, 10.0);
    assert_eq!(stadium.straight_length(), 0.0);
    assert_point_eq(
        stadium.position_on_track(25.0, Boundary::Outer),
        Point::new(50.0, 0.0),
    );
    assert_point_eq(
        stadium.position_on_track(50.0, Boundary::Outer),
        Point::new(0.0, -50.0),
    );
}

#[test]
fn fit_into_viewport() {
    let stadium = Stadium::fit(500.0, 450.0, 35.0);
    assert_eq!(stadium.center, Point::new(250.0, 225.0));
    assert!((stadium.width - 602.0).abs() < 1e-9);
    assert!((stadium.height - 344.0).abs() < 1e-9);
    assert_eq!(stadium.thickness, 35.0);
}
