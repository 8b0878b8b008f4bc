use crate::{Point, Stadium};

mod test_stadium;

/// The reference track: 400 x 200 with a 35 wide ring.
fn get_stadium() -> Stadium {
    Stadium::new(Point::new(250.0, 225.0), 400.0, 200.0, 35.0)
}

fn assert_point_eq(actual: Point, expected: Point) {
    assert!(
        actual.distance(&expected) < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}
