use attention_monitor::constants::{CHIN, FOREHEAD, LEFT_CHEEK, NOSE_TIP, RIGHT_CHEEK};
use attention_monitor::vision::classifier::{EyeLandmarks, LEFT_EYE, RIGHT_EYE};
use attention_monitor::vision::{LandmarkSet, Point2D};

/// 100×100 face, nose tip at the centre, both eyes open (EAR 0.3).
/// Arguments are the inner eye corners' offsets from the nose, relative to
/// face width and height.
pub fn face(left_x: f64, right_x: f64, left_y: f64, right_y: f64) -> LandmarkSet {
    let mut points = vec![Point2D::new(50.0, 50.0); 468];
    points[LEFT_CHEEK] = Point2D::new(0.0, 50.0);
    points[RIGHT_CHEEK] = Point2D::new(100.0, 50.0);
    points[FOREHEAD] = Point2D::new(50.0, 0.0);
    points[CHIN] = Point2D::new(50.0, 100.0);
    points[NOSE_TIP] = Point2D::new(50.0, 50.0);

    let left_inner = Point2D::new(50.0 + left_x * 100.0, 50.0 + left_y * 100.0);
    let right_inner = Point2D::new(50.0 + right_x * 100.0, 50.0 + right_y * 100.0);
    place_eye(&mut points, &LEFT_EYE, left_inner, -10.0, 3.0);
    place_eye(&mut points, &RIGHT_EYE, right_inner, 10.0, 3.0);
    LandmarkSet::new(points).expect("468 landmarks")
}

pub fn straight_face() -> LandmarkSet {
    face(-0.1, 0.1, -0.25, -0.25)
}

pub fn left_face() -> LandmarkSet {
    face(-0.2, -0.2, -0.25, -0.25)
}

pub fn closed_eyes_face() -> LandmarkSet {
    let mut points = straight_face().points().to_vec();
    for eye in [&LEFT_EYE, &RIGHT_EYE] {
        let mid_y = (points[eye.top].y + points[eye.bottom].y) / 2.0;
        points[eye.top].y = mid_y;
        points[eye.bottom].y = mid_y;
    }
    LandmarkSet::new(points).expect("468 landmarks")
}

fn place_eye(points: &mut [Point2D], eye: &EyeLandmarks, inner: Point2D, width: f64, opening: f64) {
    let mid_x = inner.x + width / 2.0;
    points[eye.inner] = inner;
    points[eye.outer] = Point2D::new(inner.x + width, inner.y);
    points[eye.top] = Point2D::new(mid_x, inner.y - opening / 2.0);
    points[eye.bottom] = Point2D::new(mid_x, inner.y + opening / 2.0);
}
