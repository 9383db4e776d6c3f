//! 逐帧注意力分类
//!
//! 固定优先级，命中即返回：
//! 1. 多张人脸 → MultiFace
//! 2. 没有人脸 → NoFace
//! 3. 双眼平均 EAR 低于阈值 → BlinkOrClosed
//! 4. 视线偏移：Left → Right → Top → Bottom，均不满足为 Straight
//!
//! 每帧独立计算，不跨帧保留状态。

use serde::{Deserialize, Serialize};

use crate::constants::{
    CHIN, DEFAULT_EAR_THRESHOLD, DEFAULT_GAZE_BOTTOM_THRESHOLD, DEFAULT_GAZE_LEFT_THRESHOLD,
    DEFAULT_GAZE_RIGHT_THRESHOLD, DEFAULT_GAZE_TOP_THRESHOLD, FOREHEAD, LEFT_CHEEK,
    LEFT_EYE_BOTTOM, LEFT_EYE_INNER, LEFT_EYE_OUTER, LEFT_EYE_TOP, MIN_FACE_EXTENT, NOSE_TIP,
    RIGHT_CHEEK, RIGHT_EYE_BOTTOM, RIGHT_EYE_INNER, RIGHT_EYE_OUTER, RIGHT_EYE_TOP,
};
use crate::status::Status;
use crate::vision::geometry::{eye_aspect_ratio, GeometryError};
use crate::vision::landmarks::LandmarkSet;

/// 计算单眼 EAR 所需的四个关键点下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeLandmarks {
    pub top: usize,
    pub bottom: usize,
    pub inner: usize,
    pub outer: usize,
}

pub const LEFT_EYE: EyeLandmarks = EyeLandmarks {
    top: LEFT_EYE_TOP,
    bottom: LEFT_EYE_BOTTOM,
    inner: LEFT_EYE_INNER,
    outer: LEFT_EYE_OUTER,
};

pub const RIGHT_EYE: EyeLandmarks = EyeLandmarks {
    top: RIGHT_EYE_TOP,
    bottom: RIGHT_EYE_BOTTOM,
    inner: RIGHT_EYE_INNER,
    outer: RIGHT_EYE_OUTER,
};

/// 视线判定阈值（相对面宽/面高的归一化偏移）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeThresholds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for GazeThresholds {
    fn default() -> Self {
        Self {
            left: DEFAULT_GAZE_LEFT_THRESHOLD,
            right: DEFAULT_GAZE_RIGHT_THRESHOLD,
            top: DEFAULT_GAZE_TOP_THRESHOLD,
            bottom: DEFAULT_GAZE_BOTTOM_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub ear_threshold: f64,
    pub gaze: GazeThresholds,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ear_threshold: DEFAULT_EAR_THRESHOLD,
            gaze: GazeThresholds::default(),
        }
    }
}

/// 内眼角相对鼻尖的归一化偏移
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GazeRatios {
    pub left_x: f64,
    pub right_x: f64,
    pub left_y: f64,
    pub right_y: f64,
}

/// 单帧分类明细
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameAnalysis {
    pub status: Status,
    pub face_count: usize,
    /// 双眼平均 EAR；眼宽退化时为 None
    pub average_ear: Option<f64>,
    /// 面部框退化时为 None
    pub gaze: Option<GazeRatios>,
}

impl FrameAnalysis {
    fn without_face(status: Status, face_count: usize) -> Self {
        Self {
            status,
            face_count,
            average_ear: None,
            gaze: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, faces: &[LandmarkSet]) -> Status {
        self.analyze(faces).status
    }

    pub fn analyze(&self, faces: &[LandmarkSet]) -> FrameAnalysis {
        match faces {
            [] => FrameAnalysis::without_face(Status::NoFace, 0),
            [face] => self.analyze_face(face),
            _ => FrameAnalysis::without_face(Status::MultiFace, faces.len()),
        }
    }

    fn analyze_face(&self, face: &LandmarkSet) -> FrameAnalysis {
        let average_ear = match average_ear(face) {
            Ok(ear) => Some(ear),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping blink check for frame");
                None
            }
        };

        let gaze = gaze_ratios(face);
        if gaze.is_none() {
            tracing::warn!("Degenerate face extent, skipping gaze check for frame");
        }

        let status = match (average_ear, gaze) {
            (Some(ear), _) if ear < self.config.ear_threshold => Status::BlinkOrClosed,
            (_, Some(ratios)) => self.classify_gaze(&ratios),
            (_, None) => Status::Straight,
        };

        FrameAnalysis {
            status,
            face_count: 1,
            average_ear,
            gaze,
        }
    }

    /// 按 Left → Right → Top → Bottom 顺序判定，双眼同时满足才算命中
    pub fn classify_gaze(&self, ratios: &GazeRatios) -> Status {
        let t = &self.config.gaze;
        let GazeRatios {
            left_x,
            right_x,
            left_y,
            right_y,
        } = *ratios;

        if left_x < t.left && right_x < t.left {
            Status::Left
        } else if left_x > t.right && right_x > t.right {
            Status::Right
        } else if left_y > t.top && right_y > t.top {
            Status::Top
        } else if left_y < t.bottom && right_y < t.bottom {
            Status::Bottom
        } else {
            Status::Straight
        }
    }
}

pub fn eye_ear(face: &LandmarkSet, eye: &EyeLandmarks) -> Result<f64, GeometryError> {
    eye_aspect_ratio(
        face.point(eye.top),
        face.point(eye.bottom),
        face.point(eye.inner),
        face.point(eye.outer),
    )
}

/// 双眼 EAR 均值，任一眼退化即整体失败
pub fn average_ear(face: &LandmarkSet) -> Result<f64, GeometryError> {
    let left = eye_ear(face, &LEFT_EYE)?;
    let right = eye_ear(face, &RIGHT_EYE)?;
    Ok((left + right) / 2.0)
}

pub fn gaze_ratios(face: &LandmarkSet) -> Option<GazeRatios> {
    let nose = face.point(NOSE_TIP);
    let left_inner = face.point(LEFT_EYE_INNER);
    let right_inner = face.point(RIGHT_EYE_INNER);

    let face_width = face.point(RIGHT_CHEEK).x - face.point(LEFT_CHEEK).x;
    let face_height = face.point(CHIN).y - face.point(FOREHEAD).y;
    if !(face_width.abs() >= MIN_FACE_EXTENT && face_height.abs() >= MIN_FACE_EXTENT) {
        return None;
    }

    Some(GazeRatios {
        left_x: (left_inner.x - nose.x) / face_width,
        right_x: (right_inner.x - nose.x) / face_width,
        left_y: (left_inner.y - nose.y) / face_height,
        right_y: (right_inner.y - nose.y) / face_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::geometry::Point2D;

    /// 100×100 像素的人脸：鼻尖 (50,50)，双眼睁开 (EAR = 0.3)，
    /// 内眼角相对鼻尖的归一化偏移由参数给出。
    fn gaze_face(left_x: f64, right_x: f64, left_y: f64, right_y: f64) -> LandmarkSet {
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
        LandmarkSet::new(points).unwrap()
    }

    fn place_eye(
        points: &mut [Point2D],
        eye: &EyeLandmarks,
        inner: Point2D,
        width: f64,
        opening: f64,
    ) {
        let mid_x = inner.x + width / 2.0;
        points[eye.inner] = inner;
        points[eye.outer] = Point2D::new(inner.x + width, inner.y);
        points[eye.top] = Point2D::new(mid_x, inner.y - opening / 2.0);
        points[eye.bottom] = Point2D::new(mid_x, inner.y + opening / 2.0);
    }

    fn straight_face() -> LandmarkSet {
        gaze_face(-0.1, 0.1, -0.25, -0.25)
    }

    #[test]
    fn multiple_faces_win_over_content() {
        let classifier = Classifier::default();
        let faces = vec![straight_face(), gaze_face(-0.2, -0.2, -0.25, -0.25)];
        assert_eq!(classifier.classify(&faces), Status::MultiFace);
    }

    #[test]
    fn no_faces_is_no_face() {
        assert_eq!(Classifier::default().classify(&[]), Status::NoFace);
    }

    #[test]
    fn neutral_face_is_straight() {
        let analysis = Classifier::default().analyze(&[straight_face()]);
        assert_eq!(analysis.status, Status::Straight);
        assert!((analysis.average_ear.unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn pixel_face_looking_left() {
        // 面宽 100，面高 50；内眼角相对鼻尖 x 偏移 -10 / -12
        let mut points = vec![Point2D::new(50.0, 25.0); 468];
        points[LEFT_CHEEK] = Point2D::new(0.0, 25.0);
        points[RIGHT_CHEEK] = Point2D::new(100.0, 25.0);
        points[FOREHEAD] = Point2D::new(50.0, 0.0);
        points[CHIN] = Point2D::new(50.0, 50.0);
        points[NOSE_TIP] = Point2D::new(50.0, 30.0);
        place_eye(&mut points, &LEFT_EYE, Point2D::new(40.0, 17.5), -10.0, 3.0);
        place_eye(&mut points, &RIGHT_EYE, Point2D::new(38.0, 17.5), 10.0, 3.0);
        let face = LandmarkSet::new(points).unwrap();

        let analysis = Classifier::default().analyze(&[face]);
        let gaze = analysis.gaze.unwrap();
        assert!((gaze.left_x + 0.10).abs() < 1e-9);
        assert!((gaze.right_x + 0.12).abs() < 1e-9);
        assert_eq!(analysis.status, Status::Left);
    }

    #[test]
    fn both_eyes_must_agree_for_horizontal_gaze() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&[gaze_face(-0.1, -0.05, -0.25, -0.25)]),
            Status::Straight
        );
        assert_eq!(
            classifier.classify(&[gaze_face(0.1, 0.09, -0.25, -0.25)]),
            Status::Right
        );
    }

    #[test]
    fn top_threshold_boundary() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&[gaze_face(-0.1, 0.1, -0.149, -0.149)]),
            Status::Top
        );
        assert_eq!(
            classifier.classify(&[gaze_face(-0.1, 0.1, -0.151, -0.151)]),
            Status::Straight
        );
        // 仅一只眼越界
        assert_eq!(
            classifier.classify(&[gaze_face(-0.1, 0.1, -0.149, -0.151)]),
            Status::Straight
        );
    }

    #[test]
    fn bottom_threshold_boundary() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&[gaze_face(-0.1, 0.1, -0.331, -0.331)]),
            Status::Bottom
        );
        assert_eq!(
            classifier.classify(&[gaze_face(-0.1, 0.1, -0.329, -0.329)]),
            Status::Straight
        );
    }

    #[test]
    fn horizontal_checks_run_before_vertical() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&[gaze_face(-0.1, -0.12, -0.1, -0.1)]),
            Status::Left
        );
    }

    #[test]
    fn closed_eyes_take_priority_over_gaze() {
        let mut points: Vec<Point2D> = gaze_face(-0.1, -0.12, -0.25, -0.25).into();
        for eye in [LEFT_EYE, RIGHT_EYE] {
            let inner = points[eye.inner];
            let width = points[eye.outer].x - inner.x;
            place_eye(&mut points, &eye, inner, width, 0.5);
        }
        let face = LandmarkSet::new(points).unwrap();

        let analysis = Classifier::default().analyze(&[face]);
        assert!(analysis.average_ear.unwrap() < 0.2);
        assert_eq!(analysis.status, Status::BlinkOrClosed);
    }

    #[test]
    fn degenerate_eye_falls_through_to_gaze() {
        let mut points: Vec<Point2D> = gaze_face(0.1, 0.12, -0.25, -0.25).into();
        points[LEFT_EYE_OUTER] = points[LEFT_EYE_INNER];
        let face = LandmarkSet::new(points).unwrap();

        let analysis = Classifier::default().analyze(&[face]);
        assert!(analysis.average_ear.is_none());
        assert_eq!(analysis.status, Status::Right);
    }

    #[test]
    fn degenerate_face_extent_is_straight() {
        let mut points: Vec<Point2D> = straight_face().into();
        points[RIGHT_CHEEK] = points[LEFT_CHEEK];
        let face = LandmarkSet::new(points).unwrap();

        let analysis = Classifier::default().analyze(&[face]);
        assert!(analysis.gaze.is_none());
        assert_eq!(analysis.status, Status::Straight);
    }

    #[test]
    fn custom_thresholds_are_respected() {
        let classifier = Classifier::new(ClassifierConfig {
            ear_threshold: 0.35,
            ..ClassifierConfig::default()
        });
        assert_eq!(classifier.classify(&[straight_face()]), Status::BlinkOrClosed);
    }
}
