//! 单帧单张人脸的关键点集合
//!
//! 下标即语义标识（1 = 鼻尖，152 = 下巴 ...），长度只允许 468 或 478。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    FACE_MESH_LANDMARKS, FACE_MESH_REFINED_LANDMARKS, LEFT_IRIS, RIGHT_IRIS,
};
use crate::vision::geometry::Point2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LandmarkError {
    #[error("unexpected landmark count: {len} (expected 468 or 478)")]
    UnexpectedLength { len: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2D>", into = "Vec<Point2D>")]
pub struct LandmarkSet {
    points: Vec<Point2D>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point2D>) -> Result<Self, LandmarkError> {
        match points.len() {
            FACE_MESH_LANDMARKS | FACE_MESH_REFINED_LANDMARKS => Ok(Self { points }),
            len => Err(LandmarkError::UnexpectedLength { len }),
        }
    }

    /// 核心关键点（下标 < 468）在任何合法集合中都存在
    pub fn point(&self, index: usize) -> Point2D {
        debug_assert!(index < FACE_MESH_LANDMARKS);
        self.points[index]
    }

    pub fn get(&self, index: usize) -> Option<Point2D> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 是否包含虹膜点
    pub fn is_refined(&self) -> bool {
        self.points.len() == FACE_MESH_REFINED_LANDMARKS
    }

    /// 左右虹膜各 5 个点，非 refine 模式返回 None
    pub fn irises(&self) -> Option<([Point2D; 5], [Point2D; 5])> {
        if !self.is_refined() {
            return None;
        }
        Some((
            LEFT_IRIS.map(|i| self.points[i]),
            RIGHT_IRIS.map(|i| self.points[i]),
        ))
    }
}

impl TryFrom<Vec<Point2D>> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: Vec<Point2D>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Point2D> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}
