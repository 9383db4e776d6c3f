//! 基于面部关键点的注意力判定
//!
//! ## 模块
//! - `geometry`: 欧氏距离与 EAR
//! - `landmarks`: 单张人脸的关键点集合
//! - `classifier`: 逐帧状态分类（多人脸 / 无人脸 / 闭眼 / 视线方向）
//! - `overlay`: 在渲染面上绘制关键点与虹膜

pub mod classifier;
pub mod geometry;
pub mod landmarks;
pub mod overlay;

pub use classifier::{Classifier, ClassifierConfig, FrameAnalysis, GazeRatios, GazeThresholds};
pub use geometry::{distance, eye_aspect_ratio, GeometryError, Point2D};
pub use landmarks::{LandmarkError, LandmarkSet};
