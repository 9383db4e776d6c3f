//! 几何工具
//!
//! 欧氏距离与 EAR (Eye Aspect Ratio) 计算。
//! EAR = |top - bottom| / |inner - outer|，眼宽退化（两眼角重合）时显式返回错误，
//! 不依赖浮点除零产生的 inf/NaN。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MIN_EYE_WIDTH;

/// 二维关键点
///
/// provider 输出为归一化坐标 [0,1]，绘制时按画布尺寸换算为像素坐标。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        distance(*self, *other)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// 归一化坐标 → 像素坐标
    pub fn to_pixel(self, width: u32, height: u32) -> (f64, f64) {
        (self.x * f64::from(width), self.y * f64::from(height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("degenerate eye width: {width}")]
    DegenerateEyeWidth { width: f64 },
}

pub fn distance(a: Point2D, b: Point2D) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// 单眼 EAR
///
/// # 参数
/// - `top`, `bottom`: 上下眼睑点
/// - `inner`, `outer`: 内外眼角点
///
/// # 错误
/// 眼宽小于 [`MIN_EYE_WIDTH`] 时返回 [`GeometryError::DegenerateEyeWidth`]
pub fn eye_aspect_ratio(
    top: Point2D,
    bottom: Point2D,
    inner: Point2D,
    outer: Point2D,
) -> Result<f64, GeometryError> {
    let horizontal = distance(inner, outer);
    if !horizontal.is_finite() || horizontal < MIN_EYE_WIDTH {
        return Err(GeometryError::DegenerateEyeWidth { width: horizontal });
    }
    Ok(distance(top, bottom) / horizontal)
}
