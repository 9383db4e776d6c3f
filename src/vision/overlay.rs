//! 关键点叠加层
//!
//! 单张人脸时，全部关键点画红色实心圆，虹膜点（仅 478 点模式）画黑色实心圆。

use image::Rgb;

use crate::constants::{IRIS_RADIUS_PX, LANDMARK_RADIUS_PX};
use crate::ports::{Frame, RenderSurface};
use crate::vision::LandmarkSet;

pub const LANDMARK_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const IRIS_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// 清空画布并绘制当前帧，随后叠加唯一人脸的关键点
pub fn render(surface: &mut dyn RenderSurface, frame: &Frame, faces: &[LandmarkSet]) {
    surface.clear();
    surface.draw_frame(frame);
    if let [face] = faces {
        draw_face(surface, face);
    }
}

pub fn draw_face(surface: &mut dyn RenderSurface, face: &LandmarkSet) {
    let (width, height) = surface.size();

    for point in face.points() {
        surface.fill_circle(point.to_pixel(width, height), LANDMARK_RADIUS_PX, LANDMARK_COLOR);
    }

    if let Some((left, right)) = face.irises() {
        for point in left.iter().chain(right.iter()) {
            surface.fill_circle(point.to_pixel(width, height), IRIS_RADIUS_PX, IRIS_COLOR);
        }
    }
}
