//! In-memory RGB render surface.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use image::imageops::{self, FilterType};
use image::{ImageResult, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::ports::{Frame, RenderSurface};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Render surface backed by an `RgbImage`.
///
/// Clones share the same buffer, so a caller can keep one to read the last
/// rendered overlay after handing the other to the monitor.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    canvas: Arc<Mutex<RgbImage>>,
    width: u32,
    height: u32,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Arc::new(Mutex::new(RgbImage::from_pixel(width, height, BACKGROUND))),
            width,
            height,
        }
    }

    pub fn snapshot(&self) -> RgbImage {
        self.lock().clone()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.snapshot().save(path)
    }

    fn lock(&self) -> MutexGuard<'_, RgbImage> {
        // a panic mid-draw leaves at worst a half-drawn overlay
        self.canvas.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RenderSurface for ImageSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        for pixel in self.lock().pixels_mut() {
            *pixel = BACKGROUND;
        }
    }

    fn draw_frame(&mut self, frame: &Frame) {
        let mut canvas = self.lock();
        if frame.dimensions() == (self.width, self.height) {
            canvas.copy_from_slice(frame.as_raw());
        } else {
            let resized = imageops::resize(frame, self.width, self.height, FilterType::Triangle);
            canvas.copy_from_slice(resized.as_raw());
        }
    }

    fn fill_circle(&mut self, center: (f64, f64), radius: i32, color: Rgb<u8>) {
        let center = (center.0.round() as i32, center.1.round() as i32);
        draw_filled_circle_mut(&mut *self.lock(), center, radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_circle_is_drawn_at_center() {
        let mut surface = ImageSurface::new(20, 20);
        surface.fill_circle((10.0, 10.0), 2, Rgb([255, 0, 0]));

        let image = surface.snapshot();
        assert_eq!(*image.get_pixel(10, 10), Rgb([255, 0, 0]));
        assert_eq!(*image.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn clear_resets_to_background() {
        let mut surface = ImageSurface::new(8, 8);
        surface.fill_circle((4.0, 4.0), 3, Rgb([0, 0, 0]));
        surface.clear();
        assert!(surface.snapshot().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn frames_of_other_sizes_are_scaled() {
        let mut surface = ImageSurface::new(8, 8);
        surface.draw_frame(&RgbImage::from_pixel(4, 4, Rgb([10, 20, 30])));
        assert!(surface.snapshot().pixels().all(|p| *p == Rgb([10, 20, 30])));
    }

    #[test]
    fn clones_share_the_canvas() {
        let reader = ImageSurface::new(4, 4);
        let mut writer = reader.clone();
        writer.draw_frame(&RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])));
        assert_eq!(*reader.snapshot().get_pixel(3, 3), Rgb([1, 2, 3]));
    }

    #[test]
    fn snapshot_is_written_as_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("overlay.png");
        ImageSurface::new(4, 4).save(&path).unwrap();
        assert!(path.exists());
    }
}
