use std::path::Path;

/// Write a small solid-color PNG for upload tests.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba([120, 80, 60, 255]));
    buffer.save(path).expect("write test png");
}
