use image::{Rgb, RgbImage};

/// Default outline color for detected stairs.
pub const COLOR_MATCH: Rgb<u8> = Rgb([255, 0, 0]); // Red

/// Draws a rectangle border on an image. Pixels outside the image are skipped.
pub fn draw_rect(
    img: &mut RgbImage,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    color: Rgb<u8>,
    thickness: u32,
) {
    let (img_w, img_h) = img.dimensions();
    let mut put = |px: u32, py: u32| {
        if px < img_w && py < img_h {
            img.put_pixel(px, py, color);
        }
    };

    for d in 0..thickness.min(h) {
        for dx in 0..w {
            // Top and bottom edges
            put(x + dx, y + d);
            put(x + dx, y + h - 1 - d);
        }
    }

    for d in 0..thickness.min(w) {
        for dy in 0..h {
            // Left and right edges
            put(x + d, y + dy);
            put(x + w - 1 - d, y + dy);
        }
    }
}
