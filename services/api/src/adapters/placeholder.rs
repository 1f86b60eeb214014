//! services/api/src/adapters/placeholder.rs
//!
//! Deterministic local placeholder image, substituted whenever no remote
//! image-generation credential is configured or the remote call fails.
//! Identical prompts must produce byte-identical PNG output, so the text is
//! rendered with an embedded bitmap font instead of a system font.

use ancient_eats_core::ports::ImageError;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use std::io::Cursor;

const WIDTH: u32 = 512;
const HEIGHT: u32 = 512;

// Warm gradient stops and panel colors shared with the storefront theme.
const GRADIENT_START: [f32; 3] = [139.0, 69.0, 19.0]; // #8B4513
const GRADIENT_MID: [f32; 3] = [210.0, 105.0, 30.0]; // #D2691E
const GRADIENT_END: [f32; 3] = [244.0, 164.0, 96.0]; // #F4A460
const PANEL_OUTER: Rgb<u8> = Rgb([101, 67, 33]); // #654321
const PANEL_INNER: Rgb<u8> = Rgb([139, 69, 19]); // #8B4513
const TEXT_COLOR: Rgb<u8> = Rgb([245, 222, 179]); // #F5DEB3

/// Renders the placeholder for a prompt: gradient background, nested panels,
/// brand title and a truncated six-word excerpt of the prompt.
pub fn render_placeholder(prompt: &str) -> Result<Vec<u8>, ImageError> {
    let mut img = RgbImage::new(WIDTH, HEIGHT);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = gradient_at(x, y);
    }

    fill_rect(&mut img, 50, 50, 412, 412, PANEL_OUTER);
    fill_rect(&mut img, 75, 75, 362, 362, PANEL_INNER);

    draw_text_centered(&mut img, 256, 172, 4, "Ancient Eats");
    draw_text_centered(&mut img, 256, 216, 2, "Promo Image");

    let excerpt: String = prompt.split(' ').take(6).collect::<Vec<_>>().join(" ");
    draw_text_centered(&mut img, 256, 286, 2, &format!("{excerpt}..."));

    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
        .map_err(|e| ImageError::Render(e.to_string()))?;
    Ok(out)
}

/// Diagonal three-stop linear gradient.
fn gradient_at(x: u32, y: u32) -> Rgb<u8> {
    let t = (x + y) as f32 / ((WIDTH + HEIGHT - 2) as f32);
    let (from, to, local) = if t < 0.5 {
        (GRADIENT_START, GRADIENT_MID, t * 2.0)
    } else {
        (GRADIENT_MID, GRADIENT_END, (t - 0.5) * 2.0)
    };
    let channel = |i: usize| (from[i] + (to[i] - from[i]) * local).round() as u8;
    Rgb([channel(0), channel(1), channel(2)])
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..(y0 + h).min(HEIGHT) {
        for x in x0..(x0 + w).min(WIDTH) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Draws text centered on `center_x` with its top edge at `top_y`. Each glyph
/// cell is 5x7 dots scaled up by `scale`, with a one-dot gap between glyphs.
fn draw_text_centered(img: &mut RgbImage, center_x: i64, top_y: i64, scale: u32, text: &str) {
    let advance = 6 * scale as i64;
    let total_width = advance * text.chars().count() as i64 - scale as i64;
    let mut x = center_x - total_width / 2;

    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..5u32 {
                    if bits & (0x10 >> col) != 0 {
                        let dot_x = x + (col * scale) as i64;
                        let dot_y = top_y + (row as u32 * scale) as i64;
                        fill_dot(img, dot_x, dot_y, scale);
                    }
                }
            }
        }
        x += advance;
    }
}

fn fill_dot(img: &mut RgbImage, x0: i64, y0: i64, scale: u32) {
    for dy in 0..scale as i64 {
        for dx in 0..scale as i64 {
            let (x, y) = (x0 + dx, y0 + dy);
            if (0..WIDTH as i64).contains(&x) && (0..HEIGHT as i64).contains(&y) {
                img.put_pixel(x as u32, y as u32, TEXT_COLOR);
            }
        }
    }
}

/// Classic 5x7 dot-matrix glyphs, case-insensitive. Characters outside the
/// table render as blanks.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '"' => [0x0A, 0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_prompts_produce_identical_bytes() {
        let a = render_placeholder("ancient roman banquet with honey and wine").unwrap();
        let b = render_placeholder("ancient roman banquet with honey and wine").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_prompts_produce_different_images() {
        let a = render_placeholder("roman banquet").unwrap();
        let b = render_placeholder("viking feast").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn output_is_a_png_of_the_expected_size() {
        let bytes = render_placeholder("emmer bread").unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 512);
        assert_eq!(decoded.height(), 512);
    }
}
