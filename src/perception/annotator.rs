/// Draw numbered, color-coded boxes for detected elements onto a captured
/// viewport image. Pure bytes-in/bytes-out; the driver never appears here.
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::RgbaImage;

use crate::errors::PageSightResult;
use crate::perception::types::ElementDescriptor;

const BOX_THICKNESS: i32 = 3;
/// Boxes smaller than this are unlabelable noise on a static image. The
/// filter applies only here, never to detection.
const MIN_LABEL_WIDTH: i32 = 20;
const MIN_LABEL_HEIGHT: i32 = 10;

/// RGBA color keyed by element kind.
fn element_color(e: &ElementDescriptor) -> [u8; 4] {
    if e.is_range() {
        return [231, 76, 60, 255]; // red
    }
    match e.tag.as_str() {
        "input" => [52, 152, 219, 255],  // blue
        "button" => [46, 204, 113, 255], // green
        "a" => [155, 89, 182, 255],      // purple
        _ => [243, 156, 18, 255],        // orange
    }
}

/// Annotate `src_bytes` (PNG) with one rectangle and `[id]` label per
/// element that is visible and at least 20x10 px, up to `max_labels`.
/// Returns PNG bytes and the number of boxes drawn. Output dimensions
/// always equal the input's, labels or not.
pub fn draw_labels(
    src_bytes: &[u8],
    elements: &[ElementDescriptor],
    max_labels: usize,
) -> PageSightResult<(Vec<u8>, u32)> {
    let img = image::load_from_memory(src_bytes)?;
    let mut canvas = img.to_rgba8();
    let (w, _h) = canvas.dimensions();

    // 2x glyphs on high-res captures so labels survive downscaling when
    // the image is shown to a vision model.
    let scale: u32 = if w > 1600 { 2 } else { 1 };

    let mut labeled = 0u32;
    for elem in elements {
        if labeled as usize >= max_labels {
            break;
        }
        if !elem.visible || elem.width < MIN_LABEL_WIDTH || elem.height < MIN_LABEL_HEIGHT {
            continue;
        }

        let color = element_color(elem);
        draw_rect(
            &mut canvas,
            elem.left,
            elem.top,
            elem.left + elem.width,
            elem.top + elem.height,
            color,
            BOX_THICKNESS,
        );

        let label = format!("[{}]", elem.id);
        let label_x = elem.left + 5;
        let label_y = (elem.top - 20).max(5);
        draw_label(&mut canvas, label_x, label_y, &label, color, scale);

        labeled += 1;
    }

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(canvas)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)?;
    Ok((out, labeled))
}

// ── Drawing primitives ──────────────────────────────────────────────────────

fn draw_rect(
    canvas: &mut RgbaImage,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: [u8; 4],
    thickness: i32,
) {
    let (w, h) = canvas.dimensions();
    let (iw, ih) = (w as i32, h as i32);

    for t in 0..thickness {
        let ty = y1 + t;
        let by = y2 - t;
        for x in x1..=x2 {
            if x >= 0 && x < iw {
                if ty >= 0 && ty < ih {
                    put_px(canvas, x as u32, ty as u32, color);
                }
                if by >= 0 && by < ih {
                    put_px(canvas, x as u32, by as u32, color);
                }
            }
        }
        let lx = x1 + t;
        let rx = x2 - t;
        for y in y1..=y2 {
            if y >= 0 && y < ih {
                if lx >= 0 && lx < iw {
                    put_px(canvas, lx as u32, y as u32, color);
                }
                if rx >= 0 && rx < iw {
                    put_px(canvas, rx as u32, y as u32, color);
                }
            }
        }
    }
}

/// Filled background in the element color, white bitmap text on top.
fn draw_label(canvas: &mut RgbaImage, x: i32, y: i32, text: &str, color: [u8; 4], scale: u32) {
    let (w, h) = canvas.dimensions();
    let (iw, ih) = (w as i32, h as i32);

    let char_w = 8 * scale as i32;
    let char_h = 8 * scale as i32;
    let pad = 2;
    let bg_w = text.len() as i32 * char_w + pad * 2;
    let bg_h = char_h + pad * 2;

    for dy in 0..bg_h {
        for dx in 0..bg_w {
            let px = x - pad + dx;
            let py = y - pad + dy;
            if px >= 0 && px < iw && py >= 0 && py < ih {
                put_px(canvas, px as u32, py as u32, color);
            }
        }
    }

    draw_bitmap_text(canvas, x, y, text, [255, 255, 255, 255], scale);
}

/// 8x8 fixed-size font, scaled by integer replication. Legibility over
/// typographic fidelity.
fn draw_bitmap_text(canvas: &mut RgbaImage, x: i32, y: i32, text: &str, color: [u8; 4], scale: u32) {
    let (w, h) = canvas.dimensions();
    let (iw, ih) = (w as i32, h as i32);
    let scale_i = scale.max(1) as i32;

    let mut cursor_x = x;
    for ch in text.chars() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            cursor_x += 8 * scale_i;
            continue;
        };
        for (row_idx, row) in glyph.iter().enumerate() {
            for col_idx in 0..8i32 {
                if (row >> col_idx) & 1 == 0 {
                    continue;
                }
                for sy in 0..scale_i {
                    for sx in 0..scale_i {
                        let px = cursor_x + col_idx * scale_i + sx;
                        let py = y + row_idx as i32 * scale_i + sy;
                        if px >= 0 && px < iw && py >= 0 && py < ih {
                            put_px(canvas, px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
        cursor_x += 8 * scale_i;
    }
}

fn put_px(canvas: &mut RgbaImage, x: u32, y: u32, color: [u8; 4]) {
    canvas.put_pixel(x, y, image::Rgba(color));
}
