use font8x8::BASIC_FONTS;
use font8x8::LATIN_FONTS;
use font8x8::UnicodeFonts;
use image::Rgba;
use image::RgbaImage;

/// Glyphs are 8x8 cells scaled by an integer factor
pub const GLYPH_SIZE: u32 = 8;

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Width in pixels of `text` drawn at `scale`
pub fn text_width(text: &str, scale: u32) -> u32 {
    let count = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    count.saturating_mul(GLYPH_SIZE * scale)
}

/// Largest scale in `1..=max_scale` at which `text` fits `max_width`
pub fn fit_scale(text: &str, max_width: u32, max_scale: u32) -> u32 {
    (1..=max_scale)
        .rev()
        .find(|scale| text_width(text, *scale) <= max_width)
        .unwrap_or(1)
}

/// Draws `text` with its top-left corner at (`x`, `y`), clipping at the canvas edge
pub fn draw_text(canvas: &mut RgbaImage, text: &str, x: u32, y: u32, scale: u32, color: Rgba<u8>) {
    let advance = GLYPH_SIZE * scale;
    let mut origin_x = x;
    for c in text.chars() {
        draw_glyph(canvas, glyph(c), origin_x, y, scale, color);
        origin_x = origin_x.saturating_add(advance);
    }
}

/// Draws `text` horizontally centered on `center_x`
pub fn draw_text_centered(
    canvas: &mut RgbaImage,
    text: &str,
    center_x: u32,
    y: u32,
    scale: u32,
    color: Rgba<u8>,
) {
    let x = center_x.saturating_sub(text_width(text, scale) / 2);
    draw_text(canvas, text, x, y, scale, color);
}

fn draw_glyph(canvas: &mut RgbaImage, rows: [u8; 8], x: u32, y: u32, scale: u32, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    for (row_index, row) in (0_u32..).zip(rows) {
        for bit in 0..GLYPH_SIZE {
            // bit 0 is the leftmost pixel
            if row & (1 << bit) == 0 {
                continue;
            }
            let cell_x = x.saturating_add(bit * scale);
            let cell_y = y.saturating_add(row_index * scale);
            for py in cell_y..cell_y.saturating_add(scale).min(height) {
                for px in cell_x..cell_x.saturating_add(scale).min(width) {
                    canvas.put_pixel(px, py, color);
                }
            }
        }
    }
}
