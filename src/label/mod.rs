//! Procedural label cards: a rounded translucent card with the location name,
//! a condition icon and the formatted value, rasterized on the CPU and then
//! handed to the GPU as a texture.

mod icon;
mod text;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::Extent3d;
use bevy::render::render_resource::TextureDimension;
use bevy::render::render_resource::TextureFormat;
pub use icon::fit_icon;
pub use icon::load_icon;
use image::Rgba;
use image::RgbaImage;
use image::imageops;

use crate::conditions::Condition;

pub const LABEL_WIDTH: u32 = 512;
pub const LABEL_HEIGHT: u32 = 256;

const CARD_INSET: u32 = 6;
const CARD_CORNER_RADIUS: u32 = 36;
const CARD_COLOR: Rgba<u8> = Rgba([12, 16, 32, 168]);
const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CAPTION_COLOR: Rgba<u8> = Rgba([200, 200, 210, 255]);
const TEXT_MARGIN: u32 = 24;

/// Top of the name row
pub const NAME_TOP: u32 = 36;
const NAME_MAX_SCALE: u32 = 5;

/// Icon box, left of center at mid-height of the lower area
pub const ICON_MAX_EDGE: u32 = 96;
const ICON_LEFT: u32 = 96;
/// Vertical center of the icon and value row
pub const CONTENT_CENTER_Y: u32 = 168;

/// Left edge of the value text, right of the icon box
pub const VALUE_LEFT: u32 = ICON_LEFT + ICON_MAX_EDGE + 20;
const VALUE_MAX_SCALE: u32 = 6;

const NO_DATA_CAPTION: &str = "no data";
const CAPTION_SCALE: u32 = 4;

/// Degree sign drawn after values on the card
pub const LABEL_UNIT: &str = "°";

/// What the lower part of a card shows
#[derive(Debug, Clone, Copy)]
pub struct LabelReading<'a> {
    pub condition: &'a Condition,
    /// Already decoded; `None` leaves the icon region blank
    pub icon:      Option<&'a RgbaImage>,
}

/// The empty card every label starts from
pub fn blank_card() -> RgbaImage {
    let mut canvas = RgbaImage::new(LABEL_WIDTH, LABEL_HEIGHT);
    fill_rounded_rect(
        &mut canvas,
        CARD_INSET,
        CARD_INSET,
        LABEL_WIDTH - 2 * CARD_INSET,
        LABEL_HEIGHT - 2 * CARD_INSET,
        CARD_CORNER_RADIUS,
        CARD_COLOR,
    );
    canvas
}

/// Draws a card for `name`. With a reading that has data the icon and value are
/// drawn below the name; otherwise only the card and name are drawn.
pub fn render_label(name: &str, reading: Option<LabelReading<'_>>) -> RgbaImage {
    let mut canvas = blank_card();

    let name_scale = text::fit_scale(name, LABEL_WIDTH - 2 * TEXT_MARGIN, NAME_MAX_SCALE);
    text::draw_text_centered(&mut canvas, name, LABEL_WIDTH / 2, NAME_TOP, name_scale, TEXT_COLOR);

    let Some(reading) = reading else {
        return canvas;
    };
    let Some(value) = reading.condition.format_value(LABEL_UNIT) else {
        return canvas;
    };

    if let Some(icon) = reading.icon {
        let icon = fit_icon(icon, ICON_MAX_EDGE);
        let (width, height) = icon.dimensions();
        let x = ICON_LEFT + (ICON_MAX_EDGE - width.min(ICON_MAX_EDGE)) / 2;
        let y = CONTENT_CENTER_Y.saturating_sub(height / 2);
        imageops::overlay(&mut canvas, &icon, i64::from(x), i64::from(y));
    }

    let value_scale = text::fit_scale(&value, LABEL_WIDTH - TEXT_MARGIN - VALUE_LEFT, VALUE_MAX_SCALE);
    let value_top = CONTENT_CENTER_Y.saturating_sub(text::GLYPH_SIZE * value_scale / 2);
    text::draw_text(&mut canvas, &value, VALUE_LEFT, value_top, value_scale, TEXT_COLOR);

    canvas
}

/// Card for a location whose lookup produced no data
pub fn render_no_data(name: &str) -> RgbaImage {
    let mut canvas = render_label(name, None);
    let caption_top = CONTENT_CENTER_Y.saturating_sub(text::GLYPH_SIZE * CAPTION_SCALE / 2);
    text::draw_text_centered(
        &mut canvas,
        NO_DATA_CAPTION,
        LABEL_WIDTH / 2,
        caption_top,
        CAPTION_SCALE,
        CAPTION_COLOR,
    );
    canvas
}

/// Wraps a raster as a sampleable texture
pub fn to_texture(raster: RgbaImage) -> Image {
    let (width, height) = raster.dimensions();
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        raster.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

/// Width over height of every label
#[allow(clippy::cast_precision_loss, reason = "label dimensions are small constants")]
pub fn label_aspect() -> f32 { LABEL_WIDTH as f32 / LABEL_HEIGHT as f32 }

fn fill_rounded_rect(
    canvas: &mut RgbaImage,
    left: u32,
    top: u32,
    width: u32,
    height: u32,
    radius: u32,
    color: Rgba<u8>,
) {
    let radius = radius.min(width / 2).min(height / 2);
    let right = left + width;
    let bottom = top + height;
    for y in top..bottom {
        for x in left..right {
            if inside_rounded(x, y, left, top, right, bottom, radius) {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

fn inside_rounded(x: u32, y: u32, left: u32, top: u32, right: u32, bottom: u32, radius: u32) -> bool {
    // distance from the nearest corner circle center, zero outside the corner squares
    let dx = if x < left + radius {
        left + radius - x
    } else if x >= right - radius {
        x + 1 + radius - right
    } else {
        0
    };
    let dy = if y < top + radius {
        top + radius - y
    } else if y >= bottom - radius {
        y + 1 + radius - bottom
    } else {
        0
    };
    dx * dx + dy * dy <= radius * radius
}
