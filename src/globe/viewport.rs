use bevy::prelude::*;
use bevy::window::WindowResized;

use super::GlobeCamera;
use crate::schedule::GlobeSet;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, fit_projection_to_window.in_set(GlobeSet::Camera));
    }
}

/// Width over height, `None` for a collapsed window
pub fn aspect_ratio(width: f32, height: f32) -> Option<f32> {
    (width > 0.0 && height > 0.0).then_some(width / height)
}

/// The render surface follows the window on its own; the projection is kept
/// in step here so the globe never stretches during a resize
fn fit_projection_to_window(
    mut resized: MessageReader<WindowResized>,
    mut cameras: Query<&mut Projection, With<GlobeCamera>>,
) {
    let Some(latest) = resized.read().last() else {
        return;
    };
    let Some(aspect) = aspect_ratio(latest.width, latest.height) else {
        return;
    };
    debug!("viewport resized to {}x{}", latest.width, latest.height);

    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = aspect;
        }
    }
}
