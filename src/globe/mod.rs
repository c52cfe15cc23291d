mod controller;
mod rotation;
mod scene;
mod viewport;

use bevy::prelude::*;
use controller::ControllerPlugin;
pub use rotation::AutoRotate;
use rotation::RotationPlugin;
pub use scene::Globe;
pub use scene::GlobeCamera;
use scene::ScenePlugin;
use viewport::ViewportPlugin;

use crate::settings::GlobeMode;

pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ScenePlugin)
            .add_plugins(ControllerPlugin)
            .add_plugins(RotationPlugin)
            .add_plugins(ViewportPlugin);
    }
}

/// Requests from any control surface. Applied in order by a single system.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum GlobeCommand {
    ToggleMode,
    SetAutoRotate(bool),
    /// Negative values are clamped to zero when applied
    SetRotateSpeed(f32),
}

/// Written after the mode flips, for anything listing the active locations
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChanged {
    pub mode: GlobeMode,
}
