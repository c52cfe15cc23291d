//! Pins, connectors and billboard labels for the active mode's locations.
//!
//! A rebuild clears the layer at once and starts a build pass: one worker thread
//! per location resolves its condition and rasterizes its label off the main thread.
//! When the whole pass is in, every marker is spawned under the marker group in
//! a single command flush. Passes are numbered, and a result that arrives for a
//! pass that has since been replaced is dropped on arrival.

mod build;
mod layer;

use bevy::prelude::*;
pub use layer::MarkerLayer;

use crate::config::GlobeConfig;
use crate::label;
use crate::schedule::GlobeSet;
use crate::settings::GlobeMode;

pub struct MarkerPlugin;

impl Plugin for MarkerPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RebuildMarkers>()
            .add_message::<MarkersBuilt>()
            .init_resource::<MarkerLayer>()
            .add_systems(Startup, (init_marker_assets, spawn_marker_group))
            .add_systems(
                Update,
                (
                    build::start_build_pass,
                    build::poll_label_tasks,
                    build::finish_build_pass,
                )
                    .chain()
                    .in_set(GlobeSet::Markers),
            )
            .add_systems(Update, face_camera.in_set(GlobeSet::Camera));
    }
}

/// Asks for the marker layer to be rebuilt for `mode`
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildMarkers {
    pub mode: GlobeMode,
}

/// Written once per completed build pass, in table order
#[derive(Message, Debug, Clone)]
pub struct MarkersBuilt {
    pub mode:       GlobeMode,
    pub generation: u64,
    pub readings:   Vec<MarkerReading>,
}

/// What the pass found for one location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerReading {
    pub name:     &'static str,
    /// Formatted value with the source's unit suffix, `None` for no data
    pub value:    Option<String>,
    /// The source's description, `None` for no data
    pub category: Option<String>,
}

/// Parent of every marker node
#[derive(Component, Debug)]
pub struct MarkerGroup;

#[derive(Component, Debug)]
pub struct MarkerPin;

#[derive(Component, Debug)]
pub struct MarkerConnector;

#[derive(Component, Debug)]
pub struct MarkerLabel {
    pub key:  &'static str,
    pub mode: GlobeMode,
}

/// Quads that turn to face the camera every frame
#[derive(Component, Debug)]
pub struct Billboard;

/// Meshes and materials every marker shares
#[derive(Resource, Debug)]
pub struct MarkerAssets {
    pin_mesh:           Handle<Mesh>,
    pin_material:       Handle<StandardMaterial>,
    connector_material: Handle<StandardMaterial>,
    label_mesh:         Handle<Mesh>,
}

fn init_marker_assets(
    mut commands: Commands,
    config: Res<GlobeConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let label_height = config.label_width / label::label_aspect();

    commands.insert_resource(MarkerAssets {
        pin_mesh:           meshes.add(Sphere::new(config.pin_radius).mesh().uv(16, 8)),
        pin_material:       materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.25, 0.2),
            emissive: LinearRgba::rgb(0.6, 0.1, 0.05),
            ..default()
        }),
        connector_material: materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.8),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        }),
        label_mesh:         meshes.add(Rectangle::new(config.label_width, label_height)),
    });
}

fn spawn_marker_group(mut commands: Commands, mut layer: ResMut<MarkerLayer>) {
    let group = commands
        .spawn((
            Name::new("Marker Group"),
            MarkerGroup,
            Transform::default(),
            Visibility::default(),
        ))
        .id();
    layer.set_group(group);
}

/// The marker group sits at the origin unrotated, so matching the camera's
/// rotation turns each quad's front toward the viewer
fn face_camera(
    camera: Query<&Transform, (With<Camera3d>, Without<Billboard>)>,
    mut labels: Query<&mut Transform, With<Billboard>>,
) {
    let Ok(camera) = camera.single() else {
        return;
    };
    for mut transform in &mut labels {
        transform.rotation = camera.rotation;
    }
}
