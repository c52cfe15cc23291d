use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_panorbit_camera::PanOrbitCameraPlugin;

use super::AutoRotate;
use super::ModeChanged;
use crate::asset_loader::GlobeAssets;
use crate::config::GlobeConfig;
use crate::marker::RebuildMarkers;
use crate::settings::RotationSettings;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanOrbitCameraPlugin)
            .add_systems(Startup, (spawn_globe, spawn_lights, spawn_globe_camera))
            .add_systems(PostStartup, request_initial_markers)
            .add_systems(Update, update_clear_color);
    }
}

/// The sphere
#[derive(Component, Debug)]
pub struct Globe;

#[derive(Component, Debug)]
pub struct GlobeCamera;

fn spawn_globe(
    mut commands: Commands,
    config: Res<GlobeConfig>,
    settings: Res<RotationSettings>,
    assets: Res<GlobeAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    commands.spawn((
        Name::new("Globe"),
        Globe,
        Mesh3d(meshes.add(Sphere::new(config.globe_radius).mesh().uv(64, 32))),
        MeshMaterial3d(assets.material_for(settings.mode())),
        Transform::default(),
    ));
}

fn spawn_lights(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(10.0, 6.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    // dim fill so the night side is not pure black
    commands.spawn((
        Name::new("Fill"),
        DirectionalLight {
            illuminance: 800.0,
            ..default()
        },
        Transform::from_xyz(-10.0, -4.0, -12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Orbit only: zoom and pan are off and pitch is clamped to a band around the
/// equator. Auto-rotation drives the yaw target and the damping eases toward it.
fn spawn_globe_camera(mut commands: Commands, config: Res<GlobeConfig>) {
    commands.spawn((
        Name::new("Globe Camera"),
        GlobeCamera,
        AutoRotate::default(),
        Camera3d::default(),
        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(config.camera_distance),
            yaw: Some(0.0),
            pitch: Some(0.0),
            orbit_sensitivity: config.orbit_sensitivity,
            orbit_smoothness: config.orbit_smoothness,
            pan_sensitivity: 0.0,
            zoom_sensitivity: 0.0,
            pitch_upper_limit: Some(config.polar_band),
            pitch_lower_limit: Some(-config.polar_band),
            ..default()
        },
    ));
}

/// Builds markers for the starting mode once the scene exists
fn request_initial_markers(
    settings: Res<RotationSettings>,
    mut rebuild: MessageWriter<RebuildMarkers>,
    mut mode_changed: MessageWriter<ModeChanged>,
) {
    let mode = settings.mode();
    info!("globe ready in {mode} mode");
    rebuild.write(RebuildMarkers { mode });
    mode_changed.write(ModeChanged { mode });
}

// lets the inspector edit the background at runtime
fn update_clear_color(config: Res<GlobeConfig>, mut clear_color: ResMut<ClearColor>) {
    if config.is_changed() {
        clear_color.0 = config.clear_color;
    }
}
