use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::schedule::GlobeSet;
use crate::settings::RotationSettings;

/// One full orbit per minute at speed 1.0
pub const RADIANS_PER_SECOND_AT_UNIT_SPEED: f32 = TAU / 60.0;

pub struct RotationPlugin;

impl Plugin for RotationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AutoRotate>().add_systems(
            Update,
            (sync_auto_rotate, advance_auto_rotate)
                .chain()
                .in_set(GlobeSet::Camera),
        );
    }
}

/// Rotation speed the camera is currently turning at, zero when auto-rotate is off
#[derive(Component, Reflect, Debug, Default, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct AutoRotate {
    pub speed: f32,
}

fn sync_auto_rotate(settings: Res<RotationSettings>, mut cameras: Query<&mut AutoRotate>) {
    let speed = settings.effective_speed();
    for mut auto_rotate in &mut cameras {
        auto_rotate.set_if_neq(AutoRotate { speed });
    }
}

/// Moves the orbit target rather than the transform so user drags and the
/// damping keep working while the globe turns
fn advance_auto_rotate(time: Res<Time>, mut cameras: Query<(&AutoRotate, &mut PanOrbitCamera)>) {
    for (auto_rotate, mut pan_orbit) in &mut cameras {
        if auto_rotate.speed > 0.0 {
            pan_orbit.target_yaw += auto_rotate.speed * RADIANS_PER_SECOND_AT_UNIT_SPEED * time.delta_secs();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use super::*;

    fn rotation_app(settings: RotationSettings) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(settings)
            .add_plugins(RotationPlugin);
        app.world_mut().spawn((
            PanOrbitCamera::default(),
            AutoRotate::default(),
        ));
        // the first update only primes the clock
        app.update();
        app
    }

    fn target_yaw(app: &mut App) -> f32 {
        let world = app.world_mut();
        world.query::<&PanOrbitCamera>().single(world).unwrap().target_yaw
    }

    #[test]
    fn zero_speed_leaves_the_camera_still() {
        let mut settings = RotationSettings::default();
        settings.set_speed(0.0);
        let mut app = rotation_app(settings);

        let before = target_yaw(&mut app);
        app.update();
        app.update();
        assert!((target_yaw(&mut app) - before).abs() < f32::EPSILON);
    }

    #[test]
    fn positive_speed_restores_motion() {
        let mut settings = RotationSettings::default();
        settings.set_speed(0.0);
        let mut app = rotation_app(settings);
        app.update();
        let before = target_yaw(&mut app);

        app.world_mut().resource_mut::<RotationSettings>().set_speed(2.0);
        app.update();
        let after = target_yaw(&mut app);

        let expected = 2.0 * RADIANS_PER_SECOND_AT_UNIT_SPEED * 0.1;
        assert!((after - before - expected).abs() < 1e-4);
    }

    #[test]
    fn disabled_auto_rotate_reports_zero_speed() {
        let mut settings = RotationSettings::default();
        settings.set_auto_rotate(false);
        let mut app = rotation_app(settings);
        app.update();

        let world = app.world_mut();
        let speed = world.query::<&AutoRotate>().single(world).unwrap().speed;
        assert!(speed.abs() < f32::EPSILON);
    }
}
