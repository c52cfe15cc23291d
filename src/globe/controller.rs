use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::AutoRotate;
use super::Globe;
use super::GlobeCommand;
use super::ModeChanged;
use crate::asset_loader::GlobeAssets;
use crate::marker::RebuildMarkers;
use crate::schedule::GlobeSet;
use crate::settings::GlobeMode;
use crate::settings::RotationSettings;

pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<GlobeCommand>()
            .add_message::<ModeChanged>()
            .add_message::<RebuildMarkers>()
            .add_systems(Update, apply_globe_commands.in_set(GlobeSet::Commands));
    }
}

/// The operations the outside world may perform on the globe. Every change goes
/// through here so the settings, the sphere and the camera never disagree.
#[derive(SystemParam)]
pub struct GlobeController<'w, 's> {
    settings:     ResMut<'w, RotationSettings>,
    assets:       Res<'w, GlobeAssets>,
    globe:        Query<'w, 's, &'static mut MeshMaterial3d<StandardMaterial>, With<Globe>>,
    cameras:      Query<'w, 's, &'static mut AutoRotate>,
    rebuild:      MessageWriter<'w, RebuildMarkers>,
    mode_changed: MessageWriter<'w, ModeChanged>,
}

impl GlobeController<'_, '_> {
    /// Flips the mode, swaps the sphere material, requests a marker rebuild
    /// for the new mode and tells observers
    pub fn toggle_mode(&mut self) -> GlobeMode {
        let mode = self.settings.toggle_mode();
        let material = self.assets.material_for(mode);
        for mut globe_material in &mut self.globe {
            globe_material.0 = material.clone();
        }
        self.rebuild.write(RebuildMarkers { mode });
        self.mode_changed.write(ModeChanged { mode });
        info!("switched globe to {mode}");
        mode
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.settings.set_auto_rotate(enabled);
        self.push_speed();
    }

    pub fn set_rotate_speed(&mut self, speed: f32) {
        self.settings.set_speed(speed);
        self.push_speed();
    }

    /// The frame loop syncs the camera from the settings anyway; pushing here
    /// makes the change visible to systems later in this frame
    fn push_speed(&mut self) {
        let speed = self.settings.effective_speed();
        for mut auto_rotate in &mut self.cameras {
            auto_rotate.set_if_neq(AutoRotate { speed });
        }
    }

    pub fn apply(&mut self, command: GlobeCommand) {
        debug!("applying {command:?}");
        match command {
            GlobeCommand::ToggleMode => {
                self.toggle_mode();
            },
            GlobeCommand::SetAutoRotate(enabled) => self.set_auto_rotate(enabled),
            GlobeCommand::SetRotateSpeed(speed) => self.set_rotate_speed(speed),
        }
    }
}

fn apply_globe_commands(mut commands: MessageReader<GlobeCommand>, mut controller: GlobeController) {
    for command in commands.read() {
        controller.apply(*command);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::conditions::Condition;
    use crate::conditions::ConditionCategory;
    use crate::conditions::ConditionProviders;
    use crate::conditions::StaticConditions;
    use crate::config::GlobeConfig;
    use crate::globe::rotation::RotationPlugin;
    use crate::locations::EARTH_LOCATIONS;
    use crate::marker::MarkerLabel;
    use crate::marker::MarkerLayer;
    use crate::marker::MarkerPlugin;
    use crate::schedule::SchedulePlugin;

    #[derive(Resource, Default)]
    struct Seen {
        rebuilds: Vec<GlobeMode>,
        changes:  Vec<GlobeMode>,
    }

    fn observe(
        mut rebuilds: MessageReader<RebuildMarkers>,
        mut changes: MessageReader<ModeChanged>,
        mut seen: ResMut<Seen>,
    ) {
        seen.rebuilds.extend(rebuilds.read().map(|request| request.mode));
        seen.changes.extend(changes.read().map(|change| change.mode));
    }

    fn controller_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), SchedulePlugin))
            .init_asset::<Image>()
            .init_asset::<StandardMaterial>()
            .init_resource::<RotationSettings>()
            .init_resource::<Seen>()
            .add_plugins((ControllerPlugin, RotationPlugin))
            .add_systems(Update, observe.after(GlobeSet::Commands));

        let world = app.world_mut();
        let assets = {
            let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
            GlobeAssets::from_textures(Handle::default(), Handle::default(), &mut materials)
        };
        let earth = assets.material_for(GlobeMode::Earth);
        world.insert_resource(assets);
        world.spawn((Globe, MeshMaterial3d(earth)));
        world.spawn(AutoRotate::default());
        app
    }

    fn send(app: &mut App, command: GlobeCommand) {
        app.world_mut().write_message(command);
        app.update();
    }

    fn globe_material(app: &mut App) -> Handle<StandardMaterial> {
        let world = app.world_mut();
        world
            .query_filtered::<&MeshMaterial3d<StandardMaterial>, With<Globe>>()
            .single(world)
            .unwrap()
            .0
            .clone()
    }

    fn camera_speed(app: &mut App) -> f32 {
        let world = app.world_mut();
        world.query::<&AutoRotate>().single(world).unwrap().speed
    }

    #[test]
    fn toggling_swaps_material_rebuilds_and_notifies() {
        let mut app = controller_app();
        send(&mut app, GlobeCommand::ToggleMode);

        let moon = app.world().resource::<GlobeAssets>().material_for(GlobeMode::Moon);
        assert_eq!(app.world().resource::<RotationSettings>().mode(), GlobeMode::Moon);
        assert_eq!(globe_material(&mut app), moon);
        let seen = app.world().resource::<Seen>();
        assert_eq!(seen.rebuilds, vec![GlobeMode::Moon]);
        assert_eq!(seen.changes, vec![GlobeMode::Moon]);
    }

    #[test]
    fn toggling_twice_returns_to_earth() {
        let mut app = controller_app();
        send(&mut app, GlobeCommand::ToggleMode);
        send(&mut app, GlobeCommand::ToggleMode);

        let earth = app.world().resource::<GlobeAssets>().material_for(GlobeMode::Earth);
        assert_eq!(app.world().resource::<RotationSettings>().mode(), GlobeMode::Earth);
        assert_eq!(globe_material(&mut app), earth);
        assert_eq!(app.world().resource::<Seen>().rebuilds, vec![GlobeMode::Moon, GlobeMode::Earth]);
    }

    /// Controller plus the real marker layer, with offline sources for both modes
    fn globe_with_markers() -> App {
        let mut app = controller_app();
        let earth = StaticConditions::new(
            EARTH_LOCATIONS
                .iter()
                .map(|location| (location.key, Condition::live(18.0, ConditionCategory::FewClouds))),
        );
        app.init_asset::<Mesh>()
            .init_resource::<GlobeConfig>()
            .insert_resource(ConditionProviders::new(Arc::new(earth), Arc::new(StaticConditions::moon())))
            .add_plugins(MarkerPlugin);
        app.world_mut().write_message(RebuildMarkers { mode: GlobeMode::Earth });
        app
    }

    /// Runs frames until the marker pass in flight has been swapped in
    fn settle_markers(app: &mut App) -> bool {
        for _ in 0..2000 {
            app.update();
            if app.world().resource::<MarkerLayer>().pending_pass().is_none() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        false
    }

    fn marker_keys(app: &mut App) -> Vec<(&'static str, GlobeMode)> {
        let world = app.world_mut();
        let mut keys: Vec<_> = world
            .query::<&MarkerLabel>()
            .iter(world)
            .map(|label| (label.key, label.mode))
            .collect();
        keys.sort_unstable_by_key(|(key, _)| *key);
        keys
    }

    #[test]
    fn toggling_twice_restores_the_earth_markers() {
        let mut app = globe_with_markers();
        assert!(settle_markers(&mut app));
        let earth_markers = marker_keys(&mut app);
        assert_eq!(earth_markers.len(), EARTH_LOCATIONS.len());

        send(&mut app, GlobeCommand::ToggleMode);
        assert!(settle_markers(&mut app));
        let moon_markers = marker_keys(&mut app);
        assert_eq!(moon_markers.len(), GlobeMode::Moon.locations().len());
        assert!(moon_markers.iter().all(|(_, mode)| *mode == GlobeMode::Moon));

        send(&mut app, GlobeCommand::ToggleMode);
        assert!(settle_markers(&mut app));

        let earth = app.world().resource::<GlobeAssets>().material_for(GlobeMode::Earth);
        assert_eq!(app.world().resource::<RotationSettings>().mode(), GlobeMode::Earth);
        assert_eq!(globe_material(&mut app), earth);
        assert_eq!(marker_keys(&mut app), earth_markers);
        assert_eq!(app.world().resource::<MarkerLayer>().node_count(), 3 * EARTH_LOCATIONS.len());
    }

    #[test]
    fn speed_changes_reach_the_camera_in_the_same_frame() {
        let mut app = controller_app();
        send(&mut app, GlobeCommand::SetRotateSpeed(0.0));
        assert!(camera_speed(&mut app).abs() < f32::EPSILON);

        send(&mut app, GlobeCommand::SetRotateSpeed(2.5));
        assert!((camera_speed(&mut app) - 2.5).abs() < f32::EPSILON);
        assert!((app.world().resource::<RotationSettings>().speed() - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn disabling_auto_rotate_stops_the_camera_but_keeps_the_speed() {
        let mut app = controller_app();
        send(&mut app, GlobeCommand::SetRotateSpeed(3.0));
        send(&mut app, GlobeCommand::SetAutoRotate(false));

        assert!(camera_speed(&mut app).abs() < f32::EPSILON);
        let settings = *app.world().resource::<RotationSettings>();
        assert!(!settings.auto_rotate());
        assert!((settings.speed() - 3.0).abs() < f32::EPSILON);

        send(&mut app, GlobeCommand::SetAutoRotate(true));
        assert!((camera_speed(&mut app) - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn negative_speed_is_clamped() {
        let mut app = controller_app();
        send(&mut app, GlobeCommand::SetRotateSpeed(-4.0));
        assert!(app.world().resource::<RotationSettings>().speed().abs() < f32::EPSILON);
    }
}
