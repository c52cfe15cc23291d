use bevy::prelude::*;

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum GlobeSet {
    UserInput,
    Commands,
    Markers,
    Camera,
}

pub struct SchedulePlugin;

impl Plugin for SchedulePlugin {
    fn build(&self, app: &mut App) {
        // input becomes commands, commands may start a marker pass, and the camera
        // reads the settings the commands just wrote
        app.configure_sets(
            Update,
            (
                GlobeSet::UserInput,
                GlobeSet::Commands,
                GlobeSet::Markers,
                GlobeSet::Camera,
            )
                .chain(),
        );
    }
}
