use bevy::prelude::*;
use leafwing_input_manager::Actionlike;
use leafwing_input_manager::action_state::ActionState;
use leafwing_input_manager::input_map::InputMap;
use leafwing_input_manager::plugin::InputManagerPlugin;
use strum::EnumIter;
use strum::IntoEnumIterator;

use crate::globe::GlobeCommand;
use crate::schedule::GlobeSet;
use crate::settings::RotationSettings;

/// Speed change per key press
pub const SPEED_STEP: f32 = 0.5;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<GlobeAction>::default())
            .init_resource::<ActionState<GlobeAction>>()
            .insert_resource(GlobeAction::generate_input_map())
            .add_systems(Update, send_globe_commands.in_set(GlobeSet::UserInput));
    }
}

#[derive(Actionlike, EnumIter, PartialEq, Eq, Clone, Copy, Hash, Debug, Reflect)]
pub enum GlobeAction {
    ToggleMode,
    ToggleAutoRotate,
    SpeedUp,
    SlowDown,
    StopRotation,
    ConfigInspector,
}

impl GlobeAction {
    pub fn generate_input_map() -> InputMap<Self> {
        Self::iter().fold(InputMap::default(), |input_map, action| match action {
            Self::ToggleMode => input_map.with(action, KeyCode::KeyM),
            Self::ToggleAutoRotate => input_map.with(action, KeyCode::KeyR),
            Self::SpeedUp => input_map
                .with(action, KeyCode::Equal)
                .with(action, KeyCode::NumpadAdd),
            Self::SlowDown => input_map
                .with(action, KeyCode::Minus)
                .with(action, KeyCode::NumpadSubtract),
            Self::StopRotation => input_map.with(action, KeyCode::Digit0),
            Self::ConfigInspector => input_map.with(action, KeyCode::F1),
        })
    }
}

/// Run condition that flips between on and off each time `action` is pressed
pub fn toggle_active(
    default: bool,
    action: GlobeAction,
) -> impl Fn(Res<ActionState<GlobeAction>>, Local<Option<bool>>) -> bool {
    move |action_state: Res<ActionState<GlobeAction>>, mut state: Local<Option<bool>>| {
        if action_state.just_pressed(&action) {
            *state = Some(!state.unwrap_or(default));
        }
        state.unwrap_or(default)
    }
}

/// Keyboard is one of the control surfaces; it goes through the same commands
/// any other UI would write
fn send_globe_commands(
    actions: Res<ActionState<GlobeAction>>,
    settings: Res<RotationSettings>,
    mut commands: MessageWriter<GlobeCommand>,
) {
    if actions.just_pressed(&GlobeAction::ToggleMode) {
        commands.write(GlobeCommand::ToggleMode);
    }
    if actions.just_pressed(&GlobeAction::ToggleAutoRotate) {
        commands.write(GlobeCommand::SetAutoRotate(!settings.auto_rotate()));
    }
    if actions.just_pressed(&GlobeAction::SpeedUp) {
        commands.write(GlobeCommand::SetRotateSpeed(settings.speed() + SPEED_STEP));
    }
    if actions.just_pressed(&GlobeAction::SlowDown) {
        commands.write(GlobeCommand::SetRotateSpeed((settings.speed() - SPEED_STEP).max(0.0)));
    }
    if actions.just_pressed(&GlobeAction::StopRotation) {
        commands.write(GlobeCommand::SetRotateSpeed(0.0));
    }
}
