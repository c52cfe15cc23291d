use bevy::prelude::*;
use strum::Display;
use strum::EnumIter;

use crate::geo::Location;
use crate::locations::EARTH_LOCATIONS;
use crate::locations::MOON_LOCATIONS;

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GlobeMode>()
            .register_type::<RotationSettings>()
            .init_resource::<RotationSettings>();
    }
}

/// Which planet the globe is presenting. Each mode owns a coordinate table,
/// a condition source and a surface texture.
#[derive(Debug, Display, EnumIter, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum GlobeMode {
    #[default]
    Earth,
    Moon,
}

impl GlobeMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Earth => Self::Moon,
            Self::Moon => Self::Earth,
        }
    }

    pub const fn locations(self) -> &'static [Location] {
        match self {
            Self::Earth => EARTH_LOCATIONS,
            Self::Moon => MOON_LOCATIONS,
        }
    }
}

/// Auto-rotation and active mode, read every frame by the camera and by each
/// marker build pass. Only mutated through the setters so a single writer owns
/// each field at a time.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Resource)]
pub struct RotationSettings {
    auto_rotate: bool,
    speed:       f32,
    mode:        GlobeMode,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            speed:       1.0,
            mode:        GlobeMode::Earth,
        }
    }
}

impl RotationSettings {
    pub const fn auto_rotate(&self) -> bool { self.auto_rotate }

    pub const fn speed(&self) -> f32 { self.speed }

    pub const fn mode(&self) -> GlobeMode { self.mode }

    /// Speed the camera should actually turn at this frame
    pub const fn effective_speed(&self) -> f32 {
        if self.auto_rotate { self.speed } else { 0.0 }
    }

    pub const fn set_auto_rotate(&mut self, enabled: bool) { self.auto_rotate = enabled; }

    /// Negative and non-finite speeds are clamped to zero
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    /// Flips the active mode and returns the new one
    pub const fn toggle_mode(&mut self) -> GlobeMode {
        self.mode = self.mode.toggled();
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_rotate_earth() {
        let settings = RotationSettings::default();
        assert!(settings.auto_rotate());
        assert!(settings.speed() > 0.0);
        assert_eq!(settings.mode(), GlobeMode::Earth);
    }

    #[test]
    fn toggling_twice_restores_mode() {
        let mut settings = RotationSettings::default();
        assert_eq!(settings.toggle_mode(), GlobeMode::Moon);
        assert_eq!(settings.toggle_mode(), GlobeMode::Earth);
    }

    #[test]
    fn speed_is_never_negative() {
        let mut settings = RotationSettings::default();
        settings.set_speed(-3.0);
        assert_eq!(settings.speed(), 0.0);
        settings.set_speed(f32::NAN);
        assert_eq!(settings.speed(), 0.0);
        settings.set_speed(2.5);
        assert_eq!(settings.speed(), 2.5);
    }

    #[test]
    fn disabled_rotation_has_zero_effective_speed() {
        let mut settings = RotationSettings::default();
        settings.set_speed(4.0);
        settings.set_auto_rotate(false);
        assert_eq!(settings.effective_speed(), 0.0);
        settings.set_auto_rotate(true);
        assert_eq!(settings.effective_speed(), 4.0);
    }

    #[test]
    fn modes_have_disjoint_tables() {
        let earth = GlobeMode::Earth.locations();
        let moon = GlobeMode::Moon.locations();
        assert!(!earth.is_empty() && !moon.is_empty());
        assert!(earth.iter().all(|e| moon.iter().all(|m| m.key != e.key)));
    }
}
