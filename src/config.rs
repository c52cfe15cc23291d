use std::env;
use std::path::PathBuf;
use std::time::Duration;

use bevy::asset::io::file::FileAssetReader;
use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use crate::input::GlobeAction;
use crate::input::toggle_active;

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            ResourceInspectorPlugin::<GlobeConfig>::default()
                .run_if(toggle_active(false, GlobeAction::ConfigInspector)),
        )
        .init_resource::<GlobeConfig>()
        .insert_resource(WeatherConfig::from_env());
    }
}

/// Scene dimensions and camera behavior
#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone)]
#[reflect(Resource, InspectorOptions)]
pub struct GlobeConfig {
    #[inspector(min = 1.0, max = 20.0, display = NumberDisplay::Slider)]
    pub globe_radius:       f32,
    #[inspector(min = 0.01, max = 0.5, display = NumberDisplay::Slider)]
    pub pin_radius:         f32,
    /// Connector end point as a multiple of the pin's distance from the center
    #[inspector(min = 1.0, max = 2.0, display = NumberDisplay::Slider)]
    pub connector_scale:    f32,
    /// Width of a label quad in world units, height follows the texture aspect
    #[inspector(min = 0.2, max = 5.0, display = NumberDisplay::Slider)]
    pub label_width:        f32,
    #[inspector(min = 5.0, max = 50.0, display = NumberDisplay::Slider)]
    pub camera_distance:    f32,
    /// Half-width of the pitch band around the equator the camera may tilt within
    #[inspector(min = 0.0, max = 1.5, display = NumberDisplay::Slider)]
    pub polar_band:         f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub orbit_smoothness:   f32,
    #[inspector(min = 0.0, max = 5.0, display = NumberDisplay::Slider)]
    pub orbit_sensitivity:  f32,
    pub clear_color:        Color,
    /// Directory icons and textures are read from, relative to the asset
    /// server's base directory unless absolute. Read once at startup.
    pub asset_root:         String,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            globe_radius:      5.0,
            pin_radius:        0.06,
            connector_scale:   1.2,
            label_width:       1.6,
            camera_distance:   14.0,
            polar_band:        std::f32::consts::FRAC_PI_6,
            orbit_smoothness:  0.1,
            orbit_sensitivity: 1.0,
            clear_color:       Color::srgb(0.01, 0.01, 0.03),
            asset_root:        "assets".to_string(),
        }
    }
}

impl GlobeConfig {
    /// Condition icons are read from `<asset_root>/images`. A relative root is
    /// taken from the asset server's base directory, so icons and textures
    /// come from the same place wherever the app is launched from.
    pub fn icon_dir(&self) -> PathBuf {
        FileAssetReader::get_base_path()
            .join(&self.asset_root)
            .join("images")
    }
}

/// Unit system passed to the weather service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Some(Self::Metric),
            "imperial" => Some(Self::Imperial),
            "standard" => Some(Self::Standard),
            _ => None,
        }
    }

    pub const fn query_value(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }
}

pub const WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const UNITS_VAR: &str = "GLOBE_WEATHER_UNITS";
pub const TIMEOUT_VAR: &str = "GLOBE_WEATHER_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Settings for the live weather source, read once from the environment
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct WeatherConfig {
    pub endpoint: String,
    pub api_key:  Option<String>,
    pub units:    Units,
    pub timeout:  Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: WEATHER_ENDPOINT.to_string(),
            api_key:  None,
            units:    Units::default(),
            timeout:  Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl WeatherConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!("{API_KEY_VAR} is not set, live weather lookups will report no data");
        }

        let units = match lookup(UNITS_VAR) {
            Some(value) => Units::parse(&value).unwrap_or_else(|| {
                warn!("unrecognized {UNITS_VAR}={value}, using metric");
                Units::Metric
            }),
            None => Units::Metric,
        };

        let timeout_secs = lookup(TIMEOUT_VAR)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key,
            units,
            timeout: Duration::from_secs(timeout_secs),
            ..default()
        }
    }
}
