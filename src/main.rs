//! globe-weather - an interactive weather globe built with Bevy 0.18
//!
//! A textured sphere orbited by a damped, auto-rotating camera:
//! - Earth mode with live conditions per city, Moon mode with a static table of Apollo sites
//! - Pins, connectors and billboard labels rendered from procedurally drawn textures
//! - Condition lookups run concurrently off the main thread
//! - Bevy Remote Protocol (BRP) support for debugging

mod asset_loader;
mod conditions;
mod config;
mod despawn;
mod geo;
mod globe;
mod input;
mod label;
mod locations;
mod marker;
mod panel;
mod schedule;
mod settings;

use bevy::prelude::*;
use bevy_brp_extras::BrpExtrasPlugin;
use bevy_inspector_egui::bevy_egui::EguiPlugin;

use crate::asset_loader::AssetLoaderPlugin;
use crate::conditions::ConditionsPlugin;
use crate::config::ConfigPlugin;
use crate::config::GlobeConfig;
use crate::globe::GlobePlugin;
use crate::input::InputPlugin;
use crate::marker::MarkerPlugin;
use crate::panel::PanelPlugin;
use crate::schedule::SchedulePlugin;
use crate::settings::SettingsPlugin;

fn main() {
    let mut app = App::new();

    // Get effective port from BrpExtrasPlugin to include in window title if non-default
    let brp_plugin = BrpExtrasPlugin::default();
    let (effective_port, _) = brp_plugin.get_effective_port();
    let window_title = if effective_port == bevy_brp_extras::DEFAULT_REMOTE_PORT {
        "globe-weather".to_string()
    } else {
        format!("globe-weather - {effective_port}")
    };

    let config = GlobeConfig::default();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: window_title,
                    ..default()
                }),
                ..default()
            })
            // label icons resolve against the same root, see `GlobeConfig::icon_dir`
            .set(AssetPlugin {
                file_path: config.asset_root.clone(),
                ..default()
            }),
    )
    .insert_resource(ClearColor(config.clear_color));

    app.add_plugins((
        EguiPlugin::default(),
        brp_plugin,
        AssetLoaderPlugin,
        ConditionsPlugin,
        ConfigPlugin,
        GlobePlugin,
        InputPlugin,
        MarkerPlugin,
        PanelPlugin,
        SchedulePlugin,
        SettingsPlugin,
    ))
    .run();
}
