//! Screen-space list of the active mode's locations and their latest readings.
//! It only listens: mode switches reset it to loading, finished marker passes
//! fill it in.

use bevy::prelude::*;

use crate::globe::ModeChanged;
use crate::marker::MarkerReading;
use crate::marker::MarkersBuilt;
use crate::schedule::GlobeSet;
use crate::settings::GlobeMode;
use crate::settings::RotationSettings;

const PANEL_MARGIN: f32 = 16.0;
const PANEL_FONT_SIZE: f32 = 18.0;

pub struct PanelPlugin;

impl Plugin for PanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocationPanel>()
            .add_systems(Startup, spawn_panel)
            .add_systems(
                Update,
                (track_mode_changes, track_built_markers, refresh_panel_text)
                    .chain()
                    .after(GlobeSet::Markers),
            );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    Loading,
    NoData,
    Reading { value: String, category: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub name:   &'static str,
    pub status: RowStatus,
}

impl PanelRow {
    fn line(&self) -> String {
        match &self.status {
            RowStatus::Loading => format!("{}  loading...", self.name),
            RowStatus::NoData => format!("{}  no data", self.name),
            RowStatus::Reading { value, category } => format!("{}  {value}  {category}", self.name),
        }
    }
}

impl From<&MarkerReading> for PanelRow {
    fn from(reading: &MarkerReading) -> Self {
        let status = match (&reading.value, &reading.category) {
            (Some(value), Some(category)) => RowStatus::Reading {
                value:    value.clone(),
                category: category.clone(),
            },
            _ => RowStatus::NoData,
        };
        Self {
            name: reading.name,
            status,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct LocationPanel {
    mode: GlobeMode,
    rows: Vec<PanelRow>,
}

impl LocationPanel {
    pub const fn mode(&self) -> GlobeMode { self.mode }

    pub fn rows(&self) -> &[PanelRow] { &self.rows }

    pub fn show_loading(&mut self, mode: GlobeMode) {
        self.mode = mode;
        self.rows = mode
            .locations()
            .iter()
            .map(|location| PanelRow {
                name:   location.name,
                status: RowStatus::Loading,
            })
            .collect();
    }

    /// Results for a mode other than the one shown are ignored
    pub fn show_readings(&mut self, mode: GlobeMode, readings: &[MarkerReading]) {
        if mode != self.mode {
            return;
        }
        self.rows = readings.iter().map(PanelRow::from).collect();
    }

    pub fn text(&self, settings: &RotationSettings) -> String {
        let rotation = if settings.auto_rotate() {
            format!("auto-rotate {:.1}", settings.speed())
        } else {
            "auto-rotate off".to_string()
        };
        let mut text = format!("{}  |  {rotation}\n", self.mode);
        for row in &self.rows {
            text.push('\n');
            text.push_str(&row.line());
        }
        text
    }
}

#[derive(Component, Debug)]
pub struct PanelText;

fn spawn_panel(mut commands: Commands) {
    commands.spawn((
        Name::new("Location Panel"),
        PanelText,
        Text::new(""),
        TextFont {
            font_size: PANEL_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(PANEL_MARGIN),
            top: Val::Px(PANEL_MARGIN),
            ..default()
        },
    ));
}

fn track_mode_changes(mut changes: MessageReader<ModeChanged>, mut panel: ResMut<LocationPanel>) {
    if let Some(change) = changes.read().last() {
        panel.show_loading(change.mode);
    }
}

fn track_built_markers(mut built: MessageReader<MarkersBuilt>, mut panel: ResMut<LocationPanel>) {
    for pass in built.read() {
        panel.show_readings(pass.mode, &pass.readings);
    }
}

fn refresh_panel_text(
    panel: Res<LocationPanel>,
    settings: Res<RotationSettings>,
    mut texts: Query<&mut Text, With<PanelText>>,
) {
    if !panel.is_changed() && !settings.is_changed() {
        return;
    }
    let text = panel.text(&settings);
    for mut panel_text in &mut texts {
        panel_text.0.clone_from(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(name: &'static str, value: Option<&str>, category: Option<&str>) -> MarkerReading {
        MarkerReading {
            name,
            value: value.map(str::to_string),
            category: category.map(str::to_string),
        }
    }

    fn panel_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_message::<ModeChanged>()
            .add_message::<MarkersBuilt>()
            .init_resource::<RotationSettings>()
            .add_plugins(PanelPlugin);
        app
    }

    fn panel_text(app: &mut App) -> String {
        let world = app.world_mut();
        world
            .query_filtered::<&Text, With<PanelText>>()
            .single(world)
            .unwrap()
            .0
            .clone()
    }

    #[test]
    fn mode_change_lists_every_location_as_loading() {
        let mut panel = LocationPanel::default();
        panel.show_loading(GlobeMode::Moon);
        assert_eq!(panel.rows().len(), GlobeMode::Moon.locations().len());
        assert!(panel.rows().iter().all(|row| row.status == RowStatus::Loading));
    }

    #[test]
    fn readings_replace_loading_rows() {
        let mut panel = LocationPanel::default();
        panel.show_loading(GlobeMode::Earth);
        panel.show_readings(
            GlobeMode::Earth,
            &[
                reading("Agay", Some("21.3°C"), Some("clear sky")),
                reading("Sydney", None, None),
            ],
        );
        let text = panel.text(&RotationSettings::default());
        assert!(text.contains("Agay  21.3°C  clear sky"));
        assert!(text.contains("Sydney  no data"));
        assert!(!text.contains("loading"));
    }

    #[test]
    fn unmapped_conditions_show_the_reported_wording() {
        let mut panel = LocationPanel::default();
        panel.show_loading(GlobeMode::Earth);
        panel.show_readings(GlobeMode::Earth, &[reading("Seoul", Some("8.2°C"), Some("light rain"))]);
        assert!(panel.text(&RotationSettings::default()).contains("Seoul  8.2°C  light rain"));
    }

    #[test]
    fn readings_for_another_mode_are_ignored() {
        let mut panel = LocationPanel::default();
        panel.show_loading(GlobeMode::Moon);
        panel.show_readings(GlobeMode::Earth, &[reading("Agay", Some("21.3°C"), Some("clear sky"))]);
        assert_eq!(panel.mode(), GlobeMode::Moon);
        assert!(panel.rows().iter().all(|row| row.status == RowStatus::Loading));
    }

    #[test]
    fn panel_follows_mode_changes_and_results() {
        let mut app = panel_app();
        app.update();

        app.world_mut().write_message(ModeChanged { mode: GlobeMode::Moon });
        app.update();
        let text = panel_text(&mut app);
        assert!(text.starts_with("Moon"));
        assert!(text.contains("Apollo 11  loading..."));

        app.world_mut().write_message(MarkersBuilt {
            mode:       GlobeMode::Moon,
            generation: 1,
            readings:   vec![reading("Apollo 11", Some("107°"), Some("clear sky"))],
        });
        app.update();
        assert!(panel_text(&mut app).contains("Apollo 11  107°  clear sky"));
    }

    #[test]
    fn rotation_state_is_shown() {
        let mut settings = RotationSettings::default();
        let panel = LocationPanel::default();
        assert!(panel.text(&settings).contains("auto-rotate 1.0"));
        settings.set_auto_rotate(false);
        assert!(panel.text(&settings).contains("auto-rotate off"));
    }
}
