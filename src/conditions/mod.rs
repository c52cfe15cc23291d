mod category;
mod fixed;
mod live;

use std::sync::Arc;

use bevy::prelude::*;
pub use category::ConditionCategory;
pub use fixed::StaticConditions;
pub use live::FetchError;
pub use live::LiveConditions;

use crate::config::WeatherConfig;
use crate::geo::Location;
use crate::locations::EARTH_LOCATIONS;
use crate::settings::GlobeMode;

pub struct ConditionsPlugin;

impl Plugin for ConditionsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, init_condition_providers);
    }
}

/// Where a condition came from, which decides how its value is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Live,
    Static,
    /// No data could be obtained for the location
    Fallback,
}

/// Current state of one location
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub value:    f32,
    pub category: ConditionCategory,
    pub kind:     ConditionKind,
    /// Wording the source used, kept for display even when the category is `Other`
    reported:     Option<String>,
}

/// Value carried by the fallback condition
pub const FALLBACK_VALUE: f32 = 0.0;

impl Condition {
    pub const fn live(value: f32, category: ConditionCategory) -> Self {
        Self {
            value,
            category,
            kind: ConditionKind::Live,
            reported: None,
        }
    }

    pub const fn fixed(value: f32, category: ConditionCategory) -> Self {
        Self {
            value,
            category,
            kind: ConditionKind::Static,
            reported: None,
        }
    }

    /// The documented fallback: sentinel value, clear sky, flagged as no data
    pub const fn fallback() -> Self {
        Self {
            value:    FALLBACK_VALUE,
            category: ConditionCategory::ClearSky,
            kind:     ConditionKind::Fallback,
            reported: None,
        }
    }

    /// Attaches the source's own description text
    pub fn described(mut self, text: &str) -> Self {
        let text = text.trim();
        self.reported = (!text.is_empty()).then(|| text.to_string());
        self
    }

    /// The source's wording when it gave one, otherwise the category's name
    pub fn description(&self) -> &str {
        self.reported
            .as_deref()
            .unwrap_or_else(|| self.category.description())
    }

    pub fn has_data(&self) -> bool { self.kind != ConditionKind::Fallback }

    /// Live readings keep one decimal, static table values are whole numbers.
    /// `None` for the fallback.
    pub fn format_value(&self, suffix: &str) -> Option<String> {
        match self.kind {
            ConditionKind::Live => Some(format!("{:.1}{suffix}", self.value)),
            ConditionKind::Static => Some(format!("{:.0}{suffix}", self.value)),
            ConditionKind::Fallback => None,
        }
    }
}

/// Source of conditions for one mode's locations. Implementations are called
/// from worker threads, one call per location per build pass, and never fail
/// past this boundary: `None` means no data.
pub trait ConditionProvider: Send + Sync + 'static {
    fn fetch(&self, location: &Location) -> Option<Condition>;

    /// Suffix printed after values from this source
    fn unit_suffix(&self) -> &'static str { "°" }
}

/// Resolves a location through `provider`, substituting the fallback for no data
pub fn resolve(provider: &dyn ConditionProvider, location: &Location) -> Condition {
    provider.fetch(location).unwrap_or_else(Condition::fallback)
}

/// The provider each mode reads from
#[derive(Resource, Clone)]
pub struct ConditionProviders {
    earth: Arc<dyn ConditionProvider>,
    moon:  Arc<dyn ConditionProvider>,
}

impl ConditionProviders {
    pub fn new(earth: Arc<dyn ConditionProvider>, moon: Arc<dyn ConditionProvider>) -> Self {
        Self { earth, moon }
    }

    pub fn for_mode(&self, mode: GlobeMode) -> Arc<dyn ConditionProvider> {
        match mode {
            GlobeMode::Earth => Arc::clone(&self.earth),
            GlobeMode::Moon => Arc::clone(&self.moon),
        }
    }
}

/// Earth reads the weather service, the Moon reads its static table. Skipped
/// when providers were inserted up front (tests, alternate sources).
fn init_condition_providers(
    mut commands: Commands,
    weather: Res<WeatherConfig>,
    existing: Option<Res<ConditionProviders>>,
) {
    if existing.is_some() {
        return;
    }
    commands.insert_resource(ConditionProviders::new(
        Arc::new(LiveConditions::new(weather.clone(), EARTH_LOCATIONS)),
        Arc::new(StaticConditions::moon()),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl ConditionProvider for Failing {
        fn fetch(&self, _location: &Location) -> Option<Condition> { None }
    }

    #[test]
    fn value_formatting_depends_on_source() {
        let live = Condition::live(21.34, ConditionCategory::ClearSky);
        assert_eq!(live.format_value("°").as_deref(), Some("21.3°"));

        let fixed = Condition::fixed(-173.0, ConditionCategory::ClearSky);
        assert_eq!(fixed.format_value("°").as_deref(), Some("-173°"));

        assert_eq!(Condition::fallback().format_value("°"), None);
    }

    #[test]
    fn reported_wording_wins_over_the_category_name() {
        let unmapped = Condition::live(12.0, ConditionCategory::from_description("light rain"))
            .described(" light rain ");
        assert_eq!(unmapped.category, ConditionCategory::Other);
        assert_eq!(unmapped.description(), "light rain");

        let plain = Condition::live(12.0, ConditionCategory::Mist);
        assert_eq!(plain.description(), "mist");
        assert_eq!(plain.described("  ").description(), "mist");
    }

    #[test]
    fn failing_provider_resolves_to_fallback() {
        let location = EARTH_LOCATIONS[0];
        let condition = resolve(&Failing, &location);
        assert_eq!(condition, Condition::fallback());
        assert!(!condition.has_data());
        assert_eq!(condition.category, ConditionCategory::ClearSky);
    }

    #[test]
    fn providers_are_selected_by_mode() {
        let providers = ConditionProviders::new(Arc::new(Failing), Arc::new(StaticConditions::moon()));
        let moon_site = GlobeMode::Moon.locations()[0];
        assert!(providers.for_mode(GlobeMode::Moon).fetch(&moon_site).is_some());
        assert!(providers.for_mode(GlobeMode::Earth).fetch(&moon_site).is_none());
    }
}
