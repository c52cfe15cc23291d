use strum::EnumIter;

/// Closed vocabulary of weather descriptions that have their own icon.
/// Anything the service reports outside this set lands in `Other` and shares
/// the default icon.
#[derive(Debug, EnumIter, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    #[default]
    ClearSky,
    FewClouds,
    ScatteredClouds,
    OvercastClouds,
    BrokenClouds,
    ShowerRain,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Other,
}

/// Icon for `Other`, also the fallback for any unmapped description
pub const DEFAULT_ICON: &str = "clear.png";

impl ConditionCategory {
    /// Maps a free-text description (any case, surrounding whitespace ignored)
    pub fn from_description(description: &str) -> Self {
        match description.trim().to_lowercase().as_str() {
            "clear sky" => Self::ClearSky,
            "few clouds" => Self::FewClouds,
            "scattered clouds" => Self::ScatteredClouds,
            "overcast clouds" => Self::OvercastClouds,
            "broken clouds" => Self::BrokenClouds,
            "shower rain" => Self::ShowerRain,
            "rain" => Self::Rain,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" => Self::Mist,
            _ => Self::Other,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::ClearSky => "clear sky",
            Self::FewClouds => "few clouds",
            Self::ScatteredClouds => "scattered clouds",
            Self::OvercastClouds => "overcast clouds",
            Self::BrokenClouds => "broken clouds",
            Self::ShowerRain => "shower rain",
            Self::Rain => "rain",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Mist => "mist",
            Self::Other => "unknown",
        }
    }

    /// File name of the icon under `<asset_root>/images`
    pub const fn icon_file(self) -> &'static str {
        match self {
            Self::ClearSky | Self::Other => DEFAULT_ICON,
            Self::FewClouds => "cloudy.png",
            Self::ScatteredClouds => "scattered.png",
            Self::OvercastClouds => "overcastclouds.png",
            Self::BrokenClouds => "broken.png",
            Self::ShowerRain | Self::Rain => "rain.png",
            Self::Thunderstorm => "storm.png",
            Self::Snow => "snow.png",
            Self::Mist => "mist.png",
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn descriptions_round_trip_except_other() {
        for category in ConditionCategory::iter().filter(|c| *c != ConditionCategory::Other) {
            assert_eq!(ConditionCategory::from_description(category.description()), category);
        }
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        assert_eq!(
            ConditionCategory::from_description("  Overcast Clouds "),
            ConditionCategory::OvercastClouds
        );
        assert_eq!(ConditionCategory::from_description("RAIN"), ConditionCategory::Rain);
    }

    #[test]
    fn unmapped_descriptions_use_default_icon() {
        let category = ConditionCategory::from_description("light intensity drizzle");
        assert_eq!(category, ConditionCategory::Other);
        assert_eq!(category.icon_file(), DEFAULT_ICON);
    }

    #[test]
    fn rain_variants_share_an_icon() {
        assert_eq!(ConditionCategory::ShowerRain.icon_file(), ConditionCategory::Rain.icon_file());
    }
}
