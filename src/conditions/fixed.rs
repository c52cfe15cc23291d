use std::collections::HashMap;

use super::Condition;
use super::ConditionCategory;
use super::ConditionProvider;
use crate::geo::Location;

/// Conditions from an in-memory table keyed by location name
#[derive(Debug, Clone, Default)]
pub struct StaticConditions {
    table: HashMap<&'static str, Condition>,
}

impl StaticConditions {
    pub fn new(entries: impl IntoIterator<Item = (&'static str, Condition)>) -> Self {
        Self {
            table: entries.into_iter().collect(),
        }
    }

    /// Daytime surface temperatures at the Apollo sites
    pub fn moon() -> Self {
        Self::new([
            ("apollo11", Condition::fixed(107.0, ConditionCategory::ClearSky)),
            ("apollo12", Condition::fixed(94.0, ConditionCategory::ClearSky)),
            ("apollo14", Condition::fixed(-153.0, ConditionCategory::ClearSky)),
            ("apollo15", Condition::fixed(86.0, ConditionCategory::ClearSky)),
            ("apollo16", Condition::fixed(-173.0, ConditionCategory::ClearSky)),
            ("apollo17", Condition::fixed(102.0, ConditionCategory::ClearSky)),
        ])
    }

    pub fn get(&self, key: &str) -> Condition {
        self.table.get(key).cloned().unwrap_or_else(Condition::fallback)
    }
}

impl ConditionProvider for StaticConditions {
    fn fetch(&self, location: &Location) -> Option<Condition> { Some(self.get(location.key)) }
}
