//! The filter engine: a pure predicate over catalog records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::GameRecord;

/// Ratings at or above this value belong to the highest tier.
pub const RATING_THRESHOLD: f64 = 3.0;

/// Language code tested by the "localized only" checkbox unless configured otherwise.
pub const DEFAULT_LOCALIZED_LANGUAGE: &str = "RUS";

/// Binary split of the catalog by rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTier {
    /// Rating >= 3.0.
    #[default]
    Highest,
    /// Rating < 3.0.
    Lowest,
}

impl RatingTier {
    /// Selector order.
    pub const ALL: [RatingTier; 2] = [RatingTier::Highest, RatingTier::Lowest];

    /// Whether a parsed rating falls in this tier. `NaN` is in neither.
    pub fn admits(self, rating: f64) -> bool {
        match self {
            RatingTier::Highest => rating >= RATING_THRESHOLD,
            RatingTier::Lowest => rating < RATING_THRESHOLD,
        }
    }

    /// Next option in selector order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            RatingTier::Highest => RatingTier::Lowest,
            RatingTier::Lowest => RatingTier::Highest,
        }
    }

    /// Previous option in selector order, wrapping around.
    pub fn previous(self) -> Self {
        self.next()
    }
}

/// Platform selector value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformFilter {
    /// No platform restriction.
    #[default]
    All,
    /// `PC`
    Pc,
    /// `PlayStation`
    PlayStation,
    /// `Web browser`
    WebBrowser,
    /// `Xbox`
    Xbox,
}

impl PlatformFilter {
    /// Selector order.
    pub const ALL: [PlatformFilter; 5] = [
        PlatformFilter::All,
        PlatformFilter::Pc,
        PlatformFilter::PlayStation,
        PlatformFilter::WebBrowser,
        PlatformFilter::Xbox,
    ];

    /// Platform name as it appears in catalog records, `None` for [`PlatformFilter::All`].
    pub fn platform_name(self) -> Option<&'static str> {
        match self {
            PlatformFilter::All => None,
            PlatformFilter::Pc => Some("PC"),
            PlatformFilter::PlayStation => Some("PlayStation"),
            PlatformFilter::WebBrowser => Some("Web browser"),
            PlatformFilter::Xbox => Some("Xbox"),
        }
    }

    /// Whether a record passes this platform restriction.
    pub fn admits(self, game: &GameRecord) -> bool {
        self.platform_name()
            .map_or(true, |name| game.has_platform(name))
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0)
    }

    /// Next option in selector order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous option in selector order, wrapping around.
    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform_name().unwrap_or("all"))
    }
}

/// The full set of user-selected filter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Rating tier to keep.
    pub rating: RatingTier,
    /// Platform restriction.
    pub platform: PlatformFilter,
    /// Keep only records listing the localized language code.
    pub require_localized_language: bool,
    /// Keep only multiplayer records.
    pub require_multiplayer: bool,
}

impl FilterCriteria {
    /// Whether a single record passes every active predicate.
    pub fn matches(&self, game: &GameRecord, localized_language: &str) -> bool {
        if !self.rating.admits(game.rating_value()) {
            return false;
        }
        if !self.platform.admits(game) {
            return false;
        }
        if self.require_localized_language && !game.has_language(localized_language) {
            return false;
        }
        if self.require_multiplayer && !game.multiplayer {
            return false;
        }
        true
    }
}

/// Records matching `criteria`, in catalog order.
pub fn apply_filters<'a>(
    catalog: &'a [GameRecord],
    criteria: &FilterCriteria,
    localized_language: &str,
) -> Vec<&'a GameRecord> {
    catalog
        .iter()
        .filter(|game| criteria.matches(game, localized_language))
        .collect()
}

/// Catalog positions of the records matching `criteria`, ascending.
pub fn matching_indices(
    catalog: &[GameRecord],
    criteria: &FilterCriteria,
    localized_language: &str,
) -> Vec<usize> {
    catalog
        .iter()
        .enumerate()
        .filter(|(_, game)| criteria.matches(game, localized_language))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{record, scenario_catalog};

    fn titles(games: &[&GameRecord]) -> Vec<String> {
        games.iter().map(|game| game.title.clone()).collect()
    }

    #[test]
    fn highest_tier_without_other_filters() {
        let catalog = scenario_catalog();
        let result = apply_filters(&catalog, &FilterCriteria::default(), DEFAULT_LOCALIZED_LANGUAGE);
        assert_eq!(titles(&result), vec!["A"]);
    }

    #[test]
    fn lowest_tier_with_localized_language() {
        let catalog = scenario_catalog();
        let criteria = FilterCriteria {
            rating: RatingTier::Lowest,
            require_localized_language: true,
            ..FilterCriteria::default()
        };
        let result = apply_filters(&catalog, &criteria, DEFAULT_LOCALIZED_LANGUAGE);
        assert_eq!(titles(&result), vec!["B"]);
    }

    #[test]
    fn unmatched_platform_yields_empty_result() {
        let catalog = scenario_catalog();
        for rating in RatingTier::ALL {
            let criteria = FilterCriteria {
                rating,
                platform: PlatformFilter::PlayStation,
                ..FilterCriteria::default()
            };
            assert!(apply_filters(&catalog, &criteria, DEFAULT_LOCALIZED_LANGUAGE).is_empty());
        }
    }

    #[test]
    fn threshold_belongs_to_highest_tier() {
        let catalog = vec![record(1, "Edge", "3.0", &["PC"], false, &[])];
        let highest = FilterCriteria::default();
        let lowest = FilterCriteria {
            rating: RatingTier::Lowest,
            ..FilterCriteria::default()
        };
        assert_eq!(apply_filters(&catalog, &highest, "RUS").len(), 1);
        assert!(apply_filters(&catalog, &lowest, "RUS").is_empty());
    }

    #[test]
    fn unparseable_rating_is_in_neither_tier() {
        let catalog = vec![record(1, "Unrated", "N/A", &["PC"], true, &["RUS"])];
        for rating in RatingTier::ALL {
            let criteria = FilterCriteria {
                rating,
                ..FilterCriteria::default()
            };
            assert!(apply_filters(&catalog, &criteria, "RUS").is_empty());
        }
    }

    #[test]
    fn platform_match_is_exact() {
        let catalog = vec![
            record(1, "Browser", "4.0", &["Web browser"], false, &[]),
            record(2, "Lowercase", "4.0", &["web browser"], false, &[]),
            record(3, "Pc", "4.0", &["PC", "Xbox"], false, &[]),
        ];
        let criteria = FilterCriteria {
            platform: PlatformFilter::WebBrowser,
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&apply_filters(&catalog, &criteria, "RUS")), vec!["Browser"]);

        let criteria = FilterCriteria {
            platform: PlatformFilter::Xbox,
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&apply_filters(&catalog, &criteria, "RUS")), vec!["Pc"]);
    }

    #[test]
    fn localized_language_code_is_injected() {
        let catalog = vec![
            record(1, "Russian", "4.0", &["PC"], false, &["RUS"]),
            record(2, "German", "4.0", &["PC"], false, &["DEU"]),
        ];
        let criteria = FilterCriteria {
            require_localized_language: true,
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&apply_filters(&catalog, &criteria, "RUS")), vec!["Russian"]);
        assert_eq!(titles(&apply_filters(&catalog, &criteria, "DEU")), vec!["German"]);
    }

    #[test]
    fn multiplayer_requirement() {
        let catalog = vec![
            record(1, "Solo", "4.0", &["PC"], false, &[]),
            record(2, "Party", "4.0", &["PC"], true, &[]),
        ];
        let criteria = FilterCriteria {
            require_multiplayer: true,
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&apply_filters(&catalog, &criteria, "RUS")), vec!["Party"]);
    }

    #[test]
    fn indices_follow_catalog_order() {
        let catalog = vec![
            record(1, "Low", "1.0", &["PC"], false, &[]),
            record(2, "High", "4.0", &["PC"], false, &[]),
            record(3, "Mid", "3.2", &["PC"], false, &[]),
        ];
        assert_eq!(
            matching_indices(&catalog, &FilterCriteria::default(), "RUS"),
            vec![1, 2]
        );
    }

    #[test]
    fn selectors_cycle() {
        let mut platform = PlatformFilter::All;
        for _ in 0..PlatformFilter::ALL.len() {
            platform = platform.next();
        }
        assert_eq!(platform, PlatformFilter::All);
        assert_eq!(PlatformFilter::All.previous(), PlatformFilter::Xbox);
        assert_eq!(PlatformFilter::Xbox.next(), PlatformFilter::All);
        assert_eq!(RatingTier::Highest.next(), RatingTier::Lowest);
        assert_eq!(RatingTier::Lowest.previous(), RatingTier::Highest);
    }
}
