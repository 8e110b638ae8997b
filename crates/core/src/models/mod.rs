//! Shared domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry of the game catalog, as shipped in the bundled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Numeric identifier, unique within a catalog.
    pub id: u32,
    /// Human-readable game title.
    pub title: String,
    /// Cover image URL.
    pub thumbnail: String,
    /// One-line blurb.
    pub short_description: String,
    /// Link to the game itself.
    #[serde(default)]
    pub game_url: String,
    /// Genre label (e.g. `Shooter`).
    pub genre: String,
    /// Platforms the game runs on (`PC`, `PlayStation`, `Web browser`, `Xbox`).
    pub platform: Vec<String>,
    /// Publisher credit.
    pub publisher: String,
    /// Developer credit.
    pub developer: String,
    /// Release date as written in the dataset (`YYYY-MM-DD`).
    pub release_date: String,
    /// External profile page.
    pub freetogame_profile_url: String,
    /// Decimal rating stored as text.
    pub rating: String,
    /// Whether the game supports multiplayer.
    pub multiplayer: bool,
    /// Free-form player count description.
    #[serde(default)]
    pub players: String,
    /// Supported language codes (e.g. `ENG`, `RUS`).
    pub languages: Vec<String>,
}

impl GameRecord {
    /// Parsed rating. The longest leading decimal prefix is used (`"4.5/5"`
    /// reads as `4.5`); text without one yields `NaN`, which fails every
    /// comparison.
    pub fn rating_value(&self) -> f64 {
        parse_leading_float(&self.rating)
    }

    /// Exact, case-sensitive platform membership.
    pub fn has_platform(&self, name: &str) -> bool {
        self.platform.iter().any(|platform| platform == name)
    }

    /// Exact, case-sensitive language membership.
    pub fn has_language(&self, code: &str) -> bool {
        self.languages.iter().any(|language| language == code)
    }

    /// Release date, if the dataset value is a valid `YYYY-MM-DD` date.
    pub fn release_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.release_date.trim(), "%Y-%m-%d").ok()
    }

    /// Platforms joined for table display.
    pub fn platform_label(&self) -> String {
        self.platform.join(", ")
    }

    /// Languages joined for table display.
    pub fn languages_label(&self) -> String {
        self.languages.join(", ")
    }
}

fn parse_leading_float(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut idx: usize| {
        while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
            idx += 1;
        }
        idx
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || has_digits {
            has_digits |= frac_end > end + 1;
            end = frac_end;
        }
    }
    if !has_digits {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text.get(..end)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
