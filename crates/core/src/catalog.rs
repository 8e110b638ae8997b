//! The read-only game catalog.

use std::{collections::HashMap, fmt, fs, path::Path, sync::Arc};

use tracing::{debug, info};

use crate::{error::CatalogError, models::GameRecord};

/// Dataset compiled into the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../data/games.json");

/// Where a catalog's records came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The dataset compiled into the binary.
    Bundled,
    /// A JSON file loaded at startup.
    File(std::path::PathBuf),
    /// Records handed over directly, mostly by tests.
    Inline,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled dataset"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline => write!(f, "inline records"),
        }
    }
}

/// Immutable list of game records, cheap to clone and share between tasks.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Arc<[GameRecord]>,
    source: CatalogSource,
}

impl Catalog {
    /// Parse the bundled dataset.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::parse(BUNDLED_CATALOG, CatalogSource::Bundled)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, CatalogSource::File(path.to_path_buf()))
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self, CatalogError> {
        Self::parse(contents, CatalogSource::Inline)
    }

    /// Build a catalog from records already in memory.
    pub fn from_records(records: Vec<GameRecord>) -> Result<Self, CatalogError> {
        Self::validated(records, CatalogSource::Inline)
    }

    fn parse(contents: &str, source: CatalogSource) -> Result<Self, CatalogError> {
        let records: Vec<GameRecord> = serde_json::from_str(contents)?;
        Self::validated(records, source)
    }

    fn validated(records: Vec<GameRecord>, source: CatalogSource) -> Result<Self, CatalogError> {
        let mut seen: HashMap<u32, usize> = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if let Some(&first) = seen.get(&record.id) {
                return Err(CatalogError::DuplicateId {
                    id: record.id,
                    first: records[first].title.clone(),
                    second: record.title.clone(),
                });
            }
            seen.insert(record.id, idx);
        }

        let malformed = records
            .iter()
            .filter(|record| record.rating_value().is_nan())
            .count();
        if malformed > 0 {
            debug!(malformed, %source, "catalog contains unparseable ratings");
        }
        info!(total = records.len(), %source, "Catalog loaded");

        Ok(Self {
            records: records.into(),
            source,
        })
    }

    /// All records in catalog order.
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// Record at the given catalog position.
    pub fn get(&self, index: usize) -> Option<&GameRecord> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Origin of the records.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn bundled_dataset_parses() -> Result<()> {
        let catalog = Catalog::bundled()?;
        assert!(!catalog.is_empty());
        assert_eq!(catalog.source(), &CatalogSource::Bundled);
        assert!(catalog
            .records()
            .iter()
            .all(|game| !game.title.is_empty() && !game.platform.is_empty()));
        Ok(())
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("games.json");
        let records = vec![
            record(7, "Seven", "3.5", &["PC"], true, &["ENG"]),
            record(8, "Eight", "1.0", &["Xbox"], false, &["RUS"]),
        ];
        fs::write(&path, serde_json::to_string(&records)?)?;

        let catalog = Catalog::load(&path)?;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).map(|game| game.id), Some(8));
        assert_eq!(catalog.source(), &CatalogSource::File(path));
        Ok(())
    }

    #[test]
    fn missing_optional_fields_default() -> Result<()> {
        let catalog = Catalog::from_json_str(
            r#"[{
                "id": 1, "title": "T", "thumbnail": "", "short_description": "",
                "genre": "G", "platform": ["PC"], "publisher": "P", "developer": "D",
                "release_date": "2020-01-01", "freetogame_profile_url": "",
                "rating": "3.1", "multiplayer": false, "languages": []
            }]"#,
        )?;
        let game = catalog.get(0).expect("record");
        assert!(game.game_url.is_empty());
        assert!(game.players.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_duplicate_ids() {
        let records = vec![
            record(1, "First", "3.5", &["PC"], true, &[]),
            record(1, "Second", "2.5", &["PC"], true, &[]),
        ];
        let err = Catalog::from_records(records).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn rejects_malformed_json_and_missing_files() {
        assert!(matches!(
            Catalog::from_json_str("{\"id\": 1}"),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            Catalog::load("/definitely/not/here.json"),
            Err(CatalogError::Read { .. })
        ));
    }

    #[test]
    fn empty_catalog_is_allowed() -> Result<()> {
        let catalog = Catalog::from_json_str("[]")?;
        assert!(catalog.is_empty());
        Ok(())
    }

    #[test]
    fn clones_share_records() -> Result<()> {
        let catalog = Catalog::bundled()?;
        let clone = catalog.clone();
        assert!(std::ptr::eq(catalog.records(), clone.records()));
        Ok(())
    }
}
