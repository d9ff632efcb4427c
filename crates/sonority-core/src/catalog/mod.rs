//! The in-memory song catalog.
//!
//! A [`Catalog`] is built once from a [`RawTable`] (usually read from CSV),
//! validated up front, and then shared read-only. Identity columns become
//! each row's title and artist; the recommendation features become its
//! [`FeatureVector`]; every other fully-numeric column is kept for
//! analysis. Row identifiers, album metadata and free text are dropped.

mod raw;

pub use raw::RawTable;

use std::fs::File;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{FeatureKey, FeatureVector};

pub const TITLE_COLUMN: &str = "track_name";
pub const ARTIST_COLUMN: &str = "track_artist";
pub const ALBUM_COLUMN: &str = "track_album_name";
pub const POPULARITY_COLUMN: &str = "popularity";

/// Columns that never reach the numeric matrix.
const DROPPED_COLUMNS: &[&str] = &[
    "id",
    "name",
    "album",
    "album_id",
    "artists",
    "artist_ids",
    "track_number",
    "disc_number",
    "explicit",
    "duration_ms",
    "time_signature",
    "year",
    "release_date",
    TITLE_COLUMN,
    ARTIST_COLUMN,
    ALBUM_COLUMN,
];

/// Every column a catalog source must provide, in reporting order.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    [TITLE_COLUMN, ARTIST_COLUMN, ALBUM_COLUMN, POPULARITY_COLUMN]
        .into_iter()
        .chain(FeatureKey::ALL.into_iter().map(FeatureKey::as_str))
}

/// One song in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub title: String,
    pub artist: String,
    pub popularity: Option<f64>,
    pub features: FeatureVector,
    /// Values aligned with [`Catalog::numeric_columns`].
    values: Vec<f64>,
}

impl CatalogRow {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        features: FeatureVector,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            popularity: None,
            features,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    /// This row's numeric values, aligned with the owning catalog's columns.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// The full, immutable song catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
    numeric_columns: Vec<String>,
}

impl Catalog {
    /// Validate and convert a raw table.
    ///
    /// # Errors
    ///
    /// `MissingRequiredColumns` when any required column is absent and
    /// `InvalidFeatureValue` when a feature cell is empty or non-numeric.
    pub fn load(raw: &RawTable) -> Result<Self> {
        let missing: Vec<String> = required_columns()
            .filter(|column| raw.column_index(column).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingRequiredColumns { columns: missing });
        }

        let title_idx = column_position(raw, TITLE_COLUMN)?;
        let artist_idx = column_position(raw, ARTIST_COLUMN)?;
        let popularity_idx = column_position(raw, POPULARITY_COLUMN)?;

        let mut feature_idx = [0usize; 8];
        for key in FeatureKey::ALL {
            feature_idx[key.index()] = column_position(raw, key.as_str())?;
        }

        // Feature cells are validated row by row so the error names the culprit.
        let mut features = Vec::with_capacity(raw.records.len());
        for row in 0..raw.records.len() {
            let mut values = [0.0; 8];
            for key in FeatureKey::ALL {
                let cell = raw.cell(row, feature_idx[key.index()]);
                values[key.index()] =
                    parse_finite(cell).ok_or_else(|| Error::InvalidFeatureValue {
                        row: row + 1,
                        column: key.as_str().to_string(),
                        value: cell.to_string(),
                    })?;
            }
            features.push(FeatureVector::new(values));
        }

        let mut numeric_columns = Vec::new();
        let mut numeric_idx = Vec::new();
        for (idx, name) in raw.headers.iter().enumerate() {
            if DROPPED_COLUMNS.contains(&name.as_str()) || numeric_columns.contains(name) {
                continue;
            }
            let all_numeric =
                (0..raw.records.len()).all(|row| parse_finite(raw.cell(row, idx)).is_some());
            if all_numeric {
                numeric_columns.push(name.clone());
                numeric_idx.push(idx);
            } else {
                log::debug!("Dropping non-numeric column '{}'", name);
            }
        }

        let rows = features
            .into_iter()
            .enumerate()
            .map(|(row, features)| CatalogRow {
                title: raw.cell(row, title_idx).to_string(),
                artist: raw.cell(row, artist_idx).to_string(),
                popularity: parse_finite(raw.cell(row, popularity_idx)),
                features,
                values: numeric_idx
                    .iter()
                    .map(|&idx| parse_finite(raw.cell(row, idx)).unwrap_or(0.0))
                    .collect(),
            })
            .collect();

        Ok(Self {
            rows,
            numeric_columns,
        })
    }

    /// Read and validate a CSV catalog file.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        log::info!("Loading catalog from {}", path.display());
        let file = File::open(path)?;
        let raw = RawTable::from_reader(file)?;
        let catalog = Self::load(&raw)?;
        log::info!(
            "Loaded {} songs with {} numeric columns",
            catalog.len(),
            catalog.numeric_columns.len()
        );
        Ok(catalog)
    }

    /// Build a catalog directly from rows.
    ///
    /// The numeric columns are the recommendation features, followed by
    /// `popularity` when every row carries one.
    #[must_use]
    pub fn from_rows(rows: Vec<CatalogRow>) -> Self {
        let with_popularity = !rows.is_empty() && rows.iter().all(|r| r.popularity.is_some());

        let mut numeric_columns: Vec<String> = FeatureKey::ALL
            .into_iter()
            .map(|key| key.as_str().to_string())
            .collect();
        if with_popularity {
            numeric_columns.push(POPULARITY_COLUMN.to_string());
        }

        let rows = rows
            .into_iter()
            .map(|mut row| {
                let mut values = row.features.as_array().to_vec();
                if let (true, Some(popularity)) = (with_popularity, row.popularity) {
                    values.push(popularity);
                }
                row.values = values;
                row
            })
            .collect();

        Self {
            rows,
            numeric_columns,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Names of the analysable numeric columns, in source order.
    #[must_use]
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.numeric_columns.iter().position(|c| c == name)
    }

    /// All values of one numeric column, in row order.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row.values[idx]).collect())
    }
}

fn column_position(raw: &RawTable, name: &str) -> Result<usize> {
    raw.column_index(name)
        .ok_or_else(|| Error::MissingRequiredColumns {
            columns: vec![name.to_string()],
        })
}

fn parse_finite(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
