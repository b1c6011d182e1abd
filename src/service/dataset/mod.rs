//! Read-only reference dataset loaded once at startup.
//!
//! The dataset is a delimited file with a header row and at least a brand
//! column.  It is serialized to plain text once, and that text is included
//! verbatim in every prompt.  The brand filter backs the read-only list
//! control on the web form.

use std::{ops::Deref, path::Path, sync::Arc};

use tracing::{info, instrument};

use crate::base::types::{RelayError, Res};

/// Snapshot of the dataset file.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    inner: Arc<DatasetInner>,
}

#[derive(Debug)]
pub struct DatasetInner {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    brand_index: usize,
    serialized: String,
}

impl Deref for DatasetSnapshot {
    type Target = DatasetInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DatasetSnapshot {
    /// Load the dataset from `path`, locating `brand_column` case-insensitively.
    ///
    /// Any failure (missing file, malformed rows, no brand column) is a
    /// [`RelayError::DatasetUnavailable`].
    #[instrument(name = "DatasetSnapshot::load", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path, brand_column: &str) -> Result<Self, RelayError> {
        let unavailable = |reason: String| RelayError::DatasetUnavailable {
            path: path.display().to_string(),
            reason,
        };

        let file = std::fs::File::open(path).map_err(|err| unavailable(err.to_string()))?;

        let snapshot = Self::from_reader(file, brand_column).map_err(|err| unavailable(format!("{err:#}")))?;

        info!("Loaded dataset with {} rows and {} columns.", snapshot.rows.len(), snapshot.headers.len());

        Ok(snapshot)
    }

    /// Parse a dataset from any reader.
    pub fn from_reader<R: std::io::Read>(reader: R, brand_column: &str) -> Res<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect::<Vec<_>>();

        let brand_index = headers
            .iter()
            .position(|h| eq_ignoring_case(h, brand_column))
            .ok_or_else(|| anyhow::anyhow!("no `{brand_column}` column in header ({})", headers.join(", ")))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let serialized = serialize(&headers, &rows)?;

        Ok(Self {
            inner: Arc::new(DatasetInner {
                headers,
                rows,
                brand_index,
                serialized,
            }),
        })
    }
}

impl DatasetInner {
    /// The plain-text serialization included in prompts.
    pub fn serialized(&self) -> &str {
        &self.serialized
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct brand values, sorted.
    pub fn brands(&self) -> Vec<&str> {
        let mut brands = self.rows.iter().map(|row| row[self.brand_index].as_str()).filter(|b| !b.is_empty()).collect::<Vec<_>>();

        brands.sort_unstable();
        brands.dedup();

        brands
    }

    /// Rows whose brand matches `brand`, ignoring case.
    pub fn filter_by_brand(&self, brand: &str) -> Vec<&[String]> {
        self.rows.iter().filter(|row| eq_ignoring_case(&row[self.brand_index], brand.trim())).map(Vec::as_slice).collect()
    }
}

/// Unicode-aware case-insensitive comparison, so `Škoda` matches `škoda`.
pub fn eq_ignoring_case(left: &str, right: &str) -> bool {
    left.chars().flat_map(char::to_lowercase).eq(right.chars().flat_map(char::to_lowercase))
}

/// Render the header and rows back to comma-delimited text.
fn serialize(headers: &[String], rows: &[Vec<String>]) -> Res<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|err| anyhow::anyhow!("Failed to flush dataset serialization: {}", err.error()))?;

    Ok(String::from_utf8(bytes)?)
}
