use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{Res, types::MergedRecord};

/// Destination for a finished dataset.
#[async_trait(?Send)]
pub trait DatasetSink {
    /// Persists `rows` under `destination` and returns where they went.
    async fn write(&self, rows: &[MergedRecord], destination: &str) -> Res<PathBuf>;
}

/// Writes datasets as `<output_dir>/<destination>.csv`.
pub struct CsvDatasetManager {
    output_dir: PathBuf,
}

impl CsvDatasetManager {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", destination))
    }

    /// Renders rows as CSV with a header line, in row order.
    pub fn to_csv(rows: &[MergedRecord]) -> Res<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(MergedRecord::HEADERS)?;
        for row in rows {
            wtr.write_record(row.to_record())?;
        }

        Ok(wtr.into_inner().map_err(|e| e.to_string())?)
    }

    /// Reads an exported dataset back as plain string columns.
    pub async fn load(path: &Path) -> Res<DatasetTable> {
        let content = async_fs::read(path).await?;
        let mut rdr = csv::Reader::from_reader(content.as_slice());
        let headers = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(DatasetTable { headers, rows })
    }
}

#[async_trait(?Send)]
impl DatasetSink for CsvDatasetManager {
    async fn write(&self, rows: &[MergedRecord], destination: &str) -> Res<PathBuf> {
        let path = self.path_for(destination);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let bytes = Self::to_csv(rows)?;
        async_fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// An exported dataset loaded for display.
#[derive(Debug, Clone)]
pub struct DatasetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DatasetTable {
    pub fn value<'a>(&'a self, row: &'a [String], column: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
    }
}
