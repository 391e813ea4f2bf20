/// Header-indexed CSV tables.
///
/// Cells are addressed by column name rather than position, so column order in the
/// source file does not matter and extra columns are ignored. Missing cells (short rows)
/// read as the empty string.
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CommonError;

pub struct CsvTable {
    columns: HashMap<String, usize>,
    rows: Vec<csv::StringRecord>,
}

impl CsvTable {
    pub fn open(path: &Path) -> Result<Self, CommonError> {
        let file = File::open(path).map_err(|source| CommonError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CommonError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect::<HashMap<_, _>>();

        let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column name to its position, failing if the header row lacks it.
    pub fn column(&self, name: &str) -> Result<usize, CommonError> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| CommonError::MissingColumn(name.to_string()))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|record| Row { record })
    }
}

#[derive(Clone, Copy)]
pub struct Row<'a> {
    record: &'a csv::StringRecord,
}

impl<'a> Row<'a> {
    pub fn cell(&self, column: usize) -> &'a str {
        self.record.get(column).unwrap_or("")
    }
}
