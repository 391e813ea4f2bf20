/// Loads the scheme CSV into an immutable, in-memory dataset.
///
/// Required columns are resolved by header name up front; a file missing any of them
/// is rejected at load time rather than at filter time.
use std::collections::BTreeSet;
use std::path::Path;

use advisor_common::table::CsvTable;
use tracing::info;

use crate::error::AppError;
use crate::filter::filter_schemes;
use crate::model::{Criteria, FilterOptions, SchemeRecord};

pub const COL_NAME: &str = "Scheme Name";
pub const COL_CATEGORY: &str = "Scheme Category";
pub const COL_GENDER: &str = "Gender";
pub const COL_CASTE: &str = "Caste";
pub const COL_RESIDENCY: &str = "Residency";
pub const COL_DIFFERENTLY_ABLED: &str = "Differently Abled";
pub const COL_STUDENT: &str = "Student";
pub const COL_ELIGIBILITY: &str = "Eligibility";
pub const COL_BENEFITS: &str = "Scheme Benefits";
pub const COL_DOCUMENTS: &str = "Documents Required";
pub const COL_APPLICATION: &str = "Application Process";
pub const COL_DETAILS: &str = "Scheme Details";

const GENDER_OPTIONS: [&str; 4] = ["Male", "Female", "Transgender", "All"];
const RESIDENCY_OPTIONS: [&str; 3] = ["Rural", "Urban", "Both"];
const YES_NO_OPTIONS: [&str; 2] = ["Yes", "No"];

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SchemeRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SchemeRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let table = CsvTable::open(path)?;
        let dataset = Self::from_table(&table)?;
        info!(path = %path.display(), schemes = dataset.len(), "scheme dataset loaded");
        Ok(dataset)
    }

    fn from_table(table: &CsvTable) -> Result<Self, AppError> {
        let name = table.column(COL_NAME)?;
        let category = table.column(COL_CATEGORY)?;
        let gender = table.column(COL_GENDER)?;
        let caste = table.column(COL_CASTE)?;
        let residency = table.column(COL_RESIDENCY)?;
        let differently_abled = table.column(COL_DIFFERENTLY_ABLED)?;
        let student = table.column(COL_STUDENT)?;
        let eligibility = table.column(COL_ELIGIBILITY)?;
        let benefits = table.column(COL_BENEFITS)?;
        let documents_required = table.column(COL_DOCUMENTS)?;
        let application_process = table.column(COL_APPLICATION)?;
        let details = table.column(COL_DETAILS)?;

        let records = table
            .rows()
            .map(|row| SchemeRecord {
                name: row.cell(name).to_string(),
                category: row.cell(category).to_string(),
                eligibility: row.cell(eligibility).to_string(),
                benefits: row.cell(benefits).to_string(),
                documents_required: row.cell(documents_required).to_string(),
                application_process: row.cell(application_process).to_string(),
                details: row.cell(details).to_string(),
                gender: row.cell(gender).to_string(),
                caste: row.cell(caste).to_string(),
                residency: row.cell(residency).to_string(),
                differently_abled: row.cell(differently_abled).to_string(),
                student: row.cell(student).to_string(),
            })
            .collect();

        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[SchemeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, criteria: &Criteria) -> Vec<&SchemeRecord> {
        filter_schemes(self.records(), criteria)
    }

    /// Selection lists for the six criteria. Caste and category come from the data.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            gender: owned(&GENDER_OPTIONS),
            caste: self.distinct_sorted(|r| &r.caste),
            residency: owned(&RESIDENCY_OPTIONS),
            differently_abled: owned(&YES_NO_OPTIONS),
            student: owned(&YES_NO_OPTIONS),
            scheme_category: self.distinct_sorted(|r| &r.category),
        }
    }

    fn distinct_sorted<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&SchemeRecord) -> &String,
    {
        self.records
            .iter()
            .map(field)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
