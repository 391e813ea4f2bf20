use advisor_common::mcp_api::{FilterOptionsResponse, SchemeDetail, SubmitFiltersParams};

/// Attribute value meaning "applies regardless of the user's criterion".
pub const WILDCARD: &str = "All";

/// One row of the scheme dataset. Absent cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemeRecord {
    pub name: String,
    pub category: String,
    pub eligibility: String,
    pub benefits: String,
    pub documents_required: String,
    pub application_process: String,
    pub details: String,
    pub gender: String,
    pub caste: String,
    pub residency: String,
    pub differently_abled: String,
    pub student: String,
}

impl SchemeRecord {
    /// Eligibility attributes in the same order as [`Criteria::values`].
    pub fn eligibility_attributes(&self) -> [&str; 6] {
        [
            self.gender.as_str(),
            self.caste.as_str(),
            self.residency.as_str(),
            self.differently_abled.as_str(),
            self.student.as_str(),
            self.category.as_str(),
        ]
    }

    pub fn to_detail(&self) -> SchemeDetail {
        SchemeDetail {
            name: self.name.clone(),
            category: self.category.clone(),
            eligibility: self.eligibility.clone(),
            benefits: self.benefits.clone(),
            documents_required: self.documents_required.clone(),
            application_process: self.application_process.clone(),
            details: self.details.clone(),
        }
    }
}

/// The six user-selected filter values, one per eligibility attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub gender: String,
    pub caste: String,
    pub residency: String,
    pub differently_abled: String,
    pub student: String,
    pub scheme_category: String,
}

impl Criteria {
    /// Criterion values in eligibility-attribute order.
    pub fn values(&self) -> [&str; 6] {
        [
            self.gender.as_str(),
            self.caste.as_str(),
            self.residency.as_str(),
            self.differently_abled.as_str(),
            self.student.as_str(),
            self.scheme_category.as_str(),
        ]
    }
}

/// Choices offered for each criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub gender: Vec<String>,
    pub caste: Vec<String>,
    pub residency: Vec<String>,
    pub differently_abled: Vec<String>,
    pub student: Vec<String>,
    pub scheme_category: Vec<String>,
}

impl From<FilterOptions> for FilterOptionsResponse {
    fn from(o: FilterOptions) -> Self {
        Self {
            gender: o.gender,
            caste: o.caste,
            residency: o.residency,
            differently_abled: o.differently_abled,
            student: o.student,
            scheme_category: o.scheme_category,
        }
    }
}

impl From<SubmitFiltersParams> for Criteria {
    fn from(p: SubmitFiltersParams) -> Self {
        Self {
            gender: p.gender,
            caste: p.caste,
            residency: p.residency,
            differently_abled: p.differently_abled,
            student: p.student,
            scheme_category: p.scheme_category,
        }
    }
}
