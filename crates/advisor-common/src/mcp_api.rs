use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SubmitFiltersParams {
    /// Gender, e.g. "Female". An empty value matches every scheme.
    pub gender: String,
    /// Caste, e.g. "OBC".
    pub caste: String,
    /// Residency, e.g. "Rural", "Urban" or "Both".
    pub residency: String,
    /// "Yes" or "No".
    pub differently_abled: String,
    /// "Yes" or "No".
    pub student: String,
    /// Scheme category, e.g. "Education".
    pub scheme_category: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectSchemeParams {
    /// Exact scheme name as returned by `submit_filters`.
    pub scheme_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AskQuestionParams {
    /// Free-text question about the currently selected scheme.
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FilterOptionsResponse {
    pub gender: Vec<String>,
    pub caste: Vec<String>,
    pub residency: Vec<String>,
    pub differently_abled: Vec<String>,
    pub student: Vec<String>,
    pub scheme_category: Vec<String>,
}

/// Interaction phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NoSelection,
    Filtered,
    SchemeSelected,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubmitFiltersResponse {
    pub phase: SessionPhase,
    pub found: usize,
    /// Distinct scheme names in dataset order, for `select_scheme`.
    pub scheme_names: Vec<String>,
    pub message: String,
    /// True when no scheme matched and the selection was cleared.
    pub warning: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemeDetail {
    pub name: String,
    pub category: String,
    pub eligibility: String,
    pub benefits: String,
    pub documents_required: String,
    pub application_process: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemeDetailResponse {
    pub scheme: SchemeDetail,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnswerResponse {
    pub answer: Option<String>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionResponse {
    pub phase: SessionPhase,
    pub scheme_names: Vec<String>,
    pub selected: Option<SchemeDetail>,
    pub summary: Option<String>,
}
