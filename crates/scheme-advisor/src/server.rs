/// MCP server implementation for the government scheme advisor.
///
/// Exposes five tools:
/// - `list_filter_options`: Choices for the six eligibility criteria
/// - `submit_filters`: Filter the dataset and start a fresh result set
/// - `select_scheme`: Pick a scheme from the results and summarize it
/// - `ask_question`: Ask a free-text question about the selected scheme
/// - `get_session`: Current phase, results, selection and summary
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::Mutex;
use tracing::error;

use advisor_common::mcp_api::{
    AnswerResponse, AskQuestionParams, FilterOptionsResponse, SchemeDetailResponse,
    SelectSchemeParams, SessionResponse, SubmitFiltersParams,
    SubmitFiltersResponse,
};

use crate::advisory::AdvisoryClient;
use crate::dataset::Dataset;
use crate::model::Criteria;
use crate::session::{AskOutcome, FilterOutcome, Session, NO_SELECTION_WARNING};

/// One interacting client. Clones share the dataset and advisor but not the session;
/// use [`SchemeAdvisorServer::fresh_session`] when a new client connects.
#[derive(Clone)]
pub struct SchemeAdvisorServer {
    dataset: Arc<Dataset>,
    advisor: Arc<AdvisoryClient>,
    session: Arc<Mutex<Session>>,
    tool_router: ToolRouter<SchemeAdvisorServer>,
}

impl SchemeAdvisorServer {
    pub fn new(dataset: Arc<Dataset>, advisor: Arc<AdvisoryClient>) -> Self {
        Self {
            dataset,
            advisor,
            session: Arc::new(Mutex::new(Session::new())),
            tool_router: Self::tool_router(),
        }
    }

    pub fn fresh_session(&self) -> Self {
        Self::new(Arc::clone(&self.dataset), Arc::clone(&self.advisor))
    }
}

#[tool_router]
impl SchemeAdvisorServer {
    #[tool(description = "List the allowed values for the six eligibility filters: gender, caste, residency, differently_abled, student and scheme_category.")]
    async fn list_filter_options(&self) -> Result<Json<FilterOptionsResponse>, String> {
        Ok(Json(self.dataset.filter_options().into()))
    }

    #[tool(description = "Filter government schemes by the six eligibility criteria. A scheme matches when each of its attributes contains the criterion (case-insensitive) or is 'All'. Replaces previous results and clears the selected scheme.")]
    async fn submit_filters(
        &self,
        Parameters(params): Parameters<SubmitFiltersParams>,
    ) -> Result<Json<SubmitFiltersResponse>, String> {
        let criteria = Criteria::from(params);
        let mut session = self.session.lock().await;
        let outcome = session.submit(&self.dataset, &criteria);

        let found = match outcome {
            FilterOutcome::NoMatch => 0,
            FilterOutcome::Found(n) => n,
        };
        Ok(Json(SubmitFiltersResponse {
            phase: session.phase(),
            found,
            scheme_names: session.scheme_names(),
            message: outcome.message(),
            warning: outcome == FilterOutcome::NoMatch,
        }))
    }

    #[tool(description = "Select one scheme from the latest submit_filters results. Returns its full details and an AI-generated summary.")]
    async fn select_scheme(
        &self,
        Parameters(params): Parameters<SelectSchemeParams>,
    ) -> Result<Json<SchemeDetailResponse>, String> {
        // Names are matched verbatim; padded names in the data stay selectable.
        let scheme_name = params.scheme_name;
        if scheme_name.trim().is_empty() {
            return Err("scheme_name must not be empty".to_string());
        }

        let mut session = self.session.lock().await;
        let scheme = session
            .select(&scheme_name, self.advisor.as_ref())
            .await
            .inspect_err(|e| error!(error = %e, scheme = %scheme_name, "select_scheme failed"))
            .map_err(|e| format!("select_scheme failed: {e}"))?
            .to_detail();

        Ok(Json(SchemeDetailResponse {
            scheme,
            summary: session.summary().unwrap_or_default().to_string(),
        }))
    }

    #[tool(description = "Ask a free-text question about the currently selected scheme. Returns a warning instead of an answer when no scheme is selected.")]
    async fn ask_question(
        &self,
        Parameters(params): Parameters<AskQuestionParams>,
    ) -> Result<Json<AnswerResponse>, String> {
        let session = self.session.lock().await;
        let outcome = session
            .ask(&params.question, self.advisor.as_ref())
            .await
            .inspect_err(|e| error!(error = %e, "ask_question failed"))
            .map_err(|e| format!("ask_question failed: {e}"))?;

        let response = match outcome {
            AskOutcome::Answer(answer) => AnswerResponse {
                answer: Some(answer),
                warning: None,
            },
            AskOutcome::NoSelection => AnswerResponse {
                answer: None,
                warning: Some(NO_SELECTION_WARNING.to_string()),
            },
        };
        Ok(Json(response))
    }

    #[tool(description = "Get the current session: phase, matching scheme names, selected scheme details and its summary.")]
    async fn get_session(&self) -> Result<Json<SessionResponse>, String> {
        let session = self.session.lock().await;
        Ok(Json(SessionResponse {
            phase: session.phase(),
            scheme_names: session.scheme_names(),
            selected: session.selected().map(|r| r.to_detail()),
            summary: session.summary().map(str::to_string),
        }))
    }
}

#[tool_handler]
impl ServerHandler for SchemeAdvisorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "scheme-advisor".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Government scheme advisor. Call list_filter_options to see valid criteria, \
submit_filters with all six criteria to find matching schemes, select_scheme to view one scheme \
with a summary, then ask_question for follow-ups about the selected scheme. get_session shows \
the current state."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_common::mcp_api::SessionPhase;
    use advisor_common::openai::{OpenAiClient, OpenAiClientConfig};

    use httpmock::prelude::*;
    use serde_json::json;

    use crate::model::SchemeRecord;

    fn scholarship(name: &str) -> SchemeRecord {
        SchemeRecord {
            name: name.to_string(),
            category: "Education".to_string(),
            gender: "All".to_string(),
            caste: "All".to_string(),
            residency: "Rural".to_string(),
            differently_abled: "No".to_string(),
            student: "No".to_string(),
            details: "scholarship details".to_string(),
            ..SchemeRecord::default()
        }
    }

    fn server_with(
        records: Vec<SchemeRecord>,
        base_url: impl Into<String>,
        api_key: Option<&str>,
    ) -> SchemeAdvisorServer {
        let config = OpenAiClientConfig::new(base_url, api_key.map(str::to_string), None, 1024);
        let openai = OpenAiClient::new(config).expect("client should build");
        SchemeAdvisorServer::new(
            Arc::new(Dataset::new(records)),
            Arc::new(AdvisoryClient::new(Arc::new(openai), "test-model")),
        )
    }

    fn server() -> SchemeAdvisorServer {
        server_with(vec![scholarship("Scholarship")], "http://127.0.0.1:9", None)
    }

    async fn summary_mock(server: &MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .body_includes("Context: scholarship details");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "Pays tuition."}}]
                }));
            })
            .await
    }

    fn params(residency: &str) -> SubmitFiltersParams {
        SubmitFiltersParams {
            gender: "Female".to_string(),
            caste: "OBC".to_string(),
            residency: residency.to_string(),
            differently_abled: "No".to_string(),
            student: "No".to_string(),
            scheme_category: "Education".to_string(),
        }
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = SchemeAdvisorServer::tool_router().list_all();
        for name in [
            "list_filter_options",
            "submit_filters",
            "select_scheme",
            "ask_question",
            "get_session",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[tokio::test]
    async fn submit_reports_matches_and_warnings() {
        let server = server();

        let Json(found) = server.submit_filters(Parameters(params("Rural"))).await.expect("submit");
        assert_eq!(found.phase, SessionPhase::Filtered);
        assert_eq!(found.found, 1);
        assert_eq!(found.scheme_names, vec!["Scholarship"]);
        assert!(!found.warning);

        let Json(empty) = server.submit_filters(Parameters(params("Urban"))).await.expect("submit");
        assert_eq!(empty.phase, SessionPhase::NoSelection);
        assert_eq!(empty.found, 0);
        assert!(empty.warning);
    }

    #[tokio::test]
    async fn question_without_selection_is_a_warning() {
        let server = server();
        let Json(resp) = server
            .ask_question(Parameters(AskQuestionParams {
                question: "Who can apply?".to_string(),
            }))
            .await
            .expect("ask_question should not fail");
        assert!(resp.answer.is_none());
        assert_eq!(resp.warning.as_deref(), Some(NO_SELECTION_WARNING));
    }

    #[tokio::test]
    async fn advisory_failure_is_a_tool_error_and_keeps_state() {
        let server = server();
        server.submit_filters(Parameters(params("Rural"))).await.expect("submit");

        // No API key configured, so the summary call fails before any request.
        let err = server
            .select_scheme(Parameters(SelectSchemeParams {
                scheme_name: "Scholarship".to_string(),
            }))
            .await
            .err()
            .expect("select should fail");
        assert!(err.contains("no API key configured"), "{err}");

        let Json(state) = server.get_session().await.expect("get_session");
        assert_eq!(state.phase, SessionPhase::Filtered);
        assert!(state.selected.is_none());
    }

    #[tokio::test]
    async fn fresh_session_does_not_share_state() {
        let first = server();
        first.submit_filters(Parameters(params("Rural"))).await.expect("submit");

        let second = first.fresh_session();
        let Json(state) = second.get_session().await.expect("get_session");
        assert_eq!(state.phase, SessionPhase::NoSelection);
        assert!(state.scheme_names.is_empty());
    }

    #[tokio::test]
    async fn filter_options_include_dataset_values() {
        let Json(options) = server().list_filter_options().await.expect("options");
        assert_eq!(options.caste, vec!["All"]);
        assert_eq!(options.scheme_category, vec!["Education"]);
        assert_eq!(options.differently_abled, vec!["Yes", "No"]);
    }

    #[tokio::test]
    async fn select_returns_details_and_generated_summary() {
        let upstream = MockServer::start_async().await;
        let mock = summary_mock(&upstream).await;
        let server = server_with(vec![scholarship("Scholarship")], upstream.base_url(), Some("k"));
        server.submit_filters(Parameters(params("Rural"))).await.expect("submit");

        let Json(resp) = server
            .select_scheme(Parameters(SelectSchemeParams {
                scheme_name: "Scholarship".to_string(),
            }))
            .await
            .expect("select should succeed");
        assert_eq!(resp.scheme.name, "Scholarship");
        assert_eq!(resp.scheme.details, "scholarship details");
        assert_eq!(resp.summary, "Pays tuition.");
        mock.assert_hits_async(1).await;

        let Json(state) = server.get_session().await.expect("get_session");
        assert_eq!(state.phase, SessionPhase::SchemeSelected);
        assert_eq!(state.summary.as_deref(), Some("Pays tuition."));
    }

    #[tokio::test]
    async fn padded_scheme_names_are_selectable_as_offered() {
        let upstream = MockServer::start_async().await;
        let mock = summary_mock(&upstream).await;
        let server = server_with(vec![scholarship("Scholarship ")], upstream.base_url(), Some("k"));

        let Json(found) = server.submit_filters(Parameters(params("Rural"))).await.expect("submit");
        assert_eq!(found.scheme_names, vec!["Scholarship "]);

        let offered = found.scheme_names[0].clone();
        let Json(resp) = server
            .select_scheme(Parameters(SelectSchemeParams { scheme_name: offered }))
            .await
            .expect("offered name should be selectable");
        assert_eq!(resp.scheme.name, "Scholarship ");
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn blank_scheme_name_is_rejected() {
        let server = server();
        server.submit_filters(Parameters(params("Rural"))).await.expect("submit");
        let err = server
            .select_scheme(Parameters(SelectSchemeParams {
                scheme_name: "   ".to_string(),
            }))
            .await
            .err()
            .expect("blank name should fail");
        assert_eq!(err, "scheme_name must not be empty");
    }
}
