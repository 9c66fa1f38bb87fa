use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::dashboard::{Dashboard, LICENSE_TYPE_OPTIONS};
use crate::data::history::{append_score, load_history, HistoryError, ScoreEntry};
use crate::feedback::{acknowledge, FeedbackForm, MAX_RATING, REFERRAL_OPTIONS};
use crate::query::{QueryError, ValueCounts};
use crate::quiz::{score_quiz, QuizResult, APPLICATION_STEP_OPTIONS};
use crate::server::session::SessionContext;

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure of a POST submission: bad JSON, rejected input, or a server-side error.
#[derive(Debug)]
pub enum SubmitPayloadError {
    Parse(serde_json::Error),
    Validation(String),
    Api(ApiError),
}

impl fmt::Display for SubmitPayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SubmitPayloadError {}

impl From<ApiError> for SubmitPayloadError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

pub fn health_payload(dashboard: &Dashboard) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "dispensary-dashboard",
        "version": env!("CARGO_PKG_VERSION"),
        "source": dashboard.source_path(),
        "loaded_at": dashboard.loaded_at(),
        "rows": dashboard.registry().len(),
        "complete_rows": dashboard.cleaned().len(),
    }))?)
}

pub fn registry_payload(dashboard: &Dashboard) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(dashboard.registry())?)
}

pub fn active_payload(dashboard: &Dashboard) -> Result<String, ApiError> {
    let active = dashboard.active_listing()?;
    Ok(serde_json::to_string_pretty(&active)?)
}

pub fn license_types_payload() -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(
        &serde_json::json!({ "license_types": LICENSE_TYPE_OPTIONS }),
    )?)
}

pub fn lookup_payload(dashboard: &Dashboard, session: &SessionContext) -> Result<String, ApiError> {
    let view = dashboard.lookup(&session.license_type, &session.zip_code)?;
    tracing::debug!(
        license_type = %view.license_type,
        zip = %view.zip_code,
        matches = view.dispensaries.len(),
        "lookup"
    );
    Ok(serde_json::to_string_pretty(&view)?)
}

pub fn map_payload(dashboard: &Dashboard) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&dashboard.map_view()?)?)
}

#[derive(Debug, Serialize)]
struct ChartPayload<'a> {
    title: String,
    x_label: &'a str,
    y_label: String,
    #[serde(flatten)]
    counts: &'a ValueCounts,
}

fn chart_payload(counts: &ValueCounts) -> Result<String, ApiError> {
    let payload = ChartPayload {
        title: format!("Bar Plot of {}", counts.column),
        x_label: &counts.column,
        y_label: format!("Count of Each {}", counts.column),
        counts,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

pub fn license_status_chart_payload(dashboard: &Dashboard) -> Result<String, ApiError> {
    chart_payload(&dashboard.license_status_counts()?)
}

pub fn license_type_chart_payload(dashboard: &Dashboard) -> Result<String, ApiError> {
    chart_payload(&dashboard.license_type_counts()?)
}

pub fn equity_payload(dashboard: &Dashboard) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&dashboard.equity_view()?)?)
}

pub fn quiz_options_payload() -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(
        &serde_json::json!({ "application_steps": APPLICATION_STEP_OPTIONS }),
    )?)
}

pub fn history_payload(dashboard: &Dashboard) -> Result<String, ApiError> {
    let history = load_history(dashboard.history_path())?;
    Ok(serde_json::to_string_pretty(
        &serde_json::json!({ "history": history }),
    )?)
}

#[derive(Debug, Serialize)]
struct QuizResponse {
    status: &'static str,
    result: QuizResult,
    history: Vec<ScoreEntry>,
}

/// Score the submission, append it to the history file, and return the result with the
/// whole history.
pub fn quiz_payload(dashboard: &Dashboard, body: &str) -> Result<String, SubmitPayloadError> {
    let session = SessionContext::default()
        .with_quiz_body(body)
        .map_err(SubmitPayloadError::Parse)?;
    let Some(mut answers) = session.quiz else {
        return Err(SubmitPayloadError::Validation("missing quiz answers".to_string()));
    };

    let name = answers.name.trim().to_string();
    if name.is_empty() {
        return Err(SubmitPayloadError::Validation("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(SubmitPayloadError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }

    answers.name = name;
    let result = score_quiz(&answers);
    let entry = ScoreEntry {
        name: result.name.clone(),
        score: result.score,
    };
    append_score(dashboard.history_path(), &entry).map_err(ApiError::from)?;
    tracing::info!(score = entry.score, "quiz result recorded");

    let history = load_history(dashboard.history_path()).map_err(ApiError::from)?;
    let response = QuizResponse {
        status: "ok",
        result,
        history,
    };
    serde_json::to_string_pretty(&response).map_err(|err| SubmitPayloadError::Api(err.into()))
}

pub fn feedback_options_payload() -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "max_rating": MAX_RATING,
        "referral_options": REFERRAL_OPTIONS,
    }))?)
}

pub fn feedback_payload(body: &str) -> Result<String, SubmitPayloadError> {
    let form: FeedbackForm = serde_json::from_str(body).map_err(SubmitPayloadError::Parse)?;
    let receipt =
        acknowledge(&form).map_err(|err| SubmitPayloadError::Validation(err.to_string()))?;
    serde_json::to_string_pretty(&receipt).map_err(|err| SubmitPayloadError::Api(err.into()))
}
