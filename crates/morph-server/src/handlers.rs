use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use morph_dict::MorphologyDictionary;
use morph_stemmer::Stemmer;
use morph_stemmer::analysis::{Analyzer, Token};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest word accepted by the lookup endpoints, in chars.
pub const MAX_WORD_LEN: usize = 64;
/// Longest text accepted by `/v1/analyze`, in chars.
pub const MAX_TEXT_LEN: usize = 4096;

#[derive(Clone)]
pub struct AppState {
    pub dict: Arc<MorphologyDictionary>,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct WordQuery {
    pub word: Option<String>,
}

#[derive(Deserialize)]
pub struct AnalyzeQuery {
    pub text: Option<String>,
    /// Comma separated words kept verbatim.
    pub keywords: Option<String>,
}

#[derive(Serialize)]
struct KnownResponse {
    word: String,
    known: bool,
}

#[derive(Serialize)]
struct NormalFormsResponse {
    word: String,
    normal_forms: Vec<String>,
}

#[derive(Serialize)]
struct StemResponse {
    word: String,
    stem: String,
}

#[derive(Serialize)]
struct AnalysisItem {
    normal_form: String,
    tag: String,
}

#[derive(Serialize)]
struct AnalysesResponse {
    word: String,
    analyses: Vec<AnalysisItem>,
}

#[derive(Serialize)]
struct TokenItem {
    text: String,
    start: usize,
    end: usize,
    position_increment: u32,
    keyword: bool,
}

impl From<Token> for TokenItem {
    fn from(token: Token) -> Self {
        Self {
            text: token.text,
            start: token.start,
            end: token.end,
            position_increment: token.position_increment,
            keyword: token.keyword,
        }
    }
}

#[derive(Serialize)]
struct AnalyzeResponse {
    language: String,
    tokens: Vec<TokenItem>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/known", get(known))
        .route("/v1/normal-forms", get(normal_forms))
        .route("/v1/stem", get(stem))
        .route("/v1/analyses", get(analyses))
        .route("/v1/analyze", get(analyze))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn known(
    State(state): State<AppState>,
    Query(params): Query<WordQuery>,
) -> Result<Response, ApiError> {
    let word = required_word(params.word)?;
    let known = state.dict.is_known(&word);
    Ok(respond(&state, KnownResponse { word, known }))
}

async fn normal_forms(
    State(state): State<AppState>,
    Query(params): Query<WordQuery>,
) -> Result<Response, ApiError> {
    let word = required_word(params.word)?;
    let normal_forms = state.dict.normal_forms(&word);
    Ok(respond(&state, NormalFormsResponse { word, normal_forms }))
}

async fn stem(
    State(state): State<AppState>,
    Query(params): Query<WordQuery>,
) -> Result<Response, ApiError> {
    let word = required_word(params.word)?;
    let stem = Stemmer::new(state.dict.as_ref())
        .stemmed_word(&word)
        .into_owned();
    Ok(respond(&state, StemResponse { word, stem }))
}

async fn analyses(
    State(state): State<AppState>,
    Query(params): Query<WordQuery>,
) -> Result<Response, ApiError> {
    let word = required_word(params.word)?;
    let analyses = state
        .dict
        .analyses(&word)
        .into_iter()
        .map(|a| AnalysisItem {
            normal_form: a.normal_form,
            tag: a.tag,
        })
        .collect();
    Ok(respond(&state, AnalysesResponse { word, analyses }))
}

async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeQuery>,
) -> Result<Response, ApiError> {
    let text = params.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ApiError::bad_request("text is required"));
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::bad_request(format!(
            "text must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    let keywords = params
        .keywords
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty());

    let analyzer = Analyzer::new(state.dict.as_ref()).with_keywords(keywords);
    let response = AnalyzeResponse {
        language: state.dict.language().name().to_string(),
        tokens: analyzer.analyze(&text).map(TokenItem::from).collect(),
    };
    Ok(respond(&state, response))
}

/// Trimmed and lowercased; dictionaries only hold lowercase forms.
fn required_word(word: Option<String>) -> Result<String, ApiError> {
    let word = word.unwrap_or_default();
    let word = word.trim();
    if word.is_empty() {
        return Err(ApiError::bad_request("word is required"));
    }
    if word.chars().count() > MAX_WORD_LEN {
        return Err(ApiError::bad_request(format!(
            "word must be at most {MAX_WORD_LEN} characters"
        )));
    }
    Ok(word.to_lowercase())
}

fn respond<T: Serialize>(state: &AppState, body: T) -> Response {
    if state.disable_cache {
        return Json(body).into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        Json(body),
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}
