//! Axum route handlers for the resume tooling.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::repository::get_job;
use crate::resume::cover_letter::{generate_cover_letter, CoverLetter, CoverLetterInput};
use crate::resume::extract::{extract_pdf_text, MAX_UPLOAD_BYTES};
use crate::resume::feedback::{review_resume, ResumeFeedback};
use crate::resume::fit_scoring::FitReport;
use crate::resume::posting_parser::{parse_posting, ParsedPosting, PostingTone};
use crate::state::AppState;

const MAX_RESUME_CHARS: usize = 20_000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub word_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_id: Option<Uuid>,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub fit_report: FitReport,
    pub parsed_posting: ParsedPosting,
    pub feedback: ResumeFeedback,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub job_id: Option<Uuid>,
    pub job_description: Option<String>,
    pub company: Option<String>,
    pub candidate_name: Option<String>,
    pub tone_override: Option<PostingTone>,
}

/// The posting a request is about, either a stored job or pasted text.
struct PostingSource {
    text: String,
    company: String,
}

async fn resolve_posting(
    state: &AppState,
    job_id: Option<Uuid>,
    job_description: Option<&str>,
    company: Option<&str>,
) -> Result<PostingSource, AppError> {
    if let Some(id) = job_id {
        let job = get_job(&state.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
        return Ok(PostingSource {
            text: format!("{} at {}\n\n{}", job.title, job.company, job.description),
            company: job.company,
        });
    }

    match job_description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(text) => Ok(PostingSource {
            text: text.to_string(),
            company: company
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or("the company")
                .to_string(),
        }),
        None => Err(AppError::Validation(
            "Provide either job_id or job_description".to_string(),
        )),
    }
}

fn validate_resume_text(text: &str) -> Result<&str, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_RESUME_CHARS {
        return Err(AppError::Validation(format!(
            "resume_text exceeds {MAX_RESUME_CHARS} characters"
        )));
    }
    Ok(text)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/extract
///
/// Multipart upload with a `file` field containing a PDF.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
            if bytes.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::Validation(
                    "File too large. Maximum size is 10MB".to_string(),
                ));
            }
            data = Some(bytes);
        }
    }

    let data = data.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let text = tokio::task::spawn_blocking(move || extract_pdf_text(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))??;

    Ok(Json(ExtractResponse {
        word_count: text.split_whitespace().count(),
        text,
    }))
}

/// POST /api/v1/resume/analyze
///
/// Parses the posting, scores the resume against it, and asks the LLM for
/// feedback grounded on the gaps.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let resume_text = validate_resume_text(&req.resume_text)?;
    let posting = resolve_posting(&state, req.job_id, req.job_description.as_deref(), None).await?;

    let parsed_posting = parse_posting(&posting.text, &state.llm).await?;
    let fit_report = state.resume_scorer.score(resume_text, &parsed_posting).await?;
    let feedback = review_resume(&state.llm, resume_text, &posting.text, &fit_report).await?;

    Ok(Json(AnalyzeResponse {
        fit_report,
        parsed_posting,
        feedback,
    }))
}

/// POST /api/v1/resume/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetter>, AppError> {
    let resume_text = validate_resume_text(&req.resume_text)?;
    let posting = resolve_posting(
        &state,
        req.job_id,
        req.job_description.as_deref(),
        req.company.as_deref(),
    )
    .await?;

    let parsed = parse_posting(&posting.text, &state.llm).await?;
    let input = CoverLetterInput {
        resume_text,
        posting_text: &posting.text,
        company: &posting.company,
        candidate_name: req.candidate_name.as_deref(),
        parsed: &parsed,
        tone_override: req.tone_override,
    };
    let letter = generate_cover_letter(&state.llm, &input).await?;
    Ok(Json(letter))
}
