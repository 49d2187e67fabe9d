//! Classification endpoints.

use actix_web::{HttpResponse, web};
use std::time::Instant;

use disorder_core::domain::classifier::{DEFAULT_THRESHOLD, classify_batch};
use disorder_core::domain::sequence::{parse_fasta, validate_amino_acids};
use disorder_core::domain::{BatchEntry, Classification, Features, Threshold};
use disorder_shared::dto::{
    ClassificationResult, ClassifyRequest, ClassifyResponse, FeatureValues, ThresholdQuery,
};

use crate::middleware::api_key::Caller;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::rate_limit;
use crate::observability::RequestId;
use crate::state::AppState;

pub const API_VERSION: &str = "1.0.0";

/// Classify sequences submitted as JSON.
///
/// POST /api/v1/classify
pub async fn classify(
    state: web::Data<AppState>,
    caller: Caller,
    request_id: RequestId,
    body: web::Json<ClassifyRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    let threshold = Threshold::new(request.threshold.unwrap_or(DEFAULT_THRESHOLD))?;
    let sequences = request
        .sequences
        .into_iter()
        .map(|input| (input.id, input.sequence))
        .collect();

    run(&state, &caller, &request_id, sequences, threshold).await
}

/// Classify sequences submitted as FASTA text.
///
/// POST /api/v1/classify/fasta?threshold=
pub async fn classify_fasta(
    state: web::Data<AppState>,
    caller: Caller,
    request_id: RequestId,
    query: web::Query<ThresholdQuery>,
    body: String,
) -> AppResult<HttpResponse> {
    let threshold = Threshold::new(query.threshold.unwrap_or(DEFAULT_THRESHOLD))?;
    let sequences = parse_fasta(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    run(&state, &caller, &request_id, sequences, threshold).await
}

/// Batch check, rate limit, validation, then classification.
async fn run(
    state: &AppState,
    caller: &Caller,
    request_id: &RequestId,
    sequences: Vec<(String, String)>,
    threshold: Threshold,
) -> AppResult<HttpResponse> {
    if sequences.is_empty() {
        return Err(AppError::BadRequest("No sequences provided".to_string()));
    }
    if sequences.len() > caller.limits.max_batch_size {
        return Err(AppError::BadRequest(format!(
            "Batch size {} exceeds the {} tier maximum of {}",
            sequences.len(),
            caller.limits.tier,
            caller.limits.max_batch_size
        )));
    }

    rate_limit::enforce(&state.limiter, caller, sequences.len() as u64, request_id).await?;

    for (id, sequence) in &sequences {
        validate_amino_acids(sequence)
            .map_err(|e| AppError::BadRequest(format!("Sequence '{}': {}", id, e)))?;
    }

    let started = Instant::now();
    let entries = classify_batch(&sequences, threshold, &state.thresholds);
    let total_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    let per_sequence_ms = total_time_ms / entries.len() as f64;

    tracing::debug!(
        sequences = entries.len(),
        threshold = threshold.get(),
        total_time_ms,
        "Classified batch"
    );

    let results: Vec<ClassificationResult> = entries
        .into_iter()
        .map(|entry| to_result(entry, per_sequence_ms))
        .collect();

    Ok(HttpResponse::Ok().json(ClassifyResponse {
        total_sequences: results.len(),
        results,
        total_time_ms,
        api_version: API_VERSION.to_string(),
    }))
}

fn to_result(entry: BatchEntry, processing_time_ms: f64) -> ClassificationResult {
    let result = entry.result;
    ClassificationResult {
        id: entry.id,
        sequence: entry.sequence,
        classification: label(result.classification).to_string(),
        confidence: result.confidence,
        conditions_met: result.conditions_met,
        threshold: result.threshold,
        features: result.features.map(feature_values),
        processing_time_ms,
        error: result.error,
    }
}

fn label(classification: Classification) -> &'static str {
    match classification {
        Classification::Structured => "structured",
        Classification::Disordered => "disordered",
        Classification::Unknown => "unknown",
    }
}

fn feature_values(f: Features) -> FeatureValues {
    FeatureValues {
        hydro_norm_avg: f.hydro_norm_avg,
        flex_norm_avg: f.flex_norm_avg,
        h_bond_potential_avg: f.h_bond_potential_avg,
        abs_net_charge_prop: f.abs_net_charge_prop,
        shannon_entropy: f.shannon_entropy,
        freq_proline: f.freq_proline,
        freq_bulky_hydrophobics: f.freq_bulky_hydrophobics,
    }
}
