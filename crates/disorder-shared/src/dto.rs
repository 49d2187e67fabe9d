//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// A single sequence submitted for classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceInput {
    pub id: String,
    pub sequence: String,
}

/// Request body for `POST /api/v1/classify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub sequences: Vec<SequenceInput>,
    /// Conditions required for "structured" (1-7).
    #[serde(default)]
    pub threshold: Option<u8>,
}

/// Query string for `POST /api/v1/classify/fasta`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdQuery {
    #[serde(default)]
    pub threshold: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureValues {
    pub hydro_norm_avg: f64,
    pub flex_norm_avg: f64,
    pub h_bond_potential_avg: f64,
    pub abs_net_charge_prop: f64,
    pub shannon_entropy: f64,
    pub freq_proline: f64,
    pub freq_bulky_hydrophobics: f64,
}

/// Classification of one sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub id: String,
    /// Input sequence, truncated past 100 residues.
    pub sequence: String,
    pub classification: String,
    pub confidence: f64,
    pub conditions_met: u8,
    pub threshold: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureValues>,
    pub processing_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub results: Vec<ClassificationResult>,
    pub total_sequences: usize,
    pub total_time_ms: f64,
    pub api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageResponse {
    pub tier: String,
    pub requests_this_minute: u64,
    pub requests_per_minute_limit: u64,
    pub sequences_today: u64,
    pub daily_limit: u64,
}
