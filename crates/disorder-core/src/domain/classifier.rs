//! Threshold-based protein disorder classifier.
//!
//! Seven biophysical features are computed from the canonical residues of a
//! sequence. Each feature on the "structured" side of its threshold counts as
//! one condition met; a sequence is structured when at least `threshold`
//! conditions hold.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Number of features, and therefore the maximum number of conditions.
pub const FEATURE_COUNT: u8 = 7;

/// Threshold used when a caller does not supply one.
pub const DEFAULT_THRESHOLD: u8 = 5;

/// Longest sequence prefix echoed back in batch results.
const ECHO_LEN: usize = 100;

/// Maximum flexibility on the scale (glycine), used for normalisation.
const MAX_FLEXIBILITY: f64 = 0.544;

const BULKY_HYDROPHOBICS: [char; 7] = ['W', 'C', 'F', 'Y', 'I', 'V', 'L'];

/// Per-residue property scales.
#[derive(Debug, Clone, Copy)]
struct Residue {
    /// Kyte-Doolittle hydrophobicity.
    hydrophobicity: f64,
    charge: i8,
    h_donors: u8,
    h_acceptors: u8,
    flexibility: f64,
}

fn residue(hydrophobicity: f64, charge: i8, h_donors: u8, h_acceptors: u8, flexibility: f64) -> Residue {
    Residue {
        hydrophobicity,
        charge,
        h_donors,
        h_acceptors,
        flexibility,
    }
}

fn lookup(aa: char) -> Option<Residue> {
    let props = match aa {
        'A' => residue(1.8, 0, 0, 0, 0.357),
        'R' => residue(-4.5, 1, 2, 0, 0.529),
        'N' => residue(-3.5, 0, 2, 2, 0.463),
        'D' => residue(-3.5, -1, 0, 2, 0.511),
        'C' => residue(2.5, 0, 0, 1, 0.346),
        'Q' => residue(-3.5, 0, 2, 2, 0.493),
        'E' => residue(-3.5, -1, 0, 2, 0.497),
        'G' => residue(-0.4, 0, 0, 0, 0.544),
        'H' => residue(-3.2, 0, 1, 1, 0.323),
        'I' => residue(4.5, 0, 0, 0, 0.462),
        'L' => residue(3.8, 0, 0, 0, 0.365),
        'K' => residue(-3.9, 1, 1, 0, 0.466),
        'M' => residue(1.9, 0, 0, 0, 0.295),
        'F' => residue(2.8, 0, 0, 0, 0.314),
        'P' => residue(-1.6, 0, 0, 0, 0.509),
        'S' => residue(-0.8, 0, 1, 1, 0.507),
        'T' => residue(-0.7, 0, 1, 1, 0.444),
        'W' => residue(-0.9, 0, 1, 0, 0.305),
        'Y' => residue(-1.3, 0, 1, 1, 0.420),
        'V' => residue(4.2, 0, 0, 0, 0.386),
        _ => return None,
    };
    Some(props)
}

/// Whether `aa` is one of the 20 canonical amino acids (uppercase).
pub fn is_canonical(aa: char) -> bool {
    lookup(aa).is_some()
}

/// The seven features a classification is based on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub hydro_norm_avg: f64,
    pub flex_norm_avg: f64,
    pub h_bond_potential_avg: f64,
    pub abs_net_charge_prop: f64,
    pub shannon_entropy: f64,
    pub freq_proline: f64,
    pub freq_bulky_hydrophobics: f64,
}

impl Features {
    fn rounded(self) -> Self {
        Self {
            hydro_norm_avg: round_to(self.hydro_norm_avg, 4),
            flex_norm_avg: round_to(self.flex_norm_avg, 4),
            h_bond_potential_avg: round_to(self.h_bond_potential_avg, 4),
            abs_net_charge_prop: round_to(self.abs_net_charge_prop, 4),
            shannon_entropy: round_to(self.shannon_entropy, 4),
            freq_proline: round_to(self.freq_proline, 4),
            freq_bulky_hydrophobics: round_to(self.freq_bulky_hydrophobics, 4),
        }
    }
}

/// Feature thresholds: midpoints between folded and disordered reference means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub hydro_norm_avg: f64,
    pub flex_norm_avg: f64,
    pub h_bond_potential_avg: f64,
    pub abs_net_charge_prop: f64,
    pub shannon_entropy: f64,
    pub freq_proline: f64,
    pub freq_bulky_hydrophobics: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hydro_norm_avg: 0.507,
            flex_norm_avg: 0.821,
            h_bond_potential_avg: 1.476,
            abs_net_charge_prop: 0.082,
            shannon_entropy: 2.932,
            freq_proline: 0.063,
            freq_bulky_hydrophobics: 0.347,
        }
    }
}

/// Number of conditions required for a "structured" call, in `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Threshold(u8);

impl Threshold {
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (1..=FEATURE_COUNT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::Validation(format!(
                "threshold must be between 1 and {FEATURE_COUNT}, got {value}"
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<u8> for Threshold {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for u8 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Structured,
    Disordered,
    Unknown,
}

/// Result of classifying a single sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classified {
    pub classification: Classification,
    pub confidence: f64,
    pub conditions_met: u8,
    pub threshold: u8,
    pub features: Option<Features>,
    pub error: Option<String>,
}

/// Classification of one entry of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub id: String,
    /// The input sequence, truncated for display.
    pub sequence: String,
    #[serde(flatten)]
    pub result: Classified,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Computes features over the canonical residues of `sequence`.
///
/// Non-canonical characters are ignored. A sequence without canonical
/// residues yields all-zero features.
pub fn compute_features(sequence: &str) -> Features {
    let mut counts = [0usize; 26];
    let mut valid_len = 0usize;
    let mut hydro_sum = 0.0;
    let mut flex_sum = 0.0;
    let mut h_bond_sum = 0.0;
    let mut charge_sum: i64 = 0;

    for aa in sequence.chars() {
        let Some(props) = lookup(aa) else {
            continue;
        };
        counts[(aa as u8 - b'A') as usize] += 1;
        valid_len += 1;
        hydro_sum += (props.hydrophobicity + 4.5) / 9.0;
        flex_sum += props.flexibility / MAX_FLEXIBILITY;
        h_bond_sum += f64::from(props.h_donors + props.h_acceptors);
        charge_sum += i64::from(props.charge);
    }

    if valid_len == 0 {
        return Features::default();
    }

    let len = valid_len as f64;
    let freq = |aa: char| counts[(aa as u8 - b'A') as usize] as f64 / len;

    let shannon_entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum();

    Features {
        hydro_norm_avg: hydro_sum / len,
        flex_norm_avg: flex_sum / len,
        h_bond_potential_avg: h_bond_sum / len,
        abs_net_charge_prop: (charge_sum as f64 / len).abs(),
        shannon_entropy,
        freq_proline: freq('P'),
        freq_bulky_hydrophobics: BULKY_HYDROPHOBICS.iter().map(|&aa| freq(aa)).sum(),
    }
}

/// Counts the features that sit on the "structured" side of their threshold.
pub fn count_conditions_met(features: &Features, thresholds: &Thresholds) -> u8 {
    [
        features.hydro_norm_avg >= thresholds.hydro_norm_avg,
        features.flex_norm_avg <= thresholds.flex_norm_avg,
        features.h_bond_potential_avg <= thresholds.h_bond_potential_avg,
        features.abs_net_charge_prop <= thresholds.abs_net_charge_prop,
        features.shannon_entropy >= thresholds.shannon_entropy,
        features.freq_proline <= thresholds.freq_proline,
        features.freq_bulky_hydrophobics >= thresholds.freq_bulky_hydrophobics,
    ]
    .into_iter()
    .filter(|met| *met)
    .count() as u8
}

fn confidence(conditions_met: u8, threshold: u8) -> f64 {
    let met = f64::from(conditions_met);
    let t = f64::from(threshold);
    let raw = if conditions_met >= threshold {
        if threshold < FEATURE_COUNT {
            0.5 + 0.5 * ((met - t) / (f64::from(FEATURE_COUNT) - t))
        } else {
            1.0
        }
    } else {
        0.5 + 0.5 * ((t - 1.0 - met) / t)
    };
    round_to(raw.clamp(0.5, 1.0), 2)
}

pub fn classify_sequence(sequence: &str, threshold: Threshold, thresholds: &Thresholds) -> Classified {
    let clean: String = sequence
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|&c| is_canonical(c))
        .collect();

    if clean.is_empty() {
        return Classified {
            classification: Classification::Unknown,
            confidence: 0.0,
            conditions_met: 0,
            threshold: threshold.get(),
            features: None,
            error: Some("No valid amino acids in sequence".to_string()),
        };
    }

    let features = compute_features(&clean);
    let conditions_met = count_conditions_met(&features, thresholds);
    let classification = if conditions_met >= threshold.get() {
        Classification::Structured
    } else {
        Classification::Disordered
    };

    Classified {
        classification,
        confidence: confidence(conditions_met, threshold.get()),
        conditions_met,
        threshold: threshold.get(),
        features: Some(features.rounded()),
        error: None,
    }
}

/// Classifies `(id, sequence)` pairs in order.
pub fn classify_batch(
    sequences: &[(String, String)],
    threshold: Threshold,
    thresholds: &Thresholds,
) -> Vec<BatchEntry> {
    sequences
        .iter()
        .map(|(id, sequence)| {
            let mut echo: String = sequence.chars().take(ECHO_LEN).collect();
            if sequence.chars().count() > ECHO_LEN {
                echo.push_str("...");
            }

            BatchEntry {
                id: id.clone(),
                sequence: echo,
                result: classify_sequence(sequence, threshold, thresholds),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_features_single_residue() {
        let f = compute_features("AAAA");
        assert!(approx(f.hydro_norm_avg, (1.8 + 4.5) / 9.0));
        assert!(approx(f.flex_norm_avg, 0.357 / 0.544));
        assert!(approx(f.h_bond_potential_avg, 0.0));
        assert!(approx(f.shannon_entropy, 0.0));
        assert!(approx(f.freq_proline, 0.0));
    }

    #[test]
    fn test_features_charge_and_entropy() {
        let f = compute_features("KKDE");
        assert!(approx(f.abs_net_charge_prop, 0.0));
        assert!(approx(f.shannon_entropy, 1.5));

        let f = compute_features("KR");
        assert!(approx(f.abs_net_charge_prop, 1.0));
        assert!(approx(f.shannon_entropy, 1.0));
    }

    #[test]
    fn test_features_ignore_non_canonical() {
        assert_eq!(compute_features("AXA"), compute_features("AA"));
        assert_eq!(compute_features("XXX"), Features::default());
    }

    #[test]
    fn test_hydrophobic_sequence_is_structured() {
        let result = classify_sequence("LIVFWCYLIVFWCYAMLIVG", Threshold::new(4).unwrap(), &Thresholds::default());
        assert_eq!(result.classification, Classification::Structured);
        assert!(result.confidence >= 0.5 && result.confidence <= 1.0);
        assert!(result.features.is_some());
    }

    #[test]
    fn test_low_complexity_charged_sequence_is_disordered() {
        let result = classify_sequence("PEPEPEKKPSPEKESPKE", Threshold::default(), &Thresholds::default());
        assert_eq!(result.classification, Classification::Disordered);
        assert!(result.conditions_met < DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_lowercase_input_is_normalised() {
        let upper = classify_sequence("MKVLWAASLLLLASAARA", Threshold::default(), &Thresholds::default());
        let lower = classify_sequence("mkvlwaasllllasaara", Threshold::default(), &Thresholds::default());
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_no_valid_residues() {
        let result = classify_sequence("1234", Threshold::default(), &Thresholds::default());
        assert_eq!(result.classification, Classification::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(confidence(7, 4), 1.0);
        assert_eq!(confidence(4, 4), 0.5);
        assert_eq!(confidence(7, 7), 1.0);
        assert_eq!(confidence(0, 4), 0.88);
        assert_eq!(confidence(3, 4), 0.5);
    }

    #[test]
    fn test_threshold_range() {
        assert!(Threshold::new(0).is_err());
        assert!(Threshold::new(8).is_err());
        assert_eq!(Threshold::new(7).unwrap().get(), 7);
    }

    #[test]
    fn test_batch_truncates_long_sequences() {
        let long = "A".repeat(150);
        let entries = classify_batch(
            &[("p1".to_string(), long), ("p2".to_string(), "MKV".to_string())],
            Threshold::default(),
            &Thresholds::default(),
        );

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "p1");
        assert_eq!(entries[0].sequence.len(), 103);
        assert!(entries[0].sequence.ends_with("..."));
        assert_eq!(entries[1].sequence, "MKV");
    }
}
