//! FASTA parsing and amino acid validation.

use std::collections::BTreeSet;

use crate::domain::classifier::is_canonical;
use crate::error::SequenceError;

/// Parses FASTA text into `(id, sequence)` pairs.
///
/// Blank lines are skipped and multi-line records are concatenated. A header
/// with no text gets the id `sequence_<line>`.
pub fn parse_fasta(text: &str) -> Result<Vec<(String, String)>, SequenceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SequenceError::EmptyInput);
    }

    let mut sequences = Vec::new();
    let mut current: Option<(String, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                push_record(&mut sequences, record)?;
            }
            let id = header.trim();
            let id = if id.is_empty() {
                format!("sequence_{line_num}")
            } else {
                id.to_string()
            };
            current = Some((id, String::new()));
        } else {
            match current.as_mut() {
                Some((_, seq)) => seq.push_str(line),
                None => return Err(SequenceError::DataBeforeHeader(line_num)),
            }
        }
    }

    if let Some(record) = current {
        push_record(&mut sequences, record)?;
    }

    if sequences.is_empty() {
        return Err(SequenceError::NoSequences);
    }

    Ok(sequences)
}

fn push_record(
    sequences: &mut Vec<(String, String)>,
    (id, seq): (String, String),
) -> Result<(), SequenceError> {
    if seq.is_empty() {
        return Err(SequenceError::MissingData(id));
    }
    sequences.push((id, seq));
    Ok(())
}

/// Checks that a sequence only holds amino acid letters (any case) and
/// whitespace, and contains at least one residue.
pub fn validate_amino_acids(sequence: &str) -> Result<(), SequenceError> {
    let mut invalid = BTreeSet::new();
    let mut residues = 0usize;

    for c in sequence.chars() {
        let upper = c.to_ascii_uppercase();
        if is_canonical(upper) {
            residues += 1;
        } else if !matches!(c, ' ' | '\t' | '\n' | '\r') {
            invalid.insert(upper);
        }
    }

    if !invalid.is_empty() {
        let chars: Vec<String> = invalid.into_iter().map(String::from).collect();
        return Err(SequenceError::InvalidResidues(chars.join(", ")));
    }
    if residues == 0 {
        return Err(SequenceError::NoResidues);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_record() {
        let fasta = ">protein1\nMKVLWAAS\nLLLLASAARA\n\n>protein2\nMALWMRLLPL\n";
        let parsed = parse_fasta(fasta).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("protein1".to_string(), "MKVLWAASLLLLASAARA".to_string()),
                ("protein2".to_string(), "MALWMRLLPL".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_empty_header_gets_line_id() {
        let parsed = parse_fasta(">\nMKV\n").unwrap();
        assert_eq!(parsed[0].0, "sequence_1");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_fasta("   "), Err(SequenceError::EmptyInput));
        assert_eq!(parse_fasta("MKV\n>p1\nMKV"), Err(SequenceError::DataBeforeHeader(1)));
        assert_eq!(
            parse_fasta(">p1\n>p2\nMKV"),
            Err(SequenceError::MissingData("p1".to_string()))
        );
    }

    #[test]
    fn test_validate_amino_acids() {
        assert!(validate_amino_acids("mkv lwa\n").is_ok());
        assert_eq!(
            validate_amino_acids("MKZB1"),
            Err(SequenceError::InvalidResidues("1, B, Z".to_string()))
        );
        assert_eq!(validate_amino_acids(" \t"), Err(SequenceError::NoResidues));
    }
}
