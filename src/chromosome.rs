//! Chromosome and gene data model.
//!
//! Both types are supplied by the caller once per session and are read-only
//! inside the engine; swapping chromosomes rebuilds the whole engine.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chromosome {
    pub name: String,
    /// Length in base pairs, ≥ 1.
    pub length: u64,
    /// Per-base letters, same length as `length` when present. Absent
    /// sequence only disables the base-letter row in the detail track.
    pub sequence: Option<String>,
}

impl Chromosome {
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
            sequence: None,
        }
    }

    pub fn with_sequence(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        let sequence = sequence.into();
        Self {
            name: name.into(),
            length: sequence.len() as u64,
            sequence: Some(sequence),
        }
    }

    /// Base letter at a 0-based position, if a sequence is loaded.
    #[inline(always)]
    pub fn base_at(&self, pos: u64) -> Option<char> {
        self.sequence
            .as_ref()
            .and_then(|seq| seq.as_bytes().get(pos as usize))
            .map(|b| b.to_ascii_uppercase() as char)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// Parses a GFF/JSON strand symbol. Anything other than `-` (including
    /// `.` and `?`) is treated as forward; the loaders log the fallback.
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "-" => Strand::Reverse,
            _ => Strand::Forward,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gene {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub strand: Strand,
    /// Source-ordered attribute pairs, as parsed from the GFF column 9 or
    /// folded in from the JSON gene record.
    pub attributes: Vec<(String, String)>,
}

impl Gene {
    pub fn new(id: impl Into<String>, start: f64, end: f64, strand: Strand) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            strand,
            attributes: vec![],
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Human-facing label: `Name`, then `gene`, then `locus_tag`, then id.
    pub fn display_name(&self) -> &str {
        for key in ["Name", "gene", "locus_tag"] {
            if let Some(value) = self.attribute(key) {
                return value;
            }
        }
        &self.id
    }

    #[inline(always)]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn snapshot(&self) -> GeneSnapshot {
        GeneSnapshot {
            id: self.id.clone(),
            name: self.display_name().to_string(),
            start: self.start,
            end: self.end,
            strand: self.strand,
            attributes: self.attributes.clone(),
        }
    }
}

/// Read-only view of the active (selected or hovered) gene, handed to the
/// inspector collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneSnapshot {
    pub id: String,
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub strand: Strand,
    pub attributes: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_priority() {
        let mut gene = Gene::new("gene-LOC1234", 100.0, 200.0, Strand::Forward);
        assert_eq!(gene.display_name(), "gene-LOC1234");
        gene.attributes.push(("locus_tag".into(), "LOC1234".into()));
        assert_eq!(gene.display_name(), "LOC1234");
        gene.attributes.push(("gene".into(), "TP53".into()));
        assert_eq!(gene.display_name(), "TP53");
        gene.attributes.push(("Name".into(), "TP53-201".into()));
        assert_eq!(gene.display_name(), "TP53-201");
    }

    #[test]
    fn test_strand_symbols() {
        assert_eq!(Strand::from_symbol("+"), Strand::Forward);
        assert_eq!(Strand::from_symbol("-"), Strand::Reverse);
        assert_eq!(Strand::from_symbol("."), Strand::Forward);
        assert_eq!(Strand::Reverse.symbol(), "-");
    }

    #[test]
    fn test_base_at() {
        let chromosome = Chromosome::with_sequence("chr1", "acGT");
        assert_eq!(chromosome.length, 4);
        assert_eq!(chromosome.base_at(0), Some('A'));
        assert_eq!(chromosome.base_at(3), Some('T'));
        assert_eq!(chromosome.base_at(4), None);
        let bare = Chromosome::new("chr2", 1000);
        assert_eq!(bare.base_at(0), None);
    }
}
