//! Data collaborators: the HTTP gene-list endpoint client and local
//! FASTA/GFF loaders.
//!
//! The engine itself performs no I/O; everything here runs before (or
//! outside of) an engine session. Failures degrade to an empty gene list
//! or an error at load time, logged, never a UI error surface.

use crate::chromosome::{Chromosome, Gene, Strand};
use anyhow::{Context, Result, anyhow};
use bio::io::fasta;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// One gene object as served by the annotation endpoint
/// (`GET {base}/api/v1/genes/?chromosome={name}`).
#[derive(Debug, Deserialize)]
pub struct GeneRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub strand: Option<String>,
}

/// Fetches the gene list for a chromosome. Any failure — network, HTTP
/// status, malformed JSON — yields an empty list and a warning; the caller
/// renders bare bars instead of an error.
pub fn fetch_genes(base_url: &str, chromosome: &str) -> Vec<Gene> {
    match try_fetch_genes(base_url, chromosome) {
        Ok(genes) => genes,
        Err(err) => {
            log::warn!("gene fetch for '{chromosome}' from {base_url} failed: {err:#}");
            vec![]
        }
    }
}

fn try_fetch_genes(base_url: &str, chromosome: &str) -> Result<Vec<Gene>> {
    let url = format!(
        "{}/api/v1/genes/?chromosome={}",
        base_url.trim_end_matches('/'),
        chromosome
    );
    let records: Vec<GeneRecord> = reqwest::blocking::get(&url)
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()?
        .json()
        .context("decoding gene list JSON")?;
    log::info!("fetched {} genes for {chromosome}", records.len());
    Ok(records.into_iter().filter_map(record_to_gene).collect())
}

/// Converts a wire record into a [`Gene`], repairing inverted coordinates
/// and dropping zero-width entries. A `name` field is folded into the
/// attributes so the display-name rule sees it.
pub fn record_to_gene(record: GeneRecord) -> Option<Gene> {
    let (start, end) = if record.start <= record.end {
        (record.start, record.end)
    } else {
        (record.end, record.start)
    };
    if start == end {
        log::debug!("dropping zero-width gene record '{}'", record.id);
        return None;
    }
    let strand_symbol = record.strand.as_deref().unwrap_or("+");
    if !matches!(strand_symbol, "+" | "-") {
        log::debug!(
            "gene '{}': strand '{strand_symbol}' treated as forward",
            record.id
        );
    }
    let mut gene = Gene::new(record.id, start, end, Strand::from_symbol(strand_symbol));
    if let Some(name) = record.name {
        gene.attributes.push(("Name".to_string(), name));
    }
    Some(gene)
}

/// Loads one chromosome from a FASTA file: the record matching `name`, or
/// the first record when no name is given.
pub fn load_chromosome_from_fasta(path: &Path, name: Option<&str>) -> Result<Chromosome> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    for record in fasta::Reader::new(file).records() {
        let record = record.context("reading FASTA record")?;
        if name.is_none_or(|wanted| record.id() == wanted) {
            let sequence = String::from_utf8_lossy(record.seq()).into_owned();
            return Ok(Chromosome::with_sequence(record.id(), sequence));
        }
    }
    Err(anyhow!(
        "no matching sequence in {} (wanted {})",
        path.display(),
        name.unwrap_or("<first record>")
    ))
}

/// Reads `gene` features for one chromosome from a GFF3 file, plain or
/// gzipped. Malformed lines are skipped, not fatal.
pub fn load_genes_from_gff(path: &Path, chromosome: &str) -> Result<Vec<Gene>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let mut genes = Vec::new();
    for (line_number, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.context("reading GFF line")?;
        match parse_gff_gene_line(&line, chromosome) {
            Ok(Some(gene)) => genes.push(gene),
            Ok(None) => {}
            Err(err) => {
                log::debug!("skipping GFF line {}: {err}", line_number + 1);
            }
        }
    }
    log::info!(
        "loaded {} genes for {chromosome} from {}",
        genes.len(),
        path.display()
    );
    Ok(genes)
}

/// One GFF3 line → `Some(Gene)` when it is a `gene` feature on the wanted
/// chromosome, `None` when it is valid but irrelevant, `Err` when malformed.
pub fn parse_gff_gene_line(line: &str, chromosome: &str) -> Result<Option<Gene>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < 8 {
        return Err(anyhow!("expected at least 8 columns, got {}", columns.len()));
    }
    if columns[0] != chromosome || columns[2] != "gene" {
        return Ok(None);
    }
    let start: f64 = columns[3].parse().context("start coordinate")?;
    let end: f64 = columns[4].parse().context("end coordinate")?;
    let attributes = parse_attributes(columns.get(8).copied().unwrap_or(""));
    let id = attributes
        .iter()
        .find(|(key, _)| key == "ID")
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| format!("gene@{start}-{end}"));
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    if start == end {
        return Ok(None);
    }
    let mut gene = Gene::new(id, start, end, Strand::from_symbol(columns[6]));
    gene.attributes = attributes;
    Ok(Some(gene))
}

/// GFF/GTF attribute column → ordered key/value pairs. Tolerates trailing
/// semicolons, stray whitespace and quoted values.
pub fn parse_attributes(column: &str) -> Vec<(String, String)> {
    column
        .trim()
        .trim_matches(';')
        .split(';')
        .filter_map(|part| {
            let part = part.trim();
            let (key, value) = part.split_once('=')?;
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}
