//! Reads the catalog dataset and produces the eligible record set.

use super::fund::Fund;
use super::normalize::{RawRow, normalize_row};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::path::Path;
use tracing::{debug, instrument};

pub const DELIMITER: u8 = b';';

/// Parses a semicolon-delimited table and keeps the advisory-eligible funds.
///
/// The header row names the columns. Blank lines are skipped and short rows
/// are read with their missing trailing cells empty.
pub fn parse_funds(content: &str) -> Result<Vec<Fund>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .trim(Trim::None)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header_record = reader
        .headers()
        .context("Failed to read dataset header")?
        .clone();
    let headers: Vec<&str> = header_record
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
        .collect();

    let mut total = 0usize;
    let mut funds = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read dataset row {}", row_no + 1))?;
        total += 1;

        let row: RawRow = headers.iter().copied().zip(record.iter()).collect();
        let fund = normalize_row(&row);
        if fund.available_for_implicit_advisory {
            funds.push(fund);
        }
    }

    debug!(rows = total, eligible = funds.len(), "Parsed fund dataset");
    Ok(funds)
}

/// Loads the dataset at `path`. Called once per query; nothing is cached.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_funds<P: AsRef<Path>>(path: P) -> Result<Vec<Fund>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read fund dataset: {}", path.display()))?;
    parse_funds(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fund::RiskLevel;

    const HEADER: &str = "ISIN;Nombre;Divisa;Categoria Singular Bank;REQ;Rent YTD;Disponible para asesoramiento con cobro implícito";

    #[test]
    fn test_parse_keeps_only_eligible_rows() {
        let content = format!(
            "{HEADER}\nLU0000000001;Alpha;EUR;RV Europa;10;1,5;Y\nLU0000000002;Beta;USD;RF Global;30;2,5;N\nLU0000000003;Gamma;EUR;Mixto;90;-1;Y\n"
        );
        let funds = parse_funds(&content).unwrap();
        assert_eq!(funds.len(), 2);
        assert_eq!(funds[0].isin, "LU0000000001");
        assert_eq!(funds[0].ytd_return, 1.5);
        assert_eq!(funds[0].risk_level, RiskLevel::Low);
        assert_eq!(funds[1].isin, "LU0000000003");
        assert_eq!(funds[1].risk_level, RiskLevel::VeryHigh);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_tolerates_short_rows() {
        let content = format!(
            "{HEADER}\n\nLU0000000001;Alpha;EUR;RV Europa;10;1,5;Y\n\nLU0000000002;Short\n"
        );
        let funds = parse_funds(&content).unwrap();
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].name, "Alpha");
    }

    #[test]
    fn test_parse_ignores_byte_order_mark() {
        let content = format!("\u{feff}{HEADER}\nLU0000000001;Alpha;EUR;RV Europa;10;1,5;Y\n");
        let funds = parse_funds(&content).unwrap();
        assert_eq!(funds[0].isin, "LU0000000001");
    }

    #[test]
    fn test_parse_bundled_sample() {
        let funds = parse_funds(include_str!("../../docs/sample_funds.csv")).unwrap();
        assert_eq!(funds.len(), 5);
        assert!(funds.iter().all(|f| f.isin != "LU0000000000"));
        assert_eq!(funds[0].isin, "LU1223083327");
        assert_eq!(funds[0].management_fee, 1.5);
    }

    #[test]
    fn test_parse_header_only() {
        let funds = parse_funds(HEADER).unwrap();
        assert!(funds.is_empty());
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let content = format!(
            "{HEADER}\nLU0000000001;Alpha;EUR;RV;10;1;Y\nLU0000000001;Alpha bis;EUR;RV;10;1;Y\n"
        );
        assert_eq!(parse_funds(&content).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        let err = load_funds(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read fund dataset"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            format!("{HEADER}\nLU0000000001;Alpha;EUR;RV Europa;45;3,2;Y\n"),
        )
        .unwrap();
        let funds = load_funds(file.path()).await.unwrap();
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].risk_level, RiskLevel::MediumHigh);
    }
}
