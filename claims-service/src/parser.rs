//! Pipe-delimited claim list and claim detail parsing.
//!
//! Malformed rows never abort a file: they come back as [`RowIssue`]s next
//! to the rows that did parse. Only I/O and encoding failures are fatal.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ClaimsError, ClaimsResult};
use crate::models::{NewClaim, NewClaimDetail};

const DELIMITER: u8 = b'|';
const DATE_FORMAT: &str = "%Y-%m-%d";
const DETAIL_COLUMNS: usize = 4;

/// Which input file a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImportFile {
    ClaimList,
    ClaimDetail,
}

/// A row that was not imported, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RowIssue {
    pub file: ImportFile,
    pub row: usize,
    pub message: String,
}

impl RowIssue {
    pub fn new(file: ImportFile, row: usize, message: impl Into<String>) -> Self {
        Self {
            file,
            row,
            message: message.into(),
        }
    }
}

/// A successfully parsed row with its position in the file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow<T> {
    pub row: usize,
    pub value: T,
}

/// Everything read from one file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile<T> {
    pub rows: Vec<ParsedRow<T>>,
    pub issues: Vec<RowIssue>,
}

impl<T> Default for ParsedFile<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            issues: Vec::new(),
        }
    }
}

impl<T> ParsedFile<T> {
    /// Number of rows that parsed
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column positions in the claim list header
struct ClaimColumns {
    id: Option<usize>,
    patient_name: Option<usize>,
    billed_amount: Option<usize>,
    paid_amount: Option<usize>,
    status: Option<usize>,
    insurer_name: Option<usize>,
    discharge_date: Option<usize>,
}

impl ClaimColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Self {
            id: find("id"),
            patient_name: find("patient_name"),
            billed_amount: find("billed_amount"),
            paid_amount: find("paid_amount"),
            status: find("status"),
            insurer_name: find("insurer_name"),
            discharge_date: find("discharge_date"),
        }
    }
}

fn field<'r>(record: &'r StringRecord, index: Option<usize>, name: &str) -> Result<&'r str, String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .ok_or_else(|| format!("missing column '{name}'"))
}

fn parse_int(value: &str, name: &str) -> Result<i32, String> {
    value
        .parse::<i32>()
        .map_err(|_| format!("invalid {name} '{value}': expected an integer"))
}

fn parse_amount(value: &str, name: &str) -> Result<Decimal, String> {
    value
        .parse::<Decimal>()
        .map_err(|_| format!("invalid {name} '{value}': expected a decimal amount"))
}

fn parse_date(value: &str, name: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| format!("invalid {name} '{value}': expected YYYY-MM-DD"))
}

fn parse_claim_record(record: &StringRecord, columns: &ClaimColumns) -> Result<NewClaim, String> {
    Ok(NewClaim {
        id: parse_int(field(record, columns.id, "id")?, "id")?,
        patient_name: field(record, columns.patient_name, "patient_name")?.to_string(),
        billed_amount: parse_amount(
            field(record, columns.billed_amount, "billed_amount")?,
            "billed_amount",
        )?,
        paid_amount: parse_amount(field(record, columns.paid_amount, "paid_amount")?, "paid_amount")?,
        status: field(record, columns.status, "status")?.to_string(),
        insurer_name: field(record, columns.insurer_name, "insurer_name")?.to_string(),
        discharge_date: parse_date(
            field(record, columns.discharge_date, "discharge_date")?,
            "discharge_date",
        )?,
    })
}

fn parse_detail_record(record: &StringRecord) -> Result<NewClaimDetail, String> {
    if record.len() != DETAIL_COLUMNS {
        return Err(format!(
            "expected {DETAIL_COLUMNS} columns, got {}",
            record.len()
        ));
    }
    // Column 0 is the exporter's own detail id; it has to be numeric but is
    // not stored.
    parse_int(record.get(0).unwrap_or_default(), "detail id")?;
    let claim_id = parse_int(record.get(1).unwrap_or_default(), "claim id")?;
    let denial_reason = record
        .get(2)
        .map(str::trim)
        .filter(|r| !r.is_empty() && *r != "N/A")
        .map(ToString::to_string);
    let cpt_codes = record.get(3).unwrap_or_default().trim().to_string();

    Ok(NewClaimDetail {
        claim_id,
        denial_reason,
        cpt_codes,
    })
}

/// 1-based line a record starts on. Blank lines are skipped by the reader,
/// so the record index alone can drift from the file.
fn record_line(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .and_then(|p| usize::try_from(p.line()).ok())
        .unwrap_or(fallback)
}

fn unreadable(file: &str, err: impl std::fmt::Display) -> ClaimsError {
    ClaimsError::UnreadableFile {
        file: file.to_string(),
        reason: err.to_string(),
    }
}

/// Parse a claim list. The first row is a header naming the columns.
/// Rows are numbered by file line, so the first data row is 2.
pub fn parse_claims<R: Read>(reader: R, source: &str) -> ClaimsResult<ParsedFile<NewClaim>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| unreadable(source, e))?.clone();
    let columns = ClaimColumns::from_headers(&headers);

    let mut parsed = ParsedFile::default();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| unreadable(source, e))?;
        let row = record_line(&record, index + 2);
        match parse_claim_record(&record, &columns) {
            Ok(value) => parsed.rows.push(ParsedRow { row, value }),
            Err(reason) => parsed.issues.push(RowIssue::new(
                ImportFile::ClaimList,
                row,
                format!("Error processing claim at row {row}: {reason}"),
            )),
        }
    }
    Ok(parsed)
}

/// Parse a claim detail file with positional columns
/// `detail_id|claim_id|denial_reason|cpt_codes`. A leading header row is
/// skipped. Rows are numbered by file line, starting at 1.
pub fn parse_details<R: Read>(reader: R, source: &str) -> ClaimsResult<ParsedFile<NewClaimDetail>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedFile::default();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| unreadable(source, e))?;
        let row = record_line(&record, index + 1);
        if index == 0 && is_detail_header(&record) {
            continue;
        }
        match parse_detail_record(&record) {
            Ok(value) => parsed.rows.push(ParsedRow { row, value }),
            Err(reason) => parsed.issues.push(RowIssue::new(
                ImportFile::ClaimDetail,
                row,
                format!("Error processing claim detail at row {row}: {reason}"),
            )),
        }
    }
    Ok(parsed)
}

fn is_detail_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(str::trim)
        .is_some_and(|f| f.eq_ignore_ascii_case("id") || f.eq_ignore_ascii_case("detail_id"))
}

/// Open and parse a claim list from disk.
pub fn read_claims_file(path: &Path) -> ClaimsResult<ParsedFile<NewClaim>> {
    let source = path.display().to_string();
    let file = open(path)?;
    parse_claims(file, &source)
}

/// Open and parse a claim detail file from disk.
pub fn read_details_file(path: &Path) -> ClaimsResult<ParsedFile<NewClaimDetail>> {
    let source = path.display().to_string();
    let file = open(path)?;
    parse_details(file, &source)
}

fn open(path: &Path) -> ClaimsResult<std::fs::File> {
    if !path.exists() {
        return Err(ClaimsError::FileNotFound(path.display().to_string()));
    }
    std::fs::File::open(path).map_err(|e| unreadable(&path.display().to_string(), e))
}
