/// PTS point file parser
///
/// A PTS file holds one record per line, each record a run of
/// whitespace-separated decimal numbers. Three numbers make a position
/// point, six numbers a position plus direction. Any other count is
/// reported and skipped; it never aborts the load.
///
/// Scanning stops at the first token that does not start with a number, so
/// `1 2 3 garbage` scans as three values and is accepted. Such lines are
/// flagged with a warning and counted in [`ParseOutcome::truncated`].
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nom::{character::complete::multispace0, number::complete::float, sequence::preceded, IResult};

use crate::error::{PtsError, Result};
use crate::point::{PointSet, PtsRecord};

/// A line that did not scan to exactly 3 or 6 numbers
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    /// 1-based line number
    pub line_number: usize,
    pub content: String,
    /// Number of values scanned before the line ended or a non-number was hit
    pub token_count: usize,
}

/// Everything a PTS load produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub points: PointSet,
    pub rejected: Vec<RejectedLine>,
    /// Accepted lines that carried trailing non-numeric content
    pub truncated: usize,
}

impl ParseOutcome {
    /// Total number of lines seen
    pub fn line_count(&self) -> usize {
        self.points.len() + self.rejected.len()
    }
}

/// Numbers scanned from a single line
#[derive(Debug, Clone, PartialEq)]
pub struct LineScan<'a> {
    pub values: Vec<f32>,
    /// Unscanned remainder, trimmed. Empty when the whole line was numeric.
    pub rest: &'a str,
}

fn scan_value(input: &str) -> IResult<&str, f32> {
    preceded(multispace0, float)(input)
}

/// Scan whitespace-separated floats until the first non-numeric token.
///
/// `nan`, `inf` and literals outside the `f32` range end the scan like any
/// other non-numeric token.
pub fn scan_line(line: &str) -> LineScan<'_> {
    let mut values = Vec::new();
    let mut input = line;
    while let Ok((rest, value)) = scan_value(input) {
        if !value.is_finite() {
            break;
        }
        values.push(value);
        input = rest;
    }

    LineScan {
        values,
        rest: input.trim(),
    }
}

/// Parse an in-memory PTS document
pub fn parse_str(input: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    for (index, line) in input.lines().enumerate() {
        outcome.accept_line(index + 1, line);
    }
    outcome.log_summary();
    outcome
}

/// Parse PTS data from any buffered reader.
///
/// Lines are split on `\n`, a trailing `\r` is dropped and invalid UTF-8 is
/// replaced rather than treated as an error.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<ParseOutcome> {
    let mut outcome = ParseOutcome::default();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let mut bytes = buf.as_slice();
        if let Some(stripped) = bytes.strip_suffix(b"\n") {
            bytes = stripped;
        }
        if let Some(stripped) = bytes.strip_suffix(b"\r") {
            bytes = stripped;
        }

        outcome.accept_line(line_number, &String::from_utf8_lossy(bytes));
    }

    outcome.log_summary();
    Ok(outcome)
}

/// Open and parse a PTS file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParseOutcome> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PtsError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "reading PTS file");
    parse_reader(BufReader::new(file))
}

impl ParseOutcome {
    fn accept_line(&mut self, line_number: usize, line: &str) {
        let scan = scan_line(line);

        match PtsRecord::from_values(&scan.values) {
            Some(record) => {
                if !scan.rest.is_empty() {
                    tracing::warn!(
                        line = line_number,
                        ignored = scan.rest,
                        "Trailing non-numeric content ignored in PTS line: {}",
                        line
                    );
                    self.truncated += 1;
                }
                self.points.push(record);
            }
            None => {
                tracing::warn!(
                    line = line_number,
                    tokens = scan.values.len(),
                    "Invalid line in PTS file: {}",
                    line
                );
                self.rejected.push(RejectedLine {
                    line_number,
                    content: line.to_string(),
                    token_count: scan.values.len(),
                });
            }
        }
    }

    fn log_summary(&self) {
        tracing::info!(
            positions = self.points.positions.len(),
            oriented = self.points.oriented.len(),
            rejected = self.rejected.len(),
            "PTS data loaded"
        );
    }
}
