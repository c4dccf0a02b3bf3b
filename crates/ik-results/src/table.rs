//! Plain-text query input and tabular output.

use crate::types::AngleRow;
use crate::{ResultsError, ResultsResult};
use ik_kinematics::{AngleRecord, AngleSolution, Query, QueryError};
use std::fmt::Write as _;

pub const TABLE_HEADER: &str =
    "ex_mev\tz_cm\ttheta_cm_deg\ttheta_lab_deg\tke_lab_mev\titerations\tstatus";

/// Parse `ex z` pairs, one per line, separated by whitespace.
///
/// Blank lines and lines starting with `#` are skipped; columns past the
/// second are ignored.
pub fn parse_queries(text: &str) -> ResultsResult<Vec<Query>> {
    let mut queries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        let mut fields = line.split_whitespace();
        let ex = parse_field(fields.next(), "excitation energy", line_no)?;
        let z = parse_field(fields.next(), "position", line_no)?;
        queries.push(Query::new(ex, z));
    }
    Ok(queries)
}

fn parse_field(field: Option<&str>, what: &str, line: usize) -> ResultsResult<f64> {
    let field = field.ok_or_else(|| ResultsError::Parse {
        line,
        message: format!("missing {what}"),
    })?;
    field.parse::<f64>().map_err(|e| ResultsError::Parse {
        line,
        message: format!("bad {what} '{field}': {e}"),
    })
}

/// Short machine-readable status for one outcome.
pub fn status_tag(outcome: &Result<AngleSolution, QueryError>) -> String {
    match outcome {
        Ok(_) => "ok".to_string(),
        Err(QueryError::Forbidden { reason, .. }) => format!("forbidden:{}", reason.tag()),
        Err(QueryError::NotConverged { .. }) => "not-converged".to_string(),
        Err(QueryError::InvalidInput { .. }) => "invalid".to_string(),
    }
}

pub fn format_table(records: &[AngleRecord]) -> String {
    let rows: Vec<AngleRow> = records.iter().map(AngleRow::from).collect();
    format_rows(&rows)
}

/// Tab-separated table with a header line; missing values print as `nan`.
pub fn format_rows(rows: &[AngleRow]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(TABLE_HEADER);
    out.push('\n');
    for row in rows {
        let iterations = row
            .iterations
            .map_or_else(|| "nan".to_string(), |n| n.to_string());
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.ex_mev,
            row.z_cm,
            fixed(row.theta_cm_deg),
            fixed(row.theta_lab_deg),
            fixed(row.ke_lab_mev),
            iterations,
            row.status
        );
    }
    out
}

fn fixed(value: Option<f64>) -> String {
    value.map_or_else(|| "nan".to_string(), |v| format!("{v:.6}"))
}
