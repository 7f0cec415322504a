//! Vendor sheet normalizer — semi-structured vendor lines to fixed-column
//! records.
//!
//! A standalone collaborator with no data dependency on the alignment
//! pipeline (it shares only the informal `RSI_pool_env_delta` column name).
//! Input is newline-delimited text, comma- or whitespace-separated; output is
//! one [`SheetRecord`] per parseable data row.
//!
//! A row starting with `svcA`, `svc1`, etc. is **data** — only a line whose
//! first field is exactly `svc` (case-insensitive), and which does not itself
//! look like a data row, is treated as a header and skipped.
//!
//! Unparseable rows are recoverable per-row failures: the row is skipped, a
//! diagnostic is emitted, and the remaining rows are still processed. A batch
//! never aborts because of one bad line.
//!
//! Requires the `vendor` feature (pulls in `std`).

use thiserror::Error;

/// Canonical column names, in output order.
pub const HEADERS: [&str; 8] = [
    "svc",
    "comparison",
    "tokens_saved_pct",
    "retry_drop_pct",
    "latency_saved_pct",
    "unit_cost_saved_pct",
    "RSI_pool_env_delta",
    "weekly_savings_usd",
];

/// One normalized vendor sheet row.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetRecord {
    /// Service identifier (first field, e.g. `svcA`).
    pub svc: String,
    /// Free-text comparison label; may span several source tokens.
    pub comparison: String,
    /// Percentage of tokens saved.
    pub tokens_saved_pct: f64,
    /// Percentage drop in retries.
    pub retry_drop_pct: f64,
    /// Percentage of latency saved.
    pub latency_saved_pct: f64,
    /// Percentage of unit cost saved.
    pub unit_cost_saved_pct: f64,
    /// Opaque delta string — carried through verbatim, never interpreted.
    pub rsi_pool_env_delta: String,
    /// Weekly savings in whole dollars, from a leading-`$` token or a
    /// trailing bare integer.
    pub weekly_savings_usd: i64,
}

/// Why a single row could not be parsed.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    /// Fewer fields than the minimum layout allows.
    #[error("row too short: {0} fields, need at least 7")]
    TooShort(usize),
    /// No `$` token and no trailing bare integer to anchor the layout on.
    #[error("cannot find USD or integer amount token")]
    MissingAmount,
    /// The amount token leaves no room for the five value fields plus a head.
    #[error("not enough fields before the amount token")]
    TruncatedHead,
    /// A percentage field failed to parse as a float.
    #[error("failed to parse {field} from {token:?}")]
    BadPercentage {
        /// Which column was being parsed.
        field: &'static str,
        /// The offending token.
        token: String,
    },
    /// A `$` token contained no digits at all.
    #[error("cannot parse integer from currency token {0:?}")]
    BadCurrency(String),
}

/// One skipped input line and the reason it was dropped.
#[derive(Debug, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the input.
    pub line_number: usize,
    /// The per-row parse failure.
    pub error: RowError,
}

/// Result of normalizing a batch of lines.
#[derive(Debug, Default)]
pub struct Normalized {
    /// Successfully parsed records, in input order.
    pub records: Vec<SheetRecord>,
    /// Rows skipped with their reasons, in input order.
    pub skipped: Vec<SkippedLine>,
}

// ─── Tokenizing ─────────────────────────────────────────────────────────────

/// Split one raw line into trimmed fields.
///
/// Comma-separated lines honor double-quoted fields (doubled quotes escape);
/// anything else splits on whitespace runs. Unquoted currency amounts that
/// the comma pass fragments — `$182,400` arriving as `$182` + `400` — are
/// re-merged when every continuation token is exactly three digits.
pub fn split_line(line: &str) -> Vec<String> {
    let s = line.trim();
    if s.is_empty() {
        return Vec::new();
    }
    if s.contains(',') {
        merge_currency_fragments(split_csv(s))
    } else {
        s.split_whitespace().map(str::to_string).collect()
    }
}

/// Quote-aware comma split. Doubled quotes inside a quoted field become a
/// literal quote.
fn split_csv(s: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn merge_currency_fragments(row: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(row.len());
    let mut i = 0;
    while i < row.len() {
        let tok = &row[i];
        if tok.starts_with('$') {
            let mut combined = tok.clone();
            let mut j = i + 1;
            while j < row.len() && is_three_digits(&row[j]) {
                combined.push_str(&row[j]);
                j += 1;
            }
            merged.push(combined);
            i = j;
        } else {
            merged.push(tok.clone());
            i += 1;
        }
    }
    merged
}

fn is_three_digits(tok: &str) -> bool {
    tok.len() == 3 && tok.chars().all(|c| c.is_ascii_digit())
}

fn is_all_digits(tok: &str) -> bool {
    !tok.is_empty() && tok.chars().all(|c| c.is_ascii_digit())
}

// ─── Row layout ─────────────────────────────────────────────────────────────

/// A line is a header only when its first field is exactly `svc`,
/// case-insensitive. `svcA`, `svc1`, etc. are data rows.
pub fn is_header(fields: &[String]) -> bool {
    fields
        .first()
        .map(|f| f.trim().eq_ignore_ascii_case("svc"))
        .unwrap_or(false)
}

/// Index of the rightmost `$`-prefixed token, if any.
fn find_usd_token(fields: &[String]) -> Option<usize> {
    fields.iter().rposition(|t| t.trim().starts_with('$'))
}

/// A header-shaped line that nevertheless carries a trailing `$` amount with
/// five value fields and a non-empty head is data, not a header.
fn header_looks_like_data(fields: &[String]) -> bool {
    match find_usd_token(fields) {
        Some(usd_idx) => usd_idx >= 6,
        None => false,
    }
}

fn parse_percentage(tok: &str, field: &'static str) -> Result<f64, RowError> {
    tok.trim().parse::<f64>().map_err(|_| RowError::BadPercentage {
        field,
        token: tok.to_string(),
    })
}

fn parse_currency(tok: &str) -> Result<i64, RowError> {
    let digits: String = tok.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<i64>()
        .map_err(|_| RowError::BadCurrency(tok.to_string()))
}

/// Parse one tokenized data row.
///
/// Expected layout: `svc`, comparison tokens, four percentage fields, one
/// opaque delta field, and the amount token — `$`-prefixed, or a trailing
/// bare integer. The amount anchors the layout: the five value tokens sit
/// immediately before it, everything earlier is `svc` plus the comparison.
pub fn parse_row(fields: &[String]) -> Result<SheetRecord, RowError> {
    if fields.len() < 7 {
        return Err(RowError::TooShort(fields.len()));
    }

    let usd_idx = match find_usd_token(fields) {
        Some(i) => i,
        None => fields
            .iter()
            .rposition(|t| is_all_digits(t.trim()))
            .ok_or(RowError::MissingAmount)?,
    };

    if usd_idx < 6 {
        return Err(RowError::TruncatedHead);
    }
    let tail_start = usd_idx - 5;

    let head = &fields[..tail_start];
    let tail = &fields[tail_start..usd_idx];
    let usd_tok = fields[usd_idx].trim();

    let svc = head[0].trim().to_string();
    let comparison = head[1..]
        .iter()
        .map(|h| h.trim())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    let weekly_savings_usd = if usd_tok.starts_with('$') {
        parse_currency(usd_tok)?
    } else {
        // Fallback path found a bare integer token.
        usd_tok
            .parse::<i64>()
            .map_err(|_| RowError::BadCurrency(usd_tok.to_string()))?
    };

    Ok(SheetRecord {
        svc,
        comparison,
        tokens_saved_pct: parse_percentage(&tail[0], "tokens_saved_pct")?,
        retry_drop_pct: parse_percentage(&tail[1], "retry_drop_pct")?,
        latency_saved_pct: parse_percentage(&tail[2], "latency_saved_pct")?,
        unit_cost_saved_pct: parse_percentage(&tail[3], "unit_cost_saved_pct")?,
        rsi_pool_env_delta: tail[4].trim().to_string(),
        weekly_savings_usd,
    })
}

// ─── Batch entry point ──────────────────────────────────────────────────────

/// Normalize a batch of raw lines into records.
///
/// Blank lines and `#` comments are ignored. A true header line (see
/// [`is_header`]) is skipped once recognized. Every other unparseable row is
/// recorded in [`Normalized::skipped`] with a warning diagnostic, and
/// processing continues with the next line.
pub fn normalize_lines<'a, I>(lines: I) -> Normalized
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Normalized::default();

    for (idx, raw) in lines.into_iter().enumerate() {
        let line_number = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_line(raw);
        if fields.is_empty() {
            continue;
        }

        if is_header(&fields) && !header_looks_like_data(&fields) {
            continue;
        }

        match parse_row(&fields) {
            Ok(record) => out.records.push(record),
            Err(error) => {
                tracing::warn!(line_number, line = raw, %error, "skipping unparseable vendor row");
                out.skipped.push(SkippedLine { line_number, error });
            }
        }
    }

    out
}

/// Render records as CSV text with the canonical [`HEADERS`] row.
///
/// Fields containing commas, quotes, or newlines are double-quoted with
/// doubled inner quotes.
pub fn to_csv(records: &[SheetRecord]) -> String {
    let mut out = String::new();
    out.push_str(&HEADERS.join(","));
    out.push('\n');
    for r in records {
        let fields = [
            csv_escape(&r.svc),
            csv_escape(&r.comparison),
            r.tokens_saved_pct.to_string(),
            r.retry_drop_pct.to_string(),
            r.latency_saved_pct.to_string(),
            r.unit_cost_saved_pct.to_string(),
            csv_escape(&r.rsi_pool_env_delta),
            r.weekly_savings_usd.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
