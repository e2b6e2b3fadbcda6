use std::fmt::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

const MAX_STEM_CHARS: usize = 80;

/// Local name for a job's enriched file: `enriched_{stem}--{hash8(job_id)}.{ext}`.
///
/// The stem comes from the uploaded file name with path separators and
/// control characters replaced; the extension is kept when it is one the
/// server produces (`csv`, `xlsx`, `xls`), otherwise `csv`.
pub fn result_filename(source_filename: &str, job_id: &str) -> String {
    let path = Path::new(source_filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(sanitize_stem)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "result".to_string());
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| matches!(e.as_str(), "csv" | "xlsx" | "xls"))
        .unwrap_or_else(|| "csv".to_string());
    format!("enriched_{stem}--{}.{ext}", job_hash(job_id))
}

fn sanitize_stem(stem: &str) -> String {
    let mut cleaned = String::with_capacity(stem.len());
    for c in stem.chars().take(MAX_STEM_CHARS) {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && cleaned.ends_with('_') {
            continue;
        }
        cleaned.push(c);
    }
    cleaned.trim_matches(&['_', ' ', '.'][..]).to_string()
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}

fn job_hash(job_id: &str) -> String {
    let digest = Sha256::digest(job_id.as_bytes());
    digest.iter().take(4).fold(String::with_capacity(8), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    })
}
