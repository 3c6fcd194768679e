//! Output formatting for extraction runs - plaintext and JSON.
//!
//! Each fragment is summarized with its statement count, rendered size,
//! and a SHA-256 content digest. The digest is what content-derived
//! fragment file names are built from: two runs over identical inputs
//! produce identical digests.

use crate::emit::render_fragment;
use crate::ir::Statement;
use crate::model::Program;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Summary of one extracted fragment.
#[derive(Debug, Clone, Serialize)]
pub struct FragmentSummary {
    /// Index of the split point this fragment belongs to.
    pub split_point: usize,
    /// Number of statements selected.
    pub statements: usize,
    /// Size of the rendered fragment in bytes.
    pub bytes: usize,
    /// SHA-256 digest of the rendered fragment.
    pub digest: String,
}

/// Report envelope for a whole extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub generated_at: String,
    pub fragments: Vec<FragmentSummary>,
}

impl ExtractionReport {
    /// Summarize the fragments of one run, in split-point order.
    pub fn new(program: &Program, fragments: &[Vec<Statement>]) -> Self {
        let summaries = fragments
            .iter()
            .enumerate()
            .map(|(split_point, statements)| {
                let rendered = render_fragment(program, statements);
                FragmentSummary {
                    split_point,
                    statements: statements.len(),
                    bytes: rendered.len(),
                    digest: digest_text(&rendered),
                }
            })
            .collect();
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            fragments: summaries,
        }
    }

    pub fn total_statements(&self) -> usize {
        self.fragments.iter().map(|f| f.statements).sum()
    }
}

/// SHA-256 digest of rendered fragment text, hex-encoded.
fn digest_text(text: &str) -> String {
    let mut sha = Sha256::new();
    sha.update(text.as_bytes());
    format!("{:x}", sha.finalize())
}

/// Prints an extraction report in plain text format.
pub fn print_plain(report: &ExtractionReport) {
    if report.fragments.is_empty() {
        println!("No fragments extracted.");
        return;
    }
    println!("FRAGMENTS ({}):", report.fragments.len());
    for fragment in &report.fragments {
        println!(
            "- split point {}: {} statements, {} bytes, sha256 {}",
            fragment.split_point,
            fragment.statements,
            fragment.bytes,
            &fragment.digest[..12.min(fragment.digest.len())]
        );
    }
}

/// Prints an extraction report in JSON format.
pub fn print_json(report: &ExtractionReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            // Fallback: the envelope is plain data, so this should not
            // happen, but the report must still reach the user.
            eprintln!("[WARN] JSON serialization failed: {}", e);
            print_plain(report);
        }
    }
}
