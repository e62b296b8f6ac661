//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::chunking::ChunkPlan;
use crate::core::{Chunk, SessionUser, Summary, SummaryPath, User};
use crate::error::Error;
use crate::storage::StorageStats;
use serde::Serialize;
use std::fmt::Write;

/// Characters of chunk text shown in plan previews.
const PREVIEW_CHARS: usize = 48;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &StorageStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &StorageStats) -> String {
    let mut output = String::new();
    output.push_str("SummarAI Status\n");
    output.push_str("===============\n\n");
    let _ = writeln!(output, "  Users:         {}", stats.user_count);
    let _ = writeln!(
        output,
        "  Logged in as:  {}",
        stats.logged_in_as.as_deref().unwrap_or("-")
    );
    let _ = writeln!(output, "  Schema:        v{}", stats.schema_version);
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {}", format_size(size));
    }
    output
}

/// Formats the result of a signup or login.
#[must_use]
pub fn format_account(action: &str, user: &User, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "{action} as {} <{}>. Welcome, {}!\n",
            user.username, user.email, user.username
        ),
        OutputFormat::Json => format_json(&serde_json::json!({
            "action": action,
            "user": user,
        })),
    }
}

/// Formats the session user for `whoami` and `logout`.
#[must_use]
pub fn format_session_user(
    user: Option<&SessionUser>,
    empty_message: &str,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => user.map_or_else(
            || format!("{empty_message}\n"),
            |u| format!("{} (ID: {})\n", u.username, u.id),
        ),
        OutputFormat::Json => format_json(&serde_json::json!({ "user": user })),
    }
}

/// Formats a summary, wrapping text output at `width` columns.
#[must_use]
pub fn format_summary(summary: &Summary, width: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = summary.wrapped(width);
            output.push('\n');
            output
        }
        OutputFormat::Json => format_json(summary),
    }
}

/// Formats a chunk plan.
#[must_use]
pub fn format_plan(
    plan: &ChunkPlan,
    path: SummaryPath,
    chunks: &[Chunk],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_plan_text(plan, path, chunks),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct PlanWithPath<'a> {
                path: SummaryPath,
                #[serde(flatten)]
                plan: &'a ChunkPlan,
                dropped_tokens: usize,
                model_calls: usize,
            }
            format_json(&PlanWithPath {
                path,
                plan,
                dropped_tokens: plan.dropped_tokens(),
                model_calls: model_calls(plan, path),
            })
        }
    }
}

fn format_plan_text(plan: &ChunkPlan, path: SummaryPath, chunks: &[Chunk]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Path:         {}", path.as_str());
    let _ = writeln!(output, "Tokens:       {}", plan.total_tokens);
    let _ = writeln!(
        output,
        "Chunking:     {} tokens x {} max",
        plan.chunk_tokens, plan.max_chunks
    );
    let _ = writeln!(output, "Model calls:  {}", model_calls(plan, path));

    if path == SummaryPath::MapReduce {
        output.push('\n');
        let _ = writeln!(output, "{:<6} {:<16} {:<8} Preview", "Index", "Tokens", "Size");
        output.push_str(&"-".repeat(70));
        output.push('\n');
        for chunk in chunks {
            let _ = writeln!(
                output,
                "{:<6} {:<16} {:<8} {}",
                chunk.index,
                format!("{}..{}", chunk.start(), chunk.end()),
                chunk.token_count(),
                truncate(&chunk.preview(PREVIEW_CHARS + 1).replace('\n', " "), PREVIEW_CHARS)
            );
        }
    }

    if plan.is_truncated() {
        let _ = writeln!(
            output,
            "\nWarning: {} of {} tokens fall past the chunk cap and will be dropped.",
            plan.dropped_tokens(),
            plan.total_tokens
        );
    }
    output
}

fn model_calls(plan: &ChunkPlan, path: SummaryPath) -> usize {
    match path {
        SummaryPath::Direct => 1,
        SummaryPath::MapReduce => plan.windows.len() + 1,
    }
}

/// Formats an error for display.
///
/// JSON errors carry the error kind so callers can branch on it.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({
            "error": {
                "kind": error.kind(),
                "message": error.to_string(),
            }
        })),
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Truncates a string to `max_chars` characters with an ellipsis.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{head}...")
    }
}
