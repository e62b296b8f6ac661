//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::auth::Accounts;
use crate::chunking::FixedWindowChunker;
use crate::cli::output::{
    OutputFormat, format_account, format_plan, format_session_user, format_status,
    format_summary,
};
use crate::cli::parser::{Cli, Commands, InputArgs};
use crate::config::Config;
use crate::core::{Session, SummaryPath};
use crate::error::{CommandError, InputError, Result, StorageError};
use crate::io::{read_file, read_stdin};
use crate::service::create_service;
use crate::storage::{SqliteStorage, Storage};
use crate::summarizer::ChunkedSummarizer;
use std::path::Path;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force, format),
        Commands::Status => cmd_status(&db_path, format),
        Commands::Signup {
            username,
            email,
            password,
        } => cmd_signup(&db_path, username, email, password, format),
        Commands::Login { email, password } => cmd_login(&db_path, email, password, format),
        Commands::Logout => cmd_logout(&db_path, format),
        Commands::Whoami => cmd_whoami(&db_path, format),
        Commands::Summarize {
            file,
            input,
            parallel,
            width,
        } => cmd_summarize(
            &db_path,
            config_path,
            file.as_deref(),
            input,
            *parallel,
            *width,
            format,
        ),
        Commands::Plan { file, input } => cmd_plan(config_path, file.as_deref(), input, format),
    }
}

/// Opens storage and ensures it's initialized.
fn open_storage(db_path: &Path) -> Result<SqliteStorage> {
    let storage = SqliteStorage::open(db_path)?;

    if !storage.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }

    Ok(storage)
}

/// Loads the config file and applies command-line overrides.
fn load_config(config_path: Option<&Path>, input: &InputArgs, parallel: bool) -> Result<Config> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(chunk_tokens) = input.chunk_tokens {
        config.summarizer.chunk_tokens = chunk_tokens;
    }
    if let Some(max_chunks) = input.max_chunks {
        config.summarizer.max_chunks = max_chunks;
    }
    if parallel {
        config.summarizer.parallel_map = true;
    }
    Ok(config)
}

/// Reads `--text`, else `file`, else stdin, and trims the result.
fn read_input(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    let raw = match (text, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => read_file(path)?,
        (None, None) => read_stdin()?,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyText.into());
    }
    Ok(trimmed.to_string())
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool, _format: OutputFormat) -> Result<String> {
    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
    }

    let mut storage = SqliteStorage::open(db_path)?;
    storage.init()?;
    storage.save_session(&Session::new())?;

    Ok(format!(
        "Initialized SummarAI database at: {}\n",
        db_path.display()
    ))
}

fn cmd_status(db_path: &Path, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let stats = storage.stats()?;
    Ok(format_status(&stats, format))
}

fn cmd_signup(
    db_path: &Path,
    username: &str,
    email: &str,
    password: &str,
    format: OutputFormat,
) -> Result<String> {
    let mut storage = open_storage(db_path)?;
    let user = Accounts::new(&mut storage).signup(username, email, password)?;
    Ok(format_account("Signed up", &user, format))
}

fn cmd_login(db_path: &Path, email: &str, password: &str, format: OutputFormat) -> Result<String> {
    let mut storage = open_storage(db_path)?;
    let user = Accounts::new(&mut storage).login(email, password)?;
    Ok(format_account("Logged in", &user, format))
}

fn cmd_logout(db_path: &Path, format: OutputFormat) -> Result<String> {
    let mut storage = open_storage(db_path)?;
    let user = Accounts::new(&mut storage).logout()?;
    match (format, &user) {
        (OutputFormat::Text, Some(user)) => Ok(format!("Logged out {}.\n", user.username)),
        _ => Ok(format_session_user(
            user.as_ref(),
            "Nobody was logged in.",
            format,
        )),
    }
}

fn cmd_whoami(db_path: &Path, format: OutputFormat) -> Result<String> {
    let mut storage = open_storage(db_path)?;
    let user = Accounts::new(&mut storage).current_user()?;
    Ok(format_session_user(user.as_ref(), "Not logged in.", format))
}

fn cmd_summarize(
    db_path: &Path,
    config_path: Option<&Path>,
    file: Option<&Path>,
    input: &InputArgs,
    parallel: bool,
    width: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    let mut storage = open_storage(db_path)?;
    let user = Accounts::new(&mut storage).require_user()?;

    let config = load_config(config_path, input, parallel)?;
    let text = read_input(input.text.as_deref(), file)?;

    let service = create_service()?;
    let summarizer = ChunkedSummarizer::new(service.as_ref(), config.summarizer)?;
    tracing::debug!(user = %user.username, chars = text.len(), "summarize requested");
    let summary = summarizer.summarize(&text)?;

    Ok(format_summary(
        &summary,
        width.unwrap_or(config.wrap_width),
        format,
    ))
}

fn cmd_plan(
    config_path: Option<&Path>,
    file: Option<&Path>,
    input: &InputArgs,
    format: OutputFormat,
) -> Result<String> {
    let config = load_config(config_path, input, false)?;
    let text = read_input(input.text.as_deref(), file)?;

    let service = create_service()?;
    config.summarizer.validate(service.max_input_tokens())?;
    let chunker =
        FixedWindowChunker::new(config.summarizer.chunk_tokens, config.summarizer.max_chunks)?;

    let tokens = service.tokenize(&text)?;
    let plan = chunker.plan(tokens.len());
    let (path, chunks) = if chunker.fits(tokens.len()) {
        (SummaryPath::Direct, Vec::new())
    } else {
        let chunks = FixedWindowChunker::decode(&plan, &tokens, service.as_ref())?;
        (SummaryPath::MapReduce, chunks)
    };

    Ok(format_plan(&plan, path, &chunks, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, ChunkingError, Error};
    use tempfile::TempDir;

    fn setup() -> (TempDir, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        (temp_dir, db_path)
    }

    fn text_input(text: &str) -> InputArgs {
        InputArgs {
            text: Some(text.to_string()),
            ..InputArgs::default()
        }
    }

    #[test]
    fn test_cmd_init() {
        let (_temp_dir, db_path) = setup();
        let result = cmd_init(&db_path, false, OutputFormat::Text);
        assert!(result.is_ok());
        assert!(db_path.exists());
    }

    #[test]
    fn test_cmd_init_already_exists() {
        let (_temp_dir, db_path) = setup();

        cmd_init(&db_path, false, OutputFormat::Text).unwrap();

        // Second init should fail without force
        let result = cmd_init(&db_path, false, OutputFormat::Text);
        assert!(result.is_err());

        let result = cmd_init(&db_path, true, OutputFormat::Text);
        assert!(result.is_ok());
    }

    #[test]
    fn test_cmd_status_requires_init() {
        let (_temp_dir, db_path) = setup();
        let err = cmd_status(&db_path, OutputFormat::Text).unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::NotInitialized)));
    }

    #[test]
    fn test_cmd_status() {
        let (_temp_dir, db_path) = setup();
        cmd_init(&db_path, false, OutputFormat::Text).unwrap();

        let result = cmd_status(&db_path, OutputFormat::Text).unwrap();
        assert!(result.contains("Users:         0"));
    }

    #[test]
    fn test_signup_whoami_logout() {
        let (_temp_dir, db_path) = setup();
        cmd_init(&db_path, false, OutputFormat::Text).unwrap();

        let out = cmd_signup(&db_path, "ada", "ada@example.com", "pw", OutputFormat::Text).unwrap();
        assert!(out.contains("Welcome, ada!"));

        let out = cmd_whoami(&db_path, OutputFormat::Text).unwrap();
        assert!(out.starts_with("ada (ID: "));

        let out = cmd_logout(&db_path, OutputFormat::Text).unwrap();
        assert_eq!(out, "Logged out ada.\n");

        let out = cmd_whoami(&db_path, OutputFormat::Text).unwrap();
        assert_eq!(out, "Not logged in.\n");
    }

    #[test]
    fn test_cmd_login() {
        let (_temp_dir, db_path) = setup();
        cmd_init(&db_path, false, OutputFormat::Text).unwrap();
        cmd_signup(&db_path, "ada", "ada@example.com", "pw", OutputFormat::Text).unwrap();
        cmd_logout(&db_path, OutputFormat::Text).unwrap();

        let err = cmd_login(&db_path, "ada@example.com", "bad", OutputFormat::Text).unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));

        let out = cmd_login(&db_path, "ada@example.com", "pw", OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["user"]["username"], "ada");
        assert!(json["user"].get("password_hash").is_none());
    }

    #[test]
    fn test_cmd_summarize_requires_login() {
        let (_temp_dir, db_path) = setup();
        cmd_init(&db_path, false, OutputFormat::Text).unwrap();

        let err = cmd_summarize(
            &db_path,
            None,
            None,
            &text_input("Some text."),
            false,
            None,
            OutputFormat::Text,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::NotLoggedIn)));
    }

    #[test]
    fn test_cmd_summarize_empty_text() {
        let (_temp_dir, db_path) = setup();
        cmd_init(&db_path, false, OutputFormat::Text).unwrap();
        cmd_signup(&db_path, "ada", "ada@example.com", "pw", OutputFormat::Text).unwrap();

        let err = cmd_summarize(
            &db_path,
            None,
            None,
            &text_input("   \n\t "),
            false,
            None,
            OutputFormat::Text,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Input(InputError::EmptyText)));
    }

    #[test]
    fn test_cmd_summarize_short_text() {
        let (_temp_dir, db_path) = setup();
        cmd_init(&db_path, false, OutputFormat::Text).unwrap();
        cmd_signup(&db_path, "ada", "ada@example.com", "pw", OutputFormat::Text).unwrap();

        let out = cmd_summarize(
            &db_path,
            None,
            None,
            &text_input("  Rust is fast. Rust is safe.  "),
            false,
            None,
            OutputFormat::Text,
        )
        .unwrap();
        assert_eq!(out, "Rust is fast. Rust is safe.\n");
    }

    #[test]
    fn test_cmd_summarize_long_text_json() {
        let (temp_dir, db_path) = setup();
        cmd_init(&db_path, false, OutputFormat::Text).unwrap();
        cmd_signup(&db_path, "ada", "ada@example.com", "pw", OutputFormat::Text).unwrap();

        let file = temp_dir.path().join("article.txt");
        std::fs::write(&file, "A sentence about chunking. ".repeat(200)).unwrap();

        let out = cmd_summarize(
            &db_path,
            None,
            Some(&file),
            &InputArgs::default(),
            true,
            None,
            OutputFormat::Json,
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["path"], "map_reduce");
        assert_eq!(json["chunk_count"], 5);
        assert!(json["truncation"].is_object());
    }

    #[test]
    fn test_cmd_plan() {
        let input = InputArgs {
            text: Some("x".repeat(2500)),
            chunk_tokens: Some(1000),
            max_chunks: Some(2),
        };
        let out = cmd_plan(None, None, &input, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["path"], "map_reduce");
        assert_eq!(json["windows"].as_array().unwrap().len(), 2);
        assert_eq!(json["dropped_tokens"], 500);
        assert_eq!(json["model_calls"], 3);
    }

    #[test]
    fn test_cmd_plan_rejects_reduce_input_beyond_window() {
        let input = InputArgs {
            text: Some("x".repeat(2500)),
            chunk_tokens: None,
            max_chunks: Some(10),
        };
        let err = cmd_plan(None, None, &input, OutputFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            Error::Chunking(ChunkingError::ReduceInputTooLarge { .. })
        ));
    }

    #[test]
    fn test_cmd_plan_direct() {
        let out = cmd_plan(None, None, &text_input("short"), OutputFormat::Text).unwrap();
        assert!(out.contains("Path:         direct"));
        assert!(out.contains("Model calls:  1"));
    }

    #[test]
    fn test_load_config_overrides() {
        let input = InputArgs {
            text: None,
            chunk_tokens: Some(300),
            max_chunks: None,
        };
        let config = load_config(None, &input, true).unwrap();
        assert_eq!(config.summarizer.chunk_tokens, 300);
        assert_eq!(config.summarizer.max_chunks, 5);
        assert!(config.summarizer.parallel_map);
    }
}
