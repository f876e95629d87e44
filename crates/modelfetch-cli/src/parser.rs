//! Command-line arguments.
//!
//! `Cli` is the only place raw argument strings live; `Cli::to_options`
//! validates them into a `FetchOptions` value before anything touches the
//! network.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use modelfetch_core::{DEFAULT_MAX_PAGES, DEFAULT_THREADS, FetchOptions};

use crate::error::CliError;

/// Public Hugging Face host.
pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";

/// Download every file of a Hugging Face model repository.
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "modelfetch")]
#[command(about = "Download model repositories from Hugging Face")]
#[command(version)]
pub struct Cli {
    /// Model to download, as `owner/name`
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Branch to download from
    #[arg(long, default_value = "main")]
    pub branch: String,

    /// Number of files to download simultaneously
    #[arg(long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Only download text files (configs, tokenizers, docs)
    #[arg(long = "text-only")]
    pub text_only: bool,

    /// Base folder to save the model into (defaults to `models` or `loras`)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Do not resume partial downloads
    #[arg(long)]
    pub clean: bool,

    /// Verify sha256 checksums after downloading
    #[arg(long)]
    pub check: bool,

    /// Clone the repository with git instead of downloading files
    #[arg(long = "git-clone", conflicts_with_all = ["text_only", "check", "clean"])]
    pub git_clone: bool,

    /// Timeout in seconds for each network operation
    #[arg(long, value_name = "SECS", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Maximum number of listing pages to fetch
    #[arg(long = "max-pages", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// Access token for private or gated repositories
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Hugging Face host to talk to
    #[arg(long, env = "HF_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Validate the arguments into fetch options.
    pub fn to_options(&self) -> Result<FetchOptions, CliError> {
        let options = FetchOptions::new(&self.model, &self.branch)?
            .with_threads(self.threads)
            .with_text_only(self.text_only)
            .with_output(self.output.clone())
            .with_clean(self.clean)
            .with_check(self.check)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_max_pages(self.max_pages)
            .with_token(self.token.clone());
        Ok(options)
    }

    /// Endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Base URL of the listing API under the endpoint.
    pub fn api_base(&self) -> String {
        format!("{}/api/models", self.endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["modelfetch", "facebook/opt-1.3b"]);
        assert_eq!(cli.model, "facebook/opt-1.3b");
        assert_eq!(cli.branch, "main");
        assert_eq!(cli.threads, DEFAULT_THREADS);
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.max_pages, DEFAULT_MAX_PAGES);
        assert!(!cli.text_only && !cli.clean && !cli.check && !cli.git_clone);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "modelfetch",
            "org/model",
            "--branch",
            "dev",
            "--threads",
            "4",
            "--text-only",
            "--output",
            "/tmp/out",
            "--check",
            "--timeout",
            "5",
            "--max-pages",
            "3",
            "--token",
            "hf_abc",
            "--endpoint",
            "http://127.0.0.1:8080/",
            "-v",
        ]);

        let options = cli.to_options().unwrap();
        assert_eq!(options.branch.as_str(), "dev");
        assert_eq!(options.threads, 4);
        assert!(options.text_only);
        assert!(options.check);
        assert_eq!(options.output, Some(PathBuf::from("/tmp/out")));
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.max_pages, 3);
        assert_eq!(options.token.as_deref(), Some("hf_abc"));
        assert!(cli.verbose);
        assert_eq!(cli.endpoint(), "http://127.0.0.1:8080");
        assert_eq!(cli.api_base(), "http://127.0.0.1:8080/api/models");
    }

    #[test]
    fn test_git_clone_conflicts_with_check() {
        let result = Cli::try_parse_from(["modelfetch", "org/model", "--git-clone", "--check"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = Cli::try_parse_from(["modelfetch", "org/model", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_model_is_argument_error() {
        let cli = Cli::parse_from(["modelfetch", "not-a-model"]);
        let err = cli.to_options().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
