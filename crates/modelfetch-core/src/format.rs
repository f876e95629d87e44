//! File format classification.
//!
//! Classification is a pure function of the path: the same path always
//! yields the same `FileFormat`. Only the last path segment is inspected,
//! so `subdir/pytorch_model.bin` classifies like `pytorch_model.bin`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Prefixes of full PyTorch / adapter weight files.
const PYTORCH_PREFIXES: &[&str] = &["pytorch_model", "adapter_model"];

/// Extensions of generic PyTorch checkpoints.
const PT_EXTENSIONS: &[&str] = &["pt", "pth"];

/// Extensions treated as small text files.
const TEXT_EXTENSIONS: &[&str] = &["txt", "json", "py", "md"];

/// File names that mark a repository as a fine-tuning adapter (LoRA).
const ADAPTER_SUFFIXES: &[&str] = &[
    "adapter_config.json",
    "adapter_model.bin",
    "adapter_model.safetensors",
];

/// Classification of a file found in a repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// `pytorch_model*.bin` / `adapter_model*.bin`
    Pytorch,
    /// `*.safetensors` (including shard indexes)
    Safetensors,
    /// Generic `*.pt` / `*.pth` checkpoint
    Pt,
    /// `ggml*.bin`
    Ggml,
    /// `tokenizer*.model`
    Tokenizer,
    /// `*.txt`, `*.json`, `*.py`, `*.md`
    Text,
    /// Anything else; never downloaded.
    Unclassified,
}

impl FileFormat {
    /// Classify a repository path.
    ///
    /// Checks run in precedence order and the first match wins.
    pub fn classify(path: &str) -> Self {
        let name = file_name(path);

        if PYTORCH_PREFIXES
            .iter()
            .any(|prefix| name.strip_prefix(prefix).is_some_and(|rest| rest.contains(".bin")))
        {
            Self::Pytorch
        } else if name.contains(".safetensors") {
            Self::Safetensors
        } else if has_extension(name, PT_EXTENSIONS) {
            Self::Pt
        } else if name
            .strip_prefix("ggml")
            .is_some_and(|rest| rest.contains(".bin"))
        {
            Self::Ggml
        } else if name.starts_with("tokenizer") && name.ends_with(".model") {
            Self::Tokenizer
        } else if has_extension(name, TEXT_EXTENSIONS) {
            Self::Text
        } else {
            Self::Unclassified
        }
    }

    /// Text and tokenizer files are fetched even in text-only mode.
    pub const fn is_text_like(self) -> bool {
        matches!(self, Self::Text | Self::Tokenizer)
    }

    /// Formats dropped when a safetensors variant is also present.
    pub const fn is_superseded_by_safetensors(self) -> bool {
        matches!(self, Self::Pytorch | Self::Pt)
    }

    /// Get the canonical string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pytorch => "pytorch",
            Self::Safetensors => "safetensors",
            Self::Pt => "pt",
            Self::Ggml => "ggml",
            Self::Tokenizer => "tokenizer",
            Self::Text => "text",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a path names an adapter configuration or adapter weight file.
pub fn is_adapter_path(path: &str) -> bool {
    ADAPTER_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
