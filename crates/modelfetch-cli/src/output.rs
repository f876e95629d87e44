//! Output folder layout and the metadata file written next to the model.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use modelfetch_core::FetchOptions;

/// Name of the metadata file written into the output folder.
pub const METADATA_FILE: &str = "huggingface-metadata.txt";

/// Folder the model files are written to.
///
/// `<base>/<owner>_<name>`, with `_<branch>` appended for any branch other
/// than `main`. The base is `--output`, or `loras` for adapter repositories
/// and `models` otherwise.
pub fn output_folder(options: &FetchOptions, is_adapter: bool) -> PathBuf {
    let base = options.output.clone().unwrap_or_else(|| {
        PathBuf::from(if is_adapter { "loras" } else { "models" })
    });

    let mut name = format!("{}_{}", options.model.owner(), options.model.name());
    if !options.branch.is_main() {
        name.push('_');
        name.push_str(options.branch.as_str());
    }
    base.join(name)
}

/// Contents of the metadata file.
pub fn metadata_contents(endpoint: &str, options: &FetchOptions, at: DateTime<Local>) -> String {
    format!(
        "url: {}/{}\nbranch: {}\ndownload date: {}\n",
        endpoint.trim_end_matches('/'),
        options.model,
        options.branch,
        at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Write the metadata file into `folder`, creating the folder if needed.
pub async fn write_metadata(
    folder: &Path,
    endpoint: &str,
    options: &FetchOptions,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(folder).await?;
    let path = folder.join(METADATA_FILE);
    tokio::fs::write(&path, metadata_contents(endpoint, options, Local::now())).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn options(model: &str, branch: &str) -> FetchOptions {
        FetchOptions::new(model, branch).unwrap()
    }

    #[test]
    fn test_default_base_folders() {
        assert_eq!(
            output_folder(&options("facebook/opt-1.3b", "main"), false),
            PathBuf::from("models/facebook_opt-1.3b")
        );
        assert_eq!(
            output_folder(&options("org/my-lora", "main"), true),
            PathBuf::from("loras/org_my-lora")
        );
    }

    #[test]
    fn test_branch_suffix_and_override() {
        let opts = options("org/model", "v2").with_output(Some(PathBuf::from("/data")));
        assert_eq!(output_folder(&opts, true), PathBuf::from("/data/org_model_v2"));
    }

    #[test]
    fn test_metadata_contents() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let text = metadata_contents("https://huggingface.co/", &options("org/model", "dev"), at);
        assert_eq!(
            text,
            "url: https://huggingface.co/org/model\nbranch: dev\ndownload date: 2024-03-09 07:05:01\n"
        );
    }

    #[tokio::test]
    async fn test_write_metadata_creates_folder() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("models").join("org_model");

        let path = write_metadata(&folder, "https://huggingface.co", &options("org/model", "main"))
            .await
            .unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("url: https://huggingface.co/org/model\nbranch: main\n"));
        assert!(text.contains("download date: "));
    }
}
