//! Config-file token loading and merge precedence.
//!
//! Config files are plain text whose contents are whitespace-tokenized
//! exactly like argv. [`merge_token_sources`] builds the final token
//! stream: tokens from every referenced file first (in load order), then
//! the real command-line tokens with the config-flag occurrences stripped.
//! Because a later occurrence of the same destination overrides an earlier
//! one during matching, command-line tokens always win.
//!
//! A referenced file that does not exist degrades to a structured
//! [`MergeWarning`] (also logged via `tracing::warn!`) and is skipped;
//! parsing proceeds.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Options controlling config-file merging.
///
/// # Examples
///
/// ```
/// use record_args_core::ConfigOptions;
///
/// let options = ConfigOptions::default();
/// assert_eq!(options.flag, "");
/// assert!(options.explicit_path.is_none());
/// assert!(options.candidates.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// The repeatable config-file flag; each occurrence takes one path.
    /// Empty means the default form, `--cfg`.
    pub flag: String,
    /// A path loaded unconditionally, before any flag-referenced file.
    pub explicit_path: Option<PathBuf>,
    /// Candidate paths probed when no explicit path is set; the first one
    /// that exists loads. Non-existent candidates are not warned about.
    pub candidates: Vec<PathBuf>,
}

impl ConfigOptions {
    /// Options with the given config flag and no file sources besides the
    /// flag occurrences themselves.
    pub fn with_flag(flag: &str) -> Self {
        Self {
            flag: flag.to_string(),
            ..Default::default()
        }
    }

    fn flag_or_default(&self) -> &str {
        if self.flag.is_empty() { "--cfg" } else { &self.flag }
    }
}

/// Non-fatal conditions encountered while merging token sources.
///
/// Warnings never alter control flow or the result shape; they are
/// returned alongside the parse output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeWarning {
    /// A referenced config file does not exist and was skipped.
    #[error("config file {} does not exist; ignoring it", .0.display())]
    MissingFile(PathBuf),
    /// The config flag appeared as the final token with no path operand.
    #[error("config flag {0} given without a file path; ignoring it")]
    DanglingFlag(String),
}

/// Merges file token sources with the command-line tokens.
///
/// Load order: the explicit path (if any), else the first existing
/// candidate; then one file per config-flag occurrence, left to right.
/// The returned stream is all file tokens followed by the command-line
/// tokens with the config-flag occurrences stripped, so the command line
/// keeps final precedence.
///
/// # Examples
///
/// ```
/// use record_args_core::{merge_token_sources, ConfigOptions};
///
/// // No file sources: the stream is the command line itself.
/// let args: Vec<String> = vec!["--x".into(), "2".into()];
/// let (tokens, warnings) = merge_token_sources(&args, &ConfigOptions::default());
/// assert_eq!(tokens, args);
/// assert!(warnings.is_empty());
/// ```
pub fn merge_token_sources(
    args: &[String],
    options: &ConfigOptions,
) -> (Vec<String>, Vec<MergeWarning>) {
    let flag = options.flag_or_default();
    let mut files: Vec<PathBuf> = Vec::new();
    let mut warnings = Vec::new();

    if let Some(path) = &options.explicit_path {
        files.push(path.clone());
    } else if let Some(candidate) = options.candidates.iter().find(|p| p.exists()) {
        files.push(candidate.clone());
    }

    // Flag-referenced files load after the default sources so they take
    // precedence over them (and the command line over all files).
    let mut cli_tokens: Vec<String> = Vec::with_capacity(args.len());
    let mut i = 0;
    while i < args.len() {
        let token = &args[i];
        if token == flag {
            match args.get(i + 1) {
                Some(path) => {
                    files.push(PathBuf::from(path));
                    i += 2;
                }
                None => {
                    tracing::warn!(flag, "config flag given without a file path");
                    warnings.push(MergeWarning::DanglingFlag(flag.to_string()));
                    i += 1;
                }
            }
        } else if let Some(path) = token.strip_prefix(&format!("{flag}=")) {
            files.push(PathBuf::from(path));
            i += 1;
        } else {
            cli_tokens.push(token.clone());
            i += 1;
        }
    }

    let mut tokens = Vec::new();
    for file in &files {
        match load_token_file(file) {
            Some(file_tokens) => tokens.extend(file_tokens),
            None => {
                tracing::warn!(path = %file.display(), "config file does not exist; ignoring it");
                warnings.push(MergeWarning::MissingFile(file.clone()));
            }
        }
    }
    tokens.extend(cli_tokens);

    (tokens, warnings)
}

/// Reads a config file into whitespace-delimited tokens.
///
/// Returns `None` when the file does not exist or cannot be read; the
/// caller reports the warning.
fn load_token_file(path: &Path) -> Option<Vec<String>> {
    let contents = std::fs::read_to_string(path).ok()?;
    Some(contents.split_whitespace().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("create config file");
        write!(file, "{contents}").expect("write config file");
        path
    }

    #[test]
    fn test_file_tokens_come_before_cli_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "train.cfg", "--x 1\n");

        let cli = args(&["--cfg", path.to_str().unwrap(), "--x", "2"]);
        let (tokens, warnings) = merge_token_sources(&cli, &ConfigOptions::default());

        assert_eq!(tokens, args(&["--x", "1", "--x", "2"]));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_multiple_files_load_left_to_right() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_config(&dir, "a.cfg", "--x a");
        let b = write_config(&dir, "b.cfg", "--x b");

        let cli = args(&["--cfg", a.to_str().unwrap(), "--cfg", b.to_str().unwrap()]);
        let (tokens, _) = merge_token_sources(&cli, &ConfigOptions::default());

        assert_eq!(tokens, args(&["--x", "a", "--x", "b"]));
    }

    #[test]
    fn test_missing_file_warns_and_is_skipped() {
        let cli = args(&["--cfg", "/nonexistent/train.cfg", "--x", "2"]);
        let (tokens, warnings) = merge_token_sources(&cli, &ConfigOptions::default());

        assert_eq!(tokens, args(&["--x", "2"]));
        assert_eq!(
            warnings,
            vec![MergeWarning::MissingFile(PathBuf::from(
                "/nonexistent/train.cfg"
            ))]
        );
    }

    #[test]
    fn test_explicit_path_loads_before_flag_files() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = write_config(&dir, "explicit.cfg", "--x 1");
        let flagged = write_config(&dir, "flagged.cfg", "--y 2");

        let options = ConfigOptions {
            explicit_path: Some(explicit),
            ..Default::default()
        };
        let cli = args(&["--cfg", flagged.to_str().unwrap()]);
        let (tokens, _) = merge_token_sources(&cli, &options);

        assert_eq!(tokens, args(&["--x", "1", "--y", "2"]));
    }

    #[test]
    fn test_first_existing_candidate_loads() {
        let dir = tempfile::tempdir().unwrap();
        let exists = write_config(&dir, "second.cfg", "--x 7");

        let options = ConfigOptions {
            candidates: vec![dir.path().join("first.cfg"), exists],
            ..Default::default()
        };
        let (tokens, warnings) = merge_token_sources(&[], &options);

        assert_eq!(tokens, args(&["--x", "7"]));
        // Absent candidates are probes, not references: no warning.
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_dangling_config_flag_is_stripped_with_warning() {
        let cli = args(&["--x", "2", "--cfg"]);
        let (tokens, warnings) = merge_token_sources(&cli, &ConfigOptions::default());

        assert_eq!(tokens, args(&["--x", "2"]));
        assert_eq!(warnings, vec![MergeWarning::DanglingFlag("--cfg".into())]);
    }

    #[test]
    fn test_equals_form_of_config_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "eq.cfg", "--x 9");

        let cli = vec![format!("--cfg={}", path.display())];
        let (tokens, _) = merge_token_sources(&cli, &ConfigOptions::default());

        assert_eq!(tokens, args(&["--x", "9"]));
    }
}
