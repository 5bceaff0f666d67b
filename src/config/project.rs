use std::path::{Path, PathBuf};

use crate::diagnostic::Diagnostic;
use crate::lower::{is_valid_name, TARGETS};
use crate::span::Span;

pub const CONFIG_FILE: &str = "pwcet.toml";

/// Project settings from pwcet.toml. Unset keys fall back to the
/// command-line defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Project {
    pub root_dir: PathBuf,
    /// Name of the generated routine.
    pub function: Option<String>,
    /// Lowering target name.
    pub target: Option<String>,
}

impl Project {
    /// Load project settings from a pwcet.toml file.
    pub fn load(toml_path: &Path) -> Result<Project, Diagnostic> {
        let content = std::fs::read_to_string(toml_path).map_err(|e| {
            Diagnostic::error(
                format!("cannot read '{}': {}", toml_path.display(), e),
                Span::dummy(),
            )
        })?;
        let root_dir = toml_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::parse(&content, root_dir)
    }

    /// Section-aware minimal TOML parsing. Only `[generate]` is read;
    /// other sections and keys are ignored.
    pub fn parse(content: &str, root_dir: PathBuf) -> Result<Project, Diagnostic> {
        let mut project = Project {
            root_dir,
            ..Project::default()
        };
        let mut current_section = String::new();

        for line in content.lines() {
            let trimmed = strip_comment(line).trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                current_section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            if current_section != "generate" {
                continue;
            }
            let key = key.trim().trim_matches('"');
            let value = value.trim().trim_matches('"');
            match key {
                "function" => {
                    if !is_valid_name(value) {
                        return Err(Diagnostic::error(
                            format!("invalid function name '{}' in {}", value, CONFIG_FILE),
                            Span::dummy(),
                        )
                        .with_help("use letters, digits and '_', not starting with a digit".to_string()));
                    }
                    project.function = Some(value.to_string());
                }
                "target" => {
                    if !TARGETS.contains(&value) {
                        return Err(Diagnostic::error(
                            format!("unknown target '{}' in {}", value, CONFIG_FILE),
                            Span::dummy(),
                        )
                        .with_help(format!("available targets: {}", TARGETS.join(", "))));
                    }
                    project.target = Some(value.to_string());
                }
                _ => {}
            }
        }

        Ok(project)
    }

    /// Try to find a pwcet.toml in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Settings for an input file: the nearest pwcet.toml above it, or
    /// defaults when there is none.
    pub fn for_input(input: &Path) -> Result<Project, Diagnostic> {
        let start = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        match Self::find(start) {
            Some(path) => Self::load(&path),
            None => Ok(Project {
                root_dir: start.to_path_buf(),
                ..Project::default()
            }),
        }
    }
}

/// Drop a trailing `# comment` that is not inside a quoted value.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}
