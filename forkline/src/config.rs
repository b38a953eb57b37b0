//! Engine configuration and project directory resolution.
//!
//! Session logs live in the Claude Code layout:
//! `~/.claude/projects/<project-id>/<session>.jsonl`, where the project id is
//! the project's absolute path with every non-alphanumeric character
//! replaced by `-`.

use std::path::{Path, PathBuf};

use crate::error::{LineageError, Result};

/// Environment variable overriding the projects root (read by the CLI).
pub const PROJECTS_DIR_ENV: &str = "FORKLINE_PROJECTS_DIR";

/// Environment variable overriding the read concurrency.
pub const MAX_CONCURRENT_READS_ENV: &str = "FORKLINE_MAX_CONCURRENT_READS";

pub const DEFAULT_MAX_CONCURRENT_READS: usize = 16;

const CLAUDE_DIR: &str = ".claude";
const PROJECTS_DIR: &str = "projects";

/// Settings shared by every engine request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root holding one directory per project.
    pub projects_dir: PathBuf,
    /// Upper bound on log files read at once.
    pub max_concurrent_reads: usize,
}

impl Config {
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            max_concurrent_reads: DEFAULT_MAX_CONCURRENT_READS,
        }
    }

    #[must_use]
    pub const fn with_max_concurrent_reads(mut self, max: usize) -> Self {
        self.max_concurrent_reads = if max == 0 { 1 } else { max };
        self
    }

    /// Directory holding the logs of `project_id`.
    ///
    /// A project id that looks like a filesystem path is encoded first, so
    /// both `-home-me-app` and `/home/me/app` name the same project. `.` and
    /// `..` are encoded too and never leave the projects root.
    pub fn project_dir(&self, project_id: &str) -> PathBuf {
        let is_path = project_id.contains(std::path::MAIN_SEPARATOR)
            || project_id.contains('/')
            || matches!(project_id, "." | "..");
        if is_path {
            self.projects_dir.join(encode_project_id(Path::new(project_id)))
        } else {
            self.projects_dir.join(project_id)
        }
    }

    /// Directory for a command-line target: an existing directory is used
    /// as-is, anything else is a project id. No target means the project of
    /// the current directory.
    pub fn resolve_target(&self, target: Option<&str>) -> Result<PathBuf> {
        match target {
            Some(t) if Path::new(t).is_dir() => Ok(PathBuf::from(t)),
            Some(t) => Ok(self.project_dir(t)),
            None => {
                let cwd = std::env::current_dir().map_err(LineageError::CurrentDir)?;
                Ok(self.projects_dir.join(encode_project_id(&cwd)))
            }
        }
    }
}

/// `~/.claude/projects`.
pub fn default_projects_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(LineageError::HomeDirNotFound)?;
    Ok(home.join(CLAUDE_DIR).join(PROJECTS_DIR))
}

/// Project id for a project path.
pub fn encode_project_id(path: &Path) -> String {
    path.to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_project_paths() {
        assert_eq!(
            encode_project_id(Path::new("/Users/me/dev/my.app")),
            "-Users-me-dev-my-app"
        );
        assert_eq!(encode_project_id(Path::new("/srv/a_b")), "-srv-a-b");
    }

    #[test]
    fn project_dir_accepts_ids_and_paths() {
        let config = Config::new("/root/.claude/projects");
        assert_eq!(
            config.project_dir("-home-me-app"),
            PathBuf::from("/root/.claude/projects/-home-me-app")
        );
        assert_eq!(
            config.project_dir("/home/me/app"),
            PathBuf::from("/root/.claude/projects/-home-me-app")
        );
    }

    #[test]
    fn dot_ids_stay_inside_projects_root() {
        let config = Config::new("/root/.claude/projects");
        for id in ["..", "."] {
            let dir = config.project_dir(id);
            assert_eq!(dir.parent(), Some(Path::new("/root/.claude/projects")));
            assert!(dir
                .file_name()
                .is_some_and(|name| name.to_string_lossy().chars().all(|c| c == '-')));
        }
        assert_eq!(
            config.project_dir("../../etc"),
            PathBuf::from("/root/.claude/projects/------etc")
        );
    }

    #[test]
    fn existing_directory_target_is_used_directly() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new("/nonexistent");
        let target = dir.path().to_string_lossy().into_owned();
        assert_eq!(config.resolve_target(Some(&target)).unwrap(), dir.path());
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let config = Config::new("/x").with_max_concurrent_reads(0);
        assert_eq!(config.max_concurrent_reads, 1);
    }
}
