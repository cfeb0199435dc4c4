//! Local version control for glossary components.
//!
//! The migration only needs a handful of operations, captured by
//! [`Repository`]. [`GitRepository`] implements them by running the `git`
//! binary inside the repository directory.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{MigrateError, MigrateResult};

const GIT: &str = "git";

/// Operations the migration performs on a component repository.
pub trait Repository {
    /// Working tree root.
    fn path(&self) -> &Path;

    /// Take the exclusive lock of this repository.
    fn lock(&self) -> MigrateResult<RepositoryLock> {
        RepositoryLock::acquire(lock_path(self.path()))
    }

    /// Stage `path` (a file or directory inside the working tree).
    fn stage(&self, path: &Path) -> MigrateResult<()>;

    /// Whether there is anything to commit.
    fn needs_commit(&self) -> MigrateResult<bool>;

    /// Commit the staged changes.
    fn commit(&self, message: &str) -> MigrateResult<()>;

    /// Content hash of a file as the repository would store it.
    fn object_hash(&self, file: &Path) -> MigrateResult<String>;
}

/// Creates repositories for new components.
pub trait RepositoryBackend {
    type Repo: Repository;

    /// Initialize an empty repository at `path`: no files, no commits.
    fn init_empty(&self, path: &Path) -> MigrateResult<Self::Repo>;
}

/// Location of the lock file guarding `repo_path`: a sibling of the
/// working tree so it never gets staged.
#[must_use]
pub fn lock_path(repo_path: &Path) -> PathBuf {
    let name = repo_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    repo_path.with_file_name(format!("{name}.lock"))
}

/// Exclusive repository lock, released on drop.
#[derive(Debug)]
pub struct RepositoryLock {
    path: PathBuf,
    _file: File,
}

impl RepositoryLock {
    /// Create the lock file; fails with [`MigrateError::Locked`] if it exists.
    pub fn acquire(path: PathBuf) -> MigrateResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                log::debug!("Locked {}", path.display());
                Ok(Self { path, _file: file })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(MigrateError::Locked { path }),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for RepositoryLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}

/// Identity recorded as author and committer of migration commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// A git working tree driven through the `git` command line.
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
    author: CommitAuthor,
}

impl GitRepository {
    /// Create the directory and an empty repository on branch `main`.
    ///
    /// An existing repository at `path` is reused as is.
    pub fn init_empty(path: impl AsRef<Path>, author: CommitAuthor) -> MigrateResult<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)?;
        let repo = Self { path, author };

        if repo.path.join(".git").exists() {
            log::debug!("Reusing repository at {}", repo.path.display());
        } else {
            repo.execute(&["init", "--quiet"])?;
            repo.execute(&["symbolic-ref", "HEAD", "refs/heads/main"])?;
            log::debug!("Initialized repository at {}", repo.path.display());
        }

        Ok(repo)
    }

    /// Run git in the working tree and return its stdout.
    fn execute(&self, args: &[&str]) -> MigrateResult<String> {
        let output = Command::new(GIT)
            .args(args)
            .current_dir(&self.path)
            .env("GIT_AUTHOR_NAME", &self.author.name)
            .env("GIT_AUTHOR_EMAIL", &self.author.email)
            .env("GIT_COMMITTER_NAME", &self.author.name)
            .env("GIT_COMMITTER_EMAIL", &self.author.email)
            .output()
            .map_err(|e| MigrateError::Vcs {
                command: command_line(args),
                message: e.to_string(),
            })?;
        check_output(args, output)
    }
}

fn command_line(args: &[&str]) -> String {
    let mut line = String::from(GIT);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn check_output(args: &[&str], output: Output) -> MigrateResult<String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(MigrateError::Vcs {
        command: command_line(args),
        message: format!("{} ({})", stderr.trim(), output.status),
    })
}

fn path_arg(path: &Path) -> MigrateResult<&str> {
    path.to_str().ok_or_else(|| MigrateError::Vcs {
        command: GIT.to_string(),
        message: format!("path is not valid UTF-8: {}", path.display()),
    })
}

impl Repository for GitRepository {
    fn path(&self) -> &Path {
        &self.path
    }

    fn stage(&self, path: &Path) -> MigrateResult<()> {
        self.execute(&["add", "--", path_arg(path)?])?;
        Ok(())
    }

    fn needs_commit(&self) -> MigrateResult<bool> {
        let status = self.execute(&["status", "--porcelain"])?;
        Ok(!status.trim().is_empty())
    }

    fn commit(&self, message: &str) -> MigrateResult<()> {
        self.execute(&[
            "-c",
            "commit.gpgsign=false",
            "commit",
            "--quiet",
            "--no-verify",
            "--message",
            message,
        ])?;
        log::info!("Committed {}: {}", self.path.display(), message);
        Ok(())
    }

    fn object_hash(&self, file: &Path) -> MigrateResult<String> {
        let hash = self.execute(&["hash-object", "--", path_arg(file)?])?;
        Ok(hash.trim().to_string())
    }
}

/// Creates [`GitRepository`] instances committing as one author.
#[derive(Debug, Clone)]
pub struct GitBackend {
    author: CommitAuthor,
}

impl GitBackend {
    #[must_use]
    pub fn new(author: CommitAuthor) -> Self {
        Self { author }
    }
}

impl RepositoryBackend for GitBackend {
    type Repo = GitRepository;

    fn init_empty(&self, path: &Path) -> MigrateResult<GitRepository> {
        GitRepository::init_empty(path, self.author.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_is_sibling() {
        let path = Path::new("/data/vcs/acme/glossary");
        assert_eq!(lock_path(path), PathBuf::from("/data/vcs/acme/glossary.lock"));
    }

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repo.lock");

        let lock = RepositoryLock::acquire(path.clone()).unwrap();
        assert!(path.exists());
        assert!(matches!(
            RepositoryLock::acquire(path.clone()),
            Err(MigrateError::Locked { .. })
        ));

        drop(lock);
        assert!(!path.exists());
        RepositoryLock::acquire(path).unwrap();
    }

    #[test]
    fn test_command_line() {
        assert_eq!(command_line(&["add", "--", "x"]), "git add -- x");
    }
}
