use crate::areas::database::Database;
use crate::areas::refs::Refs;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    refs: Refs,
}

impl Repository {
    /// Open the repository at `path`, either a work tree containing `.git` or
    /// a bare git directory. Lines produced by commands go to `writer`.
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path)
            .canonicalize()
            .with_context(|| format!("Repository path {path} does not exist"))?;
        let git_path = Self::locate_git_dir(&path)?;
        let common_path = Self::locate_common_dir(&git_path)?;

        let database = Database::new(common_path.join("objects").into_boxed_path())?;
        let refs = Refs::with_head_dir(
            common_path.into_boxed_path(),
            git_path.clone().into_boxed_path(),
        );

        Ok(Repository {
            path: git_path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            refs,
        })
    }

    /// Create an empty repository layout under `<path>/.git` and open it.
    #[cfg(test)]
    pub fn init(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let git_path = Path::new(path).join(".git");

        for dir in ["objects", "refs/heads", "refs/tags"] {
            std::fs::create_dir_all(git_path.join(dir))
                .with_context(|| format!("Unable to create {}", git_path.join(dir).display()))?;
        }
        std::fs::write(git_path.join("HEAD"), "ref: refs/heads/master\n")
            .context("Unable to write HEAD")?;

        Self::new(path, writer)
    }

    fn locate_git_dir(path: &Path) -> anyhow::Result<PathBuf> {
        let dot_git = path.join(".git");
        if dot_git.is_dir() {
            return Ok(dot_git);
        }

        // linked worktrees and submodule checkouts: `.git` is a `gitdir: <path>` file
        if dot_git.is_file() {
            return Self::read_gitdir_file(path, &dot_git);
        }

        // bare repository
        if path.join("objects").is_dir() && path.join("HEAD").is_file() {
            return Ok(path.to_path_buf());
        }

        anyhow::bail!("{} is not a git repository", path.display())
    }

    /// A linked worktree keeps only HEAD; objects and refs live in the
    /// directory named by its `commondir` file.
    fn locate_common_dir(git_path: &Path) -> anyhow::Result<PathBuf> {
        let commondir = git_path.join("commondir");
        if !commondir.is_file() {
            return Ok(git_path.to_path_buf());
        }

        let content = std::fs::read_to_string(&commondir)
            .with_context(|| format!("Unable to read {}", commondir.display()))?;

        git_path
            .join(content.trim())
            .canonicalize()
            .with_context(|| format!("Common git directory {} does not exist", content.trim()))
    }

    fn read_gitdir_file(path: &Path, dot_git: &Path) -> anyhow::Result<PathBuf> {
        let content = std::fs::read_to_string(dot_git)
            .with_context(|| format!("Unable to read {}", dot_git.display()))?;
        let git_dir = content
            .lines()
            .find_map(|line| line.strip_prefix("gitdir:"))
            .map(str::trim)
            .filter(|git_dir| !git_dir.is_empty())
            .with_context(|| format!("{} is not a git repository", path.display()))?;

        // relative paths are relative to the directory holding `.git`
        path.join(git_dir)
            .canonicalize()
            .with_context(|| format!("Git directory {git_dir} does not exist"))
    }

    /// The git directory (`.../.git` for non-bare repositories)
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
