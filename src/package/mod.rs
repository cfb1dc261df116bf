//! Launch packages consumed by the process-execution harness.
//!
//! A package turns an analysis target into a [`LaunchRequest`]; it never
//! spawns anything itself.

use std::borrow::Cow;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

mod chrome;

pub use chrome::Chrome;

/// Candidate executable location: an environment variable naming the base
/// directory followed by path components below it.
pub type CandidatePath = &'static [&'static str];

/// What the harness should execute for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub executable: PathBuf,
    /// Command line passed to the executable, already quoted.
    pub arguments: String,
    /// Value shown to the analyst in place of the command line.
    pub display: String,
}

impl LaunchRequest {
    #[must_use]
    pub fn new(
        executable: PathBuf,
        arguments: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            executable,
            arguments: arguments.into(),
            display: display.into(),
        }
    }
}

type EnvLookup = dyn Fn(&str) -> Option<OsString> + Send + Sync;

/// Expands [`CandidatePath`]s against an environment.
pub struct PathResolver {
    env: Box<EnvLookup>,
}

impl fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathResolver").finish_non_exhaustive()
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PathResolver {
    /// Resolves against the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_lookup(|name| std::env::var_os(name))
    }

    #[must_use]
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString> + Send + Sync + 'static,
    {
        Self {
            env: Box::new(lookup),
        }
    }

    /// Expands one candidate; `None` when its base variable is unset or empty.
    #[must_use]
    pub fn expand(&self, candidate: CandidatePath) -> Option<PathBuf> {
        let (base, rest) = candidate.split_first()?;
        let root = (self.env)(base).filter(|value| !value.is_empty())?;
        let mut path = PathBuf::from(root);
        path.extend(rest);
        Some(path)
    }

    /// Returns the first expanded candidate that exists on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] naming `application` when no
    /// candidate exists.
    pub fn first_existing(
        &self,
        application: &str,
        candidates: &[CandidatePath],
    ) -> Result<PathBuf> {
        candidates
            .iter()
            .copied()
            .filter_map(|candidate| self.expand(candidate))
            .find(|path| path.is_file())
            .ok_or_else(|| Error::PackageNotFound {
                package: Cow::Owned(application.to_owned()),
                details: Cow::Owned(format!(
                    "unable to find any {application} executable among {} candidate(s)",
                    candidates.len()
                )),
            })
    }
}

/// A launch recipe for one kind of analysis target.
pub trait Package {
    fn name(&self) -> &'static str;

    /// One-line description shown when selecting a package.
    fn summary(&self) -> &'static str;

    fn candidate_paths(&self) -> &'static [CandidatePath];

    fn resolver(&self) -> &PathResolver;

    /// Locates the executable backing `application`.
    ///
    /// # Errors
    ///
    /// Returns an error if no candidate path exists.
    fn resolve_path(&self, application: &str) -> Result<PathBuf> {
        self.resolver()
            .first_existing(application, self.candidate_paths())
    }

    /// Builds the launch request for `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable cannot be resolved.
    fn start(&self, target: &str) -> Result<LaunchRequest>;
}
