use crate::error::Result;

use super::{CandidatePath, LaunchRequest, Package, PathResolver};

const PATHS: &[CandidatePath] = &[
    &["ProgramFiles", "Google", "Chrome", "Application", "chrome.exe"],
    &["LOCALAPPDATA", "Chromium", "Application", "chrome.exe"],
];

/// Renderer code integrity blocks the injected monitor inside Chrome.
const DISABLE_CODE_INTEGRITY: &str = "--disable-features=RendererCodeIntegrity";

/// Opens a URL in Google Chrome (or Chromium).
#[derive(Debug, Default)]
pub struct Chrome {
    resolver: PathResolver,
}

impl Chrome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_resolver(resolver: PathResolver) -> Self {
        Self { resolver }
    }
}

impl Package for Chrome {
    fn name(&self) -> &'static str {
        "chrome"
    }

    fn summary(&self) -> &'static str {
        "Opens the URL in Google Chrome."
    }

    fn candidate_paths(&self) -> &'static [CandidatePath] {
        PATHS
    }

    fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// The URL is passed in place of a file name and doubles as the display value.
    fn start(&self, target: &str) -> Result<LaunchRequest> {
        let chrome = self.resolve_path("Google")?;
        Ok(LaunchRequest::new(
            chrome,
            format!("{DISABLE_CODE_INTEGRITY} \"{target}\""),
            target,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::Path;

    use super::*;
    use crate::error::Error;

    fn install(root: &Path, components: &[&str]) -> std::path::PathBuf {
        let exe = components.iter().fold(root.to_path_buf(), |p, c| p.join(c));
        std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
        std::fs::write(&exe, b"MZ").unwrap();
        exe
    }

    fn resolver_for(var: &'static str, root: &Path) -> PathResolver {
        let root = OsString::from(root);
        PathResolver::with_lookup(move |name| (name == var).then(|| root.clone()))
    }

    #[test]
    fn prefers_program_files_install() {
        let dir = tempfile::tempdir().unwrap();
        let exe = install(dir.path(), &["Google", "Chrome", "Application", "chrome.exe"]);
        let chrome = Chrome::with_resolver(resolver_for("ProgramFiles", dir.path()));

        let request = chrome.start("http://example.test/a b").unwrap();
        assert_eq!(request.executable, exe);
        assert_eq!(
            request.arguments,
            "--disable-features=RendererCodeIntegrity \"http://example.test/a b\""
        );
        assert_eq!(request.display, "http://example.test/a b");
    }

    #[test]
    fn falls_back_to_chromium_under_local_app_data() {
        let dir = tempfile::tempdir().unwrap();
        let exe = install(dir.path(), &["Chromium", "Application", "chrome.exe"]);
        let chrome = Chrome::with_resolver(resolver_for("LOCALAPPDATA", dir.path()));
        assert_eq!(chrome.resolve_path("Google").unwrap(), exe);
    }

    #[test]
    fn start_fails_without_an_install() {
        let chrome = Chrome::with_resolver(PathResolver::with_lookup(|_| None));
        let err = chrome.start("http://example.test/").unwrap_err();
        assert!(matches!(err, Error::PackageNotFound { .. }));
        assert_eq!(chrome.name(), "chrome");
        assert_eq!(chrome.summary(), "Opens the URL in Google Chrome.");
    }
}
