//! `.gitignore` templates from the [github/gitignore] collection.
//!
//! The list of available templates comes from the GitHub tree API and is
//! cached locally; individual templates are downloaded as raw files.
//!
//! [github/gitignore]: https://github.com/github/gitignore

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Raw file base URL for templates.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/github/gitignore/main";
/// Tree listing of the template repository.
pub const DEFAULT_INDEX_URL: &str =
    "https://api.github.com/repos/github/gitignore/git/trees/main?recursive=1";

const USER_AGENT: &str = "setup/0.1 (https://github.com/CrossEvol/setup)";
const TEMPLATE_SUFFIX: &str = ".gitignore";

/// Used when the tree listing cannot be fetched.
static BUILTIN_TEMPLATES: &[&str] = &[
    "Android",
    "C",
    "C++",
    "CMake",
    "CUDA",
    "Dart",
    "Elixir",
    "Elm",
    "Erlang",
    "Go",
    "Gradle",
    "Haskell",
    "Java",
    "Julia",
    "Kotlin",
    "Laravel",
    "Lua",
    "Maven",
    "Node",
    "Objective-C",
    "OCaml",
    "Perl",
    "Python",
    "Qt",
    "R",
    "Rails",
    "Ruby",
    "Rust",
    "Sass",
    "Scala",
    "Swift",
    "Symfony",
    "Terraform",
    "TeX",
    "Unity",
    "UnrealEngine",
    "VisualStudio",
    "WordPress",
    "Zig",
    "Global/Emacs",
    "Global/JetBrains",
    "Global/Linux",
    "Global/macOS",
    "Global/Vim",
    "Global/VisualStudioCode",
    "Global/Windows",
];

/// Errors from fetching templates.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("{url} returned status {code}")]
    Status { url: String, code: u16 },
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Template names mapped to their path in the repository.
///
/// Keys are paths without the `.gitignore` suffix, e.g. `Go` or
/// `Global/macOS`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitignoreIndex {
    entries: BTreeMap<String, String>,
}

/// On-disk cache, tagged with the index URL it was fetched from.
#[derive(Debug, Serialize, Deserialize)]
struct CachedIndex {
    source: String,
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
}

impl GitignoreIndex {
    /// Build from repository paths, keeping only `*.gitignore` files.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = paths
            .into_iter()
            .filter_map(|path| {
                let path: String = path.into();
                let key = path.strip_suffix(TEMPLATE_SUFFIX)?.to_string();
                (!key.is_empty()).then_some((key, path))
            })
            .collect();
        Self { entries }
    }

    /// Parse a GitHub tree API response.
    pub fn from_tree_json(json: &str) -> Result<Self, FetchError> {
        let response: TreeResponse = serde_json::from_str(json)?;
        Ok(Self::from_paths(response.tree.into_iter().map(|e| e.path)))
    }

    /// The built-in fallback list.
    pub fn builtin() -> Self {
        Self::from_paths(BUILTIN_TEMPLATES.iter().map(|k| format!("{k}{TEMPLATE_SUFFIX}")))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All template keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Find a template by key, ignoring case. Returns `(key, path)`.
    pub fn find(&self, name: &str) -> Option<(&str, &str)> {
        let name = name.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(name);
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(k, p)| (k.as_str(), p.as_str()))
    }

    /// Keys starting with `prefix`, ignoring case.
    pub fn starting_with(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        self.keys()
            .filter(|key| key.to_lowercase().starts_with(&prefix))
            .collect()
    }
}

/// A `.gitignore` template client with a cached index.
pub struct GitignoreClient {
    base_url: String,
    index_url: String,
    cache_dir: PathBuf,
    cache_ttl: Duration,
}

impl GitignoreClient {
    /// Create a client with the default URLs and cache settings.
    pub fn new() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("setup");

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            index_url: DEFAULT_INDEX_URL.to_string(),
            cache_dir,
            cache_ttl: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }

    /// Use different template and index URLs.
    pub fn with_urls(mut self, base_url: impl Into<String>, index_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self.index_url = index_url.into();
        self
    }

    /// Use a custom cache directory.
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    /// Get the template index: cache, then network, then built-in list.
    pub fn index(&self) -> GitignoreIndex {
        match self.read_cache() {
            Ok(Some(index)) => {
                log::debug!("using cached gitignore index ({} entries)", index.len());
                return index;
            }
            Ok(None) => {}
            Err(e) => log::debug!("ignoring gitignore index cache: {e}"),
        }

        match self.fetch_index() {
            Ok(index) if !index.is_empty() => {
                if let Err(e) = self.write_cache(&index) {
                    log::warn!("failed to cache gitignore index: {e}");
                }
                index
            }
            Ok(_) => GitignoreIndex::builtin(),
            Err(e) => {
                log::warn!("failed to fetch gitignore index, using built-in list: {e}");
                GitignoreIndex::builtin()
            }
        }
    }

    /// Fetch the tree listing from the API.
    fn fetch_index(&self) -> Result<GitignoreIndex, FetchError> {
        let body = self.get(&self.index_url)?;
        GitignoreIndex::from_tree_json(&body)
    }

    /// URL of a template given its repository path.
    pub fn template_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Download a template body.
    pub fn fetch_template(&self, path: &str) -> Result<String, FetchError> {
        self.get(&self.template_url(path)).map_err(|e| match e {
            FetchError::Status { code: 404, .. } => FetchError::NotFound(path.to_string()),
            other => other,
        })
    }

    /// Download a template into `dest_dir`, named after the template file.
    pub fn download(&self, path: &str, dest_dir: &Path) -> Result<PathBuf, FetchError> {
        let body = self.fetch_template(path)?;
        let dest = dest_dir.join(template_file_name(path));
        fs::write(&dest, body).map_err(|source| FetchError::Write {
            path: dest.clone(),
            source,
        })?;
        Ok(dest)
    }

    fn get(&self, url: &str) -> Result<String, FetchError> {
        log::info!("fetching {url}");
        let response = match ureq::get(url).set("User-Agent", USER_AGENT).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    code,
                });
            }
            Err(e) => return Err(FetchError::Http(e.to_string())),
        };

        response
            .into_string()
            .map_err(|e| FetchError::Http(e.to_string()))
    }

    /// Read from cache if valid.
    fn read_cache(&self) -> Result<Option<GitignoreIndex>, FetchError> {
        let cache_path = self.cache_path();

        if !cache_path.exists() {
            return Ok(None);
        }

        let modified = fs::metadata(&cache_path)?.modified()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age > self.cache_ttl {
            return Ok(None);
        }

        let contents = fs::read_to_string(&cache_path)?;
        let cached: CachedIndex = serde_json::from_str(&contents)?;
        if cached.source != self.index_url {
            log::debug!("gitignore index cache is for {}, refetching", cached.source);
            return Ok(None);
        }
        Ok(Some(GitignoreIndex {
            entries: cached.entries,
        }))
    }

    /// Write to cache.
    fn write_cache(&self, index: &GitignoreIndex) -> Result<(), FetchError> {
        fs::create_dir_all(&self.cache_dir)?;
        let cached = CachedIndex {
            source: self.index_url.clone(),
            entries: index.entries.clone(),
        };
        let contents = serde_json::to_string_pretty(&cached)?;
        fs::write(self.cache_path(), contents)?;
        Ok(())
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_dir.join("gitignore-index.json")
    }

    /// Clear the cached index.
    pub fn clear_cache(&self) -> Result<(), FetchError> {
        let path = self.cache_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for GitignoreClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Local file name for a template path, e.g. `Global/macOS.gitignore` ->
/// `macOS.gitignore`.
pub fn template_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one HTTP request on 127.0.0.1 and return the base URL.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}")
    }

    fn local_client(base_url: &str, cache: &Path) -> GitignoreClient {
        GitignoreClient::new()
            .with_urls(base_url, format!("{base_url}/tree"))
            .with_cache_dir(cache.to_path_buf())
    }

    #[test]
    fn parse_tree_response() {
        let json = r#"{
            "sha": "abc",
            "url": "https://api.github.com/...",
            "tree": [
                {"path": "Go.gitignore", "mode": "100644", "type": "blob"},
                {"path": "Global", "mode": "040000", "type": "tree"},
                {"path": "Global/macOS.gitignore", "mode": "100644", "type": "blob"},
                {"path": "README.md", "mode": "100644", "type": "blob"}
            ],
            "truncated": false
        }"#;

        let index = GitignoreIndex::from_tree_json(json).unwrap();
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["Global/macOS", "Go"]);
        assert_eq!(index.find("go"), Some(("Go", "Go.gitignore")));
        assert_eq!(
            index.find("global/MACOS"),
            Some(("Global/macOS", "Global/macOS.gitignore"))
        );
        assert_eq!(index.find("Go.gitignore"), Some(("Go", "Go.gitignore")));
        assert_eq!(index.find("rust"), None);
    }

    #[test]
    fn starting_with_ignores_case() {
        let index = GitignoreIndex::builtin();
        let r = index.starting_with("r");
        assert!(r.contains(&"Rust"));
        assert!(r.contains(&"Ruby"));
        assert!(r.iter().all(|k| k.to_lowercase().starts_with('r')));
        assert!(index.starting_with("G").contains(&"Global/macOS"));
    }

    #[test]
    fn builtin_has_node() {
        let index = GitignoreIndex::builtin();
        assert_eq!(index.find("node"), Some(("Node", "Node.gitignore")));
        assert_eq!(index.len(), BUILTIN_TEMPLATES.len());
    }

    #[test]
    fn template_file_names() {
        assert_eq!(template_file_name("Go.gitignore"), "Go.gitignore");
        assert_eq!(template_file_name("Global/macOS.gitignore"), "macOS.gitignore");
    }

    #[test]
    fn template_urls() {
        let client = GitignoreClient::new().with_urls("https://example.com/raw/", "unused");
        assert_eq!(
            client.template_url("Node.gitignore"),
            "https://example.com/raw/Node.gitignore"
        );
    }

    #[test]
    fn cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let client = GitignoreClient::new().with_cache_dir(dir.path().join("cache"));
        assert!(client.read_cache().unwrap().is_none());

        let index = GitignoreIndex::from_paths(["Node.gitignore", "Rust.gitignore"]);
        client.write_cache(&index).unwrap();
        assert_eq!(client.read_cache().unwrap(), Some(index.clone()));
        // A fresh cache short-circuits the network
        assert_eq!(client.index(), index);

        client.clear_cache().unwrap();
        assert!(client.read_cache().unwrap().is_none());
    }

    #[test]
    fn cache_from_another_index_url_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let old = GitignoreClient::new()
            .with_urls(DEFAULT_BASE_URL, "https://old.example/tree")
            .with_cache_dir(dir.path().to_path_buf());
        old.write_cache(&GitignoreIndex::from_paths(["Node.gitignore"]))
            .unwrap();

        let new = GitignoreClient::new()
            .with_urls(DEFAULT_BASE_URL, "https://new.example/tree")
            .with_cache_dir(dir.path().to_path_buf());
        assert!(new.read_cache().unwrap().is_none());
        assert!(old.read_cache().unwrap().is_some());
    }

    #[test]
    fn missing_template_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let client = local_client(&serve_once("404 Not Found", "404: Not Found"), dir.path());

        let err = client.download("Go.gitignore", dir.path()).unwrap_err();
        assert!(matches!(err, FetchError::NotFound(ref p) if p == "Go.gitignore"));
        assert!(!dir.path().join("Go.gitignore").exists());
    }

    #[test]
    fn server_error_keeps_status() {
        let dir = tempfile::tempdir().unwrap();
        let client = local_client(&serve_once("500 Internal Server Error", "oops"), dir.path());

        match client.fetch_template("Go.gitignore").unwrap_err() {
            FetchError::Status { url, code } => {
                assert_eq!(code, 500);
                assert!(url.ends_with("/Go.gitignore"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn download_writes_body_under_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let client = local_client(&serve_once("200 OK", "bin/\n"), dir.path());

        let dest = client.download("Global/macOS.gitignore", dir.path()).unwrap();
        assert_eq!(dest, dir.path().join("macOS.gitignore"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "bin/\n");
    }

    #[test]
    fn index_is_fetched_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let tree = r#"{"tree":[{"path":"Go.gitignore"},{"path":"README.md"}]}"#;
        let client = local_client(&serve_once("200 OK", tree), dir.path());

        let index = client.index();
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["Go"]);
        // The server is gone; the second call must come from the cache
        assert_eq!(client.index(), index);
    }
}
