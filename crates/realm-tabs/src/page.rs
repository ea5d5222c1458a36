//! Page sources
//!
//! Where tab content comes from. A source either returns the page's HTML or
//! says why it couldn't.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use crate::error::PageError;

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, page_id: &str) -> Result<String, PageError>;
}

/// Page ids become file and URL path segments, so only plain slugs pass.
fn validate_page_id(page_id: &str) -> Result<(), PageError> {
    let valid = !page_id.is_empty()
        && page_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(PageError::InvalidId(page_id.to_string()))
    }
}

/// Reads `<root>/<page_id>.html`.
#[derive(Debug, Clone)]
pub struct DirPageSource {
    root: PathBuf,
}

impl DirPageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn page_path(&self, page_id: &str) -> Result<PathBuf, PageError> {
        validate_page_id(page_id)?;
        Ok(self.root.join(format!("{page_id}.html")))
    }
}

#[async_trait]
impl PageSource for DirPageSource {
    async fn fetch(&self, page_id: &str) -> Result<String, PageError> {
        let path = self.page_path(page_id)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                tracing::debug!(page_id = %page_id, path = %path.display(), "Loaded page");
                Ok(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PageError::NotFound(page_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// GETs `<base>/pages/<page_id>.html`.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpPageSource {
    pub fn new(mut base: Url) -> Self {
        // Url::join drops the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    pub fn page_url(&self, page_id: &str) -> Result<Url, PageError> {
        validate_page_id(page_id)?;
        self.base
            .join(&format!("pages/{page_id}.html"))
            .map_err(|_| PageError::InvalidId(page_id.to_string()))
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, page_id: &str) -> Result<String, PageError> {
        let url = self.page_url(page_id)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PageError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PageError::NotFound(page_id.to_string()));
        }
        if !status.is_success() {
            return Err(PageError::Http {
                page_id: page_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PageError::Network(e.to_string()))?;

        tracing::debug!(page_id = %page_id, url = %url, "Fetched page");
        Ok(body)
    }
}

/// Pages held in memory, e.g. embedded at build time.
#[derive(Debug, Default)]
pub struct StaticPageSource {
    pages: Arc<RwLock<HashMap<String, String>>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page_id: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(page_id, content);
        self
    }

    pub fn insert(&self, page_id: impl Into<String>, content: impl Into<String>) {
        self.pages.write().insert(page_id.into(), content.into());
    }
}

impl Clone for StaticPageSource {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
        }
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch(&self, page_id: &str) -> Result<String, PageError> {
        self.pages
            .read()
            .get(page_id)
            .cloned()
            .ok_or_else(|| PageError::NotFound(page_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_pages_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("realm-pages-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_validate_page_id() {
        assert!(validate_page_id("customer-list").is_ok());
        assert!(validate_page_id("loan_2024").is_ok());
        assert!(validate_page_id("").is_err());
        assert!(validate_page_id("../secrets").is_err());
        assert!(validate_page_id("a/b").is_err());
        assert!(validate_page_id("page.html").is_err());
    }

    #[tokio::test]
    async fn test_dir_source_reads_pages() {
        let dir = temp_pages_dir();
        std::fs::write(dir.join("accounts.html"), "<h1>Accounts</h1>").unwrap();

        let source = DirPageSource::new(&dir);
        assert_eq!(source.fetch("accounts").await.unwrap(), "<h1>Accounts</h1>");

        let missing = source.fetch("transfers").await.unwrap_err();
        assert!(matches!(missing, PageError::NotFound(id) if id == "transfers"));

        let traversal = source.fetch("../accounts").await.unwrap_err();
        assert!(matches!(traversal, PageError::InvalidId(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_http_page_url() {
        let source = HttpPageSource::new(Url::parse("https://realm.example/app").unwrap());
        assert_eq!(
            source.page_url("accounts").unwrap().as_str(),
            "https://realm.example/app/pages/accounts.html"
        );

        let rooted = HttpPageSource::new(Url::parse("https://realm.example/").unwrap());
        assert_eq!(
            rooted.page_url("accounts").unwrap().as_str(),
            "https://realm.example/pages/accounts.html"
        );

        assert!(source.page_url("../admin").is_err());
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticPageSource::new().with_page("reports", "<p>Reports</p>");
        assert_eq!(source.fetch("reports").await.unwrap(), "<p>Reports</p>");
        assert!(matches!(
            source.fetch("audit").await,
            Err(PageError::NotFound(_))
        ));
    }
}
