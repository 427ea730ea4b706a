// src/github/fetch.rs
// =============================================================================
// The GitHub-backed ContentSource.
//
// Two hosts are involved:
// - api.github.com serves directory listings as JSON
//   (GET /repos/{owner}/{repo}/contents/{path}?ref={branch})
// - raw.githubusercontent.com serves the literal bytes of a file
//   (GET /{owner}/{repo}/{branch}/{path})
//
// Unauthenticated access only: the repository is public and read-only from
// our point of view.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{ContentSource, Entry, FetchError};
use crate::config::{BrowserConfig, REQUEST_TIMEOUT, USER_AGENT};

/// HTTP client for one repository at one branch.
///
/// Cloning is cheap: reqwest's Client is reference counted internally, so
/// every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    owner: String,
    repo: String,
    branch: String,
    api_url: String,
    raw_url: String,
}

impl GitHubClient {
    pub fn new(config: &BrowserConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport {
                url: config.api_url.clone(),
                message: format!("could not create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            api_url: config.api_url.clone(),
            raw_url: config.raw_url.clone(),
        })
    }

    /// URL of the contents API for a repository-relative directory path.
    fn listing_url(&self, path: &str) -> Result<Url, FetchError> {
        let mut url = parse_base(&self.api_url)?;

        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(split_path(path));

        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }

    /// URL of a file's raw bytes on the configured branch.
    fn raw_url(&self, path: &str) -> Result<Url, FetchError> {
        let mut url = parse_base(&self.raw_url)?;

        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.raw_url.clone()))?
            .pop_if_empty()
            .extend([self.owner.as_str(), self.repo.as_str()])
            .extend(split_path(&self.branch))
            .extend(split_path(path));

        Ok(url)
    }

    // Sends a GET and hands back the body of a 2xx response.
    async fn get(&self, url: Url, accept: &str) -> Result<Body, FetchError> {
        let url_string = url.to_string();
        debug!(url = %url_string, "GET");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| FetchError::transport(&url_string, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_string,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(&url_string, e))?;

        Ok(Body {
            url: url_string,
            bytes: bytes.to_vec(),
        })
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    async fn list_contents(&self, path: &str) -> Result<Vec<Entry>, FetchError> {
        let url = self.listing_url(path)?;
        let body = self.get(url, "application/vnd.github+json").await?;

        let entries: Vec<Entry> =
            serde_json::from_slice(&body.bytes).map_err(|e| FetchError::Decode {
                url: body.url.clone(),
                message: e.to_string(),
            })?;

        debug!(path, count = entries.len(), "listed directory");
        Ok(entries)
    }

    async fn fetch_raw(&self, path: &str) -> Result<String, FetchError> {
        let url = self.raw_url(path)?;
        let body = self.get(url, "text/plain").await?;

        debug!(path, bytes = body.bytes.len(), "fetched raw content");
        Ok(String::from_utf8_lossy(&body.bytes).into_owned())
    }

    // The raw host doubles as the download link.
    fn download_url(&self, path: &str) -> Option<String> {
        self.raw_url(path).ok().map(String::from)
    }
}

// A successful response body together with the URL it came from, so decode
// errors can say where the bad JSON was served.
struct Body {
    url: String,
    bytes: Vec<u8>,
}

fn parse_base(base: &str) -> Result<Url, FetchError> {
    Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))
}

// "Flames/H001.md" -> ["Flames", "H001.md"]; "" -> []
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> GitHubClient {
        let config = BrowserConfig::new("owner/repo", "main")
            .unwrap()
            .with_endpoints(server.url(), server.url());
        GitHubClient::new(&config).unwrap()
    }

    #[test]
    fn test_listing_url_for_root_and_nested_paths() {
        let config = BrowserConfig::new("letswastetimee/HEARTH", "gh-pages").unwrap();
        let client = GitHubClient::new(&config).unwrap();

        assert_eq!(
            client.listing_url("").unwrap().as_str(),
            "https://api.github.com/repos/letswastetimee/HEARTH/contents?ref=gh-pages"
        );
        assert_eq!(
            client.listing_url("Flames").unwrap().as_str(),
            "https://api.github.com/repos/letswastetimee/HEARTH/contents/Flames?ref=gh-pages"
        );
    }

    #[test]
    fn test_urls_percent_encode_segments() {
        let config = BrowserConfig::new("o/r", "main").unwrap();
        let client = GitHubClient::new(&config).unwrap();

        assert_eq!(
            client.raw_url("My Notes/a b.md").unwrap().as_str(),
            "https://raw.githubusercontent.com/o/r/main/My%20Notes/a%20b.md"
        );
    }

    #[test]
    fn test_raw_url_keeps_branch_slashes() {
        let config = BrowserConfig::new("o/r", "feature/x").unwrap();
        let client = GitHubClient::new(&config).unwrap();

        assert_eq!(
            client.raw_url("README.md").unwrap().as_str(),
            "https://raw.githubusercontent.com/o/r/feature/x/README.md"
        );
    }

    #[test]
    fn test_download_url_is_the_raw_url() {
        let config = BrowserConfig::new("letswastetimee/HEARTH", "gh-pages").unwrap();
        let client = GitHubClient::new(&config).unwrap();

        assert_eq!(
            client.download_url("Flames/H001.md").as_deref(),
            Some("https://raw.githubusercontent.com/letswastetimee/HEARTH/gh-pages/Flames/H001.md")
        );
    }

    #[tokio::test]
    async fn test_list_contents_sends_ref_and_parses_entries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/owner/repo/contents/Flames")
            .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"name":"README.md","path":"Flames/README.md","type":"file"},
                    {"name":"old","path":"Flames/old","type":"dir"}]"#,
            )
            .create_async()
            .await;

        let entries = client_for(&server).list_contents("Flames").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            entries,
            vec![
                Entry::file("README.md", "Flames/README.md"),
                Entry::dir("old", "Flames/old"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_contents_maps_status_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/owner/repo/contents")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = client_for(&server).list_contents("").await.unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_list_contents_rejects_non_array_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/owner/repo/contents")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":"Not Found"}"#)
            .create_async()
            .await;

        let err = client_for(&server).list_contents("").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_raw_returns_body_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/owner/repo/main/Flames/H001.md")
            .with_status(200)
            .with_body("# H001\n")
            .create_async()
            .await;

        let text = client_for(&server).fetch_raw("Flames/H001.md").await.unwrap();
        assert_eq!(text, "# H001\n");
    }

    #[tokio::test]
    async fn test_fetch_raw_missing_file_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/owner/repo/main/nope.md")
            .with_status(404)
            .create_async()
            .await;

        let err = client_for(&server).fetch_raw("nope.md").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
