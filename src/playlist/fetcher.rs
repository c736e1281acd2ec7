use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;

use crate::error::Result;

/// True when `input` names an HTTP(S) document rather than a local file.
pub fn is_remote(input: &str) -> bool {
    url::Url::parse(input)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Loads playlist documents from local paths or HTTP(S) URLs.
pub struct PlaylistFetcher {
    client: Client,
    download_copy: Option<PathBuf>,
}

impl PlaylistFetcher {
    pub fn new(timeout: Duration, download_copy: Option<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("m3u-curator/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            download_copy,
        })
    }

    pub async fn load(&self, input: &str) -> Result<String> {
        if is_remote(input) {
            self.fetch(input).await
        } else {
            tracing::debug!("Reading playlist file {}", input);
            Ok(tokio::fs::read_to_string(input).await?)
        }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::info!("Downloading playlist {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(
                anyhow::anyhow!("Failed to fetch playlist: HTTP {}", response.status()).into(),
            );
        }

        let text = response.text().await?;

        if let Some(path) = &self.download_copy {
            tokio::fs::write(path, &text).await?;
            tracing::debug!("Saved downloaded playlist to {}", path.display());
        }

        Ok(text)
    }
}
