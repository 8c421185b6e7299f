use crate::latest::{FeedResponse, ReleaseFeed};
use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::env;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Blocking HTTP client shared by the release feed and asset downloads.
pub struct HttpClient {
    client: Client,
    token: Option<String>,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let token = env::var("GITHUB_TOKEN")
            .or_else(|_| env::var("GH_TOKEN"))
            .ok()
            .filter(|token| !token.is_empty());

        Ok(Self { client, token })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match (&self.token, url.starts_with("https://api.github.com/")) {
            (Some(token), true) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            _ => request,
        }
    }

    pub fn download_file(&self, url: &str, dest_path: &Path) -> Result<()> {
        debug!(%url, dest = %dest_path.display(), "Downloading release asset");

        let resp = self
            .get(url)
            .send()
            .context("Failed to send request")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("Unexpected HTTP response: {}", status));
        }

        let total_size = resp.content_length().unwrap_or(0);

        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            )?
            .progress_chars("#>-"),
        );

        let mut file = File::create(dest_path)
            .with_context(|| format!("Failed to create {}", dest_path.display()))?;
        let written = io::copy(&mut pb.wrap_read(resp), &mut file)?;
        pb.finish_and_clear();

        debug!(bytes = written, "Download complete");
        Ok(())
    }
}

impl ReleaseFeed for HttpClient {
    fn get_json(&self, url: &str) -> Result<FeedResponse> {
        debug!(%url, "Querying release feed");

        let resp = self
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = resp.status().as_u16();
        let body = resp.json::<serde_json::Value>().ok();

        Ok(FeedResponse { status, body })
    }
}
