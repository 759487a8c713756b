//! Backend requests fired by the page buttons.
//!
//! Fire-and-forget from the UI's point of view: no retry, no auth. Callers
//! log failures and only touch the button label on success.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::debug::{self, cat};

/// Label shown on a download button once the backend accepted the request.
pub const QUEUED_LABEL: &str = "queued";

pub const DOWNLOAD_PATH: &str = "/download";
pub const PLAY_PATH: &str = "/mpv";
pub const CHANGE_SCORE_PATH: &str = "/change_score";

/// JSON body of `POST /download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub ytid: String,
    pub channel_id: String,
}

/// Form body of `POST /mpv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayRequest {
    pub path: String,
}

/// Form body of `POST /change_score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRequest {
    pub ytid: String,
    pub score: i32,
}

/// HTTP client for the ytvip backend.
#[derive(Clone, Debug)]
pub struct Backend {
    client: reqwest::Client,
    config: Config,
}

impl Backend {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.config.endpoint(path))
            .timeout(Duration::from_millis(self.config.request_timeout_ms))
    }

    async fn send(&self, request: reqwest::RequestBuilder, label: &str) -> Result<String> {
        let response = request
            .send()
            .await
            .with_context(|| format!("{label}: request failed"))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow!("{label}: backend error ({status}): {body}"));
        }
        debug::log(cat::ACTION, format!("{label}: {status}"));
        Ok(body)
    }

    /// Queue a full download of `ytid`.
    pub async fn queue_download(&self, ytid: &str, channel_id: &str) -> Result<()> {
        let body = DownloadRequest {
            ytid: ytid.to_string(),
            channel_id: channel_id.to_string(),
        };
        log::info!("[actions] queue download {ytid} (channel {channel_id})");
        self.send(self.post(DOWNLOAD_PATH).json(&body), "download").await?;
        Ok(())
    }

    /// Ask the backend to open `path` in the local video player.
    ///
    /// Returns the backend's reply, which is an HTML snippet (empty on success).
    pub async fn play_locally(&self, path: &str) -> Result<String> {
        let body = PlayRequest {
            path: path.to_string(),
        };
        log::info!("[actions] play locally {path}");
        self.send(self.post(PLAY_PATH).form(&body), "play").await
    }

    pub async fn change_score(&self, ytid: &str, score: i32) -> Result<()> {
        let body = ScoreRequest {
            ytid: ytid.to_string(),
            score,
        };
        log::info!("[actions] score {ytid} = {score}");
        self.send(self.post(CHANGE_SCORE_PATH).form(&body), "change_score").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_body_keys() {
        let body = DownloadRequest {
            ytid: "dQw4w9WgXcQ".into(),
            channel_id: "UC38IQsAvIsxxjztdMZQtwHA".into(),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["ytid"], "dQw4w9WgXcQ");
        assert_eq!(v["channel_id"], "UC38IQsAvIsxxjztdMZQtwHA");
        assert_eq!(v.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_form_request_targets_endpoint() {
        let backend = Backend::new(Config::default());
        let req = backend
            .post(PLAY_PATH)
            .form(&PlayRequest {
                path: "C:\\videos\\a b.mp4".into(),
            })
            .build()
            .unwrap();
        assert_eq!(req.url().as_str(), "http://127.0.0.1:8000/mpv");
        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(
            req.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_json_request_content_type() {
        let backend = Backend::new(Config::default());
        let req = backend
            .post(DOWNLOAD_PATH)
            .json(&DownloadRequest {
                ytid: "x".into(),
                channel_id: "y".into(),
            })
            .build()
            .unwrap();
        assert_eq!(req.url().path(), "/download");
        assert_eq!(req.headers()[reqwest::header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_an_error() {
        let backend = Backend::new(Config {
            server_url: "http://127.0.0.1:1".into(),
            request_timeout_ms: 500,
            ..Config::default()
        });
        assert!(backend.queue_download("x", "y").await.is_err());
    }
}
