//! Holiday wish text from a generative language model.
//!
//! Nothing here can fail outward: every error ends in [`FALLBACK_WISH`].

use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::{runtime::Handle, sync::oneshot};

pub const FALLBACK_WISH: &str =
    "Merry Christmas! May your home be filled with light, warmth and the people you love.";

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn prompt(theme: &str) -> String {
    format!(
        "Write one short, warm Christmas wish (at most 40 words) about {}. \
         Reply with the wish only.",
        theme.trim()
    )
}

fn extract_text(response: GenerateResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .context("Response has no candidates")?
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        bail!("Response text is empty");
    }
    Ok(text.to_owned())
}

pub struct WishService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl WishService {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Always yields text: the generated wish, or the fallback on any failure.
    pub async fn generate_wish(&self, theme: &str) -> String {
        match self.request(theme).await {
            Ok(wish) => {
                info!("Generated wish for {:?}", theme);
                wish
            }
            Err(e) => {
                warn!("Wish generation failed, using fallback: {:#}", e);
                FALLBACK_WISH.to_owned()
            }
        }
    }

    async fn request(&self, theme: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY is not set"))?;

        let prompt = prompt(theme);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/{}:generateContent", ENDPOINT, self.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .context("Request failed")?
            .error_for_status()
            .context("Service returned an error status")?
            .json::<GenerateResponse>()
            .await
            .context("Failed to decode response")?;

        extract_text(response)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishStatus {
    Idle,
    Loading,
    Ready(String),
}

/// UI side of the wish: one request at a time, polled once per frame.
pub struct WishBoard {
    service: Arc<WishService>,
    theme: String,
    status: WishStatus,
    pending: Option<oneshot::Receiver<String>>,
}

impl WishBoard {
    pub fn new(service: WishService, theme: impl Into<String>) -> Self {
        Self {
            service: Arc::new(service),
            theme: theme.into(),
            status: WishStatus::Idle,
            pending: None,
        }
    }

    pub fn status(&self) -> &WishStatus {
        &self.status
    }

    /// Starts a request on `handle`. Only allowed while the tree is formed and
    /// nothing is in flight, returns whether a request was started.
    pub fn request(&mut self, handle: &Handle, is_formed: bool) -> bool {
        if !is_formed || self.pending.is_some() {
            return false;
        }

        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        let theme = self.theme.clone();
        handle.spawn(async move {
            let wish = service.generate_wish(&theme).await;
            // The board may be gone by now.
            let _ = tx.send(wish);
        });

        self.pending = Some(rx);
        self.status = WishStatus::Loading;
        true
    }

    /// Never blocks. Returns true when the status changed.
    pub fn poll(&mut self) -> bool {
        let rx = match self.pending.as_mut() {
            Some(rx) => rx,
            None => return false,
        };

        let wish = match rx.try_recv() {
            Ok(wish) => wish,
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!("Wish task ended without a result");
                FALLBACK_WISH.to_owned()
            }
        };

        self.pending = None;
        self.status = WishStatus::Ready(wish);
        true
    }
}
