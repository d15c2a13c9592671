
use crate::fetch::{FetchError, FetchResponse, Fetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

enum Served {
    Body {
        content_type: &'static str,
        body: String,
    },
    Failure(FetchError),
    Hang,
    Redirect(String),
}

/// Serves canned responses and records every request
#[derive(Default)]
pub struct MemoryFetcher {
    routes: HashMap<String, Served>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Served::Body {
                content_type: "text/html; charset=utf-8",
                body: body.to_string(),
            },
        );
        self
    }

    pub fn xml(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Served::Body {
                content_type: "application/xml",
                body: body.to_string(),
            },
        );
        self
    }

    pub fn failure(mut self, url: &str, error: FetchError) -> Self {
        self.routes.insert(url.to_string(), Served::Failure(error));
        self
    }

    /// Answers `url` with the body served at `target`, as a followed redirect would
    pub fn redirect(mut self, url: &str, target: &str) -> Self {
        self.routes
            .insert(url.to_string(), Served::Redirect(target.to_string()));
        self
    }

    /// Never answers
    pub fn hang(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Served::Hang);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let (final_url, served) = match self.routes.get(url) {
            Some(Served::Redirect(target)) => (target.as_str(), self.routes.get(target)),
            served => (url, served),
        };
        match served {
            Some(Served::Body { content_type, body }) => Ok(FetchResponse {
                url: url.to_string(),
                final_url: final_url.to_string(),
                status: 200,
                content_type: Some(content_type.to_string()),
                body: body.clone(),
            }),
            Some(Served::Failure(error)) => Err(error.clone()),
            Some(Served::Hang) => std::future::pending().await,
            Some(Served::Redirect(_)) | None => Err(FetchError::Status { status: 404 }),
        }
    }
}

/// Minimal HTML page with the given body markup
pub fn page(body: &str) -> String {
    format!("<html><head><title>Test page</title></head><body>{body}</body></html>")
}

/// Urlset sitemap listing the given locations
pub fn urlset(locations: &[&str]) -> String {
    let urls: String = locations
        .iter()
        .map(|loc| format!("<url><loc>{loc}</loc></url>"))
        .collect();
    format!(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{urls}</urlset>"#)
}
