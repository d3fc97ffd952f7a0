//! Scripted [`HttpClient`] for provider tests.

use async_trait::async_trait;
use std::sync::Mutex;

use super::http::HttpClient;
use crate::errors::{Error, Result};

#[derive(Default)]
pub struct FakeHttpClient {
    routes: Mutex<Vec<(String, Result<String, String>)>>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests whose URL starts with `prefix` with `body`.
    pub fn respond(self, prefix: &str, body: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((prefix.to_string(), Ok(body.to_string())));
        self
    }

    /// Fail requests whose URL starts with `prefix`.
    pub fn fail(self, prefix: &str, message: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((prefix.to_string(), Err(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        let routes = self.routes.lock().unwrap();
        match routes.iter().find(|(prefix, _)| url.starts_with(prefix.as_str())) {
            Some((_, Ok(body))) => Ok(body.clone()),
            Some((_, Err(message))) => Err(Error::Fetch(message.clone())),
            None => Err(Error::Fetch(format!("no scripted response for {}", url))),
        }
    }
}
