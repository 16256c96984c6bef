use std::time::Duration;

use super::client::HttpClient;
use async_trait::async_trait;

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }

    /// Client with connect and overall request timeouts.
    pub fn with_timeouts(connect: Duration, total: Duration) -> reqwest::Result<Self> {
        let inner = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(total)
            .build()?;
        Ok(Self(inner))
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
