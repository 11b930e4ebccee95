use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tokio::time::timeout;

use crate::config::HttpConfig;
use crate::transport::{Transport, TransportError};

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .build()?;

        Ok(Self {
            client,
            request_timeout: Duration::from_secs(config.timeout_seconds.into()),
        })
    }

    async fn execute(&self, url: &str, builder: RequestBuilder) -> Result<Value, TransportError> {
        match timeout(self.request_timeout, self.do_execute(url, builder)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                url: url.to_string(),
                seconds: self.request_timeout.as_secs(),
            }),
        }
    }

    async fn do_execute(&self, url: &str, builder: RequestBuilder) -> Result<Value, TransportError> {
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Connection {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| TransportError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Value, TransportError> {
        tracing::debug!(url = %url, "GET");
        self.execute(url, self.client.get(url)).await
    }

    async fn post(&self, url: &str, body: Value) -> Result<Value, TransportError> {
        tracing::debug!(url = %url, "POST");
        self.execute(url, self.client.post(url).json(&body)).await
    }
}
