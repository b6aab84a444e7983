use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;

use crate::config::AppConfig;
use crate::worker::{FetchRequest, FetchResponse, Network, NetworkError, ResponseKind};

/// 离线缓存使用的网络能力，基于 `reqwest`
#[derive(Clone)]
pub struct ReqwestNetwork {
    inner: reqwest::Client,
    scope: Option<Url>,
}

impl ReqwestNetwork {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);

        let client = builder.build().context("failed to build reqwest client")?;
        let scope = Url::parse(&config.scope_url).ok();

        Ok(Self { inner: client, scope })
    }

    fn response_kind(&self, url: &Url) -> ResponseKind {
        match self.scope.as_ref() {
            Some(scope) if scope.origin() != url.origin() => ResponseKind::Cors,
            _ => ResponseKind::Basic,
        }
    }
}

#[async_trait(?Send)]
impl Network for ReqwestNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        let response = self
            .inner
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(NetworkError::from)?;

        let status = response.status();
        let url = response.url().clone();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(NetworkError::from)?;

        Ok(FetchResponse {
            kind: self.response_kind(&url),
            url: url.to_string(),
            status: status.as_u16(),
            headers,
            body: body.to_vec(),
        })
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout {
                url: err
                    .url()
                    .map(|url| url.to_string())
                    .unwrap_or_default(),
            }
        } else {
            NetworkError::Unreachable(err.to_string())
        }
    }
}
