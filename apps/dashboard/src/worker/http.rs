use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use thiserror::Error;

use super::{WorkerError, WorkerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
}

impl FetchRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn parse(method: Method, url: &str) -> WorkerResult<Self> {
        let url = Url::parse(url).map_err(|err| WorkerError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self::new(method, url))
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }

    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    #[default]
    Basic,
    Cors,
    Opaque,
    Error,
}

/// 响应体只有一个所有者，不实现 `Clone`。
/// 同时交给缓存和调用方时必须显式调用 [`FetchResponse::duplicate`]。
#[serde_as]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchResponse {
    pub url: String,
    pub status: u16,
    #[serde(default)]
    pub kind: ResponseKind,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde_as(as = "Base64")]
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            kind: ResponseKind::Basic,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_kind(mut self, kind: ResponseKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn duplicate(&self) -> Self {
        Self {
            url: self.url.clone(),
            status: self.status,
            kind: self.kind,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 只有完整且非错误的 200 响应才会写入缓存
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind != ResponseKind::Error
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("network unreachable: {0}")]
    Unreachable(String),
    #[error("request to {url} timed out")]
    Timeout { url: String },
}

#[async_trait(?Send)]
pub trait Network {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError>;
}
