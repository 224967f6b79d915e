//! The transport seam.
//!
//! Everything the client sends goes through [`HttpClient`], so tests can swap
//! the network for a recording fake.

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    codec::decode_slice,
    config::ClientConfig,
    error::{Error, Result},
    query::Params,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A file sent as a named multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub part: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(part: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            part: part.into(),
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads `path`. The part is named after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(path, e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidParam(format!("{} has no file name", path.display())))?;

        Ok(Self::new(file_name.clone(), file_name, bytes))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    Bytes(Vec<u8>),
    /// A JSON `data` part followed by file parts.
    Multipart { data: Value, files: Vec<Attachment> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,

    /// Relative to the base url, unless it starts with `http://` or `https://`.
    pub path: String,
    pub query: Params,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Params::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The service takes the raw token, without any scheme prefix.
    #[must_use]
    pub fn auth(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.header("authorization", token),
            None => self,
        }
    }

    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn json(self, value: impl Into<Value>) -> Self {
        self.body(Body::Json(value.into()))
    }

    pub fn is_absolute(&self) -> bool {
        self.path.starts_with("http://") || self.path.starts_with("https://")
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        decode_slice(&self.body)
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, request: Request) -> Result<Response>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    base_url: String,
}

impl ReqwestClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, request: &Request) -> String {
        if request.is_absolute() {
            request.path.clone()
        } else {
            format!("{}/{}", self.base_url, request.path.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(&self, request: Request) -> Result<Response> {
        let url = self.url(&request);
        debug!(method = request.method.as_str(), %url, "Sending request");

        let mut builder = self
            .inner
            .request(request.method.into(), &url)
            .query(request.query.pairs());

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Bytes(bytes) => builder.body(bytes),
            Body::Multipart { data, files } => {
                let form = files.into_iter().fold(
                    Form::new().text("data", data.to_string()),
                    |form, file| {
                        form.part(file.part, Part::bytes(file.bytes).file_name(file.file_name))
                    },
                );
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(|e| {
            error!("Request to {url} failed: {e}");
            e
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(status, %url, "Received response");

        Ok(Response { status, body })
    }
}
