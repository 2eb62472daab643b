//! Request descriptions for the API gateway
//!
//! An [`ApiRequest`] is a plain, cloneable description of a call. The
//! gateway turns it into a `reqwest` request every time it is sent, which is
//! what lets a request be replayed after a token refresh.

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use url::Url;

use crate::error::Result;

/// Body of a request, kept in a form that can be rebuilt for a replay
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Vec<u8>),
    Multipart(MultipartForm),
}

/// One field of a multipart upload
#[derive(Debug, Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

/// Owned description of a multipart form
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field. Blank values are skipped, as browsers' upload forms do.
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.parts.push(FormPart::Text {
                name: name.to_string(),
                value,
            });
        }
        self
    }

    /// Add a text field only when a value is present
    pub fn text_opt<V: Into<String>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    /// Add a file field
    pub fn file(mut self, name: &str, upload: FileUpload) -> Self {
        self.parts.push(FormPart::File {
            name: name.to_string(),
            file_name: upload.file_name,
            mime: upload.mime,
            bytes: upload.bytes,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    fn to_form(&self) -> Result<Form> {
        let mut form = Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        file = file.mime_str(mime)?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

/// A file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Description of one backend call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl ApiRequest {
    /// `path` is relative to the configured base URL unless it is an absolute URL
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Add a multipart body to the request
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Resolve the target URL against `base_url`
    pub fn url(&self, base_url: &str) -> Result<Url> {
        let mut url = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            Url::parse(&self.path)?
        } else {
            Url::parse(&format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                self.path.trim_start_matches('/')
            ))?
        };

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Build the `reqwest` request, with a bearer token when one is given
    pub(crate) fn build(
        &self,
        client: &Client,
        base_url: &str,
        bearer: Option<&str>,
    ) -> Result<RequestBuilder> {
        let url = self.url(base_url)?;
        let mut req = client.request(self.method.clone(), url);

        for (name, value) in &self.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(token) = bearer {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                req = req.header(AUTHORIZATION, value);
            }
        }

        match &self.body {
            Some(RequestBody::Json(bytes)) => {
                req = req
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }
            Some(RequestBody::Multipart(form)) => {
                req = req.multipart(form.to_form()?);
            }
            None => {}
        }

        Ok(req)
    }
}

/// A request in flight, with its single allowed retry tracked explicitly
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub request: ApiRequest,
    pub already_retried: bool,
}

impl PendingRequest {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            already_retried: false,
        }
    }
}
