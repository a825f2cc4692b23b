use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::logger::Logger;
use crate::models::{ActiveBaseModel, SynthesisResult, UserInfo};
use crate::upload::UploadSelection;

pub struct FilePart {
  pub field: String,
  pub file_name: String,
  pub mime: String,
  pub bytes: Vec<u8>,
}

pub enum Payload {
  None,
  Json(Value),
  Multipart {
    fields: Vec<(String, String)>,
    file: FilePart,
  },
}

#[derive(Debug)]
pub struct ApiResult {
  pub status: u16,
  pub data: Value,
}

impl ApiResult {
  // `data` carries a "success" flag for every JSON object response; the
  // status fallback covers non-object bodies.
  pub fn success(&self) -> bool {
    match self.data.get("success").and_then(|v| v.as_bool()) {
      Some(flag) => flag,
      None => (200..300).contains(&self.status),
    }
  }

  pub fn message(&self) -> Option<&str> {
    self.data.get("message").and_then(|v| v.as_str())
  }
}

pub struct ApiClient {
  http: reqwest::Client,
  base_url: String,
  logger: Arc<Logger>,
}

impl ApiClient {
  pub fn new(base_url: &str, logger: Arc<Logger>) -> anyhow::Result<Self> {
    // the session cookie rides along on every call once the server sets it
    let http = reqwest::Client::builder().cookie_store(true).build()?;
    Ok(Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
      logger,
    })
  }

  pub async fn call(
    &self,
    endpoint: &str,
    method: Method,
    payload: Payload,
  ) -> Result<ApiResult, ApiError> {
    let url = format!("{}{}", self.base_url, endpoint);
    self.logger.info(&format!("calling {method} {url}"));

    let mut request = self.http.request(method.clone(), &url);
    request = match payload {
      Payload::None => request,
      Payload::Json(body) => request.json(&body),
      Payload::Multipart { fields, file } => {
        let mut form = Form::new();
        for (name, value) in fields {
          form = form.text(name, value);
        }
        let part = Part::bytes(file.bytes)
          .file_name(file.file_name)
          .mime_str(&file.mime)
          .map_err(|err| ApiError::Transport(err.to_string()))?;
        form = form.part(file.field, part);
        // no explicit content-type header: the transport sets the boundary
        request.multipart(form)
      }
    };

    let response = request.send().await.map_err(|err| {
      let message = err.to_string();
      self.logger.warn(&format!("{method} {url} failed: {message}"));
      if message.is_empty() {
        ApiError::Transport("An unexpected error occurred.".to_string())
      } else {
        ApiError::Transport(message)
      }
    })?;

    let status = response.status();
    let declares_json = response
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .map(|v| v.contains("application/json"))
      .unwrap_or(false);

    let text = response
      .text()
      .await
      .map_err(|err| ApiError::Transport(err.to_string()))?;

    let mut data = if declares_json {
      serde_json::from_str::<Value>(&text).map_err(|err| {
        self
          .logger
          .warn(&format!("{method} {url} returned unparseable JSON: {err}"));
        ApiError::Malformed(err.to_string())
      })?
    } else {
      let message = if status.is_success() && text.is_empty() {
        format!("Operation successful with status {}", status.as_u16())
      } else {
        text
      };
      json!({
        "success": status.is_success(),
        "status": status.as_u16(),
        "message": message,
      })
    };

    if !status.is_success() {
      let message = data
        .get("message")
        .and_then(|v| v.as_str())
        .filter(|m| !m.is_empty())
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("HTTP error: status {}", status.as_u16()));
      self
        .logger
        .warn(&format!("{method} {url} -> {}: {message}", status.as_u16()));
      return Err(ApiError::Server {
        status: status.as_u16(),
        message,
      });
    }

    if let Value::Object(map) = &mut data {
      if !map.contains_key("success") {
        map.insert("success".to_string(), Value::Bool(true));
      }
    }
    self
      .logger
      .info(&format!("{method} {url} -> {}", status.as_u16()));

    Ok(ApiResult {
      status: status.as_u16(),
      data,
    })
  }

  pub async fn login(&self, email: &str, password: &str) -> Result<ApiResult, ApiError> {
    let body = json!({ "email": email, "password": password });
    self.call("/login", Method::POST, Payload::Json(body)).await
  }

  pub async fn register(&self, email: &str, password: &str) -> Result<ApiResult, ApiError> {
    let body = json!({ "email": email, "password": password });
    self
      .call("/register", Method::POST, Payload::Json(body))
      .await
  }

  pub async fn logout(&self) -> Result<ApiResult, ApiError> {
    self.call("/logout", Method::POST, Payload::None).await
  }

  pub async fn user_info(&self) -> Result<UserInfo, ApiError> {
    let result = self.call("/me", Method::GET, Payload::None).await?;
    serde_json::from_value(result.data).map_err(|err| ApiError::Malformed(err.to_string()))
  }

  pub async fn active_base_model(&self) -> Result<ActiveBaseModel, ApiError> {
    let result = self
      .call("/api/base_model/active", Method::GET, Payload::None)
      .await?;
    serde_json::from_value(result.data).map_err(|err| ApiError::Malformed(err.to_string()))
  }

  pub async fn synthesize(
    &self,
    item_type: &str,
    selection: UploadSelection,
  ) -> Result<SynthesisResult, ApiError> {
    let payload = Payload::Multipart {
      fields: vec![("item_type".to_string(), item_type.to_string())],
      file: FilePart {
        field: "item_image".to_string(),
        file_name: selection.file_name,
        mime: selection.mime,
        bytes: selection.bytes,
      },
    };
    let result = self.call("/synthesize/web", Method::POST, payload).await?;
    serde_json::from_value(result.data).map_err(|err| ApiError::Malformed(err.to_string()))
  }

  pub async fn download_image(&self, url: &str, dir: &Path) -> anyhow::Result<PathBuf> {
    let url = self.absolute_url(url);
    self.logger.info(&format!("downloading {url}"));

    let response = self.http.get(&url).send().await?;
    if !response.status().is_success() {
      anyhow::bail!("HTTP error: status {}", response.status().as_u16());
    }
    let bytes = response.bytes().await?;

    std::fs::create_dir_all(dir)?;
    let file_name = format!("synthesized_{}.png", Utc::now().format("%Y%m%d%H%M%S"));
    let path = dir.join(file_name);
    std::fs::write(&path, &bytes)?;
    Ok(path)
  }

  // result and model image locators may be server-relative paths
  fn absolute_url(&self, url: &str) -> String {
    if url.starts_with('/') {
      format!("{}{}", self.base_url, url)
    } else {
      url.to_string()
    }
  }
}
