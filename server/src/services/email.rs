// spokehub_server/src/services/email.rs

//! Operator notifications over an HTTP email API.
//!
//! One `POST <api>/email.v1.EmailService/SendEmail` per notification with a
//! bearer key. Any failure (transport, non-2xx) is logged and reported as
//! `false`; nothing here raises.

use async_trait::async_trait;
use serde::Serialize;
use spokehub::Notifier;
use std::time::Duration;
use tracing::{info, instrument, warn};

const SEND_PATH: &str = "email.v1.EmailService/SendEmail";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
  to: &'a str,
  subject: &'a str,
  html: String,
  text: &'a str,
  sender_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpEmailNotifier {
  client: reqwest::Client,
  endpoint: String,
  api_key: String,
  recipient: String,
  sender_name: String,
}

fn escape_html(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      _ => out.push(c),
    }
  }
  out
}

/// Plain-text notification as a minimal HTML body, line breaks kept.
fn to_html(title: &str, content: &str) -> String {
  format!(
    "<h2>{}</h2><pre style=\"font-family:inherit;white-space:pre-wrap\">{}</pre>",
    escape_html(title),
    escape_html(content)
  )
}

impl HttpEmailNotifier {
  pub fn new(
    api_url: &str,
    api_key: impl Into<String>,
    recipient: impl Into<String>,
    sender_name: impl Into<String>,
  ) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
    Ok(Self {
      client,
      endpoint: format!("{}/{}", api_url.trim_end_matches('/'), SEND_PATH),
      api_key: api_key.into(),
      recipient: recipient.into(),
      sender_name: sender_name.into(),
    })
  }
}

#[async_trait]
impl Notifier for HttpEmailNotifier {
  #[instrument(name = "email::notify", skip(self, content), fields(to = %self.recipient))]
  async fn notify(&self, title: &str, content: &str) -> bool {
    let body = SendEmailBody {
      to: &self.recipient,
      subject: title,
      html: to_html(title, content),
      text: content,
      sender_name: &self.sender_name,
    };

    let response = self
      .client
      .post(&self.endpoint)
      .bearer_auth(&self.api_key)
      .header("connect-protocol-version", "1")
      .json(&body)
      .send()
      .await;

    match response {
      Ok(resp) if resp.status().is_success() => {
        info!("Operator notification sent.");
        true
      }
      Ok(resp) => {
        let status = resp.status();
        let detail = resp.text().await.unwrap_or_default();
        warn!(%status, %detail, "Email API rejected the notification.");
        false
      }
      Err(e) => {
        warn!(error = %e, "Email API unreachable.");
        false
      }
    }
  }
}

/// Used when email is not configured: the notification only goes to the log,
/// and counts as undelivered.
#[derive(Debug, Clone, Default)]
pub struct LogOnlyNotifier;

#[async_trait]
impl Notifier for LogOnlyNotifier {
  async fn notify(&self, title: &str, content: &str) -> bool {
    info!(%title, %content, "Email not configured; notification logged only.");
    false
  }
}
