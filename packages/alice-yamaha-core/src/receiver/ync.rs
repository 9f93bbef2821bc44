//! Low-level Yamaha Network Control (YNC) protocol implementation.
//!
//! YNC is an XML-over-HTTP protocol: every command is a `<YAMAHA_AV>` document
//! POSTed to the receiver's control URL. `GET` commands carry `GetParam` at the
//! queried node, `PUT` commands carry the new value. For the receiver state
//! operations built on top of this, see `client.rs`.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use super::utils::{escape_xml, extract_root_attr, extract_xml_path};
use crate::protocol_constants::{YNC_ROOT, YNC_TIMEOUT_SECS};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while talking YNC to a receiver.
#[derive(Debug, Error)]
pub enum YncError {
    /// HTTP request to the receiver failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Receiver returned a non-success HTTP status.
    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    /// Receiver answered with a non-zero `RC` result code.
    #[error("receiver rejected command (RC={0})")]
    ResponseCode(String),

    /// Failed to parse the YNC response XML.
    #[error("Failed to parse YNC response")]
    Parse,
}

/// Convenient Result alias for YNC operations.
pub type YncResult<T> = Result<T, YncError>;

/// YNC command verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YncCommand {
    /// Read the node named by the request path.
    Get,
    /// Write the node named by the request path.
    Put,
}

impl YncCommand {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// YNC Request/Response
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps `content` in the element `path` and the `<YAMAHA_AV>` root.
///
/// `content` must already be escaped.
pub fn build_ync_body(command: YncCommand, path: &[&str], content: &str) -> String {
    let mut body = format!(r#"<?xml version="1.0" encoding="utf-8"?><{YNC_ROOT} cmd="{}">"#, command.as_str());
    for element in path {
        body.push_str(&format!("<{element}>"));
    }
    body.push_str(content);
    for element in path.iter().rev() {
        body.push_str(&format!("</{element}>"));
    }
    body.push_str(&format!("</{YNC_ROOT}>"));
    body
}

/// Sends a YNC document to a receiver's control URL.
///
/// Returns the response body once the HTTP status and the `RC` attribute
/// both report success.
pub async fn send_ync_request(client: &Client, ctrl_url: &str, body: String) -> YncResult<String> {
    log::debug!("[YNC] -> {} (body: {})", ctrl_url, body);

    let start = std::time::Instant::now();
    let res = client
        .post(ctrl_url)
        .header("Content-Type", "text/xml; charset=\"utf-8\"")
        .body(body)
        .timeout(Duration::from_secs(YNC_TIMEOUT_SECS))
        .send()
        .await;

    log::debug!(
        "[YNC] {} completed in {:?}: {:?}",
        ctrl_url,
        start.elapsed(),
        res.as_ref().map(|r| r.status())
    );

    let res = res?;
    let status = res.status();
    let response_text = res.text().await?;

    if !status.is_success() {
        return Err(YncError::HttpStatus(status.as_u16(), response_text));
    }

    check_response_code(&response_text)?;
    Ok(response_text)
}

/// Verifies the `RC` attribute of a YNC response is `0`.
pub fn check_response_code(response: &str) -> YncResult<()> {
    match extract_root_attr(response, b"RC") {
        Some(rc) if rc == "0" => Ok(()),
        Some(rc) => Err(YncError::ResponseCode(rc)),
        None => Err(YncError::Parse),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// YNC Request Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for constructing and sending YNC commands.
///
/// # Example
/// ```ignore
/// YncRequestBuilder::put(&client, "http://192.168.1.20/YamahaRemoteControl/ctrl")
///     .path(&["Main_Zone", "Power_Control", "Power"])
///     .text("On")
///     .send()
///     .await?;
/// ```
pub struct YncRequestBuilder<'a> {
    client: &'a Client,
    ctrl_url: &'a str,
    command: YncCommand,
    path: Vec<&'a str>,
    content: String,
}

impl<'a> YncRequestBuilder<'a> {
    /// Starts a `GET` command.
    #[must_use]
    pub fn get(client: &'a Client, ctrl_url: &'a str) -> Self {
        Self::new(client, ctrl_url, YncCommand::Get)
    }

    /// Starts a `PUT` command.
    #[must_use]
    pub fn put(client: &'a Client, ctrl_url: &'a str) -> Self {
        Self::new(client, ctrl_url, YncCommand::Put)
    }

    fn new(client: &'a Client, ctrl_url: &'a str, command: YncCommand) -> Self {
        Self {
            client,
            ctrl_url,
            command,
            path: Vec::new(),
            content: String::new(),
        }
    }

    /// Sets the element path the command addresses.
    #[must_use]
    pub fn path(mut self, path: &[&'a str]) -> Self {
        self.path.extend_from_slice(path);
        self
    }

    /// Appends escaped text content at the addressed node.
    #[must_use]
    pub fn text(mut self, value: &str) -> Self {
        self.content.push_str(&escape_xml(value));
        self
    }

    /// Appends a `<key>value</key>` child at the addressed node.
    ///
    /// Children are emitted in the order they are added.
    #[must_use]
    pub fn child(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.content
            .push_str(&format!("<{key}>{}</{key}>", escape_xml(value.as_ref())));
        self
    }

    /// Renders the request body without sending it.
    #[must_use]
    pub fn body(&self) -> String {
        build_ync_body(self.command, &self.path, &self.content)
    }

    /// Sends the command and returns the response body.
    pub async fn send(self) -> YncResult<String> {
        let body = self.body();
        send_ync_request(self.client, self.ctrl_url, body).await
    }
}

/// Reads a leaf from a `GET` response, failing with [`YncError::Parse`] when absent.
pub fn require_path(response: &str, path: &[&str]) -> YncResult<String> {
    extract_xml_path(response, path).ok_or(YncError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> Client {
        Client::new()
    }

    #[test]
    fn builder_renders_nested_put() {
        let client = test_client();
        let body = YncRequestBuilder::put(&client, "http://192.168.1.20/YamahaRemoteControl/ctrl")
            .path(&["Main_Zone", "Power_Control", "Power"])
            .text("On")
            .body();

        assert!(body.starts_with(r#"<?xml version="1.0" encoding="utf-8"?><YAMAHA_AV cmd="PUT">"#));
        assert!(body.ends_with(
            "<Main_Zone><Power_Control><Power>On</Power></Power_Control></Main_Zone></YAMAHA_AV>"
        ));
    }

    #[test]
    fn builder_renders_children_in_order() {
        let client = test_client();
        let body = YncRequestBuilder::put(&client, "http://receiver/ctrl")
            .path(&["Main_Zone", "Volume", "Lvl"])
            .child("Val", "-305")
            .child("Exp", "1")
            .child("Unit", "dB")
            .body();

        assert!(body.contains(
            "<Main_Zone><Volume><Lvl><Val>-305</Val><Exp>1</Exp><Unit>dB</Unit></Lvl></Volume></Main_Zone>"
        ));
    }

    #[test]
    fn builder_renders_get_param() {
        let client = test_client();
        let body = YncRequestBuilder::get(&client, "http://receiver/ctrl")
            .path(&["Main_Zone", "Basic_Status"])
            .text("GetParam")
            .body();

        assert!(body.contains(r#"<YAMAHA_AV cmd="GET">"#));
        assert!(body.contains("<Main_Zone><Basic_Status>GetParam</Basic_Status></Main_Zone>"));
    }

    #[test]
    fn builder_escapes_text() {
        let client = test_client();
        let body = YncRequestBuilder::put(&client, "http://receiver/ctrl")
            .path(&["Main_Zone", "Input", "Input_Sel"])
            .text("A&B")
            .body();

        assert!(body.contains("<Input_Sel>A&amp;B</Input_Sel>"));
    }

    #[test]
    fn check_response_code_accepts_zero() {
        assert!(check_response_code(r#"<YAMAHA_AV rsp="PUT" RC="0"></YAMAHA_AV>"#).is_ok());
    }

    #[test]
    fn check_response_code_rejects_non_zero() {
        match check_response_code(r#"<YAMAHA_AV rsp="PUT" RC="4"></YAMAHA_AV>"#) {
            Err(YncError::ResponseCode(rc)) => assert_eq!(rc, "4"),
            other => panic!("expected ResponseCode error, got {:?}", other),
        }
    }

    #[test]
    fn check_response_code_rejects_garbage() {
        assert!(matches!(
            check_response_code("<html>nope</html>"),
            Err(YncError::Parse)
        ));
    }
}
