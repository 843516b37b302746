// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Errors returned by ovhos.

use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

/// Result that is a wrapper of `Result<T, ovhos::Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// ErrorKind is all kinds of Error of ovhos.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// ovhos don't know what happened here, and no actions other than
    /// just returning it back. For example, the storage service returned
    /// an internal service error.
    Unexpected,
    /// The config for the client is invalid.
    ConfigInvalid,
    /// The credential exchange with the authentication service failed,
    /// so no token is available for the request.
    AuthFailed,
}

impl ErrorKind {
    /// Convert self into static str.
    pub fn into_static(self) -> &'static str {
        self.into()
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

impl From<ErrorKind> for &'static str {
    fn from(v: ErrorKind) -> &'static str {
        match v {
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::AuthFailed => "AuthFailed",
        }
    }
}

/// Error is the error struct returned by all ovhos functions.
///
/// ## Display
///
/// Error can be displayed in two ways:
///
/// - Via `Display`: like `err.to_string()` or `format!("{err}")`
///
/// Error will be printed in a single line:
///
/// ```shell
/// Unexpected at upload, context: { status: 500 Internal Server Error } => service unavailable
/// ```
///
/// - Via `Debug`: like `format!("{err:?}")`
///
/// Error will be printed in multi lines with more details.
pub struct Error {
    kind: ErrorKind,
    message: String,

    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("operation", &self.operation);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),

            operation: "",
            context: Vec::default(),
            source: None,
        }
    }

    /// Update error's operation.
    ///
    /// # Notes
    ///
    /// If the error already carries an operation, we will push a new context
    /// `(called, operation)`.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }

        self.operation = operation;
        self
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Notes
    ///
    /// If the source has been set, we will raise a panic here.
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "the source error has been set");

        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Parse a response with an unexpected status code into an [`Error`].
///
/// The storage service answers error statuses with short HTML or plain-text
/// bodies; keep a bounded excerpt as the error message.
pub(crate) async fn parse_error(operation: &'static str, resp: reqwest::Response) -> Error {
    let status = resp.status();
    let bs = resp.bytes().await.unwrap_or_default();

    Error::new(ErrorKind::Unexpected, parse_error_response(&bs))
        .with_operation(operation)
        .with_context("status", status)
}

fn parse_error_response(bs: &[u8]) -> String {
    const MAX_MESSAGE_LEN: usize = 256;

    let msg = String::from_utf8_lossy(bs);
    let msg = msg.trim();
    if msg.is_empty() {
        return "unexpected response status".to_string();
    }

    msg.chars().take(MAX_MESSAGE_LEN).collect()
}

/// Wrap a transport-level failure from sending a request.
pub(crate) fn new_request_send_error(operation: &'static str, err: reqwest::Error) -> Error {
    Error::new(ErrorKind::Unexpected, "send http request failed")
        .with_operation(operation)
        .set_source(err)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    use super::*;

    fn generate_error() -> Error {
        Error::new(ErrorKind::Unexpected, "something wrong happened")
            .with_operation("upload")
            .with_context("status", "500 Internal Server Error")
            .set_source(anyhow!("networking error"))
    }

    #[test]
    fn test_error_display() {
        let s = format!("{}", generate_error());
        assert_eq!(
            s,
            r#"Unexpected at upload, context: { status: 500 Internal Server Error } => something wrong happened, source: networking error"#
        );
    }

    #[test]
    fn test_error_debug() {
        let s = format!("{:?}", generate_error());
        assert_eq!(
            s,
            r#"Unexpected at upload => something wrong happened

Context:
   status: 500 Internal Server Error

Source:
   networking error
"#
        )
    }

    #[test]
    fn test_parse_error_response_excerpt() {
        assert_eq!(
            parse_error_response(b"<html><h1>Not Found</h1></html>"),
            "<html><h1>Not Found</h1></html>".to_string()
        );
        assert_eq!(
            parse_error_response(b"  \n"),
            "unexpected response status".to_string()
        );
    }
}
