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

use std::fmt::Debug;

use bytes::Bytes;
use reqwest::header;
use reqwest::Response;

use crate::auth::TokenManager;
use crate::error::new_request_send_error;
use crate::error::Result;

const X_AUTH_TOKEN: &str = "X-Auth-Token";

/// Raw HTTP layer shared by all client operations.
///
/// Every wire call attaches a token obtained from the token manager and
/// returns the raw response; mapping status codes to outcomes is left to
/// the caller.
pub(crate) struct SwiftCore {
    /// Storage endpoint up to and including the `AUTH_<tenant>` segment,
    /// without a trailing slash.
    pub endpoint: String,
    pub container: String,
    pub auth: TokenManager,
    pub client: reqwest::Client,
}

impl Debug for SwiftCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwiftCore")
            .field("endpoint", &self.endpoint)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

impl SwiftCore {
    /// Full URL of the container root.
    pub fn container_url(&self) -> String {
        format!("{}/{}", &self.endpoint, &self.container)
    }

    /// Full URL for an object key.
    ///
    /// The key is path-joined onto the container URL; it is normalized but
    /// never percent-escaped.
    pub fn object_url(&self, object: &str) -> String {
        let p = normalize_object_key(object);
        if p.is_empty() {
            return self.container_url();
        }

        format!("{}/{}", self.container_url(), p)
    }

    pub async fn container_get(&self) -> Result<Response> {
        let url = self.container_url();
        let token = self.auth.token(&self.client).await?;

        self.client
            .get(&url)
            .header(X_AUTH_TOKEN, token)
            .send()
            .await
            .map_err(|err| new_request_send_error("container_get", err).with_context("url", &url))
    }

    pub async fn object_head(&self, object: &str) -> Result<Response> {
        let url = self.object_url(object);
        let token = self.auth.token(&self.client).await?;

        self.client
            .head(&url)
            .header(X_AUTH_TOKEN, token)
            .send()
            .await
            .map_err(|err| new_request_send_error("object_head", err).with_context("url", &url))
    }

    pub async fn object_put(&self, object: &str, content_type: &str, body: Bytes) -> Result<Response> {
        let url = self.object_url(object);
        let token = self.auth.token(&self.client).await?;

        self.client
            .put(&url)
            .header(X_AUTH_TOKEN, token)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await
            .map_err(|err| new_request_send_error("object_put", err).with_context("url", &url))
    }

    pub async fn object_delete(&self, object: &str) -> Result<Response> {
        let url = self.object_url(object);
        let token = self.auth.token(&self.client).await?;

        self.client
            .delete(&url)
            .header(X_AUTH_TOKEN, token)
            .send()
            .await
            .map_err(|err| new_request_send_error("object_delete", err).with_context("url", &url))
    }
}

/// Collapse duplicate separators and strip leading and trailing slashes
/// from an object key.
pub(crate) fn normalize_object_key(object: &str) -> String {
    object
        .split('/')
        .filter(|v| !v.is_empty())
        .collect::<Vec<&str>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_object_key() {
        let cases = vec![
            ("plain", "a/b.txt", "a/b.txt"),
            ("duplicate separators", "a//b.txt", "a/b.txt"),
            ("leading slash", "/a.txt", "a.txt"),
            ("trailing slash", "a/", "a"),
            ("empty", "", ""),
            ("only slashes", "///", ""),
        ];

        for (name, input, expected) in cases {
            assert_eq!(normalize_object_key(input), expected, "{name}");
        }
    }
}
