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

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::Result;

/// Default Keystone v2.0 credential exchange endpoint.
pub(crate) const DEFAULT_AUTH_ENDPOINT: &str = "https://auth.cloud.ovh.net/v2.0/tokens";

/// A token this close to its expiry is treated as stale, so it can't
/// expire while a request carrying it is in flight.
const EXPIRY_MARGIN_MINUTES: i64 = 5;

/// A bearer token issued by the authentication service.
///
/// The id and its expiry are always updated together.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub id: String,
    pub expires: DateTime<Utc>,
}

impl Token {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires > now + Duration::minutes(EXPIRY_MARGIN_MINUTES)
    }
}

/// TokenManager exchanges credentials for a bearer token and caches it
/// until it is about to expire.
///
/// The cached pair lives behind an async mutex that is held across the
/// refresh, so callers sharing a client serialize the credential exchange
/// instead of racing it. Callers that find a fresh token only hold the
/// lock long enough to clone the id.
pub(crate) struct TokenManager {
    endpoint: String,
    username: String,
    password: String,
    tenant_id: String,

    cached: Mutex<Option<Token>>,
}

#[derive(Deserialize)]
struct TokensResponse {
    access: Access,
}

#[derive(Deserialize)]
struct Access {
    token: AccessToken,
}

#[derive(Deserialize)]
struct AccessToken {
    id: String,
    expires: String,
}

impl TokenManager {
    pub fn new(endpoint: String, username: String, password: String, tenant_id: String) -> Self {
        Self {
            endpoint,
            username,
            password,
            tenant_id,

            cached: Mutex::new(None),
        }
    }

    /// Returns a working token id, requesting a new one when the cached
    /// token is absent or expires within the safety margin.
    pub async fn token(&self, client: &reqwest::Client) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.id.clone());
            }
        }

        debug!("token absent or stale, requesting a new one");

        let token = self.request_token(client).await?;
        let id = token.id.clone();
        *cached = Some(token);

        Ok(id)
    }

    async fn request_token(&self, client: &reqwest::Client) -> Result<Token> {
        let body = serde_json::json!({
            "auth": {
                "passwordCredentials": {
                    "username": self.username,
                    "password": self.password,
                },
                "tenantId": self.tenant_id,
            }
        });

        let resp = client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                Error::new(ErrorKind::AuthFailed, "token request could not be sent")
                    .with_operation("TokenManager::request_token")
                    .set_source(err)
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(
                Error::new(ErrorKind::AuthFailed, "token request rejected")
                    .with_operation("TokenManager::request_token")
                    .with_context("status", status),
            );
        }

        let decoded: TokensResponse = resp.json().await.map_err(|err| {
            Error::new(ErrorKind::AuthFailed, "token response could not be decoded")
                .with_operation("TokenManager::request_token")
                .set_source(err)
        })?;

        let expires = DateTime::parse_from_rfc3339(&decoded.access.token.expires)
            .map_err(|err| {
                Error::new(ErrorKind::AuthFailed, "token expiry is not a valid timestamp")
                    .with_operation("TokenManager::request_token")
                    .with_context("expires", &decoded.access.token.expires)
                    .set_source(err)
            })?
            .with_timezone(&Utc);

        Ok(Token {
            id: decoded.access.token.id,
            expires,
        })
    }
}
