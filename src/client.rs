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
use std::fmt::Formatter;
use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use reqwest::StatusCode;

use crate::auth::TokenManager;
use crate::auth::DEFAULT_AUTH_ENDPOINT;
use crate::core::SwiftCore;
use crate::error::parse_error;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::Result;

/// Builder for [`Client`].
///
/// All of region, container, tenant id, username and password are required
/// for a successful connection; the endpoints only need to be set for
/// Swift-compatible deployments that are not OVH.
#[derive(Default, Clone)]
pub struct Builder {
    region: Option<String>,
    container: Option<String>,
    tenant_id: Option<String>,
    username: Option<String>,
    password: Option<String>,
    endpoint: Option<String>,
    auth_endpoint: Option<String>,
}

impl Debug for Builder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut ds = f.debug_struct("Builder");

        ds.field("region", &self.region);
        ds.field("container", &self.container);
        ds.field("tenant_id", &self.tenant_id);
        ds.field("username", &self.username);
        ds.field("endpoint", &self.endpoint);
        ds.field("auth_endpoint", &self.auth_endpoint);

        if self.password.is_some() {
            ds.field("password", &"<redacted>");
        }

        ds.finish()
    }
}

impl Builder {
    /// Set the region code of the container, e.g. `GRA1`.
    ///
    /// The storage endpoint is derived from it unless [`endpoint`] is set
    /// explicitly.
    ///
    /// [`endpoint`]: Builder::endpoint
    pub fn region(&mut self, region: &str) -> &mut Self {
        if !region.is_empty() {
            self.region = Some(region.to_string());
        }
        self
    }

    /// Set the name of the targeted container. Required.
    pub fn container(&mut self, container: &str) -> &mut Self {
        if !container.is_empty() {
            self.container = Some(container.trim_end_matches('/').to_string());
        }
        self
    }

    /// Set the tenant id scoping the storage account. Required.
    ///
    /// This is the `AUTH_xxx` section of the container URL, without the
    /// `AUTH_` part.
    pub fn tenant_id(&mut self, tenant_id: &str) -> &mut Self {
        if !tenant_id.is_empty() {
            self.tenant_id = Some(tenant_id.to_string());
        }
        self
    }

    /// Set the OpenStack username. Required.
    pub fn username(&mut self, username: &str) -> &mut Self {
        if !username.is_empty() {
            self.username = Some(username.to_string());
        }
        self
    }

    /// Set the OpenStack password for the user. Required.
    pub fn password(&mut self, password: &str) -> &mut Self {
        if !password.is_empty() {
            self.password = Some(password.to_string());
        }
        self
    }

    /// Set the storage endpoint explicitly, overriding the one derived
    /// from the region.
    ///
    /// Endpoints should be full uri up to and including the account
    /// segment, e.g.
    ///
    /// - `http://127.0.0.1:8080/v1/AUTH_test`
    /// - `https://storage.gra1.cloud.ovh.net/v1/AUTH_account`
    ///
    /// If user inputs endpoint without scheme, we will prepend `https://`
    /// to it.
    pub fn endpoint(&mut self, endpoint: &str) -> &mut Self {
        if !endpoint.is_empty() {
            self.endpoint = Some(endpoint.trim_end_matches('/').to_string());
        }
        self
    }

    /// Set the credential exchange endpoint, overriding the default
    /// `https://auth.cloud.ovh.net/v2.0/tokens`.
    pub fn auth_endpoint(&mut self, auth_endpoint: &str) -> &mut Self {
        if !auth_endpoint.is_empty() {
            self.auth_endpoint = Some(auth_endpoint.trim_end_matches('/').to_string());
        }
        self
    }

    /// Build a [`Client`].
    pub fn build(&mut self) -> Result<Client> {
        debug!("client build started: {:?}", &self);

        let container = match self.container.take() {
            Some(container) => container,
            None => {
                return Err(Error::new(
                    ErrorKind::ConfigInvalid,
                    "missing container for client",
                ));
            }
        };

        let tenant_id = match self.tenant_id.take() {
            Some(tenant_id) => tenant_id,
            None => {
                return Err(Error::new(
                    ErrorKind::ConfigInvalid,
                    "missing tenant id for client",
                ));
            }
        };

        let username = match self.username.take() {
            Some(username) => username,
            None => {
                return Err(Error::new(
                    ErrorKind::ConfigInvalid,
                    "missing username for client",
                ));
            }
        };

        let password = match self.password.take() {
            Some(password) => password,
            None => {
                return Err(Error::new(
                    ErrorKind::ConfigInvalid,
                    "missing password for client",
                ));
            }
        };

        let endpoint = match self.endpoint.take() {
            Some(endpoint) => {
                if endpoint.starts_with("http") {
                    endpoint
                } else {
                    format!("https://{endpoint}")
                }
            }
            None => {
                let region = match self.region.take() {
                    Some(region) => region,
                    None => {
                        return Err(Error::new(
                            ErrorKind::ConfigInvalid,
                            "missing region for client",
                        ));
                    }
                };
                format!(
                    "https://storage.{}.cloud.ovh.net/v1/AUTH_{}",
                    region.to_lowercase(),
                    tenant_id
                )
            }
        };
        debug!("client use endpoint: {}", &endpoint);

        let auth_endpoint = self
            .auth_endpoint
            .take()
            .unwrap_or_else(|| DEFAULT_AUTH_ENDPOINT.to_string());

        let client = reqwest::Client::new();

        debug!("client build finished");
        Ok(Client {
            core: Arc::new(SwiftCore {
                endpoint,
                container,
                auth: TokenManager::new(auth_endpoint, username, password, tenant_id),
                client,
            }),
        })
    }
}

/// An OVH Object Storage client scoped to a single container.
///
/// All operations authenticate transparently: a bearer token is exchanged
/// for the configured credentials on first use and cached until it is
/// about to expire. The client is cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct Client {
    core: Arc<SwiftCore>,
}

impl Client {
    /// Returns the full storage URL for object.
    pub fn url(&self, object: &str) -> String {
        self.core.object_url(object)
    }

    /// Verifies a connection can be made with the client credentials.
    pub async fn ping(&self) -> Result<()> {
        let resp = self.core.container_get().await?;

        match resp.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(parse_error("ping", resp).await),
        }
    }

    /// Returns the names of all objects in the container, in the order
    /// the service lists them.
    pub async fn list(&self) -> Result<Vec<String>> {
        let resp = self.core.container_get().await?;

        match resp.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {
                let body = resp.text().await.map_err(|err| {
                    Error::new(ErrorKind::Unexpected, "read listing response failed")
                        .with_operation("list")
                        .set_source(err)
                })?;

                Ok(body.lines().map(str::to_string).collect())
            }
            _ => Err(parse_error("list", resp).await),
        }
    }

    /// Checks if the object exists in the container.
    pub async fn exists(&self, object: &str) -> Result<bool> {
        let resp = self.core.object_head(object).await?;

        match resp.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(parse_error("exists", resp).await),
        }
    }

    /// Puts a new object in the container.
    pub async fn upload(
        &self,
        object: &str,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Result<()> {
        let resp = self.core.object_put(object, content_type, body.into()).await?;

        match resp.status() {
            StatusCode::CREATED => Ok(()),
            _ => Err(parse_error("upload", resp).await),
        }
    }

    /// Puts a new object in the container if it doesn't already exist.
    pub async fn upload_if_new(
        &self,
        object: &str,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Result<()> {
        if self.exists(object).await? {
            return Ok(());
        }

        self.upload(object, content_type, body).await
    }

    /// Removes an object from the container.
    ///
    /// Deleting an object that is already gone is a success, so deleting
    /// twice never errors on the second call.
    pub async fn delete(&self, object: &str) -> Result<()> {
        let resp = self.core.object_delete(object).await?;

        match resp.status() {
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(()),
            _ => Err(parse_error("delete", resp).await),
        }
    }
}
