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

//! ovhos is a light client for the OVH Object Storage service, an
//! OpenStack-Swift-compatible object store.
//!
//! The client authenticates with username/password/tenant credentials,
//! caches the issued bearer token until shortly before it expires, and
//! exposes the container operations as plain async calls.
//!
//! # Quick Start
//!
//! ```no_run
//! use ovhos::Builder;
//! use ovhos::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut builder = Builder::default();
//!     builder.region("GRA1");
//!     builder.container("backups");
//!     builder.tenant_id("32c3a65b6a4d4bd18257ab50857e4bc8");
//!     builder.username("user-abcdefgh");
//!     builder.password("password");
//!
//!     let storage = builder.build()?;
//!
//!     // Check connection.
//!     storage.ping().await?;
//!
//!     // Upload an object.
//!     storage.upload("file.txt", "text/plain", "content").await?;
//!
//!     // Get the URL of an object.
//!     println!("{}", storage.url("file.txt"));
//!
//!     // List all objects.
//!     for object in storage.list().await? {
//!         println!("{object}");
//!     }
//!
//!     // Delete an object.
//!     storage.delete("file.txt").await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

mod auth;
mod client;
mod core;
mod error;

pub use client::Builder;
pub use client::Client;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
