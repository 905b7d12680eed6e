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

//! Build, sign and send AWS signature version 2 requests.
//!
//! ```no_run
//! use amzsign::aws::DefaultCredentialProvider;
//! use amzsign::{s3, Client, Context, OsEnv};
//! use amzsign_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> amzsign::Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let client = Client::new(ctx, s3::US_STANDARD, DefaultCredentialProvider::new());
//!
//! let resp = client
//!     .put_object("mybucket", "hello.txt")
//!     .content("Hello, World!")
//!     .content_type("text/plain")
//!     .exec()
//!     .await?;
//! println!("stored with etag {:?}", resp.etag());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub use amzsign_core::*;

/// Credentials, providers and the request signer.
pub mod aws {
    pub use amzsign_aws_v2::*;
}

mod client;
pub use client::{Client, Request};

mod error;
pub use error::ServiceError;

mod region;
pub use region::{Query, Region};

pub mod s3;
pub mod ses;

#[cfg(test)]
mod mock;
