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

//! Signer for AWS signature version 2, the single pass HMAC-SHA1 scheme used by S3.
//!
//! ```no_run
//! use amzsign_aws_v2::{DefaultCredentialProvider, RequestSigner};
//! use amzsign_core::{Context, OsEnv, Signer};
//!
//! # async fn example() -> amzsign_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());
//!
//! let mut parts = http::Request::get("https://s3.amazonaws.com/mybucket/mykey")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, None).await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::*;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod normalize;
pub use normalize::{normalize_headers, normalize_multimap, normalize_pairs, NormalizedHeader};

mod sign_request;
pub use sign_request::{canonical_resource, string_to_sign, RequestSigner};

mod provide_credential;
pub use provide_credential::*;
