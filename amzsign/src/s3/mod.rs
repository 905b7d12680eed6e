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

//! Object storage operations.
//!
//! Objects are addressed path style, `/{bucket}/{key}`, so every bucket is
//! reachable through the region endpoint.

use std::fmt;

use amzsign_core::{Error, Result};
use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, Method, StatusCode};

use crate::{Query, Region};

mod put_object;
pub use put_object::{PutObject, PutObjectResponse};

mod get_object;
pub use get_object::{GetObject, GetObjectResponse};

mod delete_object;
pub use delete_object::{DeleteObject, DeleteObjectResponse};

/// US Standard, `s3.amazonaws.com`.
pub const US_STANDARD: Region = Region::from_static("https", "s3.amazonaws.com");
/// US West (N. California).
pub const US_WEST_1: Region = Region::from_static("https", "s3-us-west-1.amazonaws.com");
/// US West (Oregon).
pub const US_WEST_2: Region = Region::from_static("https", "s3-us-west-2.amazonaws.com");
/// EU (Ireland).
pub const EU_WEST_1: Region = Region::from_static("https", "s3-eu-west-1.amazonaws.com");
/// Asia Pacific (Singapore).
pub const AP_SOUTHEAST_1: Region =
    Region::from_static("https", "s3-ap-southeast-1.amazonaws.com");
/// Asia Pacific (Sydney).
pub const AP_SOUTHEAST_2: Region =
    Region::from_static("https", "s3-ap-southeast-2.amazonaws.com");
/// Asia Pacific (Tokyo).
pub const AP_NORTHEAST_1: Region =
    Region::from_static("https", "s3-ap-northeast-1.amazonaws.com");
/// South America (São Paulo).
pub const SA_EAST_1: Region = Region::from_static("https", "s3-sa-east-1.amazonaws.com");

/// AclGrantee is the target of an `x-amz-grant-*` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclGrantee {
    /// Grantee identified by the email address of its account.
    EmailAddress(String),
    /// Grantee identified by its canonical user id.
    Id(String),
    /// Predefined group identified by its uri.
    Uri(String),
}

impl fmt::Display for AclGrantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AclGrantee::EmailAddress(v) => write!(f, "emailAddress={v:?}"),
            AclGrantee::Id(v) => write!(f, "id={v:?}"),
            AclGrantee::Uri(v) => write!(f, "uri={v:?}"),
        }
    }
}

/// Method, path, query and headers shared by all object operations.
#[derive(Debug, Clone)]
struct ObjectRequest {
    method: Method,
    path: String,
    query: Query,
    headers: Vec<(String, String)>,
}

impl ObjectRequest {
    fn new(method: Method, bucket: &str, key: &str) -> Self {
        Self {
            method,
            path: format!("/{bucket}/{key}"),
            query: Query::new(),
            headers: vec![],
        }
    }

    /// Replace all values of header `name`.
    fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Add one more value to header `name`.
    fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn add_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query
            .entry(key.to_string())
            .or_default()
            .push(value.into());
        self
    }

    fn build(&self, region: &Region, body: Bytes) -> Result<http::Request<Bytes>> {
        let uri = region.resolve("", &self.path, Some(&self.query))?;

        let mut req = http::Request::builder().method(self.method.clone()).uri(uri);
        for (k, v) in &self.headers {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                Error::request_invalid(format!("invalid header name: {k}")).with_source(e)
            })?;
            req = req.header(name, v.as_str());
        }
        Ok(req.body(body)?)
    }
}

/// Status and headers of a response.
#[derive(Debug, Clone)]
struct ResponseHead {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseHead {
    fn split(resp: http::Response<Bytes>) -> (Self, Bytes) {
        let (parts, body) = resp.into_parts();
        (
            Self {
                status: parts.status,
                headers: parts.headers,
            },
            body,
        )
    }
}
