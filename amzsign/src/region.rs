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

//! Endpoint resolution.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use amzsign_aws_v2::AWS_URI_ENCODE_SET;
use amzsign_core::Result;
use http::Uri;
use percent_encoding::utf8_percent_encode;

/// Query parameters of a request, sorted by key.
///
/// Values keep their insertion order.
pub type Query = BTreeMap<String, Vec<String>>;

/// Region is the scheme and endpoint host of a service.
///
/// Known regions are provided as constants, see [`crate::s3`] and [`crate::ses`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    scheme: Cow<'static, str>,
    endpoint: Cow<'static, str>,
}

impl Region {
    /// Build a region at compile time.
    pub const fn from_static(scheme: &'static str, endpoint: &'static str) -> Self {
        Self {
            scheme: Cow::Borrowed(scheme),
            endpoint: Cow::Borrowed(endpoint),
        }
    }

    /// Build a region at runtime, for example a local S3 compatible service.
    ///
    /// `endpoint` may carry a port like `127.0.0.1:9000`.
    pub fn new(scheme: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            scheme: Cow::Owned(scheme.into()),
            endpoint: Cow::Owned(endpoint.into()),
        }
    }

    /// Scheme of this region, `https` for every known region.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Endpoint host of this region.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve the absolute URI of a resource in this region.
    ///
    /// - `subdomain` is prepended to the endpoint when it's not empty.
    /// - `path` is percent-encoded, `/` is kept.
    /// - `query` is form-encoded in key order. An absent or empty query never
    ///   produces a `?`.
    pub fn resolve(&self, subdomain: &str, path: &str, query: Option<&Query>) -> Result<Uri> {
        let mut s = String::new();
        s.push_str(&self.scheme);
        s.push_str("://");
        if !subdomain.is_empty() {
            s.push_str(subdomain);
            s.push('.');
        }
        s.push_str(&self.endpoint);
        if !path.starts_with('/') {
            s.push('/');
        }
        s.push_str(&utf8_percent_encode(path, &AWS_URI_ENCODE_SET).to_string());

        if let Some(query) = query {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(
                    query
                        .iter()
                        .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v))),
                )
                .finish();
            if !encoded.is_empty() {
                s.push('?');
                s.push_str(&encoded);
            }
        }

        Ok(Uri::from_str(&s)?)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.endpoint)
    }
}
