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

use std::mem;
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};
use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

/// Signing context for request.
///
/// The query is kept raw, exactly as it appears on the wire, since the canonical
/// resource is built from the raw form.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// Raw HTTP query, without the leading `?`.
    pub query: Option<String>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq.query().map(|v| v.to_string()),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let paq = match self.query {
                    Some(query) if !query.is_empty() => format!("{}?{}", self.path, query),
                    _ => self.path,
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Get the raw query if it's present and not empty.
    #[inline]
    pub fn query_non_empty(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    /// Replace the whole query with already encoded pairs.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a=b&c=d"
    /// ```
    pub fn query_replace(&mut self, pairs: Vec<(String, String)>) {
        let s = pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        self.query = Some(s);
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }
}

/// SigningMethod is the method that used in signing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with header.
    Header,
    /// Signing with query.
    Query(Duration),
}

impl From<Option<Duration>> for SigningMethod {
    fn from(expires_in: Option<Duration>) -> Self {
        match expires_in {
            Some(d) => SigningMethod::Query(d),
            None => SigningMethod::Header,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use pretty_assertions::assert_eq;

    fn parts(uri: &str) -> http::request::Parts {
        http::Request::get(uri)
            .header(CONTENT_TYPE, "text/plain")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_build_and_apply_keeps_raw_query() -> Result<()> {
        let mut parts = parts("https://s3.amazonaws.com/bucket/a%20b?acl&x=1%2B2");
        let req = SigningRequest::build(&mut parts)?;

        assert_eq!(req.path, "/bucket/a%20b");
        assert_eq!(req.query.as_deref(), Some("acl&x=1%2B2"));
        assert_eq!(req.header_get_or_default(&CONTENT_TYPE)?, "text/plain");
        assert_eq!(
            req.header_get_or_default(&HeaderName::from_static("content-md5"))?,
            ""
        );
        assert!(parts.headers.is_empty());

        req.apply(&mut parts)?;
        assert_eq!(
            parts.uri.to_string(),
            "https://s3.amazonaws.com/bucket/a%20b?acl&x=1%2B2"
        );
        assert_eq!(parts.headers[CONTENT_TYPE], "text/plain");
        Ok(())
    }

    #[test]
    fn test_query_replace() -> Result<()> {
        let mut parts = parts("https://s3.amazonaws.com/bucket/key?old=1");
        let mut req = SigningRequest::build(&mut parts)?;
        req.query_replace(vec![
            ("AWSAccessKeyId".to_string(), "ak".to_string()),
            ("Expires".to_string(), "1".to_string()),
        ]);
        req.apply(&mut parts)?;

        assert_eq!(
            parts.uri.to_string(),
            "https://s3.amazonaws.com/bucket/key?AWSAccessKeyId=ak&Expires=1"
        );
        Ok(())
    }

    #[test]
    fn test_build_without_authority() {
        let mut parts = http::Request::get("/bucket/key")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        assert!(SigningRequest::build(&mut parts).is_err());
    }

    #[test]
    fn test_signing_method_from_expires() {
        assert_eq!(SigningMethod::from(None), SigningMethod::Header);
        assert_eq!(
            SigningMethod::from(Some(Duration::from_secs(60))),
            SigningMethod::Query(Duration::from_secs(60))
        );
    }
}
