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

use amzsign_core::time::{format_http_date, DateTime};
use amzsign_core::Result;
use bytes::Bytes;
use http::header::{IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE, RANGE};
use http::{HeaderMap, Method, StatusCode};

use super::{ObjectRequest, ResponseHead};
use crate::{Client, Region, Request};

impl Client {
    /// Download an object.
    pub fn get_object(&self, bucket: &str, key: &str) -> GetObject<'_> {
        GetObject {
            client: self,
            req: ObjectRequest::new(Method::GET, bucket, key),
        }
    }
}

/// GetObject builds the `GET /{bucket}/{key}` operation.
///
/// `response_*` overrides are sent as query parameters and signed with the
/// resource.
#[derive(Debug, Clone)]
pub struct GetObject<'a> {
    client: &'a Client,
    req: ObjectRequest,
}

impl GetObject<'_> {
    /// Override `Content-Type` of the response.
    pub fn response_content_type(self, mime: &str) -> Self {
        self.query("response-content-type", mime)
    }

    /// Override `Content-Language` of the response.
    pub fn response_content_language(self, language: &str) -> Self {
        self.query("response-content-language", language)
    }

    /// Override `Expires` of the response.
    pub fn response_expires(self, at: DateTime) -> Self {
        self.query("response-expires", format_http_date(at))
    }

    /// Override `Cache-Control` of the response.
    pub fn response_cache_control(self, control: &str) -> Self {
        self.query("response-cache-control", control)
    }

    /// Override `Content-Disposition` of the response.
    pub fn response_content_disposition(self, disposition: &str) -> Self {
        self.query("response-content-disposition", disposition)
    }

    /// Override `Content-Encoding` of the response.
    pub fn response_content_encoding(self, encoding: &str) -> Self {
        self.query("response-content-encoding", encoding)
    }

    /// Fetch only `range`, like `bytes=0-9`.
    pub fn range(self, range: &str) -> Self {
        self.header(RANGE.as_str(), range)
    }

    /// Fetch only if modified after `at`.
    pub fn if_modified_since(self, at: DateTime) -> Self {
        self.header(IF_MODIFIED_SINCE.as_str(), format_http_date(at))
    }

    /// Fetch only if not modified after `at`.
    pub fn if_unmodified_since(self, at: DateTime) -> Self {
        self.header(IF_UNMODIFIED_SINCE.as_str(), format_http_date(at))
    }

    /// Fetch only if the etag matches.
    pub fn if_match(self, etag: &str) -> Self {
        self.header(IF_MATCH.as_str(), etag)
    }

    /// Fetch only if the etag doesn't match.
    pub fn if_none_match(self, etag: &str) -> Self {
        self.header(IF_NONE_MATCH.as_str(), etag)
    }

    fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.req = self.req.set_header(name, value);
        self
    }

    fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.req = self.req.add_query(key, value);
        self
    }

    /// Sign and send the request.
    ///
    /// Conditional requests that don't match return `304 Not Modified` or
    /// `412 Precondition Failed` through [`GetObjectResponse::status`].
    pub async fn exec(&self) -> Result<GetObjectResponse> {
        let resp = self.client.send(self).await?;
        let (head, body) = ResponseHead::split(resp);
        Ok(GetObjectResponse { head, body })
    }
}

impl Request for GetObject<'_> {
    fn request(&self, region: &Region) -> Result<http::Request<Bytes>> {
        self.req.build(region, Bytes::new())
    }
}

/// Response of [`GetObject`].
#[derive(Debug, Clone)]
pub struct GetObjectResponse {
    head: ResponseHead,
    body: Bytes,
}

impl GetObjectResponse {
    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// Object content.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Take the object content.
    pub fn into_body(self) -> Bytes {
        self.body
    }
}
