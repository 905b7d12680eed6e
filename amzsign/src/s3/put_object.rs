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

use amzsign_core::hash::base64_md5;
use amzsign_core::time::{format_http_date, DateTime};
use amzsign_core::Result;
use bytes::Bytes;
use http::header::{CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, ETAG, EXPIRES};
use http::{HeaderMap, Method, StatusCode};

use super::{AclGrantee, ObjectRequest, ResponseHead};
use crate::{Client, Region, Request};

impl Client {
    /// Upload or copy an object.
    pub fn put_object(&self, bucket: &str, key: &str) -> PutObject<'_> {
        PutObject {
            client: self,
            req: ObjectRequest::new(Method::PUT, bucket, key),
            body: Bytes::new(),
        }
    }
}

/// PutObject builds the `PUT /{bucket}/{key}` operation.
#[derive(Debug, Clone)]
pub struct PutObject<'a> {
    client: &'a Client,
    req: ObjectRequest,
    body: Bytes,
}

impl PutObject<'_> {
    /// Set the object content.
    ///
    /// `Content-Length` and `Content-MD5` are derived from it.
    pub fn content(mut self, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        self.req = self
            .req
            .set_header(CONTENT_LENGTH.as_str(), data.len().to_string())
            .set_header("Content-MD5", base64_md5(&data));
        self.body = data;
        self
    }

    /// Set `Content-Type`.
    pub fn content_type(self, mime: &str) -> Self {
        self.header(CONTENT_TYPE.as_str(), mime)
    }

    /// Set `Content-Encoding`.
    pub fn content_encoding(self, encoding: &str) -> Self {
        self.header(CONTENT_ENCODING.as_str(), encoding)
    }

    /// Set `Cache-Control`.
    pub fn cache_control(self, control: &str) -> Self {
        self.header(CACHE_CONTROL.as_str(), control)
    }

    /// Set `Expires`, the instant the object stops being cacheable.
    pub fn expires(self, at: DateTime) -> Self {
        self.header(EXPIRES.as_str(), format_http_date(at))
    }

    /// Copy the object from `bucket`/`key` instead of uploading content.
    pub fn copy_source(self, bucket: &str, key: &str) -> Self {
        self.header(
            "x-amz-copy-source",
            format!("/{bucket}/{key}"),
        )
    }

    /// Either `COPY` or `REPLACE` the metadata of the copy source.
    pub fn metadata_directive(self, directive: &str) -> Self {
        self.header("x-amz-metadata-directive", directive)
    }

    /// Copy only if the source etag matches.
    pub fn copy_source_if_match(self, etag: &str) -> Self {
        self.header("x-amz-copy-source-if-match", etag)
    }

    /// Copy only if the source etag doesn't match.
    pub fn copy_source_if_none_match(self, etag: &str) -> Self {
        self.header("x-amz-copy-source-if-none-match", etag)
    }

    /// Copy only if the source was modified after `at`.
    pub fn copy_source_if_modified_since(self, at: DateTime) -> Self {
        self.header("x-amz-copy-source-if-modified-since", format_http_date(at))
    }

    /// Copy only if the source wasn't modified after `at`.
    pub fn copy_source_if_unmodified_since(self, at: DateTime) -> Self {
        self.header(
            "x-amz-copy-source-if-unmodified-since",
            format_http_date(at),
        )
    }

    /// Encrypt the object at rest, for example with `AES256`.
    pub fn server_side_encryption(self, algorithm: &str) -> Self {
        self.header("x-amz-server-side-encryption", algorithm)
    }

    /// Set the storage class, like `STANDARD` or `REDUCED_REDUNDANCY`.
    pub fn storage_class(self, class: &str) -> Self {
        self.header("x-amz-storage-class", class)
    }

    /// Redirect website requests for this object to `location`.
    pub fn website_redirect_location(self, location: &str) -> Self {
        self.header("x-amz-website-redirect-location", location)
    }

    /// Apply a canned ACL, like `private` or `public-read`.
    pub fn acl(self, acl: &str) -> Self {
        self.header("x-amz-acl", acl)
    }

    /// Grant read on the object.
    pub fn grant_read(self, grantee: &AclGrantee) -> Self {
        self.grant("x-amz-grant-read", grantee)
    }

    /// Grant write on the object.
    pub fn grant_write(self, grantee: &AclGrantee) -> Self {
        self.grant("x-amz-grant-write", grantee)
    }

    /// Grant reading the object ACL.
    pub fn grant_read_acp(self, grantee: &AclGrantee) -> Self {
        self.grant("x-amz-grant-read-acp", grantee)
    }

    /// Grant writing the object ACL.
    pub fn grant_write_acp(self, grantee: &AclGrantee) -> Self {
        self.grant("x-amz-grant-write-acp", grantee)
    }

    /// Grant full control on the object.
    pub fn grant_full_control(self, grantee: &AclGrantee) -> Self {
        self.grant("x-amz-grant-full-control", grantee)
    }

    /// Add user metadata, sent as `x-amz-meta-{name}`.
    pub fn metadata(mut self, name: &str, value: &str) -> Self {
        self.req = self.req.add_header(format!("x-amz-meta-{name}"), value);
        self
    }

    fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.req = self.req.set_header(name, value);
        self
    }

    fn grant(mut self, name: &str, grantee: &AclGrantee) -> Self {
        self.req = self.req.add_header(name, grantee.to_string());
        self
    }

    /// Sign and send the request.
    pub async fn exec(&self) -> Result<PutObjectResponse> {
        let resp = self.client.send(self).await?;
        let (head, _) = ResponseHead::split(resp);
        Ok(PutObjectResponse { head })
    }
}

impl Request for PutObject<'_> {
    fn request(&self, region: &Region) -> Result<http::Request<Bytes>> {
        self.req.build(region, self.body.clone())
    }
}

/// Response of [`PutObject`].
#[derive(Debug, Clone)]
pub struct PutObjectResponse {
    head: ResponseHead,
}

impl PutObjectResponse {
    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// Etag of the stored object.
    pub fn etag(&self) -> Option<&str> {
        self.head.headers.get(ETAG)?.to_str().ok()
    }
}
