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

use amzsign_core::Result;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

use super::{ObjectRequest, ResponseHead};
use crate::{Client, Region, Request};

impl Client {
    /// Delete an object.
    pub fn delete_object(&self, bucket: &str, key: &str) -> DeleteObject<'_> {
        DeleteObject {
            client: self,
            req: ObjectRequest::new(Method::DELETE, bucket, key),
        }
    }
}

/// DeleteObject builds the `DELETE /{bucket}/{key}` operation.
#[derive(Debug, Clone)]
pub struct DeleteObject<'a> {
    client: &'a Client,
    req: ObjectRequest,
}

impl DeleteObject<'_> {
    /// Authenticate with a multi-factor device, required by MFA delete buckets.
    pub fn mfa(mut self, serial: &str, token: &str) -> Self {
        self.req = self.req.set_header("x-amz-mfa", format!("{serial} {token}"));
        self
    }

    /// Sign and send the request.
    pub async fn exec(&self) -> Result<DeleteObjectResponse> {
        let resp = self.client.send(self).await?;
        let (head, _) = ResponseHead::split(resp);
        Ok(DeleteObjectResponse { head })
    }
}

impl Request for DeleteObject<'_> {
    fn request(&self, region: &Region) -> Result<http::Request<Bytes>> {
        self.req.build(region, Bytes::new())
    }
}

/// Response of [`DeleteObject`].
#[derive(Debug, Clone)]
pub struct DeleteObjectResponse {
    head: ResponseHead,
}

impl DeleteObjectResponse {
    /// HTTP status, `204 No Content` on success.
    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{client, MockHttpSend};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_delete_object_with_mfa() -> Result<()> {
        let (client, sent) = client(MockHttpSend::new(StatusCode::NO_CONTENT));

        let resp = client
            .delete_object("mybucket", "mykey")
            .mfa("SERIAL", "123456")
            .exec()
            .await?;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let sent = sent.requests();
        assert_eq!(sent[0].method(), Method::DELETE);
        assert_eq!(sent[0].headers()["x-amz-mfa"], "SERIAL 123456");
        assert_eq!(
            sent[0].headers()["authorization"],
            "AWS access_key:5GL3KLHR5I2xeLn/eWI38ajbWbI="
        );
        Ok(())
    }
}
