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

use std::time::Duration;

use amzsign_aws_v2::{Credential, RequestSigner};
use amzsign_core::{Context, Error, ProvideCredential, Result, Signer};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Uri;
use log::debug;

use crate::{Region, ServiceError};

/// Request is implemented by every operation builder.
///
/// It produces the unsigned request of the operation against `region`.
pub trait Request {
    /// Build the unsigned http request.
    fn request(&self, region: &Region) -> Result<http::Request<Bytes>>;
}

/// Client signs and sends requests to one region.
///
/// The client is the only holder of the secret key. It's cheap to clone and
/// safe to share between tasks.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    region: Region,
    signer: Signer<Credential>,
}

impl Client {
    /// Create a client that loads its credential from `loader`.
    pub fn new(
        ctx: Context,
        region: Region,
        loader: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        let signer = Signer::new(ctx.clone(), loader, RequestSigner::new());
        Self::with_signer(region, signer)
    }

    /// Create a client around a prepared signer.
    ///
    /// The signer's context is used to send requests.
    pub fn with_signer(region: Region, signer: Signer<Credential>) -> Self {
        Self {
            ctx: signer.context().clone(),
            region,
            signer,
        }
    }

    /// Region of this client.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Context of this client.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Sign a request in header mode.
    pub async fn sign(&self, req: http::Request<Bytes>) -> Result<http::Request<Bytes>> {
        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts, None).await?;
        Ok(http::Request::from_parts(parts, body))
    }

    /// Build and sign the request of an operation without sending it.
    pub async fn request(&self, req: &impl Request) -> Result<http::Request<Bytes>> {
        let req = req.request(&self.region)?;
        self.sign(req).await
    }

    /// Presign a GET of `uri` that stays valid for `lifetime`.
    pub async fn sign_url(&self, uri: &Uri, lifetime: Duration) -> Result<Uri> {
        let (mut parts, _) = http::Request::get(uri.clone()).body(())?.into_parts();
        self.signer.sign(&mut parts, Some(lifetime)).await?;
        Ok(parts.uri)
    }

    /// Build, sign and send the request of an operation.
    ///
    /// Responses with status 300 or above and an XML payload fail with a
    /// [`ServiceError`] as source. Other responses are returned as is, callers
    /// must check the status.
    pub async fn send(&self, req: &impl Request) -> Result<http::Response<Bytes>> {
        let req = self.request(req).await?;
        debug!("sending {} {}", req.method(), req.uri());

        let resp = self.ctx.http_send(req).await?;
        debug!("got response: {}", resp.status());

        if resp.status().as_u16() >= 300 && is_xml(&resp) {
            let err = ServiceError::parse(resp.status(), resp.body())?;
            return Err(Error::service(err.to_string()).with_source(err));
        }
        Ok(resp)
    }
}

fn is_xml(resp: &http::Response<Bytes>) -> bool {
    let Some(v) = resp.headers().get(CONTENT_TYPE) else {
        return false;
    };
    let Ok(v) = v.to_str() else {
        return false;
    };

    let mime = v.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("application/xml") || mime.eq_ignore_ascii_case("text/xml")
}
