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

use std::sync::{Arc, Mutex};

use amzsign_aws_v2::{RequestSigner, StaticCredentialProvider};
use amzsign_core::time::DateTime;
use amzsign_core::{Context, HttpSend, Result, Signer};
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use http::StatusCode;

use crate::{Client, Region};

/// Answers every request with the same canned response and records what was sent.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    status: StatusCode,
    headers: Vec<(&'static str, &'static str)>,
    body: Bytes,
    sent: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl MockHttpSend {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: vec![],
            body: Bytes::new(),
            sent: Arc::default(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn with_body(mut self, body: &'static str) -> Self {
        self.body = Bytes::from_static(body.as_bytes());
        self
    }

    pub fn requests(&self) -> Vec<http::Request<Bytes>> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.sent.lock().unwrap().push(req);

        let mut resp = http::Response::builder().status(self.status);
        for (k, v) in &self.headers {
            resp = resp.header(*k, *v);
        }
        Ok(resp.body(self.body.clone())?)
    }
}

pub fn fixed_time() -> DateTime {
    Utc.with_ymd_and_hms(2022, 3, 1, 8, 12, 34).unwrap()
}

/// A client on the US standard region that signs at [`fixed_time`] with
/// `access_key`/`secret`.
pub fn client(http: MockHttpSend) -> (Client, MockHttpSend) {
    let signer = Signer::new(
        Context::new().with_http_send(http.clone()),
        StaticCredentialProvider::new("access_key", "secret"),
        RequestSigner::new().with_time(fixed_time()),
    );

    (
        Client::with_signer(Region::from_static("https", "s3.amazonaws.com"), signer),
        http,
    )
}
