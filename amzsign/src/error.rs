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

use amzsign_core::{Error, Result};
use http::StatusCode;
use serde::Deserialize;

/// ServiceError is the structured error payload returned by the service.
///
/// It's carried as the source of an [`Error`] of kind [`amzsign_core::ErrorKind::Service`],
/// use [`ServiceError::from_error`] to get it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{status} {code}: {message}")]
pub struct ServiceError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Error code, like `NoSuchKey` or `SignatureDoesNotMatch`.
    pub code: String,
    /// Human readable message.
    pub message: String,
    /// Request id assigned by the service.
    pub request_id: String,
    /// Host id assigned by the service.
    pub host_id: String,
    /// The string the service signed, as space separated hex bytes.
    pub string_to_sign_bytes: Option<String>,
    /// The signature the request carried.
    pub signature_provided: Option<String>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorBody {
    code: String,
    message: String,
    request_id: String,
    host_id: String,
    string_to_sign_bytes: Option<String>,
    signature_provided: Option<String>,
}

/// The `<ErrorResponse>` envelope used by query style services like SES.
#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorResponse {
    error: ErrorBody,
    request_id: String,
}

impl ServiceError {
    /// Parse the error payload of a response.
    ///
    /// An empty body yields an error with empty fields.
    pub fn parse(status: StatusCode, body: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(body).map_err(|e| {
            Error::unexpected("service error payload is not valid utf-8").with_source(e)
        })?;
        if content.trim().is_empty() {
            return Ok(Self {
                status,
                ..Default::default()
            });
        }

        let de_err =
            |e: quick_xml::de::DeError| Error::unexpected("failed to parse service error").with_source(e);
        let body = if content.contains("<ErrorResponse") {
            let resp: ErrorResponse = quick_xml::de::from_str(content).map_err(de_err)?;
            let mut body = resp.error;
            if body.request_id.is_empty() {
                body.request_id = resp.request_id;
            }
            body
        } else {
            quick_xml::de::from_str(content).map_err(de_err)?
        };

        Ok(Self {
            status,
            code: body.code,
            message: body.message,
            request_id: body.request_id,
            host_id: body.host_id,
            string_to_sign_bytes: body.string_to_sign_bytes,
            signature_provided: body.signature_provided,
        })
    }

    /// Get the service error carried by `err`, if any.
    pub fn from_error(err: &Error) -> Option<&ServiceError> {
        err.source_as::<ServiceError>()
    }

    /// Decode the string the service signed.
    ///
    /// Returns an empty string if the service didn't report it.
    pub fn string_to_sign(&self) -> Result<String> {
        let Some(bs) = &self.string_to_sign_bytes else {
            return Ok(String::new());
        };

        let raw = hex::decode(bs.split_whitespace().collect::<String>()).map_err(|e| {
            Error::unexpected("invalid hex in StringToSignBytes").with_source(e)
        })?;
        Ok(String::from_utf8(raw)?)
    }
}
