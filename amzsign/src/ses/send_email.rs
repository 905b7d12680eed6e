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

use amzsign_core::time::{format_rfc3339, now, DateTime};
use amzsign_core::{Error, Result};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, StatusCode};
use log::debug;
use serde::Deserialize;

use crate::{Client, Region, Request};

const CHARSET: &str = "UTF-8";

impl Client {
    /// Send an email, the client must be on an email region like [`super::US_EAST_1`].
    pub fn send_email(&self) -> SendEmail<'_> {
        SendEmail {
            client: self,
            to: vec![],
            cc: vec![],
            bcc: vec![],
            reply_to: vec![],
            return_path: None,
            source: None,
            subject: None,
            text: None,
            html: None,
            timestamp: None,
        }
    }
}

/// SendEmail builds the `SendEmail` action.
///
/// Addresses are sent as given, use [`super::mailbox`] for display names
/// outside ASCII.
#[derive(Debug, Clone)]
pub struct SendEmail<'a> {
    client: &'a Client,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    reply_to: Vec<String>,
    return_path: Option<String>,
    source: Option<String>,
    subject: Option<String>,
    text: Option<String>,
    html: Option<String>,
    timestamp: Option<DateTime>,
}

impl SendEmail<'_> {
    /// Add a `To` recipient.
    pub fn to(mut self, addr: &str) -> Self {
        self.to.push(addr.to_string());
        self
    }

    /// Add a `Cc` recipient.
    pub fn cc(mut self, addr: &str) -> Self {
        self.cc.push(addr.to_string());
        self
    }

    /// Add a `Bcc` recipient.
    pub fn bcc(mut self, addr: &str) -> Self {
        self.bcc.push(addr.to_string());
        self
    }

    /// Add a `Reply-To` address.
    pub fn reply_to(mut self, addr: &str) -> Self {
        self.reply_to.push(addr.to_string());
        self
    }

    /// Set the address bounces are sent to.
    pub fn return_path(mut self, addr: &str) -> Self {
        self.return_path = Some(addr.to_string());
        self
    }

    /// Set the sender, required.
    pub fn source(mut self, addr: &str) -> Self {
        self.source = Some(addr.to_string());
        self
    }

    /// Set the subject, required.
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the plain text body.
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Set the html body.
    pub fn html(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self
    }

    /// Set the `Timestamp` of the action, defaults to the current time.
    pub fn timestamp(mut self, at: DateTime) -> Self {
        self.timestamp = Some(at);
        self
    }

    fn form(&self) -> Result<String> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| Error::request_invalid("send email requires source"))?;
        let subject = self
            .subject
            .as_deref()
            .ok_or_else(|| Error::request_invalid("send email requires subject"))?;

        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("Action", "SendEmail");
        form.append_pair("Timestamp", &format_rfc3339(self.timestamp.unwrap_or_else(now)));

        for (field, addrs) in [
            ("Destination.ToAddresses", &self.to),
            ("Destination.CcAddresses", &self.cc),
            ("Destination.BccAddresses", &self.bcc),
            ("ReplyToAddresses", &self.reply_to),
        ] {
            for (i, addr) in addrs.iter().enumerate() {
                form.append_pair(&format!("{field}.member.{}", i + 1), addr);
            }
        }
        if let Some(v) = &self.return_path {
            form.append_pair("ReturnPath", v);
        }
        form.append_pair("Source", source);

        form.append_pair("Message.Subject.Charset", CHARSET);
        form.append_pair("Message.Subject.Data", subject);
        if let Some(v) = &self.text {
            form.append_pair("Message.Body.Text.Charset", CHARSET);
            form.append_pair("Message.Body.Text.Data", v);
        }
        if let Some(v) = &self.html {
            form.append_pair("Message.Body.Html.Charset", CHARSET);
            form.append_pair("Message.Body.Html.Data", v);
        }

        Ok(form.finish())
    }

    /// Sign and send the request.
    pub async fn exec(&self) -> Result<SendEmailResponse> {
        let resp = self.client.send(self).await?;
        SendEmailResponse::parse(resp)
    }
}

impl Request for SendEmail<'_> {
    fn request(&self, region: &Region) -> Result<http::Request<Bytes>> {
        let body = self.form()?;

        Ok(http::Request::builder()
            .method(Method::POST)
            .uri(region.resolve("", "/", None)?)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from(body))?)
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SendEmailResponseBody {
    send_email_result: SendEmailResult,
    response_metadata: ResponseMetadata,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SendEmailResult {
    message_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ResponseMetadata {
    request_id: String,
}

/// Response of [`SendEmail`].
#[derive(Debug, Clone)]
pub struct SendEmailResponse {
    status: StatusCode,
    headers: HeaderMap,
    message_id: String,
    request_id: String,
}

impl SendEmailResponse {
    fn parse(resp: http::Response<Bytes>) -> Result<Self> {
        let (parts, body) = resp.into_parts();

        let mut parsed = SendEmailResponseBody::default();
        if parts.status.is_success() && !body.is_empty() {
            let content = String::from_utf8(body.to_vec())?;
            debug!("send email response: {content}");
            parsed = quick_xml::de::from_str(&content).map_err(|e| {
                Error::unexpected("failed to parse send email response").with_source(e)
            })?;
        }

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            message_id: parsed.send_email_result.message_id,
            request_id: parsed.response_metadata.request_id,
        })
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Message id assigned by the service.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Request id assigned by the service.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}
