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

//! Email sending operations.

use amzsign_core::hash::{base64_decode, base64_encode};
use amzsign_core::{Error, Result};

use crate::Region;

mod send_email;
pub use send_email::{SendEmail, SendEmailResponse};

/// US East (N. Virginia).
pub const US_EAST_1: Region = Region::from_static("https", "email.us-east-1.amazonaws.com");

/// Encode `s` as an RFC 2047 `B` encoded word in UTF-8.
///
/// ```
/// assert_eq!(amzsign::ses::encode_word("café"), "=?UTF-8?B?Y2Fmw6k=?=");
/// ```
pub fn encode_word(s: &str) -> String {
    format!("=?UTF-8?B?{}?=", base64_encode(s.as_bytes()))
}

/// Decode an RFC 2047 `B` encoded word.
///
/// `UTF-8` and `ISO-8859-1` charsets are supported.
pub fn decode_word(word: &str) -> Result<String> {
    let inner = word
        .strip_prefix("=?")
        .and_then(|v| v.strip_suffix("?="))
        .ok_or_else(|| Error::unexpected(format!("not an encoded word: {word}")))?;

    let mut pieces = inner.split('?');
    let (Some(charset), Some(encoding), Some(text), None) =
        (pieces.next(), pieces.next(), pieces.next(), pieces.next())
    else {
        return Err(Error::unexpected(format!(
            "encoded word must have charset, encoding and text: {word}"
        )));
    };

    if !encoding.eq_ignore_ascii_case("B") {
        return Err(Error::unexpected(format!(
            "unsupported encoding: {encoding}"
        )));
    }
    let raw = base64_decode(text)?;

    if charset.eq_ignore_ascii_case("UTF-8") {
        Ok(String::from_utf8(raw)?)
    } else if charset.eq_ignore_ascii_case("ISO-8859-1") {
        Ok(raw.into_iter().map(char::from).collect())
    } else {
        Err(Error::unexpected(format!("unsupported charset: {charset}")))
    }
}

/// Format a mailbox like `Name <address>`.
///
/// Display names outside printable ASCII are written as an encoded word.
pub fn mailbox(name: &str, address: &str) -> String {
    if name.is_empty() {
        address.to_string()
    } else if name.bytes().all(|b| (0x20..0x7f).contains(&b)) {
        format!("{name} <{address}>")
    } else {
        format!("{} <{address}>", encode_word(name))
    }
}
