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

//! AWS signature version 2 request signer.
use std::time::Duration;

use amzsign_core::hash::base64_hmac_sha1;
use amzsign_core::time::format_http_date;
use amzsign_core::time::now;
use amzsign_core::time::DateTime;
use amzsign_core::Context;
use amzsign_core::Error;
use amzsign_core::Result;
use amzsign_core::SignRequest;
use amzsign_core::SigningMethod;
use amzsign_core::SigningRequest;
use http::header::HeaderName;
use http::header::AUTHORIZATION;
use http::header::CONTENT_TYPE;
use http::header::DATE;
use http::HeaderValue;
use http::Method;
use log::debug;
use percent_encoding::utf8_percent_encode;

use crate::constants::*;
use crate::credential::Credential;
use crate::normalize::normalize_headers;
use crate::normalize::NormalizedHeader;

/// RequestSigner that implements AWS signature version 2.
///
/// - [Signing and authenticating REST requests](https://docs.aws.amazon.com/AmazonS3/latest/userguide/RESTAuthentication.html)
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        parts: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;
        let now = self.time.unwrap_or_else(now);

        let mut req = SigningRequest::build(parts)?;

        match SigningMethod::from(expires_in) {
            SigningMethod::Header => sign_header(&mut req, cred, now)?,
            SigningMethod::Query(lifetime) => sign_query(&mut req, cred, now, lifetime)?,
        }

        req.apply(parts)
    }
}

fn sign_header(req: &mut SigningRequest, cred: &Credential, now: DateTime) -> Result<()> {
    let date: HeaderValue = format_http_date(now).parse()?;
    req.headers.insert(DATE, date.clone());
    req.headers.insert(HeaderName::from_static(X_AMZ_DATE), date);
    if let Some(token) = &cred.session_token {
        req.headers.insert(HeaderName::from_static(X_AMZ_SECURITY_TOKEN), {
            let mut value: HeaderValue = token.parse()?;
            value.set_sensitive(true);
            value
        });
    }

    let headers = normalize_headers(&req.headers)?;
    let s = string_to_sign(
        req.method.as_str(),
        req.header_get_or_default(&HeaderName::from_static(CONTENT_MD5))?,
        req.header_get_or_default(&CONTENT_TYPE)?,
        "",
        &headers,
        &canonical_resource(&req.path, req.query_non_empty()),
    );
    let signature = base64_hmac_sha1(cred.secret_access_key.as_bytes(), s.as_bytes());

    req.headers.insert(AUTHORIZATION, {
        let mut value: HeaderValue =
            format!("AWS {}:{}", cred.access_key_id, signature).parse()?;
        value.set_sensitive(true);
        value
    });

    Ok(())
}

fn sign_query(
    req: &mut SigningRequest,
    cred: &Credential,
    now: DateTime,
    lifetime: Duration,
) -> Result<()> {
    if req.method != Method::GET {
        return Err(Error::request_invalid(format!(
            "query signing only supports GET, got {}",
            req.method
        )));
    }

    let expires = i64::try_from(lifetime.as_secs())
        .ok()
        .and_then(|secs| now.timestamp().checked_add(secs))
        .ok_or_else(|| Error::request_invalid("expires_in is too large"))?
        .to_string();

    let headers = match &cred.session_token {
        Some(token) => vec![NormalizedHeader {
            name: X_AMZ_SECURITY_TOKEN.to_string(),
            original: X_AMZ_SECURITY_TOKEN.to_string(),
            value: token.clone(),
        }],
        None => vec![],
    };
    let s = string_to_sign(
        Method::GET.as_str(),
        "",
        "",
        &expires,
        &headers,
        &canonical_resource(&req.path, None),
    );
    let signature = base64_hmac_sha1(cred.secret_access_key.as_bytes(), s.as_bytes());

    let encode = |v: &str| utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string();
    let mut query = vec![
        (AWS_ACCESS_KEY_ID_PARAM.to_string(), encode(&cred.access_key_id)),
        (EXPIRES_PARAM.to_string(), expires),
        (SIGNATURE_PARAM.to_string(), encode(&signature)),
    ];
    if let Some(token) = &cred.session_token {
        query.push((X_AMZ_SECURITY_TOKEN.to_string(), encode(token)));
    }
    req.query_replace(query);

    Ok(())
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// CanonicalizedAmzHeaders +
/// CanonicalizedResource;
/// ```
///
/// Only vendor headers in `headers` are emitted, which must already be
/// normalized. `date_or_expires` is left empty when `x-amz-date` is signed.
pub fn string_to_sign(
    method: &str,
    content_md5: &str,
    content_type: &str,
    date_or_expires: &str,
    headers: &[NormalizedHeader],
    resource: &str,
) -> String {
    let mut s = String::new();
    s.push_str(method);
    s.push('\n');
    s.push_str(content_md5);
    s.push('\n');
    s.push_str(content_type);
    s.push('\n');
    s.push_str(date_or_expires);
    s.push('\n');
    for h in headers.iter().filter(|h| h.is_vendor()) {
        s.push_str(&h.name);
        s.push(':');
        s.push_str(&h.value);
        s.push('\n');
    }
    s.push_str(resource);

    debug!("string to sign: {}", &s);
    s
}

/// Build the canonicalized resource from a raw path and query.
///
/// The query is appended verbatim only when it's not empty.
pub fn canonical_resource(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amzsign_core::hash::base64_md5;
    use chrono::TimeZone;
    use chrono::Utc;
    use test_case::test_case;

    fn fixed_time() -> DateTime {
        Utc.with_ymd_and_hms(2022, 3, 1, 8, 12, 34).unwrap()
    }

    fn signer() -> RequestSigner {
        RequestSigner::new().with_time(fixed_time())
    }

    fn cred() -> Credential {
        Credential::new("access_key", "secret")
    }

    fn get(uri: &str) -> http::request::Parts {
        http::Request::get(uri).body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_string_to_sign_aws_docs() {
        let s = string_to_sign(
            "GET",
            "",
            "",
            "Tue, 27 Mar 2007 19:36:42 +0000",
            &[],
            "/johnsmith/photos/puppy.jpg",
        );
        assert_eq!(
            base64_hmac_sha1(
                b"wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
                s.as_bytes()
            ),
            "bWq2s1WEIj+Ydj0vQ697zp+IXMU="
        );
    }

    #[test]
    fn test_string_to_sign_skips_plain_headers() {
        let headers = crate::normalize_pairs([
            ("Content-Type", "text/plain"),
            ("X-Amz-Meta-Foo", "bar"),
            ("x-amz-meta-foo", "baz"),
            ("x-amz-acl", "public-read"),
        ]);

        assert_eq!(
            string_to_sign("PUT", "md5", "text/plain", "", &headers, "/b/k"),
            "PUT\nmd5\ntext/plain\n\nx-amz-acl:public-read\nx-amz-meta-foo:bar,baz\n/b/k"
        );
    }

    #[test_case("/b/k", None => "/b/k"; "no query")]
    #[test_case("/b/k", Some("") => "/b/k"; "empty query")]
    #[test_case("/b/k", Some("acl") => "/b/k?acl"; "sub resource")]
    #[test_case("/", Some("a=1&b=2") => "/?a=1&b=2"; "raw query")]
    fn test_canonical_resource(path: &str, query: Option<&str>) -> String {
        canonical_resource(path, query)
    }

    #[tokio::test]
    async fn test_sign_header() -> Result<()> {
        let mut parts = get("https://s3.amazonaws.com/mybucket/mykey");

        signer()
            .sign_request(&Context::new(), &mut parts, Some(&cred()), None)
            .await?;

        assert_eq!(parts.headers[DATE], "Tue, 01 Mar 2022 08:12:34 GMT");
        assert_eq!(parts.headers[X_AMZ_DATE], "Tue, 01 Mar 2022 08:12:34 GMT");
        assert_eq!(
            parts.headers[AUTHORIZATION],
            "AWS access_key:h02TAGn7+cmLKbxyZ5hEpCwvu/w="
        );
        assert!(parts.headers[AUTHORIZATION].is_sensitive());
        assert_eq!(
            parts.uri.to_string(),
            "https://s3.amazonaws.com/mybucket/mykey"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_header_with_sub_resource() -> Result<()> {
        let mut parts = get("https://s3.amazonaws.com/mybucket/mykey?acl");

        signer()
            .sign_request(&Context::new(), &mut parts, Some(&cred()), None)
            .await?;

        assert_eq!(
            parts.headers[AUTHORIZATION],
            "AWS access_key:zJqltqTLDSrsFswyoAvd4K40emQ="
        );
        assert_eq!(parts.uri.query(), Some("acl"));
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_header_with_session_token() -> Result<()> {
        let mut parts = get("https://s3.amazonaws.com/mybucket/mykey");
        let cred = cred().with_session_token("token");

        signer()
            .sign_request(&Context::new(), &mut parts, Some(&cred), None)
            .await?;

        assert_eq!(parts.headers[X_AMZ_SECURITY_TOKEN], "token");
        assert_eq!(
            parts.headers[AUTHORIZATION],
            "AWS access_key:m4D6yd4m+uuMjlo69+LOhOc2MLU="
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_header_put_with_vendor_headers() -> Result<()> {
        let (mut parts, _) = http::Request::put("https://s3.amazonaws.com/mybucket/mykey")
            .header(CONTENT_TYPE, "text/plain")
            .header(CONTENT_MD5, base64_md5(b"hello"))
            .header("x-amz-meta-foo", "bar")
            .header("X-Amz-Meta-Foo", "baz")
            .header("x-amz-acl", "public-read")
            .body(())
            .unwrap()
            .into_parts();

        signer()
            .sign_request(&Context::new(), &mut parts, Some(&cred()), None)
            .await?;

        assert_eq!(
            parts.headers[AUTHORIZATION],
            "AWS access_key:8yLfw6xQPxAp67lj1ZXDyNF9EGs="
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_query() -> Result<()> {
        let mut parts = get("https://s3.amazonaws.com/mybucket/mykey");

        signer()
            .sign_request(
                &Context::new(),
                &mut parts,
                Some(&cred()),
                Some(Duration::from_secs(3600)),
            )
            .await?;

        assert_eq!(
            parts.uri.to_string(),
            "https://s3.amazonaws.com/mybucket/mykey?AWSAccessKeyId=access_key&Expires=1646125954&Signature=xJ7Jtns%2F4B08fvhMC5Me30V65D4%3D"
        );
        assert!(parts.headers.get(AUTHORIZATION).is_none());
        assert!(parts.headers.get(DATE).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_query_with_session_token() -> Result<()> {
        let mut parts = get("https://s3.amazonaws.com/mybucket/mykey");
        let cred = cred().with_session_token("token");

        signer()
            .sign_request(
                &Context::new(),
                &mut parts,
                Some(&cred),
                Some(Duration::from_secs(3600)),
            )
            .await?;

        assert_eq!(
            parts.uri.query(),
            Some("AWSAccessKeyId=access_key&Expires=1646125954&Signature=rnV5z9n%2FGOcrL5ixYFwIPZEQnVw%3D&x-amz-security-token=token")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_query_rejects_non_get() {
        let (mut parts, _) = http::Request::put("https://s3.amazonaws.com/mybucket/mykey")
            .body(())
            .unwrap()
            .into_parts();

        let err = signer()
            .sign_request(
                &Context::new(),
                &mut parts,
                Some(&cred()),
                Some(Duration::from_secs(60)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), amzsign_core::ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_sign_query_rejects_huge_lifetime() {
        for secs in [i64::MAX as u64, u64::MAX] {
            let mut parts = get("https://s3.amazonaws.com/mybucket/mykey");

            let err = signer()
                .sign_request(
                    &Context::new(),
                    &mut parts,
                    Some(&cred()),
                    Some(Duration::from_secs(secs)),
                )
                .await
                .unwrap_err();

            assert_eq!(err.kind(), amzsign_core::ErrorKind::RequestInvalid);
            assert!(parts.uri.query().is_none());
        }
    }

    #[tokio::test]
    async fn test_sign_without_credential() {
        let mut parts = get("https://s3.amazonaws.com/mybucket/mykey");

        let err = signer()
            .sign_request(&Context::new(), &mut parts, None, None)
            .await
            .unwrap_err();

        assert!(err.is_credential_error());
    }

    #[tokio::test]
    async fn test_resign_at_another_instant_differs() -> Result<()> {
        let mut a = get("https://s3.amazonaws.com/mybucket/mykey");
        let mut b = get("https://s3.amazonaws.com/mybucket/mykey");

        signer()
            .sign_request(&Context::new(), &mut a, Some(&cred()), None)
            .await?;
        RequestSigner::new()
            .with_time(fixed_time() + chrono::TimeDelta::seconds(1))
            .sign_request(&Context::new(), &mut b, Some(&cred()), None)
            .await?;

        assert_ne!(a.headers[AUTHORIZATION], b.headers[AUTHORIZATION]);
        Ok(())
    }
}
