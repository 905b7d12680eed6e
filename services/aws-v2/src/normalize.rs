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

//! Header normalization for the canonical string.

use std::collections::BTreeMap;

use amzsign_core::Result;
use http::HeaderMap;

use crate::constants::X_AMZ_PREFIX;

/// A header folded into its canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHeader {
    /// Lower-cased header name, the sort key.
    pub name: String,
    /// Header name as first seen.
    pub original: String,
    /// All values, whitespace-trimmed and joined with `,` in insertion order.
    pub value: String,
}

impl NormalizedHeader {
    /// Whether this header takes part in the canonical string.
    pub fn is_vendor(&self) -> bool {
        self.name.starts_with(X_AMZ_PREFIX)
    }
}

/// Normalize a header multimap.
///
/// Names are grouped case-insensitively, a name without values normalizes to an
/// empty value, and the result is sorted by lower-cased name in byte order.
pub fn normalize_multimap<'a, I, V>(headers: I) -> Vec<NormalizedHeader>
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: IntoIterator<Item = &'a str>,
{
    let mut grouped: BTreeMap<String, (String, Vec<&'a str>)> = BTreeMap::new();
    for (name, values) in headers {
        let (_, vs) = grouped
            .entry(name.to_lowercase())
            .or_insert_with(|| (name.to_string(), Vec::new()));
        vs.extend(values.into_iter().map(str::trim));
    }

    grouped
        .into_iter()
        .map(|(name, (original, values))| NormalizedHeader {
            name,
            original,
            value: values.join(","),
        })
        .collect()
}

/// Normalize raw `(name, value)` pairs, one pair per header line.
pub fn normalize_pairs<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<NormalizedHeader> {
    normalize_multimap(pairs.into_iter().map(|(k, v)| (k, Some(v))))
}

/// Normalize the headers of a request.
///
/// Fails if any value is not visible ASCII.
pub fn normalize_headers(headers: &HeaderMap) -> Result<Vec<NormalizedHeader>> {
    let pairs = headers
        .iter()
        .map(|(k, v)| Ok((k.as_str(), v.to_str()?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(normalize_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;

    fn lines(hs: &[NormalizedHeader]) -> Vec<String> {
        hs.iter().map(|h| format!("{}:{}", h.name, h.value)).collect()
    }

    #[test]
    fn test_case_variants_merge_in_insertion_order() {
        let hs = normalize_pairs([("x-amz-foo", "bar"), ("X-Amz-Foo", " baz ")]);

        assert_eq!(lines(&hs), vec!["x-amz-foo:bar,baz"]);
        assert_eq!(hs[0].original, "x-amz-foo");
    }

    #[test]
    fn test_sorted_by_lowercase_name() {
        let hs = normalize_pairs([
            ("X-Amz-Meta-B", "2"),
            ("Content-Type", "text/plain"),
            ("x-amz-meta-a", "1"),
            ("X-Amz-Acl", "private"),
        ]);

        assert_eq!(
            lines(&hs),
            vec![
                "content-type:text/plain",
                "x-amz-acl:private",
                "x-amz-meta-a:1",
                "x-amz-meta-b:2",
            ]
        );
        assert_eq!(
            hs.iter().filter(|h| h.is_vendor()).count(),
            3,
            "content-type is not a vendor header"
        );
    }

    #[test]
    fn test_order_independent_and_idempotent() {
        let a = normalize_pairs([("x-amz-b", "1"), ("x-amz-a", "2"), ("x-amz-b", "3")]);
        let b = normalize_pairs([("x-amz-a", "2"), ("x-amz-b", "1"), ("x-amz-b", "3")]);
        assert_eq!(a, b);

        let again = normalize_pairs(
            a.iter()
                .map(|h| (h.name.as_str(), h.value.as_str()))
                .collect::<Vec<_>>(),
        );
        assert_eq!(a, again);
    }

    #[test]
    fn test_empty_values_are_kept() {
        let hs = normalize_multimap([("x-amz-meta-none", vec![]), ("x-amz-meta-blank", vec!["  "])]);

        assert_eq!(lines(&hs), vec!["x-amz-meta-blank:", "x-amz-meta-none:"]);
    }

    #[test]
    fn test_normalize_header_map() -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.append("x-amz-foo", HeaderValue::from_static("bar"));
        headers.append("X-Amz-Foo", HeaderValue::from_static("baz"));
        headers.insert("x-amz-date", HeaderValue::from_static("Tue, 01 Mar 2022 08:12:34 GMT"));

        let hs = normalize_headers(&headers)?;
        assert_eq!(
            lines(&hs),
            vec!["x-amz-date:Tue, 01 Mar 2022 08:12:34 GMT", "x-amz-foo:bar,baz"]
        );
        Ok(())
    }

    #[test]
    fn test_normalize_header_map_rejects_opaque_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-amz-meta-raw",
            HeaderValue::from_bytes(b"caf\xe9").expect("obs-text is a valid header value"),
        );

        assert!(normalize_headers(&headers).is_err());
    }
}
