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


use std::env;
use std::time::Duration;

use amzsign::aws::{Config, ConfigCredentialProvider};
use amzsign::{s3, Client, Context, OsEnv, Region, ServiceError};
use amzsign_http_send_reqwest::ReqwestHttpSend;
use anyhow::Result;
use http::StatusCode;
use log::{debug, warn};

fn init_client() -> Option<(Client, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("AMZSIGN_S3_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default()
        .with_access_key_id(
            env::var("AMZSIGN_S3_ACCESS_KEY").expect("env AMZSIGN_S3_ACCESS_KEY must set"),
        )
        .with_secret_access_key(
            env::var("AMZSIGN_S3_SECRET_KEY").expect("env AMZSIGN_S3_SECRET_KEY must set"),
        );
    let region = match env::var("AMZSIGN_S3_ENDPOINT") {
        Ok(endpoint) => Region::new(
            env::var("AMZSIGN_S3_SCHEME").unwrap_or_else(|_| "https".to_string()),
            endpoint,
        ),
        Err(_) => s3::US_STANDARD,
    };
    let bucket = env::var("AMZSIGN_S3_BUCKET").expect("env AMZSIGN_S3_BUCKET must set");

    let client = Client::new(ctx, region, ConfigCredentialProvider::new(config.into()));
    Some((client, bucket))
}

#[tokio::test]
async fn test_put_get_delete_object() -> Result<()> {
    let Some((client, bucket)) = init_client() else {
        warn!("AMZSIGN_S3_TEST is not set, skipped");
        return Ok(());
    };

    let key = "amzsign/put_get_delete.txt";
    let resp = client
        .put_object(&bucket, key)
        .content("Hello, World!")
        .content_type("text/plain")
        .metadata("origin", "amzsign")
        .exec()
        .await?;
    debug!("put object: {resp:?}");
    assert_eq!(resp.status(), StatusCode::OK);
    let etag = resp.etag().expect("put object must return etag").to_string();

    let resp = client
        .get_object(&bucket, key)
        .response_content_type("application/octet-stream")
        .exec()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/octet-stream");
    assert_eq!(resp.body().as_ref(), b"Hello, World!");

    let resp = client
        .get_object(&bucket, key)
        .if_none_match(&etag)
        .exec()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);

    let resp = client.delete_object(&bucket, key).exec().await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn test_get_missing_object() -> Result<()> {
    let Some((client, bucket)) = init_client() else {
        warn!("AMZSIGN_S3_TEST is not set, skipped");
        return Ok(());
    };

    let err = client
        .get_object(&bucket, "amzsign/not_exist_file")
        .exec()
        .await
        .expect_err("missing object must fail");
    let se = ServiceError::from_error(&err).expect("must carry service error");
    assert_eq!(se.status, StatusCode::NOT_FOUND);
    assert_eq!(se.code, "NoSuchKey");
    Ok(())
}

#[tokio::test]
async fn test_presigned_get() -> Result<()> {
    let Some((client, bucket)) = init_client() else {
        warn!("AMZSIGN_S3_TEST is not set, skipped");
        return Ok(());
    };

    let key = "amzsign/presigned.txt";
    client
        .put_object(&bucket, key)
        .content("presigned")
        .exec()
        .await?;

    let uri = client
        .region()
        .resolve("", &format!("/{bucket}/{key}"), None)?;
    let uri = client.sign_url(&uri, Duration::from_secs(300)).await?;
    debug!("presigned url: {uri}");

    let resp = reqwest::get(uri.to_string()).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await?, "presigned");

    client.delete_object(&bucket, key).exec().await?;
    Ok(())
}
