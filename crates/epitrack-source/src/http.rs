//! [`HttpLoader`]: fetches the upstream CSV over HTTP(S).

use std::time::Duration;

use epitrack_core::{snapshot::Snapshot, store::SnapshotLoader};
use reqwest::Client;

use crate::{Result, columns::ColumnMap, normalize::parse_csv};

/// Loads snapshots from a CSV served at a fixed URL.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpLoader {
  client:  Client,
  url:     String,
  columns: ColumnMap,
}

impl HttpLoader {
  pub fn new(
    url: impl Into<String>,
    columns: ColumnMap,
    timeout: Duration,
  ) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      url: url.into(),
      columns,
    })
  }

  pub fn url(&self) -> &str { &self.url }
}

impl SnapshotLoader for HttpLoader {
  type Error = crate::Error;

  async fn load(&self) -> Result<Snapshot> {
    let resp = self.client.get(&self.url).send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(crate::Error::Status(status));
    }

    let body = resp.bytes().await?;
    tracing::debug!(url = %self.url, bytes = body.len(), "fetched upstream table");
    parse_csv(body.as_ref(), &self.columns)
  }
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;
  use crate::Error;

  const BODY: &str = "region,countryName,countryCode,lat,lon,confirmed,death,recovered,day\n\
                      Africa,Egypt,EG,26.8,30.8,100,5,20,2020/04/01\n\
                      Africa,Egypt,EG,26.8,30.8,90,6,25,2020/04/02\n";

  async fn loader_for(server: &MockServer) -> HttpLoader {
    HttpLoader::new(
      format!("{}/rawReport.csv", server.uri()),
      ColumnMap::default(),
      Duration::from_secs(5),
    )
    .unwrap()
  }

  #[tokio::test]
  async fn loads_snapshot_from_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/rawReport.csv"))
      .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
      .expect(1)
      .mount(&server)
      .await;

    let snapshot = loader_for(&server).await.load().await.unwrap();
    assert_eq!(snapshot.countries(), ["Egypt"]);
    assert_eq!(snapshot.len(), 2);
  }

  #[tokio::test]
  async fn server_error_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let err = loader_for(&server).await.load().await.unwrap_err();
    assert!(err.is_fetch(), "{err}");
    assert!(matches!(err, Error::Status(s) if s.as_u16() == 503));
  }

  #[tokio::test]
  async fn missing_columns_are_a_schema_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string("countryName,day\nEgypt,2020-04-01\n"))
      .mount(&server)
      .await;

    let err = loader_for(&server).await.load().await.unwrap_err();
    assert!(err.is_schema(), "{err}");
  }

  #[tokio::test]
  async fn unreachable_upstream_is_a_fetch_error() {
    let loader = HttpLoader::new(
      "http://127.0.0.1:1/rawReport.csv",
      ColumnMap::default(),
      Duration::from_secs(5),
    )
    .unwrap();

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)), "{err}");
  }
}
