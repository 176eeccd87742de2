//! Dataverse native API client
//!
//! Minimal client for the three lookups the traversal needs.

use super::{Catalog, ChildRef, Container};
use crate::Result;
use ohno::{IntoAppError, app_err, bail};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

const LOG_TARGET: &str = "   catalog";
const API_KEY_HEADER: &str = "X-Dataverse-key";

#[derive(Debug, Clone)]
pub struct DataverseClient {
    client: reqwest::Client,
    base_url: Url,
}

impl DataverseClient {
    /// Create a client for the installation at `base_url`, optionally authenticated with an API token.
    pub fn new(base_url: &Url, api_key: Option<&str>) -> Result<Self> {
        let mut client_builder = reqwest::Client::builder().user_agent("dataverse-reports");

        if let Some(key) = api_key {
            let mut key_val = HeaderValue::from_str(key).into_app_err("invalid Dataverse API key")?;
            key_val.set_sensitive(true);

            let mut headers = HeaderMap::new();
            let _ = headers.insert(API_KEY_HEADER, key_val);

            client_builder = client_builder.default_headers(headers);
        }

        if base_url.cannot_be_a_base() {
            bail!("'{base_url}' cannot be used as a Dataverse base URL");
        }

        Ok(Self {
            client: client_builder.build().into_app_err("unable to create HTTP client")?,
            base_url: base_url.clone(),
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        let _ = url
            .path_segments_mut()
            .map_err(|()| app_err!("'{}' cannot be used as a Dataverse base URL", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET an endpoint and parse its JSON body. A 404 yields `None`.
    async fn get_json(&self, segments: &[&str]) -> Result<Option<Value>> {
        let url = self.endpoint(segments)?;
        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .into_app_err_with(|| format!("requesting {url}"))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            bail!("unexpected HTTP status {status} from {url}");
        }

        let body = resp.json::<Value>().await.into_app_err_with(|| format!("parsing response from {url}"))?;
        Ok(Some(body))
    }
}

/// The `data` payload of a response, if it carries anything.
fn payload(body: &Value) -> Option<&Value> {
    body.get("data").filter(|data| match data {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}

impl Catalog for DataverseClient {
    async fn container(&self, id: &str) -> Result<Option<Container>> {
        let Some(body) = self.get_json(&["api", "dataverses", id]).await? else {
            return Ok(None);
        };

        payload(&body)
            .map(|data| Container::deserialize(data).into_app_err_with(|| format!("parsing dataverse '{id}'")))
            .transpose()
    }

    async fn children(&self, id: &str) -> Result<Vec<ChildRef>> {
        let Some(body) = self.get_json(&["api", "dataverses", id, "contents"]).await? else {
            bail!("the contents of dataverse '{id}' could not be found");
        };

        let Some(data) = body.get("data") else {
            bail!("the contents of dataverse '{id}' have no data payload");
        };

        Vec::<ChildRef>::deserialize(data).into_app_err_with(|| format!("parsing the contents of dataverse '{id}'"))
    }

    async fn member(&self, id: &str) -> Result<Option<Value>> {
        self.get_json(&["api", "datasets", id]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> DataverseClient {
        DataverseClient::new(&Url::parse(base).unwrap(), None).unwrap()
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let url = client("https://dataverse.example.edu").endpoint(&["api", "dataverses", "root"]).unwrap();
        assert_eq!(url.as_str(), "https://dataverse.example.edu/api/dataverses/root");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = client("https://example.edu/dv/").endpoint(&["api", "datasets", "42"]).unwrap();
        assert_eq!(url.as_str(), "https://example.edu/dv/api/datasets/42");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let url = client("https://example.edu").endpoint(&["api", "dataverses", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://example.edu/api/dataverses/a%20b%2Fc");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let _ = DataverseClient::new(&Url::parse("mailto:admin@example.edu").unwrap(), None).unwrap_err();
    }

    #[test]
    fn test_rejects_invalid_api_key() {
        let _ = DataverseClient::new(&Url::parse("https://example.edu").unwrap(), Some("bad\nkey")).unwrap_err();
    }

    #[test]
    fn test_payload() {
        assert!(payload(&json!({"status": "OK", "data": {"id": 1}})).is_some());
        assert!(payload(&json!({"status": "OK", "data": {}})).is_none());
        assert!(payload(&json!({"status": "OK", "data": null})).is_none());
        assert!(payload(&json!({"status": "ERROR", "message": "nope"})).is_none());
    }
}
