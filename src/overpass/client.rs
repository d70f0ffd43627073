//! Overpass interpreter client.

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = "placesync/0.1 (poi import)";

/// Sends a single query to an Overpass interpreter endpoint
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<Element>,
}

/// One tagged element of an Overpass response.
///
/// Nodes carry `lat`/`lon`; ways and relations queried with `out center`
/// carry `center` instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Position>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Element {
    /// Position as `(lat, lon)`, falling back to the center per axis
    pub fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        (
            self.lat.or(self.center.map(|c| c.lat)),
            self.lon.or(self.center.map(|c| c.lon)),
        )
    }
}

impl OverpassClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).context("Invalid Overpass endpoint")?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `query` as the `data` form field and parse the returned elements.
    ///
    /// Any transport error, non-success status or malformed body is returned
    /// as an error; nothing is retried.
    pub async fn query(&self, query: &str) -> Result<Vec<Element>> {
        info!("Querying Overpass at {}", self.endpoint);
        debug!("Overpass query:\n{}", query);

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("data", query)
            .finish();

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .context("Overpass request failed")?
            .error_for_status()
            .context("Overpass returned an error status")?;

        let data: OverpassResponse = response
            .json()
            .await
            .context("Failed to parse Overpass response")?;

        info!("Received {} elements", data.elements.len());
        Ok(data.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one HTTP exchange on a local port, answering with `status` and
    /// `body`. The handle yields the request body that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/api/interpreter", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|value| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            while request.len() < header_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before body");
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8(request[header_end..].to_vec()).unwrap()
        });

        (endpoint, handle)
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "version": 0.6,
            "generator": "Overpass API",
            "elements": [
                {"type": "node", "id": 1, "lat": 21.03, "lon": 105.85,
                 "tags": {"name": "Café X", "amenity": "cafe"}},
                {"type": "node", "id": 2, "lat": 21.04, "lon": 105.86},
                {"type": "way", "id": 3, "center": {"lat": 21.05, "lon": 105.87},
                 "tags": {"leisure": "park"}}
            ]
        }"#;

        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.elements.len(), 3);

        let cafe = &response.elements[0];
        assert_eq!(cafe.kind.as_deref(), Some("node"));
        assert_eq!(cafe.tags.get("name").map(String::as_str), Some("Café X"));
        assert_eq!(cafe.coordinates(), (Some(21.03), Some(105.85)));

        assert!(response.elements[1].tags.is_empty());
        assert_eq!(response.elements[2].coordinates(), (Some(21.05), Some(105.87)));
    }

    #[test]
    fn test_empty_response() {
        let response: OverpassResponse = serde_json::from_str(r#"{"elements": []}"#).unwrap();
        assert!(response.elements.is_empty());
    }

    #[test]
    fn test_malformed_response() {
        assert!(serde_json::from_str::<OverpassResponse>(r#"{"remark": "timeout"}"#).is_err());
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        assert!(OverpassClient::new("overpass").is_err());
        let client = OverpassClient::new("https://overpass-api.de/api/interpreter").unwrap();
        assert_eq!(client.endpoint().host_str(), Some("overpass-api.de"));
    }

    #[tokio::test]
    async fn test_query_posts_data_field() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"elements": [{"type": "node", "id": 1, "lat": 21.03, "lon": 105.85,
                "tags": {"name": "Café X", "amenity": "cafe"}}]}"#,
        )
        .await;

        let client = OverpassClient::new(&endpoint).unwrap();
        let elements = client
            .query("[out:json][timeout:25];node[\"amenity\"](21.0,105.8,21.1,105.9);out;")
            .await
            .unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].tags.get("amenity").map(String::as_str), Some("cafe"));

        let request_body = server.await.unwrap();
        assert!(request_body.starts_with("data=%5Bout%3Ajson%5D"), "{request_body}");
        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(request_body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(decoded.len(), 1);
        assert_eq!(
            decoded[0].1,
            "[out:json][timeout:25];node[\"amenity\"](21.0,105.8,21.1,105.9);out;"
        );
    }

    #[tokio::test]
    async fn test_query_fails_on_error_status() {
        let (endpoint, server) = serve_once("429 Too Many Requests", r#"{"elements": []}"#).await;

        let client = OverpassClient::new(&endpoint).unwrap();
        assert!(client.query("[out:json];node;out;").await.is_err());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_query_fails_on_non_json_body() {
        let (endpoint, server) =
            serve_once("200 OK", "<html><body>runtime error</body></html>").await;

        let client = OverpassClient::new(&endpoint).unwrap();
        assert!(client.query("[out:json];node;out;").await.is_err());
        server.await.unwrap();
    }
}
