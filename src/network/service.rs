use crate::models::Property;
use crate::network::traits::MarsApiService;
use crate::network::types::{ApiConfig, MarsApiFilter};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

/// HTTP client for the Mars real-estate listing endpoint
pub struct MarsApiClient {
    client: Client,
    endpoint: Url,
}

impl MarsApiClient {
    /// Create a client with custom connection settings
    pub fn with_config(config: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        let endpoint = realestate_endpoint(&config.base_url)?;
        debug!("Listing endpoint: {}", endpoint);

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Resolve `realestate` against the base URL, tolerating a missing trailing slash
fn realestate_endpoint(base_url: &str) -> Result<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base).with_context(|| format!("Invalid base URL {:?}", base_url))?;
    base.join("realestate").context("Failed to build listing endpoint")
}

/// Decode the listing endpoint's JSON array
pub fn parse_properties(body: &str) -> Result<Vec<Property>> {
    serde_json::from_str(body).context("Failed to decode property list")
}

#[async_trait]
impl MarsApiService for MarsApiClient {
    async fn get_properties(&self, filter: MarsApiFilter) -> Result<Vec<Property>> {
        info!("Fetching Mars properties (filter={})", filter);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("filter", filter.value())])
            .send()
            .await
            .context("Failed to fetch property list")?;

        if !response.status().is_success() {
            warn!("Listing server returned status: {}", response.status());
            anyhow::bail!("Failed to fetch property list: {}", response.status());
        }

        let body = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of JSON", body.len());

        let properties = parse_properties(&body)?;
        info!("Fetched {} properties", properties.len());
        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned HTTP response and hand back the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn client_for(base_url: String) -> MarsApiClient {
        MarsApiClient::with_config(ApiConfig {
            base_url,
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_joins_realestate_path() {
        let endpoint = realestate_endpoint("https://example.com/api").unwrap();
        assert_eq!(endpoint.as_str(), "https://example.com/api/realestate");

        let client = MarsApiClient::with_config(ApiConfig::default()).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://android-kotlin-fun-mars-server.appspot.com/realestate"
        );
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        assert!(realestate_endpoint("not a url").is_err());
    }

    #[test]
    fn parses_empty_array() {
        assert!(parse_properties("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array_body() {
        assert!(parse_properties(r#"{"id":"1"}"#).is_err());
        assert!(parse_properties("<html></html>").is_err());
    }

    #[tokio::test]
    async fn fetches_with_filter_query() {
        let body = r#"[
            {"price":450000,"id":"424905","type":"buy","img_src":"http://mars.jpl.nasa.gov/a.jpg"},
            {"price":8000,"id":"424906","type":"rent","img_src":"http://mars.jpl.nasa.gov/b.jpg"}
        ]"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let properties = client_for(base_url)
            .get_properties(MarsApiFilter::ShowRent)
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /realestate?filter=rent HTTP/1.1"), "{}", request);
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].id, 424905);
        assert!(properties[1].is_rental());
    }

    #[tokio::test]
    async fn server_error_fails_the_fetch() {
        let (base_url, server) = serve_once("500 Internal Server Error", "oops").await;

        let result = client_for(base_url).get_properties(MarsApiFilter::ShowAll).await;

        server.await.unwrap();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn malformed_body_fails_the_fetch() {
        let (base_url, server) = serve_once("200 OK", r#"[{"id":"1"}]"#).await;

        let result = client_for(base_url).get_properties(MarsApiFilter::ShowBuy).await;

        server.await.unwrap();
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to decode property list"));
    }

    #[tokio::test]
    async fn unreachable_server_fails_the_fetch() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let result = client_for(base_url).get_properties(MarsApiFilter::ShowAll).await;
        assert!(result.is_err());
    }
}
