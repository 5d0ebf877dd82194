use crate::{
    apis::{DatasetApi, FileApi, GlobusApi, InstrumentApi, SettingsApi},
    auth::{Authentication, BearerAuth},
    config::DataFlowConfig,
    error::{DataFlowError, DataFlowResult},
};
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    multipart, Client, Method, RequestBuilder, Response,
};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Payload of a POST request
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized as `application/json`
    Json(Value),
    /// URL-encoded form fields
    Form(Vec<(String, String)>),
    /// Multipart form with file parts
    Multipart(multipart::Form),
}

/// Main DataFlow client
#[derive(Clone)]
pub struct DataFlowClient {
    client: Client,
    config: DataFlowConfig,
    auth: Arc<dyn Authentication>,
}

impl DataFlowClient {
    /// Create a new DataFlow client authenticating with the configured API key
    pub fn new(config: DataFlowConfig) -> DataFlowResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a new DataFlow client with custom reqwest client
    pub fn with_client(client: Client, config: DataFlowConfig) -> Self {
        let auth = Arc::new(BearerAuth::new(config.api_key()));

        Self {
            client,
            config,
            auth,
        }
    }

    pub fn config(&self) -> &DataFlowConfig {
        &self.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        self.config.base_url()
    }

    /// Absolute URL for a path relative to the base URL
    pub fn endpoint(&self, path: &str) -> DataFlowResult<Url> {
        self.config.endpoint(path)
    }

    /// Get user settings API
    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    /// Get instrument API
    pub fn instruments(&self) -> InstrumentApi<'_> {
        InstrumentApi::new(self)
    }

    /// Get Globus transport API
    pub fn globus(&self) -> GlobusApi<'_> {
        GlobusApi::new(self)
    }

    /// Get dataset API
    pub fn datasets(&self) -> DatasetApi<'_> {
        DatasetApi::new(self)
    }

    /// Get dataset file API
    pub fn files(&self) -> FileApi<'_> {
        FileApi::new(self)
    }

    /// Build a request to the given URL with the accept and authorization headers
    pub async fn request(&self, method: Method, url: Url) -> DataFlowResult<RequestBuilder> {
        let headers = self.base_headers().await?;
        // Query strings may carry credentials, so only the path is logged.
        debug!("HTTP {} {}", method, url.path());

        Ok(self.client.request(method, url).headers(headers))
    }

    async fn base_headers(&self) -> DataFlowResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        self.auth.apply_auth(&mut headers).await?;
        Ok(headers)
    }

    /// Send a GET request and decode the JSON response
    pub async fn get(&self, url: Url) -> DataFlowResult<Value> {
        let req = self.request(Method::GET, url).await?;
        self.execute(req).await
    }

    /// Send a POST request and decode the JSON response.
    ///
    /// `headers` are merged over the accept and authorization headers;
    /// caller values win on collision.
    pub async fn post(&self, url: Url, headers: &HeaderMap, body: RequestBody) -> DataFlowResult<Value> {
        let mut merged = self.base_headers().await?;
        for (name, value) in headers.iter() {
            merged.insert(name.clone(), value.clone());
        }
        debug!("HTTP POST {}", url.path());

        let req = self.client.post(url).headers(merged);
        let req = match body {
            RequestBody::Empty => req,
            RequestBody::Json(json) => req.json(&json),
            RequestBody::Form(fields) => req.form(&fields),
            RequestBody::Multipart(form) => req.multipart(form),
        };

        self.execute(req).await
    }

    /// Execute a request and handle common error cases
    pub async fn execute(&self, request: RequestBuilder) -> DataFlowResult<Value> {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle response and decode JSON
    async fn handle_response(&self, response: Response) -> DataFlowResult<Value> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            Ok(serde_json::from_str(&text)?)
        } else {
            let reason = status.canonical_reason().unwrap_or("Unknown Status");
            // An unreadable error body still reports the status.
            let text = response.text().await.unwrap_or_else(|e| {
                debug!("Failed to read HTTP {} response body: {}", status.as_u16(), e);
                String::new()
            });
            debug!("HTTP {} response body: {}", status.as_u16(), text);
            Err(DataFlowError::remote(status.as_u16(), reason, strip_outer_chars(&text)))
        }
    }
}

impl std::fmt::Debug for DataFlowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFlowClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Drop the first and last character, normally the quotes around a JSON string
fn strip_outer_chars(text: &str) -> String {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}
