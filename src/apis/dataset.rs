use crate::{
    client::{DataFlowClient, RequestBody},
    error::DataFlowResult,
    metadata::{self, Metadata, DEFAULT_SEPARATOR},
    models::DatasetCreateRequest,
    validate::{validate_integer, validate_str},
};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

/// Dataset operations
pub struct DatasetApi<'a> {
    client: &'a DataFlowClient,
}

impl<'a> DatasetApi<'a> {
    pub fn new(client: &'a DataFlowClient) -> Self {
        Self { client }
    }

    /// Search for datasets
    ///
    /// # Arguments
    /// * `query` - Text or date to search on
    pub async fn search(&self, query: &str) -> DataFlowResult<Value> {
        validate_str(query, "query")?;
        info!("Searching datasets: {}", query);

        let mut url = self.client.endpoint("datasets/search")?;
        url.query_pairs_mut().append_pair("q", query);

        self.client.get(url).await
    }

    /// Get information about a dataset
    ///
    /// # Arguments
    /// * `dataset_id` - Dataset ID (>= 0)
    pub async fn info(&self, dataset_id: i64) -> DataFlowResult<Value> {
        validate_integer(dataset_id, "dataset_id", 0)?;
        info!("Getting dataset: {}", dataset_id);
        let url = self.client.endpoint(&format!("datasets/{}", dataset_id))?;

        self.client.get(url).await
    }

    /// Create a new dataset
    ///
    /// # Arguments
    /// * `title` - Dataset title
    /// * `instrument_id` - Instrument ID; 0 is the unknown instrument
    /// * `metadata` - Scientific metadata. Nested maps are flattened with
    ///   keys joined by `-`
    pub async fn create(
        &self,
        title: &str,
        instrument_id: i64,
        metadata: Option<&Metadata>,
    ) -> DataFlowResult<Value> {
        let request = build_create_request(title, instrument_id, metadata)?;
        info!("Creating dataset: {}", title);
        debug!("Request body: {:?}", request);

        let url = self.client.endpoint("datasets")?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        self.client
            .post(url, &headers, RequestBody::Json(serde_json::to_value(&request)?))
            .await
    }

    /// Create a new dataset from loosely typed JSON metadata.
    ///
    /// A JSON object is used as metadata; `null` and other falsy values mean
    /// no metadata. Anything else fails with an invalid type error.
    pub async fn create_with_json(
        &self,
        title: &str,
        instrument_id: i64,
        metadata: &Value,
    ) -> DataFlowResult<Value> {
        validate_str(title, "title")?;
        let metadata = Metadata::from_json_option(metadata)?;
        self.create(title, instrument_id, metadata.as_ref()).await
    }
}

/// Validate arguments and assemble the create-dataset payload
pub fn build_create_request(
    title: &str,
    instrument_id: i64,
    metadata: Option<&Metadata>,
) -> DataFlowResult<DatasetCreateRequest> {
    validate_str(title, "title")?;

    let metadata_field_values_attributes = metadata
        .map(|md| metadata::to_field_values(metadata::flatten(md, DEFAULT_SEPARATOR)));

    Ok(DatasetCreateRequest {
        name: title.to_string(),
        instrument_id,
        metadata_field_values_attributes,
    })
}
