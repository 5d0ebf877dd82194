use crate::{
    client::{DataFlowClient, RequestBody},
    error::{DataFlowError, DataFlowResult},
    models::Transport,
    validate::{validate_integer, validate_str},
};
use log::{info, warn};
use reqwest::{header::HeaderMap, multipart};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Dataset file operations
pub struct FileApi<'a> {
    client: &'a DataFlowClient,
}

impl<'a> FileApi<'a> {
    pub fn new(client: &'a DataFlowClient) -> Self {
        Self { client }
    }

    /// Search for individual files in datasets
    ///
    /// # Arguments
    /// * `query` - Search query
    /// * `dataset_id` - Restrict results to this dataset
    pub async fn search(&self, query: &str, dataset_id: Option<i64>) -> DataFlowResult<Value> {
        validate_str(query, "query")?;
        if let Some(id) = dataset_id {
            validate_integer(id, "dataset_id", 0)?;
        }
        info!("Searching dataset files: {}", query);

        let mut url = self.client.endpoint("dataset-files/search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(id) = dataset_id {
                pairs.append_pair("dataset_id", &id.to_string());
            }
        }

        self.client.get(url).await
    }

    /// Upload a local file to a dataset
    ///
    /// # Arguments
    /// * `file_path` - Local file to upload
    /// * `dataset_id` - Dataset to upload the file to (>= 0)
    /// * `relative_path` - Directory inside the dataset; defaults to its root
    /// * `transport` - Requested transfer protocol. Only Globus is implemented
    pub async fn upload(
        &self,
        file_path: impl AsRef<Path>,
        dataset_id: i64,
        relative_path: Option<&str>,
        transport: Option<Transport>,
    ) -> DataFlowResult<Value> {
        let file_path = file_path.as_ref();
        check_upload_args(file_path, dataset_id, relative_path)?;
        let transport = effective_transport(transport);
        info!("Uploading {} to dataset {}", file_path.display(), dataset_id);

        let url = self.client.endpoint("dataset-file-upload")?;

        // The handle moves into the request body and is closed when the
        // request finishes, successfully or not.
        let file = tokio::fs::File::open(file_path).await?;
        let length = file.metadata().await?.len();
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let mut form = multipart::Form::new()
            .part("file", multipart::Part::stream_with_length(file, length).file_name(file_name))
            .text("dataset_id", dataset_id.to_string())
            .text("transport", transport.to_string());
        if let Some(relative_path) = relative_path {
            form = form.text("relative_path", relative_path.to_string());
        }

        self.client
            .post(url, &HeaderMap::new(), RequestBody::Multipart(form))
            .await
    }

    /// Build the `curl` equivalent of [`upload`](Self::upload) without sending anything.
    ///
    /// The resulting command embeds the API key in its arguments.
    #[cfg(feature = "curl-command")]
    pub fn curl_upload(
        &self,
        file_path: impl AsRef<Path>,
        dataset_id: i64,
        relative_path: Option<&str>,
        transport: Option<Transport>,
    ) -> DataFlowResult<crate::curl::CurlUpload> {
        crate::curl::CurlUpload::new(self.client.config(), file_path, dataset_id, relative_path, transport)
    }
}

/// Checks shared by every upload path; nothing touches the network before these pass
pub(crate) fn check_upload_args(
    file_path: &Path,
    dataset_id: i64,
    relative_path: Option<&str>,
) -> DataFlowResult<()> {
    validate_str(&file_path.to_string_lossy(), "file_path")?;
    if !file_path.exists() {
        return Err(DataFlowError::FileNotFound(PathBuf::from(file_path)));
    }
    if !file_path.is_file() {
        return Err(DataFlowError::invalid_param(format!(
            "file_path should be a regular file: {}",
            file_path.display()
        )));
    }
    validate_integer(dataset_id, "dataset_id", 0)?;
    if let Some(relative_path) = relative_path {
        validate_str(relative_path, "relative_path")?;
    }
    Ok(())
}

/// Transfer protocol actually requested from the server
pub(crate) fn effective_transport(requested: Option<Transport>) -> Transport {
    match requested {
        Some(Transport::Globus) => Transport::Globus,
        Some(other) => {
            warn!(
                "{} transport requested; using Globus since other file transfer adapters have not been implemented",
                other
            );
            Transport::Globus
        }
        None => {
            info!("No transport requested; using Globus");
            Transport::Globus
        }
    }
}
