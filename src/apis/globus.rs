use crate::{
    client::{DataFlowClient, RequestBody},
    error::DataFlowResult,
    models::GlobusEndpoint,
};
use log::info;
use reqwest::header::HeaderMap;
use serde_json::Value;
use uuid::Uuid;

/// Globus transport operations
pub struct GlobusApi<'a> {
    client: &'a DataFlowClient,
}

impl<'a> GlobusApi<'a> {
    pub fn new(client: &'a DataFlowClient) -> Self {
        Self { client }
    }

    /// Check whether the Globus endpoints needed for a transfer are active
    ///
    /// # Arguments
    /// * `endpoint` - Endpoint to check. `None` checks the default destination
    ///   endpoint together with the DataFlow server's endpoint
    pub async fn endpoints_active(&self, endpoint: Option<Uuid>) -> DataFlowResult<Value> {
        info!("Checking Globus endpoint activation");
        let mut url = self.client.endpoint("transports/globus/activation")?;
        if let Some(endpoint) = endpoint {
            url.query_pairs_mut()
                .append_pair("endpoint", &endpoint.to_string());
        }

        self.client.get(url).await
    }

    /// Activate a Globus endpoint so data can be transferred
    ///
    /// # Arguments
    /// * `username` - Globus user name
    /// * `password` - Password, encrypted with the DataFlow web server's key unless `encrypted` is false
    /// * `encrypted` - Whether `password` is encrypted
    /// * `endpoint` - Endpoint to activate
    pub async fn endpoints_activate(
        &self,
        username: &str,
        password: &str,
        encrypted: bool,
        endpoint: GlobusEndpoint,
    ) -> DataFlowResult<Value> {
        info!("Activating Globus endpoint: {}", endpoint);
        let password_param = if encrypted {
            "encrypted_password"
        } else {
            "unencrypted_password"
        };

        let mut url = self.client.endpoint("transports/globus/activate")?;
        url.query_pairs_mut()
            .append_pair("endpoint", &endpoint.to_string())
            .append_pair("username", username)
            .append_pair(password_param, password);

        self.client.post(url, &HeaderMap::new(), RequestBody::Empty).await
    }
}
