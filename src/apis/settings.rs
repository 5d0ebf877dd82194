use crate::{
    client::{DataFlowClient, RequestBody},
    error::DataFlowResult,
    validate::validate_str,
};
use log::info;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::fmt::Display;

/// Default user settings operations
pub struct SettingsApi<'a> {
    client: &'a DataFlowClient,
}

impl<'a> SettingsApi<'a> {
    pub fn new(client: &'a DataFlowClient) -> Self {
        Self { client }
    }

    /// Get the current default user settings
    pub async fn get(&self) -> DataFlowResult<Value> {
        info!("Getting user settings");
        let url = self.client.endpoint("user-settings")?;

        self.client.get(url).await
    }

    /// Set or update a default user setting
    ///
    /// # Arguments
    /// * `setting` - Setting name, e.g. [`SETTING_TRANSPORT_PROTOCOL`](crate::SETTING_TRANSPORT_PROTOCOL)
    /// * `value` - New value for the setting
    pub async fn set(&self, setting: &str, value: impl Display) -> DataFlowResult<Value> {
        validate_str(setting, "setting")?;
        info!("Updating user setting: {}", setting);

        let mut url = self.client.endpoint("user-settings/")?;
        url.query_pairs_mut()
            .append_pair("setting", setting)
            .append_pair("value", &value.to_string());

        self.client.post(url, &HeaderMap::new(), RequestBody::Empty).await
    }
}
