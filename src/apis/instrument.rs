use crate::{client::DataFlowClient, error::DataFlowResult, validate::validate_integer};
use log::info;
use serde_json::Value;

/// Instrument operations
pub struct InstrumentApi<'a> {
    client: &'a DataFlowClient,
}

impl<'a> InstrumentApi<'a> {
    pub fn new(client: &'a DataFlowClient) -> Self {
        Self { client }
    }

    /// List all instruments connected to this DataFlow server
    pub async fn list(&self) -> DataFlowResult<Value> {
        info!("Listing instruments");
        let url = self.client.endpoint("instruments")?;

        self.client.get(url).await
    }

    /// Get information about an instrument
    ///
    /// # Arguments
    /// * `instrument_id` - Instrument ID (>= 0)
    pub async fn info(&self, instrument_id: i64) -> DataFlowResult<Value> {
        validate_integer(instrument_id, "instrument_id", 0)?;
        info!("Getting instrument: {}", instrument_id);
        let url = self.client.endpoint(&format!("instruments/{}", instrument_id))?;

        self.client.get(url).await
    }
}
