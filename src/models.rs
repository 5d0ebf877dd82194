use crate::error::{DataFlowError, DataFlowResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Setting name for the default Globus destination endpoint
pub const SETTING_GLOBUS_DESTINATION_ENDPOINT: &str = "globus.destination_endpoint";

/// Setting name for the default transfer protocol
pub const SETTING_TRANSPORT_PROTOCOL: &str = "transport.protocol";

/// Data transfer protocols known to DataFlow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Globus,
    Https,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Globus => "globus",
            Transport::Https => "https",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = DataFlowError;

    fn from_str(s: &str) -> DataFlowResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "globus" => Ok(Transport::Globus),
            "https" => Ok(Transport::Https),
            other => Err(DataFlowError::invalid_type(format!(
                "transport should be one of globus, https (got {:?})",
                other
            ))),
        }
    }
}

/// Globus endpoint selector used for activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlobusEndpoint {
    /// The DataFlow server's own endpoint
    Source,
    /// The user's default destination endpoint
    #[default]
    Destination,
    /// Any other endpoint, by UUID
    Id(Uuid),
}

impl fmt::Display for GlobusEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobusEndpoint::Source => f.write_str("source"),
            GlobusEndpoint::Destination => f.write_str("destination"),
            GlobusEndpoint::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for GlobusEndpoint {
    type Err = DataFlowError;

    fn from_str(s: &str) -> DataFlowResult<Self> {
        match s.trim() {
            "source" => Ok(GlobusEndpoint::Source),
            "destination" => Ok(GlobusEndpoint::Destination),
            other => Uuid::parse_str(other).map(GlobusEndpoint::Id).map_err(|_| {
                DataFlowError::invalid_type(format!(
                    "endpoint should be \"source\", \"destination\" or a UUID (got {:?})",
                    other
                ))
            }),
        }
    }
}

impl From<Uuid> for GlobusEndpoint {
    fn from(id: Uuid) -> Self {
        GlobusEndpoint::Id(id)
    }
}

/// One flattened metadata record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataFieldValue {
    pub field_name: String,
    pub field_value: serde_json::Value,
}

/// Dataset creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetCreateRequest {
    pub name: String,
    pub instrument_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_field_values_attributes: Option<Vec<MetadataFieldValue>>,
}
