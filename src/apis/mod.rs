pub mod settings;
pub mod instrument;
pub mod globus;
pub mod dataset;
pub mod file;

// Re-export all APIs
pub use settings::SettingsApi;
pub use instrument::InstrumentApi;
pub use globus::GlobusApi;
pub use dataset::DatasetApi;
pub use file::FileApi;
