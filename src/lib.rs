//! Used-vehicle price prediction service.
//!
//! Form input is turned into the fixed 17-column row the pre-trained model
//! expects ([`features::transform`]), priced by a [`model::PriceModel`], and
//! served over HTTP ([`web::router`]).

pub mod catalogue;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod service;
pub mod types;
pub mod web;

pub use catalogue::DropdownCatalogue;
pub use config::AppConfig;
pub use error::{ConfigError, PredictionError, ResourceLoadError};
pub use features::transform;
pub use model::PriceModel;
pub use service::{format_price, PredictionService, Resources};
pub use types::{FeatureRecord, MileageBucket, RawInput, FEATURE_COLUMNS};
pub use web::{router, AppState};
