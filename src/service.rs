//! Request-path glue: raw input -> features -> model -> formatted price.

use crate::catalogue::DropdownCatalogue;
use crate::config::AppConfig;
use crate::error::PredictionError;
use crate::features::transform;
use crate::model::{self, PriceModel};
use crate::types::RawInput;
use std::sync::Arc;
use tracing::{error, info};

// ---------- Startup resources ----------

/// Everything loaded once before serving. Either part may be missing.
pub struct Resources {
    pub model: Option<Arc<dyn PriceModel>>,
    pub catalogue: DropdownCatalogue,
}

impl Resources {
    /// Never fails. Load errors are logged and the service runs degraded.
    pub fn load(config: &AppConfig) -> Self {
        let model = match model::load_model(&config.model_path, config.meta_path.as_deref()) {
            Ok(m) => Some(m),
            Err(e) => {
                error!(error = %e, "model unavailable, predictions disabled");
                None
            }
        };

        let catalogue = match DropdownCatalogue::from_path(&config.data_path) {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "dataset unavailable, dropdowns will be empty");
                DropdownCatalogue::default()
            }
        };

        Self { model, catalogue }
    }
}

// ---------- Prediction ----------

pub struct PredictionService {
    model: Option<Arc<dyn PriceModel>>,
    log_features: bool,
}

impl PredictionService {
    pub fn new(model: Option<Arc<dyn PriceModel>>) -> Self {
        Self {
            model,
            log_features: false,
        }
    }

    pub fn with_feature_logging(mut self, enabled: bool) -> Self {
        self.log_features = enabled;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Price one submission. `raw` is only borrowed so the caller can re-render
    /// the form with it on failure.
    pub fn predict(&self, raw: &RawInput) -> Result<String, PredictionError> {
        let model = self.model.as_ref().ok_or(PredictionError::ModelUnavailable)?;

        let features = transform(raw);
        if self.log_features {
            info!(
                make = ?features.make,
                model = ?features.model,
                vehicle_age = ?features.vehicle_age,
                annual_mileage = ?features.annual_mileage,
                mileage_bucket = %features.mileage_bucket,
                "features {:?}",
                features.columns()
            );
        }

        let price = model
            .predict(&features)
            .map_err(|e| PredictionError::PredictionFailed(format!("{:#}", e)))?;
        if !price.is_finite() {
            return Err(PredictionError::PredictionFailed(format!(
                "model returned a non-finite price ({})",
                price
            )));
        }
        Ok(format_price(price))
    }
}

/// `$` + thousands separators + two decimals. Negative values keep the sign
/// after the dollar sign (`$-1,234.50`).
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, frac)
}
