use crate::error::ResourceLoadError;
use crate::types::{FeatureRecord, FEATURE_COLUMNS};
use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::Path, sync::Arc};
use tracing::{info, warn};

/// Anything that can price one feature row.
pub trait PriceModel: Send + Sync {
    fn predict(&self, features: &FeatureRecord) -> Result<f64>;
}

/// `meta.json` written next to the exported model.
#[derive(Deserialize, Debug)]
pub struct ModelMeta {
    pub feat_list: Vec<String>,
    #[serde(default)]
    pub in_dim: Option<usize>,
}

impl ModelMeta {
    pub fn load(path: &Path) -> Result<Self, ResourceLoadError> {
        let txt = fs::read_to_string(path).map_err(|source| ResourceLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&txt)?)
    }

    /// True when the exported column list is exactly ours, in order.
    pub fn matches_schema(&self) -> bool {
        self.feat_list.iter().map(String::as_str).eq(FEATURE_COLUMNS)
    }
}

/// Load the model at `model_path`, checking it against `meta_path` if given.
pub fn load_model(
    model_path: &Path,
    meta_path: Option<&Path>,
) -> Result<Arc<dyn PriceModel>, ResourceLoadError> {
    if !model_path.exists() {
        return Err(ResourceLoadError::NotFound {
            path: model_path.to_path_buf(),
        });
    }

    if let Some(meta_path) = meta_path {
        let meta = ModelMeta::load(meta_path)?;
        if !meta.matches_schema() {
            warn!(
                "meta.feat_list {:?} differs from expected columns {:?}; predictions may be wrong",
                meta.feat_list, FEATURE_COLUMNS
            );
        }
        if let Some(in_dim) = meta.in_dim.filter(|d| *d != FEATURE_COLUMNS.len()) {
            warn!("meta.in_dim ({}) != {} feature columns", in_dim, FEATURE_COLUMNS.len());
        }
    }

    let model = backend::load(model_path)?;
    info!(path = %model_path.display(), "model loaded");
    Ok(model)
}

#[cfg(feature = "torch")]
mod backend {
    use super::*;
    use crate::types::FeatureValue;
    use anyhow::bail;
    use tch::{CModule, Device, IValue};

    pub struct TorchModel {
        module: CModule,
    }

    pub fn load(path: &Path) -> Result<Arc<dyn PriceModel>, ResourceLoadError> {
        let mut module =
            CModule::load_on_device(path, Device::Cpu).map_err(|e| ResourceLoadError::Model {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        module.set_eval();
        Ok(Arc::new(TorchModel { module }))
    }

    /// One row as a TorchScript tuple: str / float / None per column.
    pub fn row_input(features: &FeatureRecord) -> IValue {
        let cells = features
            .columns()
            .iter()
            .map(|(_, v)| match v {
                FeatureValue::Text(Some(s)) => IValue::String(s.to_string()),
                FeatureValue::Number(Some(x)) => IValue::Double(*x),
                FeatureValue::Text(None) | FeatureValue::Number(None) => IValue::None,
            })
            .collect();
        IValue::Tuple(cells)
    }

    impl PriceModel for TorchModel {
        fn predict(&self, features: &FeatureRecord) -> Result<f64> {
            let input = row_input(features);
            let out = tch::no_grad(|| self.module.forward_is(&[input]))?;
            match out {
                IValue::Double(v) => Ok(v),
                IValue::Tensor(t) => {
                    if t.numel() != 1 {
                        bail!("expected a single price, model returned shape {:?}", t.size());
                    }
                    Ok(t.f_double_value(&[])?)
                }
                other => bail!("unexpected model output: {:?}", other),
            }
        }
    }

}

#[cfg(not(feature = "torch"))]
mod backend {
    use super::*;

    pub fn load(_path: &Path) -> Result<Arc<dyn PriceModel>, ResourceLoadError> {
        Err(ResourceLoadError::BackendDisabled)
    }
}
