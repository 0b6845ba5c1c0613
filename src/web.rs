use crate::catalogue::DropdownCatalogue;
use crate::error::PredictionError;
use crate::service::{PredictionService, Resources};
use crate::types::{RawInput, INPUT_FIELDS};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use handlebars::Handlebars;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

const NUMERIC_FIELDS: [&str; 4] = ["year", "cylinders", "mileage", "doors"];

// ---------- Pages ----------

pub struct Pages {
    hb: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut hb = Handlebars::new();
        hb.register_template_string("index", include_str!("../templates/index.hbs"))?;
        hb.register_template_string("result", include_str!("../templates/result.hbs"))?;
        Ok(Self { hb })
    }

    pub fn form(
        &self,
        catalogue: &DropdownCatalogue,
        input: &RawInput,
        error: Option<&str>,
    ) -> Result<String, handlebars::RenderError> {
        let fields: Vec<Value> = INPUT_FIELDS
            .iter()
            .map(|&name| {
                let current = input.get(name);
                let known = catalogue.get(name);
                let mut options: Vec<Value> = known
                    .iter()
                    .map(|v| json!({ "value": v, "selected": current == Some(v.as_str()) }))
                    .collect();
                // Keep a submitted value the dataset never saw, or it is lost on re-render.
                if let Some(v) = current.filter(|v| !v.is_empty()) {
                    if !known.is_empty() && !known.iter().any(|k| k == v) {
                        options.push(json!({ "value": v, "selected": true }));
                    }
                }
                json!({
                    "name": name,
                    "label": field_label(name),
                    "value": current.unwrap_or(""),
                    "numeric": NUMERIC_FIELDS.contains(&name),
                    "options": options,
                })
            })
            .collect();
        self.hb
            .render("index", &json!({ "fields": fields, "error": error }))
    }

    pub fn result(&self, prediction: &str, input: &RawInput) -> Result<String, handlebars::RenderError> {
        let inputs: Vec<Value> = INPUT_FIELDS
            .iter()
            .map(|&name| json!({ "label": field_label(name), "value": input.get(name).unwrap_or("") }))
            .collect();
        self.hb
            .render("result", &json!({ "prediction": prediction, "inputs": inputs }))
    }
}

/// `exterior_color` -> `Exterior color`.
fn field_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub catalogue: Arc<DropdownCatalogue>,
    pub pages: Arc<Pages>,
}

impl AppState {
    pub fn new(resources: Resources, log_features: bool) -> Result<Self, handlebars::TemplateError> {
        let service = PredictionService::new(resources.model).with_feature_logging(log_features);
        Ok(Self {
            service: Arc::new(service),
            catalogue: Arc::new(resources.catalogue),
            pages: Arc::new(Pages::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------- Handlers ----------

fn render(page: Result<String, handlebars::RenderError>, status: StatusCode) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template render failed").into_response()
        }
    }
}

async fn index(State(state): State<AppState>) -> Response {
    let page = state.pages.form(&state.catalogue, &RawInput::default(), None);
    render(page, StatusCode::OK)
}

async fn predict(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let input = RawInput::from_pairs(pairs);
    match state.service.predict(&input) {
        Ok(price) => {
            tracing::info!(make = ?input.make, model = ?input.model, price = %price, "prediction served");
            render(state.pages.result(&price, &input), StatusCode::OK)
        }
        Err(e) => {
            tracing::warn!(error = %e, "prediction error");
            let status = match e {
                PredictionError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                PredictionError::PredictionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let page = state.pages.form(&state.catalogue, &input, Some(&e.to_string()));
            render(page, status)
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
