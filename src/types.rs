use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order the model was trained on. Must not change.
pub const FEATURE_COLUMNS: [&str; 17] = [
    "make",
    "model",
    "year",
    "cylinders",
    "fuel",
    "mileage",
    "transmission",
    "trim",
    "body",
    "doors",
    "exterior_color",
    "interior_color",
    "drivetrain",
    "mileage_bucket",
    "turbo",
    "vehicle_age",
    "annual_mileage",
];

/// Form fields, in the order they are submitted and echoed back.
pub const INPUT_FIELDS: [&str; 13] = [
    "make",
    "model",
    "year",
    "cylinders",
    "fuel",
    "mileage",
    "transmission",
    "trim",
    "body",
    "doors",
    "exterior_color",
    "interior_color",
    "drivetrain",
];

/// Categorical columns offered as dropdowns on the form.
pub const CATEGORICAL_COLUMNS: [&str; 9] = [
    "make",
    "model",
    "fuel",
    "transmission",
    "trim",
    "body",
    "exterior_color",
    "interior_color",
    "drivetrain",
];

// Raw form submission. Every field is optional; numbers arrive as text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawInput {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub cylinders: Option<String>,
    pub fuel: Option<String>,
    pub mileage: Option<String>,
    pub transmission: Option<String>,
    pub trim: Option<String>,
    pub body: Option<String>,
    pub doors: Option<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub drivetrain: Option<String>,
}

impl RawInput {
    /// Build from decoded form pairs. A repeated field keeps its first value;
    /// unknown fields are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "make" => &mut raw.make,
                "model" => &mut raw.model,
                "year" => &mut raw.year,
                "cylinders" => &mut raw.cylinders,
                "fuel" => &mut raw.fuel,
                "mileage" => &mut raw.mileage,
                "transmission" => &mut raw.transmission,
                "trim" => &mut raw.trim,
                "body" => &mut raw.body,
                "doors" => &mut raw.doors,
                "exterior_color" => &mut raw.exterior_color,
                "interior_color" => &mut raw.interior_color,
                "drivetrain" => &mut raw.drivetrain,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        raw
    }

    /// Field value by form name. Unknown names read as `None`.
    pub fn get(&self, field: &str) -> Option<&str> {
        let v = match field {
            "make" => &self.make,
            "model" => &self.model,
            "year" => &self.year,
            "cylinders" => &self.cylinders,
            "fuel" => &self.fuel,
            "mileage" => &self.mileage,
            "transmission" => &self.transmission,
            "trim" => &self.trim,
            "body" => &self.body,
            "doors" => &self.doors,
            "exterior_color" => &self.exterior_color,
            "interior_color" => &self.interior_color,
            "drivetrain" => &self.drivetrain,
            _ => return None,
        };
        v.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MileageBucket {
    BrandNew,
    TestDriven,
    SlightlyUsed,
    EarlyUsed,
    LightUsedDemo,
}

impl MileageBucket {
    pub fn label(self) -> &'static str {
        match self {
            MileageBucket::BrandNew => "brand new",
            MileageBucket::TestDriven => "test driven",
            MileageBucket::SlightlyUsed => "slightly used",
            MileageBucket::EarlyUsed => "early used",
            MileageBucket::LightUsedDemo => "light used demo",
        }
    }
}

impl fmt::Display for MileageBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One model input row. Built by [`crate::features::transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<f64>,
    pub cylinders: Option<f64>,
    pub fuel: Option<String>,
    pub mileage: Option<f64>,
    pub transmission: Option<String>,
    pub trim: Option<String>,
    pub body: Option<String>,
    pub doors: Option<f64>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub drivetrain: Option<String>,
    pub mileage_bucket: MileageBucket,
    pub turbo: i64,
    pub vehicle_age: Option<f64>,
    pub annual_mileage: Option<f64>,
}

/// A single cell of a [`FeatureRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Text(Option<&'a str>),
    Number(Option<f64>),
}

impl FeatureRecord {
    /// Cells paired with their column names, in [`FEATURE_COLUMNS`] order.
    pub fn columns(&self) -> [(&'static str, FeatureValue<'_>); 17] {
        use FeatureValue::{Number, Text};
        let values = [
            Text(self.make.as_deref()),
            Text(self.model.as_deref()),
            Number(self.year),
            Number(self.cylinders),
            Text(self.fuel.as_deref()),
            Number(self.mileage),
            Text(self.transmission.as_deref()),
            Text(self.trim.as_deref()),
            Text(self.body.as_deref()),
            Number(self.doors),
            Text(self.exterior_color.as_deref()),
            Text(self.interior_color.as_deref()),
            Text(self.drivetrain.as_deref()),
            Text(Some(self.mileage_bucket.label())),
            Number(Some(self.turbo as f64)),
            Number(self.vehicle_age),
            Number(self.annual_mileage),
        ];
        std::array::from_fn(|i| (FEATURE_COLUMNS[i], values[i]))
    }
}
