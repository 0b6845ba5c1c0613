//! Raw form input -> model feature row.

use crate::types::{FeatureRecord, MileageBucket, RawInput};

/// Year vehicle ages are measured against. The model was fit with this value.
pub const REFERENCE_YEAR: f64 = 2025.0;

// ---------- Numeric coercion ----------

/// Parse-or-missing. Blank, unparseable and NaN text all become `None`.
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}

// ---------- Derived features ----------

pub fn vehicle_age(year: f64) -> f64 {
    REFERENCE_YEAR - year
}

/// Mileage per year of age. Age <= 0 (current or future model year) keeps the
/// raw mileage instead of dividing.
pub fn annual_mileage(mileage: f64, vehicle_age: f64) -> f64 {
    if vehicle_age > 0.0 {
        mileage / vehicle_age
    } else {
        mileage
    }
}

/// Lower bounds are exclusive except for the first bucket, which starts at 0.
/// Anything that fits no interval (negative, over 5000, missing) is a demo car.
pub fn mileage_bucket(mileage: Option<f64>) -> MileageBucket {
    match mileage {
        Some(m) if (0.0..=100.0).contains(&m) => MileageBucket::BrandNew,
        Some(m) if m > 100.0 && m <= 500.0 => MileageBucket::TestDriven,
        Some(m) if m > 500.0 && m <= 2000.0 => MileageBucket::SlightlyUsed,
        Some(m) if m > 2000.0 && m <= 5000.0 => MileageBucket::EarlyUsed,
        _ => MileageBucket::LightUsedDemo,
    }
}

// ---------- Label normalization ----------
//
// Not applied by `transform`: the deployed model was trained on the raw
// labels. Kept for retraining experiments.

pub fn simplify_transmission(label: &str) -> &'static str {
    let x = label.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| x.contains(n));
    if has(&["cvt"]) {
        "cvt"
    } else if has(&["dual", "dct"]) {
        "dual clutch"
    } else if has(&["manual", "m/t"]) {
        "manual"
    } else if has(&["1-speed", "battery", "electric"]) {
        "single-speed (EV)"
    } else if has(&["automatic", "a/t"]) {
        "automatic"
    } else {
        "other"
    }
}

pub fn simplify_fuel(label: &str) -> &str {
    match label {
        "PHEV Hybrid Fuel" => "Hybrid",
        "Diesel (B20 capable)" => "Diesel",
        other => other,
    }
}

// ---------- Pipeline ----------

/// Build the model row for one submission. Never fails: bad numbers turn into
/// missing values and flow through the derived columns as missing.
pub fn transform(raw: &RawInput) -> FeatureRecord {
    let year = parse_numeric(raw.year.as_deref());
    let cylinders = parse_numeric(raw.cylinders.as_deref());
    let mileage = parse_numeric(raw.mileage.as_deref());
    let doors = parse_numeric(raw.doors.as_deref());

    let vehicle_age = year.map(vehicle_age);
    let annual_mileage = match (mileage, vehicle_age) {
        (Some(m), Some(age)) => Some(annual_mileage(m, age)),
        _ => None,
    };

    FeatureRecord {
        make: raw.make.clone(),
        model: raw.model.clone(),
        year,
        cylinders,
        fuel: raw.fuel.clone(),
        mileage,
        transmission: raw.transmission.clone(),
        trim: raw.trim.clone(),
        body: raw.body.clone(),
        doors,
        exterior_color: raw.exterior_color.clone(),
        interior_color: raw.interior_color.clone(),
        drivetrain: raw.drivetrain.clone(),
        mileage_bucket: mileage_bucket(mileage),
        turbo: 0,
        vehicle_age,
        annual_mileage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeatureValue, FEATURE_COLUMNS};

    fn camry() -> RawInput {
        RawInput {
            make: Some("Toyota".into()),
            model: Some("Camry".into()),
            year: Some("2020".into()),
            cylinders: Some("4".into()),
            fuel: Some("Gasoline".into()),
            mileage: Some("30000".into()),
            transmission: Some("8-Speed Automatic".into()),
            trim: Some("SE".into()),
            body: Some("Sedan".into()),
            doors: Some("4".into()),
            exterior_color: Some("White".into()),
            interior_color: Some("Black".into()),
            drivetrain: Some("Front-wheel Drive".into()),
        }
    }

    #[test]
    fn test_mileage_bucket_boundaries() {
        let cases = [
            (0.0, MileageBucket::BrandNew),
            (100.0, MileageBucket::BrandNew),
            (101.0, MileageBucket::TestDriven),
            (500.0, MileageBucket::TestDriven),
            (501.0, MileageBucket::SlightlyUsed),
            (2000.0, MileageBucket::SlightlyUsed),
            (2001.0, MileageBucket::EarlyUsed),
            (5000.0, MileageBucket::EarlyUsed),
            (5001.0, MileageBucket::LightUsedDemo),
        ];
        for (m, expected) in cases {
            assert_eq!(mileage_bucket(Some(m)), expected, "mileage {}", m);
        }
        assert_eq!(mileage_bucket(Some(100.5)), MileageBucket::TestDriven);
    }

    #[test]
    fn test_mileage_bucket_out_of_range() {
        assert_eq!(mileage_bucket(Some(-1.0)), MileageBucket::LightUsedDemo);
        assert_eq!(mileage_bucket(None), MileageBucket::LightUsedDemo);
        assert_eq!(MileageBucket::LightUsedDemo.to_string(), "light used demo");
    }

    #[test]
    fn test_annual_mileage() {
        assert_eq!(annual_mileage(12000.0, 0.0), 12000.0);
        assert_eq!(annual_mileage(12000.0, 4.0), 3000.0);
        assert_eq!(annual_mileage(12000.0, -1.0), 12000.0);
    }

    #[test]
    fn test_vehicle_age() {
        assert_eq!(vehicle_age(2020.0), 5.0);
        assert_eq!(vehicle_age(2026.0), -1.0);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(Some("2020")), Some(2020.0));
        assert_eq!(parse_numeric(Some(" 4.5 ")), Some(4.5));
        assert_eq!(parse_numeric(Some("")), None);
        assert_eq!(parse_numeric(Some("abc")), None);
        assert_eq!(parse_numeric(Some("NaN")), None);
        assert_eq!(parse_numeric(None), None);
    }

    #[test]
    fn test_transform_camry() {
        let f = transform(&camry());
        assert_eq!(f.vehicle_age, Some(5.0));
        assert_eq!(f.annual_mileage, Some(6000.0));
        assert_eq!(f.mileage_bucket, MileageBucket::LightUsedDemo);
        assert_eq!(f.turbo, 0);
        assert_eq!(f.cylinders, Some(4.0));
        assert_eq!(f.doors, Some(4.0));
        // passthrough, no normalization
        assert_eq!(f.transmission.as_deref(), Some("8-Speed Automatic"));
    }

    #[test]
    fn test_transform_zero_age_keeps_raw_mileage() {
        let raw = RawInput {
            year: Some("2025".into()),
            mileage: Some("12000".into()),
            ..camry()
        };
        let f = transform(&raw);
        assert_eq!(f.vehicle_age, Some(0.0));
        assert_eq!(f.annual_mileage, Some(12000.0));
    }

    #[test]
    fn test_transform_bad_year_propagates_missing() {
        for year in [None, Some("twenty".to_string()), Some(String::new())] {
            let raw = RawInput { year, ..camry() };
            let f = transform(&raw);
            assert_eq!(f.year, None);
            assert_eq!(f.vehicle_age, None);
            assert_eq!(f.annual_mileage, None);
            assert_eq!(f.mileage, Some(30000.0));
        }
    }

    #[test]
    fn test_transform_empty_input_has_all_columns() {
        let f = transform(&RawInput::default());
        let cols = f.columns();
        assert_eq!(cols.len(), 17);
        let names: Vec<&str> = cols.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, FEATURE_COLUMNS);
        assert_eq!(cols[0].1, FeatureValue::Text(None));
        assert_eq!(cols[13].1, FeatureValue::Text(Some("light used demo")));
        assert_eq!(cols[14].1, FeatureValue::Number(Some(0.0)));
        assert_eq!(cols[16].1, FeatureValue::Number(None));
    }

    #[test]
    fn test_columns_follow_record_values() {
        let f = transform(&camry());
        let cols = f.columns();
        assert_eq!(cols[0], ("make", FeatureValue::Text(Some("Toyota"))));
        assert_eq!(cols[2], ("year", FeatureValue::Number(Some(2020.0))));
        assert_eq!(cols[15], ("vehicle_age", FeatureValue::Number(Some(5.0))));
        assert_eq!(
            cols[16],
            ("annual_mileage", FeatureValue::Number(Some(6000.0)))
        );
    }

    #[test]
    fn test_simplify_transmission() {
        assert_eq!(simplify_transmission("CVT Transmission"), "cvt");
        assert_eq!(simplify_transmission("7-Speed DCT"), "dual clutch");
        assert_eq!(simplify_transmission("6-Speed M/T"), "manual");
        assert_eq!(simplify_transmission("1-Speed A/T"), "single-speed (EV)");
        assert_eq!(simplify_transmission("8-Speed Automatic"), "automatic");
        assert_eq!(simplify_transmission("unknown"), "other");
    }

    #[test]
    fn test_simplify_fuel() {
        assert_eq!(simplify_fuel("PHEV Hybrid Fuel"), "Hybrid");
        assert_eq!(simplify_fuel("Diesel (B20 capable)"), "Diesel");
        assert_eq!(simplify_fuel("Gasoline"), "Gasoline");
    }
}
