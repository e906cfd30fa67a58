use serde::Deserialize;

use crate::efficiency::binnedefficiency::BinnedEfficiency;
use crate::efficiency::cubicsplineefficiency::CubicSplineEfficiency;
use crate::efficiency::efficiency::Efficiency;
use crate::efficiency::thresholdefficiency::ThresholdEfficiency;
use crate::manager::manager::Manager;
use crate::manager::managererror::ManagerError;
use crate::math::spline::boundaryconditions::BoundaryConditions;
use crate::parameter::parameter::Parameter;

#[derive(Deserialize)]
pub enum EfficiencyType {
    CubicSpline,
    Binned,
    Threshold
}


#[derive(Deserialize)]
struct EfficiencyTypedObject {
    name: String,
    efficiency_type: EfficiencyType
}


/// Either explicit coefficients or samples at the knots to interpolate.
#[derive(Deserialize)]
struct CubicSplineJsonProp {
    knots: Vec<f64>,
    coefficients: Option<Vec<f64>>,
    values: Option<Vec<f64>>,
    #[serde(default)]
    errors: Vec<f64>,
    #[serde(default)]
    smoothing: f64,
    #[serde(default)]
    boundary_conditions: BoundaryConditions,
    #[serde(default)]
    constant_coefficients: bool
}


#[derive(Deserialize)]
struct BinnedJsonProp {
    boundaries: Vec<f64>,
    coefficients: Vec<f64>,
    #[serde(default)]
    constant_coefficients: bool
}


#[derive(Deserialize)]
struct ThresholdJsonProp {
    low: f64,
    high: f64,
    #[serde(default)]
    thresholds: Vec<ThresholdEntryJsonProp>,
    #[serde(default)]
    constant_coefficients: bool
}


#[derive(Deserialize)]
struct ThresholdEntryJsonProp {
    upper_limit: f64,
    efficiency: f64
}


fn get_cubic_spline_efficiency_from_json(name: String,
                                         json_value: serde_json::Value) -> Result<CubicSplineEfficiency, ManagerError> {
    let json_prop: CubicSplineJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    let efficiency = match (json_prop.coefficients, json_prop.values) {
        (Some(coefficients), None) => {
            let coefficients = coefficients.iter()
                .enumerate()
                .map(|(i, c)| Parameter::constant(format!("{}_coef_{}", name, i), *c))
                .collect();
            CubicSplineEfficiency::new(name, json_prop.knots, coefficients)?
        },
        (None, Some(values)) => {
            CubicSplineEfficiency::from_samples(
                name,
                json_prop.knots,
                &values,
                &json_prop.errors,
                json_prop.smoothing,
                &json_prop.boundary_conditions,
                json_prop.constant_coefficients
            )?
        },
        _ => {
            return Err(ManagerError::json_invalid_value(
                serde::de::Unexpected::Other("coefficients and values both given or both missing"),
                &"exactly one of 'coefficients' or 'values'"
            ));
        }
    };
    Ok(efficiency)
}


fn get_binned_efficiency_from_json(name: String,
                                   json_value: serde_json::Value) -> Result<BinnedEfficiency, ManagerError> {
    let json_prop: BinnedJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    let efficiency = BinnedEfficiency::from_values(
        name,
        json_prop.boundaries,
        &json_prop.coefficients,
        json_prop.constant_coefficients
    )?;
    Ok(efficiency)
}


fn get_threshold_efficiency_from_json(name: String,
                                      json_value: serde_json::Value) -> Result<ThresholdEfficiency, ManagerError> {
    let json_prop: ThresholdJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    let mut efficiency = ThresholdEfficiency::new(name.clone(), json_prop.low, json_prop.high)?;
    for (i, entry) in json_prop.thresholds.iter().enumerate() {
        let parameter_name = format!("{}_threshold_{}", name, i);
        let fraction = if json_prop.constant_coefficients {
            Parameter::constant(parameter_name, entry.efficiency)
        } else {
            Parameter::floating(parameter_name, entry.efficiency, 0.0, 1.0)?
        };
        efficiency.add_threshold(entry.upper_limit, fraction)?;
    }
    Ok(efficiency)
}


fn get_efficiency_from_json(json_value: serde_json::Value) -> Result<Efficiency, ManagerError> {
    let typed_object: EfficiencyTypedObject = ManagerError::from_json_or_json_parse_error(json_value.clone())?;
    let name = typed_object.name;
    let efficiency: Efficiency = match typed_object.efficiency_type {
        EfficiencyType::CubicSpline => get_cubic_spline_efficiency_from_json(name, json_value)?.into(),
        EfficiencyType::Binned => get_binned_efficiency_from_json(name, json_value)?.into(),
        EfficiencyType::Threshold => get_threshold_efficiency_from_json(name, json_value)?.into()
    };
    Ok(efficiency)
}


pub struct EfficiencyManager {}

impl EfficiencyManager {
    pub fn new() -> Manager<Efficiency> {
        Manager::new(get_efficiency_from_json)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::efficiency::efficiency::GaussModelEfficiency;
    use crate::efficiency::efficiencyerror::EfficiencyError;
    use crate::manager::manager::IManager;
    use crate::math::spline::splineerror::SplineError;

    #[test]
    fn builds_every_variant() {
        let manager = EfficiencyManager::new();
        let json = serde_json::json!([
            {
                "name": "spline",
                "efficiency_type": "CubicSpline",
                "knots": [0.0, 1.0, 2.0, 3.0, 4.0],
                "values": [0.0, 1.0, 4.0, 9.0, 16.0],
                "boundary_conditions": {
                    "left": { "FirstDerivative": 0.0 },
                    "right": { "FirstDerivative": 8.0 }
                },
                "constant_coefficients": true
            },
            {
                "name": "binned",
                "efficiency_type": "Binned",
                "boundaries": [0.0, 1.0, 3.0],
                "coefficients": [0.4, 0.9]
            },
            {
                "name": "step",
                "efficiency_type": "Threshold",
                "low": 0.0,
                "high": 3.0,
                "thresholds": [
                    { "upper_limit": 1.0, "efficiency": 0.3 },
                    { "upper_limit": 2.0, "efficiency": 0.5 }
                ]
            }
        ]);
        let json_vec: Vec<serde_json::Value> = ManagerError::from_json_or_json_parse_error(json).unwrap();
        manager.insert_obj_from_json_vec(&json_vec, &()).unwrap();

        let spline = manager.get("spline").unwrap();
        assert_relative_eq!(spline.evaluate(2.5), 6.25, epsilon = 1e-12);
        assert_eq!(spline.name(), "spline");

        let binned = manager.get("binned").unwrap();
        assert_relative_eq!(binned.evaluate(2.0), 0.9);
        assert_eq!(binned.parameters()[1].name(), "binned_bin_1");
        assert!(!binned.parameters()[1].is_constant());

        let step = manager.get("step").unwrap();
        assert_relative_eq!(step.definite_integral(0.0, 2.0).unwrap(), 0.8, epsilon = 1e-15);
        assert_eq!(step.parameters()[0].name(), "step_threshold_0");
    }

    #[test]
    fn explicit_coefficients_are_counted() {
        let manager = EfficiencyManager::new();
        let json = serde_json::json!({
            "name": "short",
            "efficiency_type": "CubicSpline",
            "knots": [0.0, 1.0, 2.0],
            "coefficients": [0.5, 0.5, 0.5]
        });
        let result = manager.insert_obj_from_json(json, &());
        assert!(matches!(
            result,
            Err(ManagerError::EfficiencyError(EfficiencyError::Spline(_)))
        ));
    }

    #[test]
    fn smoothing_is_validated() {
        let manager = EfficiencyManager::new();
        for smoothing in [-3.0_f64, 1.0] {
            let json = serde_json::json!({
                "name": "smoothed",
                "efficiency_type": "CubicSpline",
                "knots": [0.0, 1.0, 2.0, 3.0],
                "values": [0.2, 0.5, 0.7, 0.8],
                "errors": [0.05, 0.05, 0.05, 0.05],
                "smoothing": smoothing
            });
            let result = manager.insert_obj_from_json(json, &());
            assert!(matches!(
                result,
                Err(ManagerError::EfficiencyError(EfficiencyError::Spline(SplineError::SmoothingOutOfRange(_))))
            ));
        }
        assert!(!manager.contains("smoothed"));
    }

    #[test]
    fn ambiguous_spline_input_is_rejected() {
        let manager = EfficiencyManager::new();
        let json = serde_json::json!({
            "name": "neither",
            "efficiency_type": "CubicSpline",
            "knots": [0.0, 1.0, 2.0]
        });
        assert!(matches!(manager.insert_obj_from_json(json, &()), Err(ManagerError::JsonParseError(_))));
    }
}
