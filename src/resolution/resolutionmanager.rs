use std::collections::HashMap;

use parking_lot::{
    Mutex,
    MutexGuard
};
use serde::Deserialize;

use crate::efficiency::efficiency::Efficiency;
use crate::manager::manager::{
    name_of,
    IManager,
    Manager
};
use crate::manager::managererror::ManagerError;
use crate::parameter::parameter::Parameter;
use crate::resolution::gaussefficiencymodel::GaussEfficiencyModel;

fn default_scale_factor() -> f64 {
    1.0
}

#[derive(Deserialize)]
struct GaussEfficiencyModelJsonProp {
    efficiency: String,
    mean: f64,
    sigma: f64,
    #[serde(default = "default_scale_factor")]
    mean_scale_factor: f64,
    #[serde(default = "default_scale_factor")]
    sigma_scale_factor: f64
}


fn get_gauss_efficiency_model_from_json(name: String,
                                        json_value: serde_json::Value,
                                        efficiency_manager: &Manager<Efficiency>) -> Result<GaussEfficiencyModel, ManagerError> {
    let json_prop: GaussEfficiencyModelJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    let width = json_prop.sigma * json_prop.sigma_scale_factor;
    if !(width.is_finite() && width > 0.0) {
        return Err(ManagerError::json_invalid_value(
            serde::de::Unexpected::Float(width),
            &"a positive resolution width"
        ));
    }
    let efficiency = efficiency_manager.get(&json_prop.efficiency)?;
    Ok(GaussEfficiencyModel::with_scale_factors(
        name.clone(),
        efficiency,
        Parameter::constant(format!("{}_mean", name), json_prop.mean),
        Parameter::constant(format!("{}_sigma", name), json_prop.sigma),
        Parameter::constant(format!("{}_mean_scale_factor", name), json_prop.mean_scale_factor),
        Parameter::constant(format!("{}_sigma_scale_factor", name), json_prop.sigma_scale_factor)
    ))
}


/// Resolution models, each referring to an efficiency by name.
pub struct ResolutionManager {
    map_cell: Mutex<HashMap<String, GaussEfficiencyModel>>
}

impl ResolutionManager {
    pub fn new() -> ResolutionManager {
        ResolutionManager { map_cell: Mutex::new(HashMap::new()) }
    }
}

impl Default for ResolutionManager {
    fn default() -> Self {
        ResolutionManager::new()
    }
}

impl IManager<GaussEfficiencyModel, Manager<Efficiency>> for ResolutionManager {
    fn map(&self) -> MutexGuard<'_, HashMap<String, GaussEfficiencyModel>> {
        self.map_cell.lock()
    }

    fn insert_obj_from_json(&self,
                            json_value: serde_json::Value,
                            supports: &Manager<Efficiency>) -> Result<(), ManagerError> {
        let name = name_of(&json_value)?;
        let model = get_gauss_efficiency_model_from_json(name.clone(), json_value, supports)?;
        let efficiency_name = model.efficiency().name().to_owned();
        if self.map().insert(name.clone(), model).is_some() {
            log::warn!("resolution model '{}' was already registered and has been replaced", name);
        } else {
            log::debug!("registered resolution model '{}' on efficiency '{}'", name, efficiency_name);
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::efficiency::efficiencymanager::EfficiencyManager;

    fn efficiencies() -> Manager<Efficiency> {
        let manager = EfficiencyManager::new();
        manager.insert_obj_from_json(serde_json::json!({
            "name": "flat",
            "efficiency_type": "Binned",
            "boundaries": [0.0, 10.0],
            "coefficients": [1.0],
            "constant_coefficients": true
        }), &()).unwrap();
        manager
    }

    #[test]
    fn models_resolve_their_efficiency() {
        let efficiencies = efficiencies();
        let manager = ResolutionManager::new();
        manager.insert_obj_from_json(serde_json::json!({
            "name": "res",
            "efficiency": "flat",
            "mean": 0.01,
            "sigma": 0.04,
            "sigma_scale_factor": 1.25
        }), &efficiencies).unwrap();
        let model = manager.get("res").unwrap();
        assert_eq!(model.efficiency().name(), "flat");
        assert_relative_eq!(model.scale(), 0.05 * std::f64::consts::SQRT_2);
        assert_relative_eq!(model.offset(), 0.01);
    }

    #[test]
    fn later_definition_replaces_earlier_one() {
        let efficiencies = efficiencies();
        let manager = ResolutionManager::new();
        for sigma in [0.04_f64, 0.06] {
            manager.insert_obj_from_json(serde_json::json!({
                "name": "res",
                "efficiency": "flat",
                "mean": 0.0,
                "sigma": sigma
            }), &efficiencies).unwrap();
        }
        assert_eq!(manager.names(), vec!["res".to_string()]);
        assert_relative_eq!(manager.get("res").unwrap().scale(), 0.06 * std::f64::consts::SQRT_2);
    }

    #[test]
    fn unknown_efficiency_is_reported() {
        let efficiencies = efficiencies();
        let manager = ResolutionManager::new();
        let result = manager.insert_obj_from_json(serde_json::json!({
            "name": "res",
            "efficiency": "missing",
            "mean": 0.0,
            "sigma": 0.04
        }), &efficiencies);
        assert!(matches!(result, Err(ManagerError::NameNotFoundError(name)) if name == "missing"));
    }

    #[test]
    fn width_must_be_positive() {
        let efficiencies = efficiencies();
        let manager = ResolutionManager::new();
        let result = manager.insert_obj_from_json(serde_json::json!({
            "name": "res",
            "efficiency": "flat",
            "mean": 0.0,
            "sigma": 0.0
        }), &efficiencies);
        assert!(matches!(result, Err(ManagerError::JsonParseError(_))));
        assert!(!manager.contains("res"));
    }
}
