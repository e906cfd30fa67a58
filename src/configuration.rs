use std::fs::File;
use std::io::BufReader;

use serde::Deserialize;

use crate::efficiency::efficiency::Efficiency;
use crate::efficiency::efficiencymanager::EfficiencyManager;
use crate::manager::managererror::ManagerError;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::resolution::resolutionmanager::ResolutionManager;


#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    efficiency: Vec<serde_json::Value>,
    #[serde(default)]
    resolution: Vec<serde_json::Value>
}

/// Efficiencies and the resolution models built on them.
///
/// ```json
/// { "efficiency": [ ... ], "resolution": [ ... ] }
/// ```
pub struct Configuration {
    efficiency_manager: Manager<Efficiency>,
    resolution_manager: ResolutionManager
}


impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            efficiency_manager: EfficiencyManager::new(),
            resolution_manager: ResolutionManager::new()
        }
    }

    pub fn efficiency_manager(&self) -> &Manager<Efficiency> {
        &self.efficiency_manager
    }

    pub fn resolution_manager(&self) -> &ResolutionManager {
        &self.resolution_manager
    }

    /// Efficiencies are registered first so that resolution models in the
    /// same document can refer to them.
    pub fn load_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let json_prop: ConfigurationJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
        let empty_support = ();
        self.efficiency_manager.insert_obj_from_json_vec(&json_prop.efficiency, &empty_support)?;
        self.resolution_manager.insert_obj_from_json_vec(&json_prop.resolution, &self.efficiency_manager)?;
        log::debug!(
            "configuration loaded: {} efficiencies, {} resolution models",
            json_prop.efficiency.len(),
            json_prop.resolution.len()
        );
        Ok(())
    }

    pub fn from_reader(&self, file_path: String) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        self.load_json(json_value)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}
