use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use parking_lot::{
    Mutex,
    MutexGuard
};
use serde::Deserialize;

use super::managererror::ManagerError;

/// The field every managed JSON object carries.
#[derive(Deserialize)]
struct NamedJsonObject {
    name: String
}

pub(crate) fn name_of(json_value: &serde_json::Value) -> Result<String, ManagerError> {
    let named_object: NamedJsonObject = ManagerError::from_json_or_json_parse_error(json_value.clone())?;
    Ok(named_object.name)
}

/// Registry of named objects built from JSON.
///
/// `S` carries whatever an object needs to resolve its references, e.g. the
/// manager holding the objects it names.
pub trait IManager<V, S> where
    V: Clone {
    fn map(&self) -> MutexGuard<'_, HashMap<String, V>>;

    fn insert_obj_from_json(&self,
                            json_value: serde_json::Value,
                            supports: &S) -> Result<(), ManagerError>;

    fn get(&self, name: &str) -> Result<V, ManagerError> {
        self.map()
            .get(name)
            .cloned()
            .ok_or_else(|| ManagerError::map_elem_not_found(name))
    }

    fn contains(&self, name: &str) -> bool {
        self.map().contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map().keys().cloned().collect();
        names.sort();
        names
    }

    fn insert_obj_from_json_vec(&self,
                                json_vec: &[serde_json::Value],
                                supports: &S) -> Result<(), ManagerError> {
        for j in json_vec.iter() {
            self.insert_obj_from_json(j.clone(), supports)?;
        }
        Ok(())
    }

    fn from_reader(&self,
                   file_path: String,
                   supports: &S) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        if json_value.is_array() {
            let json_array: Vec<serde_json::Value> = ManagerError::from_json_or_json_parse_error(json_value)?;
            self.insert_obj_from_json_vec(&json_array, supports)
        } else {
            self.insert_obj_from_json(json_value, supports)
        }
    }
}


pub struct Manager<V> {
    map_cell: Mutex<HashMap<String, V>>,
    get_obj_from_json: fn(serde_json::Value) -> Result<V, ManagerError>
}


impl<V> Manager<V> where
    V: Clone {
    pub fn new(get_obj_from_json: fn(serde_json::Value) -> Result<V, ManagerError>) -> Manager<V> {
        Manager { map_cell: Mutex::new(HashMap::new()), get_obj_from_json }
    }
}

impl<V> IManager<V, ()> for Manager<V> where
    V: Clone {
    fn map(&self) -> MutexGuard<'_, HashMap<String, V>> {
        self.map_cell.lock()
    }

    fn insert_obj_from_json(&self,
                            json_value: serde_json::Value,
                            _supports: &()) -> Result<(), ManagerError> {
        let name = name_of(&json_value)?;
        let v = (self.get_obj_from_json)(json_value)?;
        if self.map().insert(name.clone(), v).is_some() {
            log::warn!("'{}' was already registered and has been replaced", name);
        } else {
            log::debug!("registered '{}'", name);
        }
        Ok(())
    }
}
