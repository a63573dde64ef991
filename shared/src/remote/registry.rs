use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use log::debug;

use crate::remote::{endpoint::ServiceEndpoint, error::EndpointError, interface::RemoteName};

/// Maps service names to the endpoint that holds their local handlers
pub struct EndpointRegistry {
    endpoints: Mutex<HashMap<String, Arc<ServiceEndpoint>>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self {
            endpoints: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the endpoint for `name`, creating it if needed.
    ///
    /// `single_threaded` only applies on creation. Fails if the name already
    /// exists with a different capability.
    pub fn get_or_create(
        &self,
        name: &RemoteName,
        single_threaded: bool,
    ) -> Result<Arc<ServiceEndpoint>, EndpointError> {
        let mut endpoints = self
            .endpoints
            .lock()
            .map_err(|_| EndpointError::LockPoisoned {
                endpoint: name.name().to_string(),
            })?;

        if let Some(endpoint) = endpoints.get(name.name()) {
            if endpoint.interface() != name.interface() {
                return Err(EndpointError::InterfaceMismatch {
                    endpoint: name.name().to_string(),
                    expected: endpoint.interface().name,
                    found: name.interface().name,
                });
            }
            return Ok(endpoint.clone());
        }

        debug!(
            "creating endpoint {:?} ({}, single threaded: {})",
            name.name(),
            name.interface().name,
            single_threaded
        );
        let endpoint = Arc::new(ServiceEndpoint::new(
            name.name(),
            name.interface(),
            single_threaded,
        ));
        endpoints.insert(name.name().to_string(), endpoint.clone());
        Ok(endpoint)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ServiceEndpoint>> {
        self.endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Drops the endpoint for `name` if it has no handlers left. Returns
    /// whether it was removed.
    pub fn remove_if_empty(&self, name: &str) -> bool {
        let mut endpoints = self
            .endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let is_empty = endpoints
            .get(name)
            .is_some_and(|endpoint| endpoint.local_handler_count() == 0);
        if is_empty {
            endpoints.remove(name);
        }
        is_empty
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}
