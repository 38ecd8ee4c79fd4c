use indexmap::IndexMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A component with a lifecycle that is owned by a chain context
pub trait Service: Send + Sync {
    fn init(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Named services in registration order
#[derive(Default)]
pub struct ServiceContainer {
    services: Mutex<IndexMap<String, Arc<dyn Service>>>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn register(&self, name: impl Into<String>, service: Arc<dyn Service>) -> anyhow::Result<()> {
        let name = name.into();
        let mut services = self.services.lock().unwrap();
        if services.contains_key(&name) {
            bail!("service {} already registered", name);
        }
        debug!(service = %name, "service registered");
        services.insert(name, service);
        Ok(())
    }

    /// Stops the service and removes it
    pub fn unregister(&self, name: &str) -> anyhow::Result<()> {
        let service = self
            .get(name)
            .ok_or_else(|| anyhow!("service {} not found", name))?;
        service.stop()?;
        self.services.lock().unwrap().shift_remove(name);
        debug!(service = name, "service unregistered");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.services.lock().unwrap().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.services.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn init_all(&self) -> anyhow::Result<()> {
        for service in self.snapshot() {
            service.init()?;
        }
        Ok(())
    }

    pub fn start_all(&self) -> anyhow::Result<()> {
        for service in self.snapshot() {
            service.start()?;
        }
        Ok(())
    }

    /// Stops in reverse registration order
    pub fn stop_all(&self) -> anyhow::Result<()> {
        for service in self.snapshot().into_iter().rev() {
            service.stop()?;
        }
        Ok(())
    }

    // services are called without holding the lock
    fn snapshot(&self) -> Vec<Arc<dyn Service>> {
        self.services.lock().unwrap().values().cloned().collect()
    }
}
