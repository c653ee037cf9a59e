// In memory catalog source, seeded with the salon's default menu.

use crate::core::catalog::{Price, Professional, Service};
use crate::core::ports::{CatalogSource, TransportError};
use async_trait::async_trait;
use tokio::sync::RwLock;

pub struct InMemoryCatalog {
    services: RwLock<Vec<Service>>,
    professionals: RwLock<Vec<Professional>>,
    is_offline: bool,
}

impl InMemoryCatalog {
    pub fn new(services: Vec<Service>, professionals: Vec<Professional>) -> Self {
        Self {
            services: RwLock::new(services),
            professionals: RwLock::new(professionals),
            is_offline: false,
        }
    }

    /// Menu offered when nothing else is configured.
    pub fn with_defaults() -> Self {
        Self::new(default_services(), default_professionals())
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn ensure_online(&self) -> Result<(), TransportError> {
        if self.is_offline {
            return Err(TransportError::Unreachable("catalog offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn list_services(&self) -> Result<Vec<Service>, TransportError> {
        self.ensure_online()?;
        Ok(self.services.read().await.clone())
    }

    async fn list_professionals(&self) -> Result<Vec<Professional>, TransportError> {
        self.ensure_online()?;
        Ok(self.professionals.read().await.clone())
    }
}

fn service(id: &str, name: &str, minutes: u32, price: i64, description: &str) -> Service {
    Service {
        id: id.into(),
        name: name.into(),
        price: Price(price),
        duration_minutes: minutes,
        description: Some(description.into()),
        category: None,
    }
}

pub fn default_services() -> Vec<Service> {
    vec![
        service("svc-haircut", "Haircut", 30, 15_000, "Modern, professional cut"),
        service("svc-haircut-beard", "Haircut + Beard", 45, 20_000, "Full cut with beard trim"),
        service("svc-classic-shave", "Classic Shave", 25, 12_000, "Traditional straight razor shave"),
        service("svc-hair-treatment", "Hair Treatment", 40, 18_000, "Hydration and hair care"),
    ]
}

pub fn default_professionals() -> Vec<Professional> {
    vec![Professional {
        id: "pro-angelo".into(),
        name: "Angelo Cuadra".into(),
        specialties: vec!["Modern cuts".into(), "Beard".into(), "Shave".into()],
        active: true,
    }]
}
