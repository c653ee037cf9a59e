use crate::core::catalog::{Catalog, Price, Professional, Service};

fn service(id: &str, name: &str, minutes: u32, price: i64) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        price: Price(price),
        duration_minutes: minutes,
        description: None,
        category: None,
    }
}

fn professional(id: &str, name: &str, active: bool) -> Professional {
    Professional {
        id: id.to_string(),
        name: name.to_string(),
        specialties: vec![],
        active,
    }
}

/// Two services and three professionals, one of them no longer taking bookings.
pub fn make_catalog() -> Catalog {
    Catalog::new(
        vec![
            service("svc-haircut", "Haircut", 30, 15_000),
            service("svc-classic-shave", "Classic Shave", 25, 12_000),
        ],
        vec![
            professional("pro-alex", "Alex", true),
            professional("pro-sam", "Sam", true),
            professional("pro-retired", "Retired Barber", false),
        ],
    )
}
