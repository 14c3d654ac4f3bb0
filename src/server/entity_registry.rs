//! Entity registry collecting the REST routes of every entity

use axum::Router;

/// Describes how to build the routes of one entity
///
/// Dealer, Vehicle and Payment each provide a descriptor holding their
/// service.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "dealer")
    fn entity_type(&self) -> &str;

    /// The plural form used as URL prefix (e.g., "dealers")
    fn plural(&self) -> &str;

    /// Build the routes of this entity, state already attached
    fn build_routes(&self) -> Router;
}

/// Registry of the entities exposed by the server
///
/// Descriptors keep their registration order; registering the same entity
/// type twice replaces the first descriptor.
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: Vec<Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        match self
            .descriptors
            .iter()
            .position(|d| d.entity_type() == descriptor.entity_type())
        {
            Some(index) => self.descriptors[index] = descriptor,
            None => self.descriptors.push(descriptor),
        }
    }

    /// Merge the routes of every registered entity
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .iter()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered entity types, in registration order
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.entity_type()).collect()
    }

    /// URL prefixes of the registered entities
    pub fn route_prefixes(&self) -> Vec<String> {
        self.descriptors
            .iter()
            .map(|d| format!("/{}", d.plural()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    struct StaticDescriptor {
        entity_type: &'static str,
        plural: &'static str,
    }

    impl EntityDescriptor for StaticDescriptor {
        fn entity_type(&self) -> &str {
            self.entity_type
        }

        fn plural(&self) -> &str {
            self.plural
        }

        fn build_routes(&self) -> Router {
            Router::new().route(&format!("/{}", self.plural), get(|| async { "[]" }))
        }
    }

    fn descriptor(entity_type: &'static str, plural: &'static str) -> Box<dyn EntityDescriptor> {
        Box::new(StaticDescriptor {
            entity_type,
            plural,
        })
    }

    #[test]
    fn test_new_registry_is_empty() {
        assert!(EntityRegistry::new().entity_types().is_empty());
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = EntityRegistry::new();
        registry.register(descriptor("dealer", "dealers"));
        registry.register(descriptor("vehicle", "vehicles"));
        registry.register(descriptor("payment", "payments"));

        assert_eq!(registry.entity_types(), vec!["dealer", "vehicle", "payment"]);
        assert_eq!(
            registry.route_prefixes(),
            vec!["/dealers", "/vehicles", "/payments"]
        );
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let mut registry = EntityRegistry::new();
        registry.register(descriptor("dealer", "dealers"));
        registry.register(descriptor("dealer", "dealerships"));

        assert_eq!(registry.entity_types(), vec!["dealer"]);
        assert_eq!(registry.route_prefixes(), vec!["/dealerships"]);
    }

    #[test]
    fn test_build_routes_with_entities() {
        let mut registry = EntityRegistry::new();
        registry.register(descriptor("dealer", "dealers"));
        registry.register(descriptor("vehicle", "vehicles"));
        let _router = registry.build_routes();
    }
}
