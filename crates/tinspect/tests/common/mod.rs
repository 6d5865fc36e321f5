//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::sync::Once;

use tinspect::{ClassId, ClassReflection, ClassRegistry, Reflector};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once; filtered by `RUST_LOG`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Reflect `ty` with the default pipeline
pub fn reflect(registry: ClassRegistry, ty: ClassId) -> ClassReflection {
    init_tracing();
    let reflector = Reflector::new(registry);
    let reflection = reflector.reflect(ty).unwrap();
    (*reflection).clone()
}

/// Method names in order
pub fn method_names(class: &ClassReflection) -> Vec<&str> {
    class.methods.iter().map(|m| m.name.as_str()).collect()
}

/// Property names in order
pub fn property_names(class: &ClassReflection) -> Vec<&str> {
    class.properties.iter().map(|p| p.name.as_str()).collect()
}
