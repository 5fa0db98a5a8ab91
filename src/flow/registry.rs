use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::catalog;
use super::spec::FlowSpec;
use crate::error::{CareerFlowError, Result};
use crate::utils::ConfigValidator;

/// Flow 注册表
#[derive(Default)]
pub struct FlowRegistry {
    flows: HashMap<String, Arc<FlowSpec>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self {
            flows: HashMap::new(),
        }
    }

    /// 内置全部能力的注册表
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for spec in catalog::builtin_flows() {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, spec: FlowSpec) -> Result<()> {
        ConfigValidator::validate_flow_name(spec.name())?;
        if self.flows.contains_key(spec.name()) {
            return Err(CareerFlowError::DuplicateFlow(spec.name().to_string()));
        }
        self.flows.insert(spec.name().to_string(), Arc::new(spec));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<FlowSpec>> {
        self.flows
            .get(name)
            .cloned()
            .ok_or_else(|| CareerFlowError::FlowNotRegistered(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flows.contains_key(name)
    }

    /// 按名称排序
    pub fn list(&self) -> Vec<Arc<FlowSpec>> {
        let mut flows: Vec<_> = self.flows.values().cloned().collect();
        flows.sort_by(|a, b| a.name().cmp(b.name()));
        flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

static DEFAULT_REGISTRY: Lazy<Arc<FlowRegistry>> = Lazy::new(|| {
    let registry = FlowRegistry::builtin().unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to register built-in flows");
        FlowRegistry::new()
    });
    Arc::new(registry)
});

/// 进程级注册表：启动时写入一次，此后只读
pub fn default_registry() -> Arc<FlowRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::FlowInput;
    use crate::schema::Schema;

    fn template(_: &FlowInput<'_>) -> String {
        "hello".to_string()
    }

    fn spec(name: &str) -> FlowSpec {
        FlowSpec::new(name, "Test", Schema::object(), Schema::object(), template)
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = FlowRegistry::new();
        registry.register(spec("a")).unwrap();
        assert!(matches!(
            registry.register(spec("a")),
            Err(CareerFlowError::DuplicateFlow(name)) if name == "a"
        ));
    }

    #[test]
    fn builtin_catalog_registers_cleanly() {
        let registry = FlowRegistry::builtin().unwrap();
        assert_eq!(registry.len(), catalog::builtin_flows().len());
        let names: Vec<String> = registry.list().iter().map(|f| f.name().to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(registry.contains("cover-letter"));
        assert!(registry.contains("dream-career"));
    }
}
