//! Validated definition registry.

use std::collections::{HashMap, HashSet};

use crate::definition::BeanDefinition;
use crate::error::ConfigError;
use crate::graph::DependencyGraph;
use crate::types::TypeRegistry;

/// Bean definitions indexed by id, plus the alias table.
///
/// Only built through [`DefinitionRegistry::build`], so every instance has
/// passed validation: ids unique, references resolvable, types and hooks
/// registered.
pub(crate) struct DefinitionRegistry {
    definitions: Vec<BeanDefinition>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl DefinitionRegistry {
    pub(crate) fn build(definitions: Vec<BeanDefinition>, types: &TypeRegistry) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            if def.id.is_empty() {
                return Err(ConfigError::EmptyId);
            }
            if index.insert(def.id.clone(), i).is_some() {
                return Err(ConfigError::DuplicateId(def.id.clone()));
            }
        }

        let mut aliases = HashMap::new();
        for def in &definitions {
            for alias in &def.aliases {
                if alias.is_empty() || index.contains_key(alias) || aliases.contains_key(alias) {
                    return Err(ConfigError::AliasConflict {
                        alias: alias.clone(),
                        bean: def.id.clone(),
                    });
                }
                aliases.insert(alias.clone(), def.id.clone());
            }
        }

        let registry = Self {
            definitions,
            index,
            aliases,
        };
        for def in &registry.definitions {
            registry.validate(def, types)?;
        }
        Ok(registry)
    }

    fn validate(&self, def: &BeanDefinition, types: &TypeRegistry) -> Result<(), ConfigError> {
        let descriptor = types.get(&def.type_ref).ok_or_else(|| ConfigError::UnknownType {
            bean: def.id.clone(),
            type_ref: def.type_ref.clone(),
        })?;

        if let Some(hook) = def.init_hook.as_deref() {
            if !descriptor.has_init_hook(hook) {
                return Err(unknown_hook(def, hook, "init"));
            }
        }
        if let Some(hook) = def.destroy_hook.as_deref() {
            if !descriptor.has_destroy_hook(hook) {
                return Err(unknown_hook(def, hook, "destroy"));
            }
        }

        let mut seen = HashSet::new();
        for (property, _) in &def.properties {
            if !seen.insert(property.as_str()) {
                return Err(ConfigError::DuplicateProperty {
                    bean: def.id.clone(),
                    property: property.clone(),
                });
            }
        }

        for target in def.dependencies() {
            match self.canonical(target) {
                None => {
                    return Err(ConfigError::UnresolvedReference {
                        bean: def.id.clone(),
                        target: target.to_string(),
                    })
                }
                Some(id) if id == def.id => return Err(ConfigError::SelfReference(def.id.clone())),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Maps an id or alias to the bean id.
    pub(crate) fn canonical<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.index.contains_key(name) {
            Some(name)
        } else {
            self.aliases.get(name).map(String::as_str)
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&BeanDefinition> {
        let id = self.canonical(name)?;
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &BeanDefinition> {
        self.definitions.iter()
    }

    pub(crate) fn aliases_of(&self, id: &str) -> Vec<&str> {
        self.get(id).map(|def| def.aliases.iter().map(String::as_str).collect()).unwrap_or_default()
    }

    /// Reference graph with every edge rewritten to bean ids.
    pub(crate) fn graph(&self) -> DependencyGraph<'_> {
        let mut graph = DependencyGraph::new();
        for def in &self.definitions {
            let deps = def.dependencies().filter_map(|target| self.canonical(target)).collect();
            graph.add(def.id.as_str(), deps);
        }
        graph
    }
}

fn unknown_hook(def: &BeanDefinition, hook: &str, kind: &'static str) -> ConfigError {
    ConfigError::UnknownHook {
        bean: def.id.clone(),
        hook: hook.to_string(),
        kind,
    }
}
