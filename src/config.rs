//! Declarative bean documents.
//!
//! Bean definitions can be kept in JSON or YAML documents instead of being
//! built in code. A document lists beans with their type, scope, constructor
//! arguments, properties and hooks:
//!
//! ```yaml
//! beans:
//!   - id: computer
//!     class: Computer
//!   - id: developer
//!     class: Developer
//!     properties:
//!       - { name: age, value: 25 }
//!       - { name: computer, ref: computer }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::definition::BeanDefinition;
use crate::error::ConfigError;
use crate::scope::Scope;
use crate::value::ArgValue;

/// Literal as written in a document; numbers and booleans are kept as text.
///
/// Unquoted numbers go through the document parser first, so `1.50` arrives
/// as `1.5`. Quote a scalar to keep its exact spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralSpec {
    Boolean(bool),
    Integer(i64),
    // integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl LiteralSpec {
    fn into_text(self) -> String {
        match self {
            LiteralSpec::Boolean(b) => b.to_string(),
            LiteralSpec::Integer(i) => i.to_string(),
            LiteralSpec::Unsigned(u) => u.to_string(),
            LiteralSpec::Float(f) => f.to_string(),
            LiteralSpec::String(s) => s,
        }
    }
}

/// A constructor argument or property value: exactly one of `value` / `ref`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<LiteralSpec>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ValueSpec {
    fn into_arg(self, bean: &str, what: &str) -> Result<ArgValue, ConfigError> {
        match (self.value, self.reference) {
            (Some(literal), None) => Ok(ArgValue::Literal(literal.into_text())),
            (None, Some(id)) => Ok(ArgValue::Ref(id)),
            (Some(_), Some(_)) => Err(malformed(bean, format!("{what} has both `value` and `ref`"))),
            (None, None) => Err(malformed(bean, format!("{what} has neither `value` nor `ref`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    #[serde(flatten)]
    pub value: ValueSpec,
}

/// One bean entry of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BeanSpec {
    pub id: String,
    #[serde(alias = "type")]
    pub class: String,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructor_args: Vec<ValueSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroy_method: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl BeanSpec {
    fn into_definition(self) -> Result<BeanDefinition, ConfigError> {
        let mut def = BeanDefinition::new(self.id, self.class).scope(self.scope);
        for (i, arg) in self.constructor_args.into_iter().enumerate() {
            let arg = arg.into_arg(&def.id, &format!("constructor argument {i}"))?;
            def.constructor_args.push(arg);
        }
        for property in self.properties {
            let value = property.value.into_arg(&def.id, &format!("property `{}`", property.name))?;
            def = def.with_property(property.name, value);
        }
        def.init_hook = self.init_method;
        def.destroy_hook = self.destroy_method;
        def.depends_on = self.depends_on;
        def.aliases = self.aliases;
        Ok(def)
    }
}

/// A parsed bean document.
///
/// # Examples
///
/// ```rust
/// use beanwire::{ArgValue, BeanDocument, Scope};
///
/// let doc = BeanDocument::from_json_str(r#"{
///     "beans": [
///         { "id": "computer", "class": "Computer", "scope": "prototype" },
///         { "id": "developer", "class": "Developer",
///           "properties": [
///               { "name": "age", "value": 25 },
///               { "name": "computer", "ref": "computer" }
///           ] }
///     ]
/// }"#).unwrap();
///
/// let defs = doc.into_definitions().unwrap();
/// assert_eq!(defs[0].scope, Scope::Prototype);
/// assert_eq!(defs[1].properties[0].1, ArgValue::Literal("25".into()));
/// assert_eq!(defs[1].properties[1].1, ArgValue::Ref("computer".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeanDocument {
    #[serde(default)]
    pub beans: Vec<BeanSpec>,
}

impl BeanDocument {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(format!("invalid JSON: {e}")))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(format!("invalid YAML: {e}")))
    }

    /// Reads a document, choosing the format from the file extension
    /// (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("cannot read {}: {e}", path.display())))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Err(ConfigError::Parse(format!(
                "unsupported document format: {}",
                path.display()
            ))),
        }
    }

    /// Converts every entry into a [`BeanDefinition`], in document order.
    pub fn into_definitions(self) -> Result<Vec<BeanDefinition>, ConfigError> {
        self.beans.into_iter().map(BeanSpec::into_definition).collect()
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn malformed(bean: &str, reason: String) -> ConfigError {
    ConfigError::MalformedValue {
        bean: bean.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVELOPER_YAML: &str = r#"
beans:
  - id: computer
    class: Computer
    destroy-method: shutdown
  - id: developer
    class: Developer
    scope: singleton
    constructor-args:
      - value: John Doe
    properties:
      - { name: age, value: 25 }
      - { name: remote, value: true }
      - { name: computer, ref: computer }
    init-method: start
    depends-on: [computer]
    aliases: [dev]
"#;

    #[test]
    fn yaml_document_maps_every_field() {
        let defs = BeanDocument::from_yaml_str(DEVELOPER_YAML)
            .unwrap()
            .into_definitions()
            .unwrap();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].destroy_hook.as_deref(), Some("shutdown"));

        let dev = &defs[1];
        assert_eq!(dev.type_ref, "Developer");
        assert_eq!(dev.constructor_args, vec![ArgValue::Literal("John Doe".into())]);
        assert_eq!(
            dev.properties,
            vec![
                ("age".to_string(), ArgValue::Literal("25".into())),
                ("remote".to_string(), ArgValue::Literal("true".into())),
                ("computer".to_string(), ArgValue::Ref("computer".into())),
            ]
        );
        assert_eq!(dev.init_hook.as_deref(), Some("start"));
        assert_eq!(dev.depends_on, vec!["computer"]);
        assert_eq!(dev.aliases, vec!["dev"]);
    }

    #[test]
    fn value_and_ref_are_exclusive() {
        let doc = BeanDocument::from_json_str(
            r#"{"beans":[{"id":"a","class":"A","properties":[{"name":"x","value":1,"ref":"b"}]}]}"#,
        )
        .unwrap();
        match doc.into_definitions() {
            Err(ConfigError::MalformedValue { bean, reason }) => {
                assert_eq!(bean, "a");
                assert!(reason.contains("both"));
            }
            other => panic!("expected malformed value, got {other:?}"),
        }
    }

    #[test]
    fn unknown_scope_is_a_parse_error() {
        let err = BeanDocument::from_json_str(r#"{"beans":[{"id":"a","class":"A","scope":"request"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn large_unsigned_values_keep_every_digit() {
        let doc = BeanDocument::from_json_str(
            r#"{"beans":[{"id":"a","class":"A","constructor-args":[{"value":18446744073709551615},{"value":-3}]}]}"#,
        )
        .unwrap();
        let defs = doc.into_definitions().unwrap();
        assert_eq!(
            defs[0].constructor_args,
            vec![
                ArgValue::Literal(u64::MAX.to_string()),
                ArgValue::Literal("-3".into())
            ]
        );
    }

    #[test]
    fn misspelled_keys_are_rejected() {
        let err = BeanDocument::from_yaml_str("beans:\n  - id: a\n    class: A\n    init_method: start\n")
            .unwrap_err();
        assert!(err.to_string().contains("init_method"), "{err}");

        let err = BeanDocument::from_json_str(r#"{"beans":[],"bean":[]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn type_is_accepted_for_class() {
        let doc = BeanDocument::from_json_str(r#"{"beans":[{"id":"a","type":"A"}]}"#).unwrap();
        assert_eq!(doc.beans[0].class, "A");
    }
}
