//! Binding node attributes to constructor parameters.

use crate::diagram::Node;
use crate::error::CompileError;
use crate::graph::BoundParam;
use crate::registry::BlockDescriptor;
use crate::script::Environment;

/// Binds every parameter of `descriptor` for `node`, in schema order.
///
/// An empty (or absent) attribute falls back to the schema default, which is
/// deep-copied so later mutation never leaks into the registry. A non-empty
/// attribute is evaluated as an expression and its raw text is kept for the
/// emitter. Bespoke parameters are bound elsewhere and skipped here.
pub(crate) fn bind_block(
    node: &Node,
    descriptor: &BlockDescriptor,
    env: &Environment,
) -> Result<Vec<BoundParam>, CompileError> {
    let mut params = Vec::with_capacity(descriptor.params.len());
    for spec in &descriptor.params {
        if spec.bespoke {
            continue;
        }
        let attr = node
            .attributes
            .get(spec.name)
            .map(String::as_str)
            .unwrap_or("");
        if attr.is_empty() {
            let default = spec.default.clone().ok_or_else(|| {
                CompileError::MissingRequiredParameter {
                    parameter: spec.name.to_string(),
                    type_tag: node.type_tag.clone(),
                    label: node.display_label().to_string(),
                }
            })?;
            params.push(BoundParam {
                name: spec.name.to_string(),
                value: default,
                raw: None,
            });
        } else {
            let value = env
                .evaluate(attr)
                .map_err(|err| CompileError::expression(spec.name, attr, err))?;
            params.push(BoundParam {
                name: spec.name.to_string(),
                value,
                raw: Some(attr.to_string()),
            });
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BlockRegistry;
    use crate::script::Value;
    use ahash::AHashMap;

    fn node(type_tag: &str, attrs: &[(&str, &str)]) -> Node {
        let mut attributes = AHashMap::new();
        for (k, v) in attrs {
            attributes.insert(k.to_string(), v.to_string());
        }
        Node {
            id: "n1".to_string(),
            type_tag: type_tag.to_string(),
            attributes,
        }
    }

    #[test]
    fn empty_attribute_falls_back_to_default() {
        let registry = BlockRegistry::standard();
        let env = Environment::with_builtins();
        let node = node("integrator", &[("initial_value", ""), ("reset_times", "")]);
        let descriptor = registry.lookup("integrator").unwrap();
        let params = bind_block(&node, descriptor, &env).unwrap();
        assert_eq!(params[0].value, Value::Number(0.0));
        assert_eq!(params[0].raw, None);
    }

    #[test]
    fn missing_required_parameter_is_an_error() {
        let registry = BlockRegistry::standard();
        let env = Environment::with_builtins();
        let node = node("amplifier", &[("label", "Amp"), ("gain", "")]);
        let descriptor = registry.lookup("amplifier").unwrap();
        let err = bind_block(&node, descriptor, &env).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingRequiredParameter { ref parameter, .. } if parameter == "gain"
        ));
    }

    #[test]
    fn expressions_see_the_environment() {
        let registry = BlockRegistry::standard();
        let mut env = Environment::with_builtins();
        env.define("k", Value::Number(3.0));
        let node = node("amplifier", &[("gain", "2 * k")]);
        let descriptor = registry.lookup("amplifier").unwrap();
        let params = bind_block(&node, descriptor, &env).unwrap();
        assert_eq!(params[0].value, Value::Number(6.0));
        assert_eq!(params[0].raw.as_deref(), Some("2 * k"));
    }

    #[test]
    fn bespoke_parameters_are_skipped() {
        let registry = BlockRegistry::standard();
        let env = Environment::with_builtins();
        let node = node("adder", &[]);
        let descriptor = registry.lookup("adder").unwrap();
        let params = bind_block(&node, descriptor, &env).unwrap();
        assert!(params.is_empty());
    }
}
