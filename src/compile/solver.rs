//! Solver parameter resolution.
//!
//! Two entries are reserved: `duration` (required, evaluated to a number and
//! returned separately) and `extra` (optional, evaluated to a map merged
//! into the engine's keyword arguments). `solver` must name a known solver
//! and `log` must be the literal `true` or `false`. Everything else is
//! evaluated as an expression under its own name.

use crate::error::CompileError;
use crate::graph::{BoundParam, SolverSettings};
use crate::registry::SOLVER_NAMES;
use crate::script::{Environment, Value};
use ahash::AHashMap;
use itertools::Itertools;

pub(crate) fn resolve(
    parameters: &AHashMap<String, String>,
    env: &Environment,
) -> Result<(SolverSettings, f64), CompileError> {
    let mut settings = SolverSettings::default();
    let mut duration = None;

    // Sorted for a deterministic evaluation and emission order.
    for (key, text) in parameters.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        match key.as_str() {
            "duration" => {
                let value = env
                    .evaluate(text)
                    .map_err(|err| CompileError::expression(key, text, err))?;
                duration = Some(value.as_number().ok_or_else(|| {
                    CompileError::ExpressionEvaluation {
                        name: key.clone(),
                        expression: text.clone(),
                        message: format!("expected a number, found {}", value.type_name()),
                    }
                })?);
            }
            "extra" => {
                if text.is_empty() {
                    continue;
                }
                let value = env
                    .evaluate(text)
                    .map_err(|err| CompileError::expression(key, text, err))?;
                match value {
                    Value::Map(entries) => {
                        settings.extra = entries;
                        settings.extra_raw = Some(text.clone());
                    }
                    other => {
                        return Err(CompileError::ExpressionEvaluation {
                            name: key.clone(),
                            expression: text.clone(),
                            message: format!("expected a map, found {}", other.type_name()),
                        });
                    }
                }
            }
            "solver" => {
                if !SOLVER_NAMES.contains(&text.as_str()) {
                    return Err(CompileError::ExpressionEvaluation {
                        name: key.clone(),
                        expression: text.clone(),
                        message: format!("unknown solver, expected one of {SOLVER_NAMES:?}"),
                    });
                }
                settings.solver = text.clone();
            }
            "log" => {
                settings.log = match text.as_str() {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(CompileError::ExpressionEvaluation {
                            name: key.clone(),
                            expression: other.to_string(),
                            message: "must be 'true' or 'false'".to_string(),
                        });
                    }
                };
            }
            _ => {
                let value = env
                    .evaluate(text)
                    .map_err(|err| CompileError::expression(key, text, err))?;
                settings.params.push(BoundParam {
                    name: key.clone(),
                    value,
                    raw: Some(text.clone()),
                });
            }
        }
    }

    let duration = duration.ok_or_else(|| CompileError::MissingRequiredParameter {
        parameter: "duration".to_string(),
        type_tag: "solver".to_string(),
        label: "solver parameters".to_string(),
    })?;
    Ok((settings, duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> AHashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn duration_is_required_and_popped() {
        let env = Environment::with_builtins();
        let (settings, duration) =
            resolve(&params(&[("duration", "10 * 2"), ("dt", "0.1")]), &env).unwrap();
        assert_eq!(duration, 20.0);
        assert_eq!(settings.params.len(), 1);
        assert_eq!(settings.params[0].name, "dt");
        assert!(matches!(
            resolve(&params(&[("dt", "0.1")]), &env),
            Err(CompileError::MissingRequiredParameter { ref parameter, .. })
                if parameter == "duration"
        ));
    }

    #[test]
    fn solver_name_is_validated() {
        let env = Environment::with_builtins();
        let (settings, _) = resolve(
            &params(&[("duration", "1"), ("solver", "RKF21")]),
            &env,
        )
        .unwrap();
        assert_eq!(settings.solver, "RKF21");
        assert!(resolve(&params(&[("duration", "1"), ("solver", "Euler")]), &env).is_err());
    }

    #[test]
    fn log_must_be_a_boolean_literal() {
        let env = Environment::with_builtins();
        let (settings, _) =
            resolve(&params(&[("duration", "1"), ("log", "true")]), &env).unwrap();
        assert!(settings.log);
        assert!(resolve(&params(&[("duration", "1"), ("log", "yes")]), &env).is_err());
    }

    #[test]
    fn extra_must_evaluate_to_a_map() {
        let env = Environment::with_builtins();
        let (settings, _) = resolve(
            &params(&[("duration", "1"), ("extra", "{\"tolerance_lte_abs\": 1e-6}")]),
            &env,
        )
        .unwrap();
        assert_eq!(settings.extra.len(), 1);
        assert!(resolve(&params(&[("duration", "1"), ("extra", "[1]")]), &env).is_err());
    }
}
