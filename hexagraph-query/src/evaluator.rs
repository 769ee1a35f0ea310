//! Arithmetic-expression evaluation against the current bindings.

use crate::agg;
use crate::ast::{EntityRef, Expr, Operand};
use crate::executor::Bindings;
use hexagraph_storage::keyspace::Keyspace;
use hexagraph_storage::value::Value;

/// Resolves a reference: a bare alias reads its bound id, `alias.prop`
/// reads the field of the record named by the bound id. Unbound aliases
/// and missing fields resolve to `Null`.
pub fn resolve(entity_ref: &EntityRef, bindings: &Bindings, keyspace: &Keyspace) -> Value {
    let Some(id) = bindings.get(&entity_ref.alias) else {
        return Value::Null;
    };
    match &entity_ref.property {
        None => Value::String(id.clone()),
        Some(property) => keyspace
            .record_field(id, property)
            .cloned()
            .unwrap_or(Value::Null),
    }
}

/// Evaluates a scalar expression. Aggregation applications are stepped by
/// the group cache during traversal, never evaluated here; encountering
/// one (or an unregistered function) yields `Null`.
pub fn evaluate(exp: &Expr, bindings: &Bindings, keyspace: &Keyspace) -> Value {
    match exp {
        Expr::Operand(Operand::Const(value)) => value.clone(),
        Expr::Operand(Operand::Variadic { alias, property }) => resolve(
            &EntityRef {
                alias: alias.clone(),
                property: property.clone(),
            },
            bindings,
            keyspace,
        ),
        Expr::Operation { func, args } => {
            let values: Vec<Value> = args
                .iter()
                .map(|arg| evaluate(arg, bindings, keyspace))
                .collect();
            apply_scalar(func, &values)
        }
    }
}

fn apply_scalar(func: &str, args: &[Value]) -> Value {
    let binary = |f: fn(f64, f64) -> Option<f64>| -> Value {
        let (Some(l), Some(r)) = (
            args.first().and_then(Value::as_number),
            args.get(1).and_then(Value::as_number),
        ) else {
            return Value::Null;
        };
        f(l, r).map(Value::Number).unwrap_or(Value::Null)
    };

    match func.to_lowercase().as_str() {
        "add" => binary(|l, r| Some(l + r)),
        "sub" => binary(|l, r| Some(l - r)),
        "mul" => binary(|l, r| Some(l * r)),
        "div" => binary(|l, r| if r == 0.0 { None } else { Some(l / r) }),
        other => {
            if !agg::is_aggregation(other) {
                tracing::debug!(func = other, "unknown scalar function");
            }
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn return_exp(query: &str) -> Expr {
        Parser::parse(query)
            .unwrap()
            .return_clause
            .unwrap()
            .elements
            .remove(0)
            .exp
    }

    #[test]
    fn arithmetic_folds_numerically() {
        let keyspace = Keyspace::new();
        let bindings = Bindings::new();
        let exp = return_exp("RETURN 1 + 2 * 3");
        assert_eq!(evaluate(&exp, &bindings, &keyspace), Value::Number(7.0));
    }

    #[test]
    fn bare_alias_reads_the_bound_id() {
        let keyspace = Keyspace::new();
        let mut bindings = Bindings::new();
        bindings.insert("a".to_string(), "alice".to_string());
        let exp = return_exp("RETURN a");
        assert_eq!(
            evaluate(&exp, &bindings, &keyspace),
            Value::String("alice".to_string())
        );
    }

    #[test]
    fn property_reads_go_through_the_record() {
        let mut keyspace = Keyspace::new();
        keyspace
            .record_mut("alice")
            .unwrap()
            .set("age".to_string(), Value::Number(30.0));
        let mut bindings = Bindings::new();
        bindings.insert("a".to_string(), "alice".to_string());

        let exp = return_exp("RETURN a.age");
        assert_eq!(evaluate(&exp, &bindings, &keyspace), Value::Number(30.0));

        let exp = return_exp("RETURN a.missing");
        assert_eq!(evaluate(&exp, &bindings, &keyspace), Value::Null);
    }

    #[test]
    fn division_by_zero_is_null() {
        let keyspace = Keyspace::new();
        let bindings = Bindings::new();
        let exp = return_exp("RETURN 1 / 0");
        assert_eq!(evaluate(&exp, &bindings, &keyspace), Value::Null);
    }
}
