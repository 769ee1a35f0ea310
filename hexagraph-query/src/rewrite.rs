//! AST normalisation passes run between parsing and compilation:
//! anonymous-entity naming, inline-property lifting, collapsed-return
//! expansion, and aggregation classification.

use crate::agg;
use crate::ast::*;
use crate::error::{Error, Result};
use hexagraph_storage::label_store::{EntityKind, LabelStores};
use std::collections::BTreeSet;

/// Runs every pass in order. Expansion needs the label stores, so the
/// caller hands in the registry of the graph being queried.
pub fn normalize(query: &mut Query, stores: &LabelStores, graph: &str) -> Result<()> {
    name_anonymous_entities(query);
    lift_inline_properties(query);
    expand_collapsed_returns(query, stores, graph)
}

/// Assigns `anon_<n>` to every unnamed entity, numbering across the
/// match then create clauses.
pub fn name_anonymous_entities(query: &mut Query) {
    let mut next_id = 0usize;
    let clauses = [
        query.match_clause.as_mut().map(|c| &mut c.entities),
        query.create_clause.as_mut().map(|c| &mut c.entities),
    ];
    for entities in clauses.into_iter().flatten() {
        for entity in entities.iter_mut() {
            if entity.alias().is_none() {
                entity.set_alias(format!("anon_{next_id}"));
                next_id += 1;
            }
        }
    }
}

/// Migrates inline `{k: v}` maps on match entities into the `WHERE`
/// clause as equality predicates, in entity then property order. The
/// existing filter root becomes the left child of each fresh `AND`.
pub fn lift_inline_properties(query: &mut Query) {
    let Some(match_clause) = &query.match_clause else {
        return;
    };

    for entity in &match_clause.entities {
        let Some(alias) = entity.alias() else {
            continue;
        };
        for (key, value) in entity.properties() {
            let predicate = FilterExpr::ConstPredicate {
                lhs: EntityRef {
                    alias: alias.to_string(),
                    property: Some(key.clone()),
                },
                op: CompareOp::Eq,
                value: value.clone(),
            };
            query.where_clause = Some(match query.where_clause.take() {
                None => WhereClause { filter: predicate },
                Some(existing) => WhereClause {
                    filter: FilterExpr::Cond {
                        left: Box::new(existing.filter),
                        op: CondOp::And,
                        right: Box::new(predicate),
                    },
                },
            });
        }
    }
}

/// Replaces each collapsed return element (a bare alias) with one
/// element per known property of that alias's label. An unlabelled
/// entity expands over the union of every same-kind registry. An alias
/// with no registered properties stays collapsed and projects the bound
/// id; an alias missing from the match clause is a hard error.
pub fn expand_collapsed_returns(
    query: &mut Query,
    stores: &LabelStores,
    graph: &str,
) -> Result<()> {
    let Some(return_clause) = &mut query.return_clause else {
        return Ok(());
    };

    let mut expanded = Vec::with_capacity(return_clause.elements.len());
    for element in return_clause.elements.drain(..) {
        let Some(alias) = element.exp.collapsed_alias() else {
            expanded.push(element);
            continue;
        };

        let entity = query
            .match_clause
            .as_ref()
            .and_then(|m| m.entities.iter().find(|e| e.alias() == Some(alias)))
            .ok_or_else(|| Error::UnknownAlias(alias.to_string()))?;
        let kind = if entity.is_node() {
            EntityKind::Node
        } else {
            EntityKind::Edge
        };

        let properties: Vec<String> = match entity.label() {
            Some(label) => stores
                .get(graph, kind, label)
                .map(|store| store.properties().map(str::to_string).collect())
                .unwrap_or_default(),
            None => stores
                .all(graph, kind)
                .flat_map(|store| store.properties())
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };

        if properties.is_empty() {
            expanded.push(element);
            continue;
        }

        let alias = alias.to_string();
        for property in properties {
            expanded.push(ReturnElement {
                exp: Expr::Operand(Operand::Variadic {
                    alias: alias.clone(),
                    property: Some(property),
                }),
                alias: element.alias.clone(),
            });
        }
    }
    return_clause.elements = expanded;
    Ok(())
}

/// True iff any return expression, recursively, applies a function
/// registered in the aggregation registry. Evaluated once per query and
/// recorded on the result set.
pub fn returns_aggregation(return_clause: &ReturnClause) -> bool {
    return_clause
        .elements
        .iter()
        .any(|element| contains_aggregation(&element.exp))
}

pub fn contains_aggregation(exp: &Expr) -> bool {
    match exp {
        Expr::Operand(_) => false,
        Expr::Operation { func, args } => {
            agg::is_aggregation(func) || args.iter().any(contains_aggregation)
        }
    }
}

/// The aggregation application a return element steps its group context
/// with; `None` for a purely scalar element.
pub fn aggregation_node(exp: &Expr) -> Option<&Expr> {
    match exp {
        Expr::Operand(_) => None,
        Expr::Operation { func, args } => {
            if agg::is_aggregation(func) {
                Some(exp)
            } else {
                args.iter().find_map(aggregation_node)
            }
        }
    }
}
