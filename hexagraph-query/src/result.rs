//! The result set and, for aggregated queries, the per-query group cache.

use crate::agg::{self, AggContext};
use crate::ast::{Expr, ReturnClause, ReturnElement};
use crate::rewrite;
use hexagraph_storage::value::Value;
use std::collections::HashMap;

/// Delimiter joining group-key values into the cache key. Not escaped;
/// colliding tuples collide, matching the observable index behaviour.
const GROUP_KEY_DELIMITER: &str = ",";

struct Group {
    keys: Vec<Value>,
    contexts: Vec<Box<dyn AggContext>>,
}

/// Group records in first-appearance order, with a cache-key index.
#[derive(Default)]
struct GroupCache {
    groups: Vec<Group>,
    index: HashMap<String, usize>,
}

pub struct ResultSet {
    pub columns: Vec<String>,
    pub aggregated: bool,
    records: Vec<Vec<Value>>,
    limit: Option<usize>,
    cache: GroupCache,
    /// Return elements split by role: group keys are the non-aggregating
    /// elements, aggregates carry their aggregation application.
    key_elements: Vec<ReturnElement>,
    agg_elements: Vec<(ReturnElement, String)>,
}

impl ResultSet {
    /// Builds an empty result set shaped by the (rewritten) return
    /// clause. Aggregated result sets order their columns group keys
    /// first, then aggregates, matching the materialised records.
    pub fn new(return_clause: Option<&ReturnClause>) -> ResultSet {
        let Some(return_clause) = return_clause else {
            return ResultSet {
                columns: Vec::new(),
                aggregated: false,
                records: Vec::new(),
                limit: None,
                cache: GroupCache::default(),
                key_elements: Vec::new(),
                agg_elements: Vec::new(),
            };
        };

        let aggregated = rewrite::returns_aggregation(return_clause);
        let mut key_elements = Vec::new();
        let mut agg_elements = Vec::new();
        if aggregated {
            for element in &return_clause.elements {
                match rewrite::aggregation_node(&element.exp) {
                    Some(Expr::Operation { func, .. }) => {
                        agg_elements.push((element.clone(), func.clone()));
                    }
                    _ => key_elements.push(element.clone()),
                }
            }
        }

        let columns = if aggregated {
            key_elements
                .iter()
                .chain(agg_elements.iter().map(|(e, _)| e))
                .map(column_name)
                .collect()
        } else {
            return_clause.elements.iter().map(column_name).collect()
        };

        ResultSet {
            columns,
            aggregated,
            records: Vec::new(),
            limit: return_clause.limit,
            cache: GroupCache::default(),
            key_elements,
            agg_elements,
        }
    }

    /// The capacity gate the executor polls: saturated result sets unwind
    /// the traversal. Aggregated queries cap at finalisation instead,
    /// since group records only materialise then.
    pub fn full(&self) -> bool {
        match self.limit {
            Some(limit) if !self.aggregated => self.records.len() >= limit,
            _ => false,
        }
    }

    pub fn add_record(&mut self, record: Vec<Value>) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Vec<Value>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Vec<Value>> {
        self.records
    }

    /// The non-aggregating elements, evaluated per assignment to locate
    /// the group.
    pub fn key_elements(&self) -> &[ReturnElement] {
        &self.key_elements
    }

    /// The aggregation application of each aggregating element, in
    /// element order.
    pub fn agg_expressions(&self) -> Vec<&Expr> {
        self.agg_elements
            .iter()
            .filter_map(|(element, _)| rewrite::aggregation_node(&element.exp))
            .collect()
    }

    /// Feeds one complete assignment into the group cache: the key tuple
    /// locates (or creates) the group, then each aggregation context
    /// steps with its value.
    pub fn aggregate(&mut self, keys: Vec<Value>, values: Vec<Value>) {
        let cache_key = keys
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(GROUP_KEY_DELIMITER);

        let group_idx = match self.cache.index.get(&cache_key) {
            Some(&idx) => idx,
            None => {
                let contexts = self
                    .agg_elements
                    .iter()
                    .filter_map(|(_, func)| agg::get(func))
                    .map(|factory| factory())
                    .collect();
                self.cache.groups.push(Group {
                    keys,
                    contexts,
                });
                let idx = self.cache.groups.len() - 1;
                self.cache.index.insert(cache_key, idx);
                idx
            }
        };

        let group = &mut self.cache.groups[group_idx];
        for (context, value) in group.contexts.iter_mut().zip(values.iter()) {
            context.step(value, 1);
        }
    }

    /// Materialises one record per group: the key values first, then each
    /// finalised aggregate. Applies the capacity limit and empties the
    /// cache; a no-op for non-aggregated queries.
    pub fn finalize(&mut self) {
        if !self.aggregated {
            return;
        }
        for group in self.cache.groups.drain(..) {
            let mut record = group.keys;
            record.extend(group.contexts.iter().map(|context| context.finalize()));
            self.records.push(record);
        }
        self.cache.index.clear();
        if let Some(limit) = self.limit {
            self.records.truncate(limit);
        }
    }
}

fn column_name(element: &ReturnElement) -> String {
    match &element.alias {
        Some(alias) => alias.clone(),
        None => element.exp.to_string(),
    }
}
