//! # Hexagraph
//!
//! An in-memory property-graph engine. Edges live in a hexastore: six
//! lexicographic permutations of every `(subject, predicate, object)`
//! triple, held in a sorted-string set per graph, so any partially-bound
//! edge pattern becomes one prefix-bounded range scan. Queries are a
//! restricted Cypher subset answered by a recursive pattern-matching
//! traversal.
//!
//! ## Quickstart
//!
//! ```
//! use hexagraph::GraphDb;
//!
//! let mut db = GraphDb::new();
//! db.add_edge("g", "alice", "knows", "bob").unwrap();
//!
//! let result = db
//!     .query("g", "MATCH (a)-[:knows]->(b) RETURN a, b")
//!     .unwrap();
//! assert_eq!(result.rows.len(), 1);
//! ```
//!
//! ## Core concepts
//!
//! - **[`GraphDb`]**: the engine handle. Owns the keyspace (sorted sets
//!   and property records) and the per-label property registries.
//! - **Graphs** are named; each owns one sorted set of index keys.
//! - **Properties** attach to entity ids through [`GraphDb::set_node_property`]
//!   / [`GraphDb::set_edge_property`] and feed filters, projections, and
//!   collapsed-return expansion.
//! - **[`commands`]**: the textual command surface (`ADDEDGE`,
//!   `REMOVEEDGE`, `DELETE`, `SETPROP`, `QUERY`).

mod error;

pub mod commands;

use hexagraph_query::filter::FilterTree;
use hexagraph_query::pattern::PatternGraph;
use hexagraph_query::{executor, rewrite};
use hexagraph_storage::hexastore;
use hexagraph_storage::keyspace::{KeyType, Keyspace};
use hexagraph_storage::label_store::{EntityKind, LabelStores};
use hexagraph_storage::triplet::Triplet;
use std::time::Instant;
use tracing::debug;

pub use error::{Error, Result};
pub use hexagraph_query as query;
pub use hexagraph_storage::value::Value;

/// One executed query: column names, records, and the execution time
/// reported in the trailer row.
#[derive(Debug)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub elapsed_ms: f64,
}

impl QueryResult {
    /// The trailer row appended after the records.
    pub fn trailer(&self) -> String {
        format!(
            "Query internal execution time: {:.6} milliseconds",
            self.elapsed_ms
        )
    }
}

/// The engine handle. Commands execute synchronously, one at a time;
/// every per-query structure (AST, pattern graph, filter tree, result
/// set, group cache) is created and dropped inside [`GraphDb::query`].
#[derive(Debug, Default)]
pub struct GraphDb {
    keyspace: Keyspace,
    labels: LabelStores,
}

impl GraphDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the six permutation keys of `(subject, predicate, object)`
    /// into the graph's sorted set and returns the new cardinality.
    /// Re-inserting an existing edge leaves the cardinality unchanged.
    pub fn add_edge(
        &mut self,
        graph: &str,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<usize> {
        let triplet = Triplet::new(subject, predicate, object);
        Ok(hexastore::insert_edge(&mut self.keyspace, graph, &triplet)?)
    }

    /// Removes the six permutation keys of the edge, returning how many
    /// were present (0..=6). A missing graph removes nothing.
    pub fn remove_edge(
        &mut self,
        graph: &str,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> usize {
        let triplet = Triplet::new(subject, predicate, object);
        hexastore::remove_edge(&mut self.keyspace, graph, &triplet)
    }

    /// Deletes the graph's index key; true iff it existed as a sorted set.
    pub fn delete_graph(&mut self, graph: &str) -> bool {
        if self.keyspace.key_type(graph) != Some(KeyType::SortedSet) {
            return false;
        }
        self.keyspace.delete(graph)
    }

    /// Sets a property on the record named by a node id and registers
    /// the property name under the node's label for collapsed-return
    /// expansion.
    pub fn set_node_property(
        &mut self,
        graph: &str,
        label: &str,
        id: &str,
        key: &str,
        value: Value,
    ) -> Result<()> {
        self.set_property(graph, EntityKind::Node, label, id, key, value)
    }

    /// Sets a property on the record named by an edge id (its predicate),
    /// registering under the edge label.
    pub fn set_edge_property(
        &mut self,
        graph: &str,
        label: &str,
        id: &str,
        key: &str,
        value: Value,
    ) -> Result<()> {
        self.set_property(graph, EntityKind::Edge, label, id, key, value)
    }

    fn set_property(
        &mut self,
        graph: &str,
        kind: EntityKind,
        label: &str,
        id: &str,
        key: &str,
        value: Value,
    ) -> Result<()> {
        let record = self.keyspace.record_mut(id)?;
        record.set(key.to_string(), value);
        self.labels.register(graph, kind, label, key);
        Ok(())
    }

    /// Compiles and runs a query against the named graph.
    ///
    /// Parsing and rewriting happen before any index access; a missing
    /// graph executes as an empty index and yields zero rows.
    pub fn query(&self, graph: &str, text: &str) -> Result<QueryResult> {
        let started = Instant::now();

        let mut query = hexagraph_query::parse(text)?;
        rewrite::normalize(&mut query, &self.labels, graph)?;
        if query.create_clause.is_some() || query.delete_clause.is_some() {
            debug!(graph, "CREATE/DELETE clauses parse but are not executed");
        }

        let pattern = match &query.match_clause {
            Some(match_clause) => PatternGraph::build(match_clause)?,
            None => PatternGraph::default(),
        };
        let filter = query.where_clause.as_ref().map(FilterTree::build);
        debug!(
            graph,
            nodes = pattern.nodes.len(),
            edges = pattern.edges.len(),
            filtered = filter.is_some(),
            "executing pattern"
        );

        let mut results = executor::execute(
            &self.keyspace,
            graph,
            &pattern,
            filter.as_ref(),
            query.return_clause.as_ref(),
        );

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        debug!(graph, rows = results.records().len(), elapsed_ms, "query done");
        Ok(QueryResult {
            columns: std::mem::take(&mut results.columns),
            rows: results.into_records(),
            elapsed_ms,
        })
    }
}
