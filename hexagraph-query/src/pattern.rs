//! The pattern graph: the in-memory graph a `MATCH` clause compiles to.

use crate::ast::{Entity, LinkDirection, MatchClause};
use crate::error::{Error, Result};
use hexagraph_storage::value::Value;
use std::collections::HashMap;

#[derive(Debug)]
pub struct PatternNode {
    pub alias: String,
    pub label: Option<String>,
    pub properties: Vec<(String, Value)>,
    pub outgoing: Vec<usize>,
    pub incoming: Vec<usize>,
}

#[derive(Debug)]
pub struct PatternEdge {
    pub alias: String,
    pub label: Option<String>,
    pub src: usize,
    pub dest: usize,
}

#[derive(Debug, Default)]
pub struct PatternGraph {
    pub nodes: Vec<PatternNode>,
    pub edges: Vec<PatternEdge>,
    node_index: HashMap<String, usize>,
    edge_index: HashMap<String, usize>,
}

impl PatternGraph {
    /// Two passes over the flat entity sequence: nodes first, then links
    /// connected through their immediate neighbours. Duplicate aliases
    /// are skipped; link direction selects which neighbour is source.
    pub fn build(match_clause: &MatchClause) -> Result<PatternGraph> {
        let entities = &match_clause.entities;
        let mut graph = PatternGraph::default();

        for entity in entities {
            let Entity::Node(node) = entity else {
                continue;
            };
            let alias = required_alias(entity)?;
            if graph.node_index.contains_key(alias) {
                continue;
            }
            graph.node_index.insert(alias.to_string(), graph.nodes.len());
            graph.nodes.push(PatternNode {
                alias: alias.to_string(),
                label: node.label.clone(),
                properties: node.properties.clone(),
                outgoing: Vec::new(),
                incoming: Vec::new(),
            });
        }

        for (i, entity) in entities.iter().enumerate() {
            let Entity::Link(link) = entity else {
                continue;
            };
            let alias = required_alias(entity)?;
            if graph.edge_index.contains_key(alias) {
                continue;
            }

            let (src_pos, dest_pos) = match link.direction {
                LinkDirection::LeftToRight => (i.checked_sub(1), Some(i + 1)),
                LinkDirection::RightToLeft => (Some(i + 1), i.checked_sub(1)),
            };
            let src = graph.neighbour_node(entities, src_pos)?;
            let dest = graph.neighbour_node(entities, dest_pos)?;

            let edge = graph.edges.len();
            graph.edge_index.insert(alias.to_string(), edge);
            graph.edges.push(PatternEdge {
                alias: alias.to_string(),
                label: link.label.clone(),
                src,
                dest,
            });
            graph.nodes[src].outgoing.push(edge);
            graph.nodes[dest].incoming.push(edge);
        }

        Ok(graph)
    }

    fn neighbour_node(&self, entities: &[Entity], pos: Option<usize>) -> Result<usize> {
        let entity = pos
            .and_then(|p| entities.get(p))
            .filter(|e| e.is_node())
            .ok_or_else(|| Error::Other("link is missing an endpoint node".to_string()))?;
        let alias = required_alias(entity)?;
        self.node_index
            .get(alias)
            .copied()
            .ok_or_else(|| Error::Other(format!("link endpoint {alias} is not in the pattern")))
    }

    pub fn node_by_alias(&self, alias: &str) -> Option<usize> {
        self.node_index.get(alias).copied()
    }

    /// Traversal roots: every node of in-degree 0. A pattern with none
    /// (a pure cycle) falls back to its first node so the component is
    /// still traversed.
    pub fn entry_points(&self) -> Vec<usize> {
        let mut roots: Vec<usize> = (0..self.nodes.len())
            .filter(|&n| self.nodes[n].incoming.is_empty())
            .collect();
        if roots.is_empty() && !self.nodes.is_empty() {
            roots.push(0);
        }
        roots
    }
}

fn required_alias(entity: &Entity) -> Result<&str> {
    entity
        .alias()
        .ok_or_else(|| Error::Other("entity has no alias; rewrites must run first".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::rewrite;

    fn pattern(query: &str) -> PatternGraph {
        let mut query = Parser::parse(query).unwrap();
        rewrite::name_anonymous_entities(&mut query);
        PatternGraph::build(&query.match_clause.unwrap()).unwrap()
    }

    #[test]
    fn direction_reverses_endpoints() {
        let graph = pattern("MATCH (a)-[r]->(b)");
        assert_eq!(graph.edges[0].src, graph.node_by_alias("a").unwrap());
        assert_eq!(graph.edges[0].dest, graph.node_by_alias("b").unwrap());

        let graph = pattern("MATCH (a)<-[r]-(b)");
        assert_eq!(graph.edges[0].src, graph.node_by_alias("b").unwrap());
        assert_eq!(graph.edges[0].dest, graph.node_by_alias("a").unwrap());
    }

    #[test]
    fn repeated_alias_folds_into_one_node() {
        let graph = pattern("MATCH (a)-[x]->(b)-[y]->(a)");
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn entry_points_are_in_degree_zero() {
        let graph = pattern("MATCH (a)-[x]->(b)-[y]->(c)");
        let roots = graph.entry_points();
        assert_eq!(roots, vec![graph.node_by_alias("a").unwrap()]);
    }

    #[test]
    fn pure_cycle_falls_back_to_first_node() {
        let graph = pattern("MATCH (a)-[x]->(b)-[y]->(a)");
        assert_eq!(graph.entry_points(), vec![0]);
    }

    #[test]
    fn disconnected_components_all_surface() {
        let graph = pattern("MATCH (a)-[x]->(b)-[y]->(c)"); // one component
        assert_eq!(graph.entry_points().len(), 1);

        let mut query = Parser::parse("MATCH (a)-[x]->(b)").unwrap();
        let mut other = Parser::parse("MATCH (c)-[y]->(d)").unwrap();
        let mut entities = query.match_clause.take().unwrap().entities;
        entities.extend(other.match_clause.take().unwrap().entities);
        let mut merged = crate::ast::Query {
            match_clause: Some(crate::ast::MatchClause { entities }),
            ..Default::default()
        };
        rewrite::name_anonymous_entities(&mut merged);
        let graph = PatternGraph::build(&merged.match_clause.unwrap()).unwrap();
        assert_eq!(graph.entry_points().len(), 2);
    }
}
