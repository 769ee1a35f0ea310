//! Collapsed returns end to end: a bare alias expands into one column
//! per registered property of its label.

use hexagraph::{GraphDb, Value};

fn seeded() -> GraphDb {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "knows", "bob").unwrap();
    db.set_node_property("g", "person", "alice", "name", Value::String("alice".into()))
        .unwrap();
    db.set_node_property("g", "person", "alice", "age", Value::Number(30.0))
        .unwrap();
    db.set_node_property("g", "person", "bob", "name", Value::String("bob".into()))
        .unwrap();
    db.set_node_property("g", "person", "bob", "age", Value::Number(25.0))
        .unwrap();
    db
}

#[test]
fn labelled_alias_expands_over_its_label_store() {
    let db = seeded();
    let result = db
        .query("g", "MATCH (a:person)-[:knows]->(b) RETURN a")
        .unwrap();
    assert_eq!(result.columns, vec!["a.age", "a.name"]);
    assert_eq!(
        result.rows,
        vec![vec![Value::Number(30.0), Value::String("alice".into())]]
    );
}

#[test]
fn unlabelled_alias_expands_over_the_union_of_node_stores() {
    let mut db = seeded();
    db.set_node_property("g", "city", "metropolis", "mayor", Value::String("carol".into()))
        .unwrap();

    let result = db
        .query("g", "MATCH (a)-[:knows]->(b) RETURN b")
        .unwrap();
    assert_eq!(result.columns, vec!["b.age", "b.mayor", "b.name"]);
    assert_eq!(
        result.rows,
        vec![vec![
            Value::Number(25.0),
            Value::Null,
            Value::String("bob".into()),
        ]]
    );
}

#[test]
fn edge_alias_expands_over_edge_stores_only() {
    let mut db = seeded();
    db.set_edge_property("g", "knows", "knows", "since", Value::Number(2020.0))
        .unwrap();

    let result = db
        .query("g", "MATCH (a)-[r:knows]->(b) RETURN r")
        .unwrap();
    assert_eq!(result.columns, vec!["r.since"]);
    assert_eq!(result.rows, vec![vec![Value::Number(2020.0)]]);
}

#[test]
fn unknown_alias_in_return_fails_the_query() {
    let db = seeded();
    let err = db.query("g", "MATCH (a)-[:knows]->(b) RETURN missing");
    let message = err.err().map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("unknown alias"), "{message}");
}
