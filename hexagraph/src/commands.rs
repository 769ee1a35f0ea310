//! The textual command surface.
//!
//! Each command replies with one integer or a result set; fixed-arity
//! violations and unknown commands reply with errors before any state
//! changes.

use crate::error::{Error, Result};
use crate::{GraphDb, QueryResult, Value};

#[derive(Debug)]
pub enum Reply {
    Integer(i64),
    Rows(QueryResult),
}

/// Dispatches one command: `ADDEDGE graph s p o`, `REMOVEEDGE graph s p
/// o`, `DELETE graph`, `SETPROP graph node|edge label id key value`,
/// `QUERY graph q`. Command names are case-insensitive.
pub fn dispatch(db: &mut GraphDb, argv: &[&str]) -> Result<Reply> {
    let Some(command) = argv.first() else {
        return Err(Error::UnknownCommand(String::new()));
    };

    match command.to_ascii_uppercase().as_str() {
        "ADDEDGE" => {
            let [_, graph, subject, predicate, object] = argv else {
                return Err(Error::WrongArity("ADDEDGE"));
            };
            let cardinality = db.add_edge(graph, subject, predicate, object)?;
            Ok(Reply::Integer(cardinality as i64))
        }
        "REMOVEEDGE" => {
            let [_, graph, subject, predicate, object] = argv else {
                return Err(Error::WrongArity("REMOVEEDGE"));
            };
            let removed = db.remove_edge(graph, subject, predicate, object);
            Ok(Reply::Integer(removed as i64))
        }
        "DELETE" => {
            let [_, graph] = argv else {
                return Err(Error::WrongArity("DELETE"));
            };
            Ok(Reply::Integer(db.delete_graph(graph) as i64))
        }
        "SETPROP" => {
            let [_, graph, kind, label, id, key, value] = argv else {
                return Err(Error::WrongArity("SETPROP"));
            };
            let value = Value::parse(value);
            match *kind {
                "node" => db.set_node_property(graph, label, id, key, value)?,
                "edge" => db.set_edge_property(graph, label, id, key, value)?,
                other => {
                    return Err(Error::Query(format!(
                        "expected 'node' or 'edge', got '{other}'"
                    )));
                }
            }
            Ok(Reply::Integer(1))
        }
        "QUERY" => {
            let [_, graph, text] = argv else {
                return Err(Error::WrongArity("QUERY"));
            };
            Ok(Reply::Rows(db.query(graph, text)?))
        }
        other => Err(Error::UnknownCommand(other.to_string())),
    }
}
