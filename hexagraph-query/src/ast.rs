use hexagraph_storage::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed query: up to five clauses. `CREATE` and `DELETE` are carried
/// through the rewrites but the executor only consumes the match path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Query {
    pub match_clause: Option<MatchClause>,
    pub where_clause: Option<WhereClause>,
    pub create_clause: Option<CreateClause>,
    pub delete_clause: Option<DeleteClause>,
    pub return_clause: Option<ReturnClause>,
}

/// The flat alternating node/link entity sequence the parser produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchClause {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateClause {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteClause {
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhereClause {
    pub filter: FilterExpr,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnClause {
    pub elements: Vec<ReturnElement>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnElement {
    pub exp: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Entity {
    Node(NodeEntity),
    Link(LinkEntity),
}

impl Entity {
    pub fn alias(&self) -> Option<&str> {
        match self {
            Entity::Node(n) => n.alias.as_deref(),
            Entity::Link(l) => l.alias.as_deref(),
        }
    }

    pub fn set_alias(&mut self, alias: String) {
        match self {
            Entity::Node(n) => n.alias = Some(alias),
            Entity::Link(l) => l.alias = Some(alias),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Entity::Node(n) => n.label.as_deref(),
            Entity::Link(l) => l.label.as_deref(),
        }
    }

    pub fn properties(&self) -> &[(String, Value)] {
        match self {
            Entity::Node(n) => &n.properties,
            Entity::Link(l) => &l.properties,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Entity::Node(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeEntity {
    pub alias: Option<String>,
    pub label: Option<String>,
    pub properties: Vec<(String, Value)>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LinkDirection {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkEntity {
    pub alias: Option<String>,
    pub label: Option<String>,
    pub direction: LinkDirection,
    pub properties: Vec<(String, Value)>,
}

/// An arithmetic expression: an operand, or a named function applied to
/// child expressions. Binary `+ - * /` parse into the scalar functions
/// `add`/`sub`/`mul`/`div`; aggregation functions keep their call name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Expr {
    Operand(Operand),
    Operation { func: String, args: Vec<Expr> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Operand {
    Const(Value),
    /// `alias` or `alias.property`.
    Variadic {
        alias: String,
        property: Option<String>,
    },
}

impl Expr {
    /// A collapsed entity: a bare variadic operand with no property.
    pub fn collapsed_alias(&self) -> Option<&str> {
        match self {
            Expr::Operand(Operand::Variadic {
                alias,
                property: None,
            }) => Some(alias),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Operand(Operand::Const(v)) => write!(f, "{v}"),
            Expr::Operand(Operand::Variadic { alias, property }) => match property {
                Some(p) => write!(f, "{alias}.{p}"),
                None => write!(f, "{alias}"),
            },
            Expr::Operation { func, args } => {
                write!(f, "{func}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A reference to a pattern entity or one of its properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityRef {
    pub alias: String,
    pub property: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// The mirrored operator, for normalising `const op ref` predicates.
    pub fn flip(self) -> CompareOp {
        match self {
            CompareOp::Eq => CompareOp::Eq,
            CompareOp::Ne => CompareOp::Ne,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CondOp {
    And,
    Or,
}

/// The where-clause predicate tree as parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FilterExpr {
    /// `alias[.property] <op> constant`
    ConstPredicate {
        lhs: EntityRef,
        op: CompareOp,
        value: Value,
    },
    /// `alias[.property] <op> alias[.property]`
    RefPredicate {
        lhs: EntityRef,
        op: CompareOp,
        rhs: EntityRef,
    },
    Cond {
        left: Box<FilterExpr>,
        op: CondOp,
        right: Box<FilterExpr>,
    },
}
