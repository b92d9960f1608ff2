use std::{cell::RefCell, fmt, rc::Rc};

/// The parsed form of a read-only query: MATCH clauses followed by an
/// optional query-level WHERE, RETURN, ORDER BY and pagination.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CypherQueryAst<'a> {
    pub match_clauses: Vec<MatchClause<'a>>,
    pub where_clause: Option<WhereClause<'a>>,
    pub return_clause: Option<ReturnClause<'a>>,
    pub order_by_clause: Option<OrderByClause<'a>>,
    pub skip_clause: Option<SkipClause>,
    pub limit_clause: Option<LimitClause>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MatchClause<'a> {
    pub path_patterns: Vec<PathPattern<'a>>,
    /// WHERE attached directly to this MATCH, per the OpenCypher grammar.
    pub where_clause: Option<WhereClause<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct WhereClause<'a> {
    pub conditions: Expression<'a>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReturnClause<'a> {
    pub distinct: bool,
    pub return_items: Vec<ReturnItem<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReturnItem<'a> {
    pub expression: Expression<'a>,
    pub alias: Option<&'a str>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct OrderByClause<'a> {
    pub order_by_items: Vec<OrderByItem<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct OrderByItem<'a> {
    pub expression: Expression<'a>,
    pub order: SortOrder,
}

#[derive(Debug, PartialEq, Clone)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SkipClause {
    pub skip_item: i64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct LimitClause {
    pub limit_item: i64,
}

#[derive(Debug, PartialEq, Clone)]
pub enum PathPattern<'a> {
    /// Standalone node, e.g. `(a:Person)`
    Node(NodePattern<'a>),
    /// Nodes joined by relationships, e.g. `(a)-[:KNOWS]->(b)<-[:KNOWS]-(c)`
    ConnectedPattern(Vec<ConnectedPattern<'a>>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct NodePattern<'a> {
    /// `a` in `(a:Person)`; None for anonymous nodes
    pub name: Option<&'a str>,
    /// `Person` in `(a:Person)`, or the alternatives in `(a:Person|Admin)`
    pub labels: Option<Vec<&'a str>>,
    /// inline map, e.g. `{name: 'Alice'}`
    pub properties: Option<Vec<Property<'a>>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Property<'a> {
    PropertyKV(PropertyKVPair<'a>),
    Param(&'a str),
}

#[derive(Debug, PartialEq, Clone)]
pub struct PropertyKVPair<'a> {
    pub key: &'a str,
    pub value: Expression<'a>,
}

/// Consecutive hops share their node endpoints, so `(a)-[r1]->(b)-[r2]->(c)`
/// holds `b` once behind an `Rc`.
#[derive(Debug, PartialEq, Clone)]
pub struct ConnectedPattern<'a> {
    pub start_node: Rc<RefCell<NodePattern<'a>>>,
    pub relationship: RelationshipPattern<'a>,
    pub end_node: Rc<RefCell<NodePattern<'a>>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RelationshipPattern<'a> {
    pub name: Option<&'a str>,
    pub direction: Direction,
    /// `KNOWS` in `[:KNOWS]`, or the alternatives in `[:KNOWS|BLOCKS]`
    pub types: Option<Vec<&'a str>>,
    pub properties: Option<Vec<Property<'a>>>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    /// `<-[..]-`
    Incoming,
    /// `-[..]->`
    Outgoing,
    /// `-[..]-`
    Either,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal<'a> {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(&'a str),
    Null,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    // binary
    Addition,         // +
    Subtraction,      // -
    Multiplication,   // *
    Division,         // /
    ModuloDivision,   // %
    Equal,            // =
    NotEqual,         // <>
    LessThan,         // <
    GreaterThan,      // >
    LessThanEqual,    // <=
    GreaterThanEqual, // >=
    And,
    Or,
    In,
    NotIn,
    // string predicates
    StartsWith,
    EndsWith,
    Contains,
    // unary
    Not,
    // postfix
    IsNull,
    IsNotNull,
}

impl Operator {
    /// Operators whose operands are compared for value equality/ordering.
    /// These are the sites the type checker inspects.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::LessThan
                | Operator::GreaterThan
                | Operator::LessThanEqual
                | Operator::GreaterThanEqual
        )
    }
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Addition => "+".to_string(),
            Operator::Subtraction => "-".to_string(),
            Operator::Multiplication => "*".to_string(),
            Operator::Division => "/".to_string(),
            Operator::ModuloDivision => "%".to_string(),
            Operator::Equal => "=".to_string(),
            Operator::NotEqual => "<>".to_string(),
            Operator::LessThan => "<".to_string(),
            Operator::GreaterThan => ">".to_string(),
            Operator::LessThanEqual => "<=".to_string(),
            Operator::GreaterThanEqual => ">=".to_string(),
            Operator::And => "AND".to_string(),
            Operator::Or => "OR".to_string(),
            Operator::In => "IN".to_string(),
            Operator::NotIn => "NOT IN".to_string(),
            Operator::StartsWith => "STARTS WITH".to_string(),
            Operator::EndsWith => "ENDS WITH".to_string(),
            Operator::Contains => "CONTAINS".to_string(),
            Operator::Not => "NOT".to_string(),
            Operator::IsNull => "IS NULL".to_string(),
            Operator::IsNotNull => "IS NOT NULL".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct OperatorApplication<'a> {
    pub operator: Operator,
    pub operands: Vec<Expression<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PropertyAccess<'a> {
    pub base: &'a str,
    pub key: &'a str,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionCall<'a> {
    pub name: &'a str,
    pub args: Vec<Expression<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression<'a> {
    /// A literal, such as a number, string, boolean, or null.
    Literal(Literal<'a>),

    /// A variable, e.g. `n`.
    Variable(&'a str),

    /// A parameter, such as `$param`.
    Parameter(&'a str),

    /// A list literal: a vector of expressions.
    List(Vec<Expression<'a>>),

    /// A function call, e.g. `date('2024-01-01')`. Parsed but never evaluated.
    FunctionCallExp(FunctionCall<'a>),

    /// Static property access, e.g. `n.name`.
    PropertyAccessExp(PropertyAccess<'a>),

    /// An operator application, e.g. `a.age > 30` or `x AND y`.
    OperatorApplicationExp(OperatorApplication<'a>),
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
