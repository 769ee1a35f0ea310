use crate::ast::*;
use crate::error::Error;
use crate::lexer::{Lexer, Token, TokenType};
use hexagraph_storage::value::Value;

pub struct Parser;

impl Parser {
    pub fn parse(input: &str) -> Result<Query, Error> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().map_err(Error::Parse)?;
        let mut parser = TokenParser::new(tokens);
        parser.parse_query()
    }
}

struct TokenParser {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenParser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn parse_query(&mut self) -> Result<Query, Error> {
        let mut query = Query::default();

        while !self.is_at_end() {
            if self.match_token(&TokenType::Match) {
                if query.match_clause.is_some() {
                    return Err(self.error_here("duplicate MATCH clause"));
                }
                query.match_clause = Some(MatchClause {
                    entities: self.parse_pattern()?,
                });
            } else if self.match_token(&TokenType::Where) {
                if query.where_clause.is_some() {
                    return Err(self.error_here("duplicate WHERE clause"));
                }
                query.where_clause = Some(WhereClause {
                    filter: self.parse_filter()?,
                });
            } else if self.match_token(&TokenType::Create) {
                if query.create_clause.is_some() {
                    return Err(self.error_here("duplicate CREATE clause"));
                }
                query.create_clause = Some(CreateClause {
                    entities: self.parse_pattern()?,
                });
            } else if self.match_token(&TokenType::Delete) {
                if query.delete_clause.is_some() {
                    return Err(self.error_here("duplicate DELETE clause"));
                }
                query.delete_clause = Some(self.parse_delete()?);
            } else if self.match_token(&TokenType::Return) {
                if query.return_clause.is_some() {
                    return Err(self.error_here("duplicate RETURN clause"));
                }
                query.return_clause = Some(self.parse_return()?);
            } else {
                return Err(self.error_here("expected MATCH, WHERE, CREATE, DELETE or RETURN"));
            }
        }

        Ok(query)
    }

    /// `(a:L {k: v})-[r:T]->(b)` as a flat alternating entity sequence.
    fn parse_pattern(&mut self) -> Result<Vec<Entity>, Error> {
        let mut entities = Vec::new();
        entities.push(Entity::Node(self.parse_node()?));

        loop {
            if self.check(&TokenType::Dash) || self.check(&TokenType::LeftArrow) {
                entities.push(Entity::Link(self.parse_link()?));
                entities.push(Entity::Node(self.parse_node()?));
            } else {
                break;
            }
        }

        Ok(entities)
    }

    fn parse_node(&mut self) -> Result<NodeEntity, Error> {
        self.consume(&TokenType::LeftParen, "expected '(' to open a node")?;

        let alias = self.match_identifier();
        let label = if self.match_token(&TokenType::Colon) {
            Some(self.consume_identifier("expected label after ':'")?)
        } else {
            None
        };
        let properties = if self.check(&TokenType::LeftBrace) {
            self.parse_properties()?
        } else {
            Vec::new()
        };

        self.consume(&TokenType::RightParen, "expected ')' to close a node")?;
        Ok(NodeEntity {
            alias,
            label,
            properties,
        })
    }

    fn parse_link(&mut self) -> Result<LinkEntity, Error> {
        let direction = if self.match_token(&TokenType::Dash) {
            LinkDirection::LeftToRight
        } else {
            self.consume(&TokenType::LeftArrow, "expected '-' or '<-' to open a link")?;
            LinkDirection::RightToLeft
        };

        self.consume(&TokenType::LeftBracket, "expected '[' in link")?;
        let alias = self.match_identifier();
        let label = if self.match_token(&TokenType::Colon) {
            Some(self.consume_identifier("expected relationship type after ':'")?)
        } else {
            None
        };
        let properties = if self.check(&TokenType::LeftBrace) {
            self.parse_properties()?
        } else {
            Vec::new()
        };
        self.consume(&TokenType::RightBracket, "expected ']' in link")?;

        match direction {
            LinkDirection::LeftToRight => {
                self.consume(&TokenType::RightArrow, "expected '->' to close a link")?;
            }
            LinkDirection::RightToLeft => {
                self.consume(&TokenType::Dash, "expected '-' to close a link")?;
            }
        }

        Ok(LinkEntity {
            alias,
            label,
            direction,
            properties,
        })
    }

    fn parse_properties(&mut self) -> Result<Vec<(String, Value)>, Error> {
        self.consume(&TokenType::LeftBrace, "expected '{'")?;
        let mut properties = Vec::new();
        loop {
            let key = self.consume_identifier("expected property name")?;
            self.consume(&TokenType::Colon, "expected ':' after property name")?;
            let value = self.parse_literal()?;
            properties.push((key, value));
            if !self.match_token(&TokenType::Comma) {
                break;
            }
        }
        self.consume(&TokenType::RightBrace, "expected '}' to close properties")?;
        Ok(properties)
    }

    fn parse_literal(&mut self) -> Result<Value, Error> {
        let negative = self.match_token(&TokenType::Dash);
        let token = self.advance();
        let value = match &token.token_type {
            TokenType::String(s) if !negative => Value::String(s.clone()),
            TokenType::Number(n) => Value::Number(if negative { -n } else { *n }),
            TokenType::Boolean(b) if !negative => Value::Bool(*b),
            TokenType::Null if !negative => Value::Null,
            _ => {
                return Err(Self::error_at(&token, "expected a literal value"));
            }
        };
        Ok(value)
    }

    // WHERE: OR over AND over comparisons, both left-associative.
    fn parse_filter(&mut self) -> Result<FilterExpr, Error> {
        let mut filter = self.parse_filter_and()?;
        while self.match_token(&TokenType::Or) {
            let right = self.parse_filter_and()?;
            filter = FilterExpr::Cond {
                left: Box::new(filter),
                op: CondOp::Or,
                right: Box::new(right),
            };
        }
        Ok(filter)
    }

    fn parse_filter_and(&mut self) -> Result<FilterExpr, Error> {
        let mut filter = self.parse_comparison()?;
        while self.match_token(&TokenType::And) {
            let right = self.parse_comparison()?;
            filter = FilterExpr::Cond {
                left: Box::new(filter),
                op: CondOp::And,
                right: Box::new(right),
            };
        }
        Ok(filter)
    }

    fn parse_comparison(&mut self) -> Result<FilterExpr, Error> {
        let lhs = self.parse_comparison_operand()?;
        let op = self.parse_compare_op()?;
        let rhs = self.parse_comparison_operand()?;

        match (lhs, rhs) {
            (ComparisonOperand::Ref(lhs), ComparisonOperand::Const(value)) => {
                Ok(FilterExpr::ConstPredicate { lhs, op, value })
            }
            (ComparisonOperand::Const(value), ComparisonOperand::Ref(lhs)) => {
                Ok(FilterExpr::ConstPredicate {
                    lhs,
                    op: op.flip(),
                    value,
                })
            }
            (ComparisonOperand::Ref(lhs), ComparisonOperand::Ref(rhs)) => {
                Ok(FilterExpr::RefPredicate { lhs, op, rhs })
            }
            (ComparisonOperand::Const(_), ComparisonOperand::Const(_)) => {
                Err(self.error_here("comparison must reference at least one entity"))
            }
        }
    }

    fn parse_comparison_operand(&mut self) -> Result<ComparisonOperand, Error> {
        if let Some(alias) = self.match_identifier() {
            let property = if self.match_token(&TokenType::Dot) {
                Some(self.consume_identifier("expected property name after '.'")?)
            } else {
                None
            };
            Ok(ComparisonOperand::Ref(EntityRef { alias, property }))
        } else {
            Ok(ComparisonOperand::Const(self.parse_literal()?))
        }
    }

    fn parse_compare_op(&mut self) -> Result<CompareOp, Error> {
        let token = self.advance();
        let op = match token.token_type {
            TokenType::Equals => CompareOp::Eq,
            TokenType::NotEquals => CompareOp::Ne,
            TokenType::LessThan => CompareOp::Lt,
            TokenType::LessEqual => CompareOp::Le,
            TokenType::GreaterThan => CompareOp::Gt,
            TokenType::GreaterEqual => CompareOp::Ge,
            _ => return Err(Self::error_at(&token, "expected a comparison operator")),
        };
        Ok(op)
    }

    fn parse_delete(&mut self) -> Result<DeleteClause, Error> {
        let mut aliases = Vec::new();
        aliases.push(self.consume_identifier("expected alias after DELETE")?);
        while self.match_token(&TokenType::Comma) {
            aliases.push(self.consume_identifier("expected alias after ','")?);
        }
        Ok(DeleteClause { aliases })
    }

    fn parse_return(&mut self) -> Result<ReturnClause, Error> {
        let mut elements = Vec::new();
        elements.push(self.parse_return_element()?);
        while self.match_token(&TokenType::Comma) {
            elements.push(self.parse_return_element()?);
        }

        let limit = if self.match_token(&TokenType::Limit) {
            let token = self.advance();
            match token.token_type {
                TokenType::Number(n) if n >= 0.0 && n.fract() == 0.0 => Some(n as usize),
                _ => return Err(Self::error_at(&token, "expected a row count after LIMIT")),
            }
        } else {
            None
        };

        Ok(ReturnClause { elements, limit })
    }

    fn parse_return_element(&mut self) -> Result<ReturnElement, Error> {
        let exp = self.parse_expression()?;
        let alias = if self.match_token(&TokenType::As) {
            Some(self.consume_identifier("expected alias after AS")?)
        } else {
            None
        };
        Ok(ReturnElement { exp, alias })
    }

    // Arithmetic: additive over multiplicative over primaries, each
    // folding left into the scalar function application.
    fn parse_expression(&mut self) -> Result<Expr, Error> {
        let mut exp = self.parse_multiplicative()?;
        loop {
            let func = if self.match_token(&TokenType::Plus) {
                "add"
            } else if self.match_token(&TokenType::Dash) {
                "sub"
            } else {
                break;
            };
            let right = self.parse_multiplicative()?;
            exp = Expr::Operation {
                func: func.to_string(),
                args: vec![exp, right],
            };
        }
        Ok(exp)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, Error> {
        let mut exp = self.parse_primary()?;
        loop {
            let func = if self.match_token(&TokenType::Asterisk) {
                "mul"
            } else if self.match_token(&TokenType::Slash) {
                "div"
            } else {
                break;
            };
            let right = self.parse_primary()?;
            exp = Expr::Operation {
                func: func.to_string(),
                args: vec![exp, right],
            };
        }
        Ok(exp)
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        if self.match_token(&TokenType::LeftParen) {
            let exp = self.parse_expression()?;
            self.consume(&TokenType::RightParen, "expected ')'")?;
            return Ok(exp);
        }

        if let Some(name) = self.match_identifier() {
            // Function application
            if self.match_token(&TokenType::LeftParen) {
                let mut args = Vec::new();
                if !self.check(&TokenType::RightParen) {
                    args.push(self.parse_expression()?);
                    while self.match_token(&TokenType::Comma) {
                        args.push(self.parse_expression()?);
                    }
                }
                self.consume(&TokenType::RightParen, "expected ')' after arguments")?;
                return Ok(Expr::Operation { func: name, args });
            }

            // Variadic reference
            let property = if self.match_token(&TokenType::Dot) {
                Some(self.consume_identifier("expected property name after '.'")?)
            } else {
                None
            };
            return Ok(Expr::Operand(Operand::Variadic {
                alias: name,
                property,
            }));
        }

        Ok(Expr::Operand(Operand::Const(self.parse_literal()?)))
    }

    // Token plumbing

    fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn check(&self, token_type: &TokenType) -> bool {
        &self.peek().token_type == token_type
    }

    fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_identifier(&mut self) -> Option<String> {
        if let TokenType::Identifier(name) = &self.peek().token_type {
            let name = name.clone();
            self.advance();
            Some(name)
        } else {
            None
        }
    }

    fn consume(&mut self, token_type: &TokenType, message: &str) -> Result<(), Error> {
        if self.match_token(token_type) {
            Ok(())
        } else {
            Err(self.error_here(message))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> Result<String, Error> {
        self.match_identifier().ok_or_else(|| self.error_here(message))
    }

    fn error_here(&self, message: &str) -> Error {
        Self::error_at(self.peek(), message)
    }

    fn error_at(token: &Token, message: &str) -> Error {
        Error::Parse(format!(
            "{message} at line {} column {}",
            token.line, token.column
        ))
    }
}

enum ComparisonOperand {
    Ref(EntityRef),
    Const(Value),
}
