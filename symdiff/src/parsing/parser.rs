use std::str::FromStr;

use tracing::{debug, trace};

use crate::prelude::*;
use crate::utils::errors::{DiffError, Result};

/// # Parser
/// Recursive-descent parser building an [`ExprTree`] from a [`CharStream`].
///
/// ```text
/// expression := ['-'] term { ('+' | '-') term }
/// term       := factor { ('*' | '/') factor }
/// factor     := number | 'x' | 'X' | '(' expression ')'
/// ```
///
/// On failure the stream is left where the error was detected, so the caller
/// can report and discard the rest of the line.
///
/// Neither parentheses nor the finished tree may nest deeper than
/// [`MAX_DEPTH`] levels.
pub struct Parser<'a> {
    stream: &'a mut CharStream,
    arena: ExprArena,
    nesting: usize,
}

/// Deepest nesting accepted, both for parentheses and for the built tree.
pub const MAX_DEPTH: usize = 512;

impl<'a> Parser<'a> {
    pub fn new(stream: &'a mut CharStream) -> Self {
        Parser {
            stream,
            arena: ExprArena::new(),
            nesting: 0,
        }
    }

    /// Parses a complete line: one expression followed only by blanks.
    pub fn parse_line(mut self) -> Result<ExprTree> {
        let root = self.expression()?;
        self.stream.skip_blanks();
        if !self.stream.is_at_newline() {
            return Err(DiffError::ExtraData);
        }
        let tree = ExprTree::new(self.arena, root);
        let depth = tree.depth();
        if depth > MAX_DEPTH {
            return Err(DiffError::NestedTooDeeply(MAX_DEPTH));
        }
        debug!(nodes = tree.node_count(), depth, "parsed expression");
        Ok(tree)
    }

    fn expression(&mut self) -> Result<NodeId> {
        self.stream.skip_blanks();
        let negative = if self.stream.peek() == '-' {
            self.stream.advance();
            true
        } else {
            false
        };
        let mut exp = self.term()?;
        if negative {
            exp = self.arena.negate(exp);
        }
        self.stream.skip_blanks();
        while matches!(self.stream.peek(), '+' | '-') {
            let op = self.operator()?;
            let next_term = self.term()?;
            exp = self.arena.binary(op, exp, next_term);
            self.stream.skip_blanks();
        }
        Ok(exp)
    }

    fn term(&mut self) -> Result<NodeId> {
        self.stream.skip_blanks();
        let mut term = self.factor()?;
        self.stream.skip_blanks();
        while matches!(self.stream.peek(), '*' | '/') {
            let op = self.operator()?;
            let next_factor = self.factor()?;
            term = self.arena.binary(op, term, next_factor);
            self.stream.skip_blanks();
        }
        Ok(term)
    }

    fn factor(&mut self) -> Result<NodeId> {
        self.stream.skip_blanks();
        let ch = self.stream.peek();
        trace!(position = self.stream.position(), %ch, "factor");
        match ch {
            '0'..='9' => {
                let number = self.stream.read_number()?;
                Ok(self.arena.constant(number))
            }
            'x' | 'X' => {
                self.stream.advance();
                Ok(self.arena.variable())
            }
            '(' => {
                if self.nesting == MAX_DEPTH {
                    return Err(DiffError::NestedTooDeeply(MAX_DEPTH));
                }
                self.stream.advance();
                self.nesting += 1;
                let exp = self.expression()?;
                self.stream.skip_blanks();
                if self.stream.peek() != ')' {
                    return Err(DiffError::MissingRightParenthesis);
                }
                self.stream.advance();
                self.nesting -= 1;
                Ok(exp)
            }
            END_OF_LINE => Err(DiffError::UnexpectedEndOfLine),
            ')' => Err(DiffError::ExtraRightParenthesis),
            '+' | '-' | '*' | '/' => Err(DiffError::MisplacedOperator(ch)),
            other => Err(DiffError::UnexpectedCharacter(other)),
        }
    }

    fn operator(&mut self) -> Result<BinaryOp> {
        let ch = self.stream.advance();
        BinaryOp::from_symbol(ch).ok_or(DiffError::UnexpectedCharacter(ch))
    }
}

/// Parses a whole line into an expression tree.
pub fn parse(line: &str) -> Result<ExprTree> {
    let mut stream = CharStream::new(line);
    Parser::new(&mut stream).parse_line()
}

impl TryFrom<&str> for ExprTree {
    type Error = DiffError;

    fn try_from(line: &str) -> Result<ExprTree> {
        parse(line)
    }
}

impl TryFrom<String> for ExprTree {
    type Error = DiffError;

    fn try_from(line: String) -> Result<ExprTree> {
        parse(&line)
    }
}

impl FromStr for ExprTree {
    type Err = DiffError;

    fn from_str(line: &str) -> Result<ExprTree> {
        parse(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtraction_is_left_associative() {
        let tree = parse("1 - 2 - 3").unwrap();
        assert_eq!(tree.render(), "( ( 1 - 2 ) - 3 )");
        assert_eq!(tree.value(0.0), -4.0);
    }

    #[test]
    fn test_division_is_left_associative() {
        let tree = parse("8 / 4 / 2").unwrap();
        assert_eq!(tree.render(), "( ( 8 / 4 ) / 2 )");
        assert_eq!(tree.value(0.0), 1.0);
    }

    #[test]
    fn test_precedence() {
        let tree = parse("1 + 2 * x - 3 / x").unwrap();
        assert_eq!(tree.render(), "( ( 1 + ( 2 * X ) ) - ( 3 / X ) )");
        assert_eq!(tree.value(3.0), 6.0);
    }

    #[test]
    fn test_leading_minus_wraps_first_term() {
        let tree = parse("-x * 2 + 1").unwrap();
        assert_eq!(tree.render(), "( ( -( X * 2 ) ) + 1 )");
        assert_eq!(tree.value(4.0), -7.0);
    }

    #[test]
    fn test_leading_minus_inside_parentheses() {
        let tree = parse("3 * (-x + 1)").unwrap();
        assert_eq!(tree.render(), "( 3 * ( ( -X ) + 1 ) )");
    }

    #[test]
    fn test_variable_is_case_insensitive() {
        assert_eq!(parse("x").unwrap().render(), "X");
        assert_eq!(parse("X").unwrap().render(), "X");
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let spaced = parse("  ( 1+x )\t*  2.5 ").unwrap();
        let packed = parse("(1+x)*2.5").unwrap();
        assert_eq!(spaced.render(), packed.render());
        assert_eq!(packed.render(), "( ( 1 + X ) * 2.5 )");
    }

    #[test]
    fn test_end_of_line_mid_expression() {
        assert!(matches!(parse("3 +"), Err(DiffError::UnexpectedEndOfLine)));
        assert!(matches!(parse("(2 *"), Err(DiffError::UnexpectedEndOfLine)));
    }

    #[test]
    fn test_extra_right_parenthesis() {
        assert!(matches!(
            parse("2 * )"),
            Err(DiffError::ExtraRightParenthesis)
        ));
    }

    #[test]
    fn test_misplaced_operator() {
        assert!(matches!(
            parse("3 + * 2"),
            Err(DiffError::MisplacedOperator('*'))
        ));
        assert!(matches!(
            parse("--x"),
            Err(DiffError::MisplacedOperator('-'))
        ));
    }

    #[test]
    fn test_unexpected_character() {
        let err = parse("2 * y").unwrap_err();
        assert!(matches!(err, DiffError::UnexpectedCharacter('y')));
        assert_eq!(err.to_string(), "Unexpected character \"y\" encountered.");
    }

    #[test]
    fn test_missing_right_parenthesis() {
        let err = parse("(2 + 3").unwrap_err();
        assert!(matches!(err, DiffError::MissingRightParenthesis));
        assert_eq!(err.to_string(), "Missing right parenthesis.");
    }

    #[test]
    fn test_extra_data_after_expression() {
        assert!(matches!(parse("2 x"), Err(DiffError::ExtraData)));
        assert!(matches!(parse("(1) )"), Err(DiffError::ExtraData)));
    }

    #[test]
    fn test_failure_leaves_rest_of_line_in_stream() {
        let mut stream = CharStream::new("1 + ) + 2");
        let result = Parser::new(&mut stream).parse_line();
        assert!(result.is_err());
        assert_eq!(stream.consume_line(), ") + 2");
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let line = format!("{}x{}", "(".repeat(200_000), ")".repeat(200_000));
        let mut stream = CharStream::new(&line);
        let err = Parser::new(&mut stream).parse_line().unwrap_err();
        assert!(matches!(err, DiffError::NestedTooDeeply(MAX_DEPTH)));
        assert!(err.is_parse_failure());
        assert_eq!(stream.position(), MAX_DEPTH);
    }

    #[test]
    fn test_parentheses_up_to_the_limit_parse() {
        let line = format!("{}x{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        let tree = parse(&line).unwrap();
        assert_eq!(tree.render(), "X");
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let short = format!("x{}", " + x".repeat(MAX_DEPTH - 1));
        assert_eq!(parse(&short).unwrap().depth(), MAX_DEPTH);
        let long = format!("x{}", " * x".repeat(100_000));
        assert!(matches!(
            parse(&long),
            Err(DiffError::NestedTooDeeply(MAX_DEPTH))
        ));
    }

    #[test]
    fn test_conversions() {
        let a = ExprTree::try_from("x * x").unwrap();
        let b = ExprTree::try_from("x * x".to_string()).unwrap();
        let c: ExprTree = "x * x".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }
}
