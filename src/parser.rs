use log::{debug, trace};

use crate::{
    ast::{Action, Branch, Grouping, Pipeline, Pipelines, Tree, Variable, Variables},
    error::{ParseError, ParseErrorKind, ParseResult},
    escape::{unquote_literal, unquote_rune, unquote_string},
    lexer::{Token, TokenKind, tokenize},
    options::ParseOptions,
    segment::{CLOSE, OPEN, Scan, carve},
};

/// Parses template source into a [`Tree`] using the default
/// [`ParseOptions`].
///
/// `filename` is only used to attribute errors. The first error aborts the
/// whole parse; no partial tree is ever returned.
///
/// ```rust
/// use tmpltree::{Render, parse};
///
/// let source = "Hello {{ .Name | printf \"%q\" }}!";
/// let tree = parse("greeting.tmpl", source).unwrap();
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.render(), source);
/// ```
pub fn parse(filename: &str, input: &str) -> ParseResult<Tree> {
    parse_with_options(filename, input, &ParseOptions::default())
}

/// Parses template source into a [`Tree`] with explicit options.
pub fn parse_with_options(filename: &str, input: &str, options: &ParseOptions) -> ParseResult<Tree> {
    debug!("parsing {} ({} bytes)", filename, input.len());

    let mut tree = Tree::new();
    let mut consumed = 0;
    while consumed < input.len() {
        let rest = &input[consumed..];
        match carve(rest) {
            Scan::Found(found) => {
                if !found.before.is_empty() {
                    tree.push(Branch::Text(found.before.to_string()));
                }
                let start = consumed + found.open_at;
                let end = start + OPEN.len() + found.inner.len() + CLOSE.len();
                let mut parser = Parser::new(filename, input, start, &input[start..end], options);
                tree.push(Branch::Action(parser.parse_action()?));
                consumed = end;
            }
            Scan::Unclosed(open_at) => {
                return Err(ParseError::at(
                    filename,
                    input,
                    consumed + open_at,
                    ParseErrorKind::UnbalancedDelimiter,
                ));
            }
            Scan::NotFound => {
                tree.push(Branch::Text(rest.to_string()));
                break;
            }
        }
    }

    debug!("parsed {} into {} branches", filename, tree.len());
    Ok(tree)
}

/// Recursive-descent parser for the tokens of a single action.
struct Parser<'a> {
    filename: &'a str,
    /// The whole template, for error positions.
    input: &'a str,
    /// Byte offset of `source` within `input`.
    base: usize,
    /// The action being parsed, delimiters included.
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(
        filename: &'a str,
        input: &'a str,
        base: usize,
        source: &'a str,
        options: &ParseOptions,
    ) -> Self {
        let tokens = tokenize(source);
        trace!("lexed {} tokens from {:?}", tokens.len(), source);
        Parser {
            filename,
            input,
            base,
            source,
            tokens,
            pos: 0,
            depth: 0,
            max_depth: options.depth_limit(),
        }
    }

    #[inline]
    fn make_error(&self, kind: ParseErrorKind) -> ParseError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |token| token.offset);
        ParseError::at(self.filename, self.input, self.base + offset, kind).with_source(self.source)
    }

    /// Builds the error for a token the grammar did not expect here.
    fn unexpected(&self, expected: &str) -> ParseError {
        let kind = match self.tokens.get(self.pos) {
            None => ParseErrorKind::unexpected_eof(Some(expected)),
            Some(token) if token.kind == TokenKind::Text => ParseErrorKind::UnexpectedCharacter {
                found: token.text.to_string(),
            },
            Some(token) => ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: describe(token),
            },
        };
        self.make_error(kind)
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|token| token.kind)
    }

    /// Consume the next token if it is of the given kind.
    fn consume(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied()?;
        if token.kind == kind {
            self.pos += 1;
            Some(token)
        } else {
            None
        }
    }

    /// Expect the next token to be of the given kind, consume it or return Err.
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token<'a>> {
        match self.consume(kind) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(kind.describe())),
        }
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.make_error(ParseErrorKind::NestingTooDeep {
                limit: self.max_depth,
            }));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// `Action := StatementOpen Pipelines StatementClose`
    fn parse_action(&mut self) -> ParseResult<Action> {
        let open = self.expect(TokenKind::StatementOpen)?;
        let pipelines = self.parse_pipelines()?;
        let close = self.expect(TokenKind::StatementClose)?;

        if let Some(token) = self.tokens.get(self.pos) {
            return Err(self.make_error(ParseErrorKind::TrailingTokens {
                found: describe(token),
            }));
        }

        Ok(Action::new(open.text, pipelines, close.text))
    }

    /// `Pipelines := Pipeline+`
    fn parse_pipelines(&mut self) -> ParseResult<Pipelines> {
        let mut pipelines = Pipelines::new();
        pipelines.push(self.parse_pipeline()?);
        while self.peek().is_some_and(TokenKind::starts_variable) {
            pipelines.push(self.parse_pipeline()?);
        }
        Ok(pipelines)
    }

    /// `Pipeline := Variable+ ( Pipe Pipeline )?`
    fn parse_pipeline(&mut self) -> ParseResult<Pipeline> {
        let mut pipeline = Pipeline::new(self.parse_variables()?);
        if self.consume(TokenKind::Pipe).is_some() {
            self.enter()?;
            pipeline = pipeline.with_pipe(self.parse_pipeline()?);
            self.leave();
        }
        Ok(pipeline)
    }

    fn parse_variables(&mut self) -> ParseResult<Variables> {
        let mut variables = Variables::new();
        while self.peek().is_some_and(TokenKind::starts_variable) {
            variables.push(self.parse_variable()?);
        }
        if variables.is_empty() {
            return Err(self.unexpected("a pipeline"));
        }
        Ok(variables)
    }

    fn parse_variable(&mut self) -> ParseResult<Variable> {
        let Some(token) = self.tokens.get(self.pos).copied() else {
            return Err(self.unexpected("a variable"));
        };

        let variable = match token.kind {
            TokenKind::Assignment => Variable::Assign(token.text.to_string()),
            TokenKind::Range => Variable::Range(token.text.to_string()),
            TokenKind::Ident => Variable::Ident(token.text.to_string()),
            TokenKind::Keyword => Variable::Keyword(token.text.to_string()),
            TokenKind::Literal => {
                let value = unquote_literal(token.text).map_err(|e| self.invalid(token, e))?;
                Variable::Literal(value.to_string())
            }
            TokenKind::String => {
                Variable::String(unquote_string(token.text).map_err(|e| self.invalid(token, e))?)
            }
            TokenKind::Rune => {
                Variable::Rune(unquote_rune(token.text).map_err(|e| self.invalid(token, e))?)
            }
            TokenKind::Float => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|e| self.invalid(token, e.to_string()))?;
                if !value.is_finite() {
                    return Err(self.invalid(token, "number out of range".to_string()));
                }
                Variable::Float(value)
            }
            TokenKind::Int => Variable::Int(
                token
                    .text
                    .parse::<i64>()
                    .map_err(|e| self.invalid(token, e.to_string()))?,
            ),
            TokenKind::Space => return Ok(self.parse_space()),
            TokenKind::Comment => Variable::Comment(token.text.to_string()),
            TokenKind::GroupOpen => return Ok(Variable::Grouping(self.parse_grouping()?)),
            TokenKind::Pipe
            | TokenKind::GroupClose
            | TokenKind::StatementOpen
            | TokenKind::StatementClose
            | TokenKind::Text => return Err(self.unexpected("a variable")),
        };
        self.pos += 1;
        Ok(variable)
    }

    /// `Space+`, joined into one variable.
    fn parse_space(&mut self) -> Variable {
        let mut space = String::new();
        while let Some(token) = self.consume(TokenKind::Space) {
            space.push_str(token.text);
        }
        Variable::Space(space)
    }

    /// `Grouping := GroupOpen Pipeline GroupClose`
    fn parse_grouping(&mut self) -> ParseResult<Grouping> {
        let open = self.expect(TokenKind::GroupOpen)?;
        self.enter()?;
        let group = self.parse_pipeline()?;
        self.leave();
        let close = self.expect(TokenKind::GroupClose)?;
        Ok(Grouping {
            open: open.text.to_string(),
            group,
            close: close.text.to_string(),
        })
    }

    fn invalid(&self, token: Token<'_>, reason: String) -> ParseError {
        ParseError::at(
            self.filename,
            self.input,
            self.base + token.offset,
            ParseErrorKind::InvalidLiteral {
                literal: token.text.to_string(),
                reason,
            },
        )
        .with_source(self.source)
    }
}

fn describe(token: &Token<'_>) -> String {
    format!("{} {:?}", token.kind.describe(), token.text)
}
