use crate::ast::{Abi, TypeNode};
use crate::error::{ARRAY_LENGTH, BITFIELD_WIDTH, ParseError};
use chumsky::Stream;
use chumsky::prelude::*;
use lexer::token::Token;
use std::ops::Range;
use tracing::{debug, trace};

/// Groups plus pointer prefixes allowed around any single type.
pub const MAX_DEPTH: usize = 32;

/// Grammar for exactly one type descriptor. Trailing tokens are left alone.
pub fn type_parser(abi: Abi) -> impl Parser<Token, TypeNode, Error = Simple<Token>> {
    recursive(move |ty| {
        let primitive = select! { Token::Primitive(p) => p }
            .map(move |p| TypeNode::primitive(p, abi));

        let object = select! { Token::ClassName(name) => name }
            .map(move |name| TypeNode::object(Some(name), abi));

        // @? and @?<v@?> (extended block signature, never decomposed)
        let block = just(Token::Block)
            .then_ignore(block_signature().or_not())
            .map(move |_| TypeNode::block(abi));

        // `^` right before a closer or the end is a pointer to unknown
        let pointee = ty.clone().or(filter(|t: &Token| t.closes_group())
            .rewind()
            .ignored()
            .or(end())
            .to(TypeNode::unknown()));

        let pointer = just(Token::Caret)
            .ignore_then(pointee)
            .map(move |pointee| TypeNode::pointer(pointee, abi));

        let array = just(Token::LBracket)
            .ignore_then(select! { Token::Number(n) => n }.labelled(ARRAY_LENGTH))
            .then(ty.clone())
            .then_ignore(just(Token::RBracket))
            .map(|(count, element)| TypeNode::array(count, element));

        // Ivar layouts name their fields: {CGPoint="x"d"y"d}
        let field_name = select! { Token::FieldName(_) => () };
        let fields = field_name
            .clone()
            .or_not()
            .ignore_then(ty.clone())
            .repeated()
            .then_ignore(field_name.or_not());

        let structure = select! { Token::StructHead(name) => Some(name) }
            .or(just(Token::LBrace).to(None))
            .then(fields.clone())
            .then_ignore(just(Token::RBrace))
            .map(|(name, fields)| TypeNode::structure(name, fields));

        let union = select! { Token::UnionHead(name) => Some(name) }
            .or(just(Token::LParen).to(None))
            .then(fields)
            .then_ignore(just(Token::RParen))
            .map(|(name, fields)| TypeNode::union(name, fields));

        // `^{__CFString}`: referenced by name only, no layout
        let opaque = select! {
            Token::StructRef(name) => TypeNode::structure(Some(name), Vec::new()),
            Token::UnionRef(name) => TypeNode::union(Some(name), Vec::new()),
        };

        let bitfield = just(Token::Bit)
            .ignore_then(select! { Token::Number(n) => n }.labelled(BITFIELD_WIDTH))
            .map(TypeNode::bitfield);

        let unknown = filter(|t: &Token| {
            matches!(
                t,
                Token::Question
                    | Token::Unknown(_)
                    | Token::Number(_)
                    | Token::FieldName(_)
                    | Token::LAngle
                    | Token::RAngle
            )
        })
        .to(TypeNode::unknown());

        select! { Token::Qualifier(_) => () }
            .repeated()
            .ignore_then(choice((
                primitive, object, block, pointer, array, structure, union, opaque, bitfield,
                unknown,
            )))
            .boxed()
    })
}

fn block_signature() -> impl Parser<Token, (), Error = Simple<Token>> {
    recursive(|signature| {
        signature
            .or(filter(|t: &Token| !matches!(t, Token::LAngle | Token::RAngle)).ignored())
            .repeated()
            .delimited_by(just(Token::LAngle), just(Token::RAngle))
            .ignored()
    })
}

struct Group {
    levels: usize,
    // `<...>` after `@?`: everything up to the matching `>` is payload
    payload: bool,
}

/// Walks the tokens of the first type before the recursive grammar sees
/// them. Rejects inputs nested deeper than `MAX_DEPTH` and groups that are
/// still open when the input runs out.
fn check_nesting(tokens: &[(Token, Range<usize>)], base: usize) -> Result<(), ParseError> {
    let mut open: Vec<Group> = Vec::new();
    let mut depth = 0;
    let mut pointers = 0;
    let mut iter = tokens.iter().peekable();

    let too_deep = |span: &Range<usize>| ParseError::NestingTooDeep {
        offset: base + span.start,
        limit: MAX_DEPTH,
    };

    while let Some((token, span)) = iter.next() {
        if open.last().is_some_and(|group| group.payload) {
            match token {
                Token::LAngle => {
                    depth += 1;
                    if depth > MAX_DEPTH {
                        return Err(too_deep(span));
                    }
                    open.push(Group { levels: 1, payload: true });
                }
                Token::RAngle => {
                    if let Some(group) = open.pop() {
                        depth -= group.levels;
                    }
                    if open.is_empty() {
                        return Ok(());
                    }
                }
                _ => {}
            }
            continue;
        }

        match token {
            Token::Qualifier(_) | Token::Bit | Token::FieldName(_) => {}
            Token::Caret => {
                pointers += 1;
                if depth + pointers > MAX_DEPTH {
                    return Err(too_deep(span));
                }
            }
            t if t.opens_group() => {
                let levels = pointers + 1;
                pointers = 0;
                depth += levels;
                if depth > MAX_DEPTH {
                    return Err(too_deep(span));
                }
                open.push(Group { levels, payload: false });
            }
            t if t.closes_group() => {
                pointers = 0;
                match open.pop() {
                    Some(group) => depth -= group.levels,
                    None => return Ok(()),
                }
                if open.is_empty() {
                    return Ok(());
                }
            }
            Token::Block if matches!(iter.peek(), Some((Token::LAngle, _))) => {
                pointers = 0;
                if let Some((_, angle)) = iter.next() {
                    depth += 1;
                    if depth > MAX_DEPTH {
                        return Err(too_deep(angle));
                    }
                    open.push(Group { levels: 1, payload: true });
                }
            }
            _ => {
                pointers = 0;
                if open.is_empty() {
                    return Ok(());
                }
            }
        }
    }

    if open.is_empty() {
        Ok(())
    } else {
        let end = tokens.last().map_or(0, |(_, span)| span.end);
        Err(ParseError::UnterminatedGroup { offset: base + end })
    }
}

/// Parses type encodings for one data model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeParser {
    abi: Abi,
}

impl TypeParser {
    pub fn new(abi: Abi) -> Self {
        TypeParser { abi }
    }

    pub fn abi(&self) -> Abi {
        self.abi
    }

    /// Parses the first type descriptor of `encoding`.
    pub fn parse(&self, encoding: &str) -> Result<TypeNode, ParseError> {
        self.parse_at(encoding, 0).map(|(node, _)| node)
    }

    /// Parses one descriptor starting at byte `offset` and returns it with
    /// the offset just past it. Use a `TypeCursor` to read a whole sequence.
    pub fn parse_at(&self, encoding: &str, offset: usize) -> Result<(TypeNode, usize), ParseError> {
        let rest = encoding.get(offset..).unwrap_or("");
        self.parse_tokens(rest, &lexer::lex(rest), offset)
    }

    /// Lexes `encoding` once for reading descriptor after descriptor.
    pub fn cursor<'a>(&self, encoding: &'a str) -> TypeCursor<'a> {
        TypeCursor {
            parser: *self,
            source: encoding,
            tokens: lexer::lex(encoding),
            position: 0,
        }
    }

    // `tokens` carry spans into `source`; `base` shifts them into the
    // caller's coordinates.
    fn parse_tokens(
        &self,
        source: &str,
        tokens: &[(Token, Range<usize>)],
        base: usize,
    ) -> Result<(TypeNode, usize), ParseError> {
        if tokens.iter().all(|(token, _)| token.is_qualifier()) {
            return Err(ParseError::EmptyInput);
        }

        check_nesting(tokens, base)?;

        let len = source.len();
        let start = tokens.first().map_or(len, |(_, span)| span.start);
        let parsed = type_parser(self.abi)
            .map_with_span(|node, span: Range<usize>| (node, span.end))
            .parse(Stream::from_iter(len..len + 1, tokens.iter().cloned()));

        match parsed {
            Ok((node, end)) => {
                trace!(
                    encoding = source.get(start..end).unwrap_or_default(),
                    offset = base + start,
                    "parsed type"
                );
                Ok((node, base + end))
            }
            Err(errors) => {
                let error = errors
                    .first()
                    .map(|e| ParseError::from_simple(e, base))
                    .unwrap_or(ParseError::UnterminatedGroup { offset: base + len });
                debug!(encoding = source, %error, "type encoding rejected");
                Err(error)
            }
        }
    }

    /// Parses consecutive descriptors until the string is exhausted.
    pub fn parse_all(&self, encoding: &str) -> Result<Vec<TypeNode>, ParseError> {
        if encoding.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut cursor = self.cursor(encoding);
        let mut nodes = Vec::new();
        while !cursor.is_exhausted() {
            let (node, _) = cursor.next_type()?;
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Storage size of a single descriptor, -1 when it cannot be resolved.
    pub fn size_of(&self, encoding: &str) -> Result<i64, ParseError> {
        Ok(self.parse(encoding)?.storage_size())
    }
}

/// An encoding lexed once and read one descriptor at a time.
#[derive(Debug, Clone)]
pub struct TypeCursor<'a> {
    parser: TypeParser,
    source: &'a str,
    tokens: Vec<(Token, Range<usize>)>,
    position: usize,
}

impl<'a> TypeCursor<'a> {
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Byte offset of the next unread token.
    pub fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .map_or(self.source.len(), |(_, span)| span.start)
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Reads the next descriptor and returns it with the byte range of its
    /// text, leading qualifiers included. On error the cursor stays put.
    pub fn next_type(&mut self) -> Result<(TypeNode, Range<usize>), ParseError> {
        let start = self.offset();
        let (node, end) = self
            .parser
            .parse_tokens(self.source, &self.tokens[self.position..], 0)?;

        while self
            .tokens
            .get(self.position)
            .is_some_and(|(_, span)| span.start < end)
        {
            self.position += 1;
        }
        Ok((node, start..end))
    }

    /// Steps over a decimal number, optionally negative.
    pub fn skip_number(&mut self) {
        fn is_digits(token: Option<&(Token, Range<usize>)>) -> bool {
            // Numbers too large for u32 lex as one `Unknown` per digit
            matches!(
                token,
                Some((Token::Number(_) | Token::Unknown('0'..='9'), _))
            )
        }

        if matches!(self.tokens.get(self.position), Some((Token::Unknown('-'), _)))
            && is_digits(self.tokens.get(self.position + 1))
        {
            self.position += 1;
        }
        while is_digits(self.tokens.get(self.position)) {
            self.position += 1;
        }
    }
}
