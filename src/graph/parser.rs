//! Graph-description parser.
//!
//! Reads the node/relationship notation the text generator is asked to emit:
//!
//! ```text
//! (Audi:Brand {founded: 1909})
//! (Vehicle)-[:HAS_BRAND {since: 2001}]->(Audi)
//! ```
//!
//! The input is tokenized first (property blocks become single opaque tokens),
//! then walked with a small recursive-descent parser. Anything that does not
//! form a node declaration or a relationship is skipped one token at a time,
//! so malformed input degrades to a partial or empty result, never an error.

use std::collections::HashMap;

use indexmap::IndexSet;

use super::{NodeDecl, ParsedDescription, RelationshipDecl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    Dash,
    Arrow,
    Ident(&'a str),
    /// A balanced `{ ... }` block; its contents are not interpreted.
    Props,
    Other,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let ends = block_ends(text);
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ':' => Token::Colon,
            '-' => {
                if matches!(chars.peek(), Some((_, '>'))) {
                    chars.next();
                    Token::Arrow
                } else {
                    Token::Dash
                }
            }
            '{' => match ends.get(&start) {
                Some(&end) => {
                    while matches!(chars.peek(), Some((i, _)) if *i <= end) {
                        chars.next();
                    }
                    Token::Props
                }
                None => Token::Other,
            },
            c if is_ident_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !is_ident_char(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                Token::Ident(&text[start..end])
            }
            _ => Token::Other,
        };
        tokens.push(token);
    }

    tokens
}

/// Offset of the matching `}` for every `{` that has one, keyed by the `{`.
///
/// Quoted strings are honoured so `{label: "a } b"}` is one block. A quote
/// only opens after `:`, `,`, `[` or `{` and only closes before `,`, `}`, `]`
/// or end of input, so apostrophes inside values (`'O'Brien'`) stay literal.
/// Braces the quote-aware pass leaves unmatched are paired by plain counting.
fn block_ends(text: &str) -> HashMap<usize, usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut ends = match_braces(&chars, false);
    ends.extend(match_braces(&chars, true));
    ends
}

fn match_braces(chars: &[(usize, char)], honour_quotes: bool) -> HashMap<usize, usize> {
    let mut ends = HashMap::new();
    let mut open = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;

    for (i, &(offset, c)) in chars.iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q && closes_quote(&chars[i + 1..]) {
                quote = None;
                prev = Some(c);
            }
            continue;
        }
        match c {
            '\'' | '"'
                if honour_quotes
                    && !open.is_empty()
                    && matches!(prev, Some(':' | ',' | '[' | '{')) =>
            {
                quote = Some(c)
            }
            '{' => open.push(offset),
            '}' => {
                if let Some(start) = open.pop() {
                    ends.insert(start, offset);
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            prev = Some(c);
        }
    }

    ends
}

fn closes_quote(rest: &[(usize, char)]) -> bool {
    matches!(
        rest.iter().map(|&(_, c)| c).find(|c| !c.is_whitespace()),
        None | Some(',' | '}' | ']')
    )
}

/// `( name [:Type] [{...}] )`
#[derive(Debug, Clone, Copy)]
struct NodePattern<'a> {
    name: &'a str,
    entity_type: Option<&'a str>,
    has_props: bool,
}

impl NodePattern<'_> {
    /// Only the `(name:Type {...})` form declares an entity.
    fn declaration(&self) -> Option<NodeDecl> {
        match (self.entity_type, self.has_props) {
            (Some(entity_type), true) => Some(NodeDecl {
                name: self.name.to_string(),
                entity_type: entity_type.to_string(),
            }),
            _ => None,
        }
    }
}

struct DescriptionParser<'a> {
    tokens: Vec<Token<'a>>,
    nodes: IndexSet<NodeDecl>,
    relationships: Vec<RelationshipDecl>,
}

impl<'a> DescriptionParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: tokenize(text),
            nodes: IndexSet::new(),
            relationships: Vec::new(),
        }
    }

    fn at(&self, pos: usize) -> Option<Token<'a>> {
        self.tokens.get(pos).copied()
    }

    fn expect(&self, pos: usize, token: Token<'a>) -> Option<usize> {
        (self.at(pos)? == token).then_some(pos + 1)
    }

    fn ident(&self, pos: usize) -> Option<(&'a str, usize)> {
        match self.at(pos)? {
            Token::Ident(name) => Some((name, pos + 1)),
            _ => None,
        }
    }

    fn props(&self, pos: usize) -> Option<usize> {
        match self.at(pos)? {
            Token::Props => Some(pos + 1),
            _ => None,
        }
    }

    fn run(mut self) -> ParsedDescription {
        let mut pos = 0;
        while pos < self.tokens.len() {
            pos = match self.path(pos) {
                Some(next) => next,
                None => pos + 1,
            };
        }

        ParsedDescription {
            nodes: self.nodes.into_iter().collect(),
            relationships: self.relationships,
        }
    }

    /// A node pattern followed by zero or more `-[...]->(node)` hops.
    fn path(&mut self, pos: usize) -> Option<usize> {
        let (mut source, mut pos) = self.node_pattern(pos)?;
        if let Some(decl) = source.declaration() {
            self.nodes.insert(decl);
        }

        while let Some((relation_type, target, next)) = self.hop(pos) {
            if let Some(decl) = target.declaration() {
                self.nodes.insert(decl);
            }
            self.relationships.push(RelationshipDecl {
                source: source.name.to_string(),
                target: target.name.to_string(),
                relation_type: relation_type.to_string(),
            });
            source = target;
            pos = next;
        }

        Some(pos)
    }

    fn node_pattern(&self, pos: usize) -> Option<(NodePattern<'a>, usize)> {
        let pos = self.expect(pos, Token::LParen)?;
        let (name, mut pos) = self.ident(pos)?;

        let mut entity_type = None;
        if let Some(after_colon) = self.expect(pos, Token::Colon) {
            let (ty, next) = self.ident(after_colon)?;
            entity_type = Some(ty);
            pos = next;
        }

        let mut has_props = false;
        if let Some(next) = self.props(pos) {
            has_props = true;
            pos = next;
        }

        let pos = self.expect(pos, Token::RParen)?;
        Some((
            NodePattern {
                name,
                entity_type,
                has_props,
            },
            pos,
        ))
    }

    /// `-[ [var] :TYPE [{...}] ]->(node)`
    fn hop(&self, pos: usize) -> Option<(&'a str, NodePattern<'a>, usize)> {
        let pos = self.expect(pos, Token::Dash)?;
        let mut pos = self.expect(pos, Token::LBracket)?;
        if let Some((_, next)) = self.ident(pos) {
            pos = next;
        }
        let pos = self.expect(pos, Token::Colon)?;
        let (relation_type, mut pos) = self.ident(pos)?;
        if let Some(next) = self.props(pos) {
            pos = next;
        }
        let pos = self.expect(pos, Token::RBracket)?;
        let pos = self.expect(pos, Token::Arrow)?;
        let (target, pos) = self.node_pattern(pos)?;
        Some((relation_type, target, pos))
    }
}

/// Extract node declarations and relationships from graph-description text.
///
/// Nodes are distinct `(name, type)` pairs; relationships keep every
/// occurrence in source order. Text that matches neither form is ignored.
pub fn parse_description(text: &str) -> ParsedDescription {
    let parsed = DescriptionParser::new(text).run();
    log::debug!(
        "Parsed description: {} nodes, {} relationships",
        parsed.nodes.len(),
        parsed.relationships.len()
    );
    parsed
}
