//! GML graph loader
//!
//! Reads the GML subset used for road networks: a `graph [ .. ]` block with
//! `node [ id .. label .. ]` and `edge [ source .. target .. a .. b .. ]`
//! entries, where `a` and `b` are the affine cost coefficients of the edge.
//!
//! An undirected input (`directed 0` or absent) is turned into a directed
//! graph by mirroring every edge in both directions.
use crate::routing::{CostEdge, RoadGraph, RoutingError};
use std::collections::HashMap;
use std::path::Path;

///
/// Load a road network from a GML file.
///
pub fn load(path: &Path) -> Result<RoadGraph, RoutingError> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| RoutingError::InvalidGraph(format!("cannot read {}: {}", path.display(), e)))?;
    parse(&src)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Word(String),
    Quoted(String),
}

fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' => tokens.push(Token::Open),
            ']' => tokens.push(Token::Close),
            '"' => {
                let mut s = String::new();
                for d in chars.by_ref() {
                    if d == '"' {
                        break;
                    }
                    s.push(d);
                }
                tokens.push(Token::Quoted(s));
            }
            '#' => {
                // comment runs to end of line
                for d in chars.by_ref() {
                    if d == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => {}
            c => {
                let mut s = String::new();
                s.push(c);
                while let Some(&d) = chars.peek() {
                    if d.is_whitespace() || d == '[' || d == ']' {
                        break;
                    }
                    s.push(d);
                    chars.next();
                }
                tokens.push(Token::Word(s));
            }
        }
    }
    tokens
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }
    fn err(msg: impl Into<String>) -> RoutingError {
        RoutingError::InvalidGraph(msg.into())
    }
    ///
    /// Next token as a scalar value string (word or quoted). A nested block
    /// is not a scalar.
    ///
    fn scalar(&mut self, key: &str) -> Result<String, RoutingError> {
        match self.next() {
            Some(Token::Word(s)) => Ok(s),
            Some(Token::Quoted(s)) => Ok(s),
            _ => Err(Self::err(format!("expected a value after '{}'", key))),
        }
    }
    /// skip a value we do not care about, balanced over nested blocks
    fn skip_value(&mut self) -> Result<(), RoutingError> {
        match self.next() {
            Some(Token::Open) => {
                let mut depth = 1;
                while depth > 0 {
                    match self.next() {
                        Some(Token::Open) => depth += 1,
                        Some(Token::Close) => depth -= 1,
                        Some(_) => {}
                        None => return Err(Self::err("unbalanced brackets")),
                    }
                }
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(Self::err("unexpected end of input")),
        }
    }
    /// key/value pairs of one `[ .. ]` block, scalars only, others skipped
    fn block(&mut self) -> Result<Vec<(String, String)>, RoutingError> {
        match self.next() {
            Some(Token::Open) => {}
            _ => return Err(Self::err("expected '['")),
        }
        let mut pairs = Vec::new();
        loop {
            match self.next() {
                Some(Token::Close) => return Ok(pairs),
                Some(Token::Word(key)) => match self.tokens.get(self.pos) {
                    Some(Token::Open) => self.skip_value()?,
                    _ => {
                        let value = self.scalar(&key)?;
                        pairs.push((key, value));
                    }
                },
                Some(_) => return Err(Self::err("expected a key")),
                None => return Err(Self::err("unbalanced brackets")),
            }
        }
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_f64(pairs: &[(String, String)], key: &str, ctx: &str) -> Result<f64, RoutingError> {
    let raw = lookup(pairs, key)
        .ok_or_else(|| Parser::err(format!("{} is missing cost coefficient '{}'", ctx, key)))?;
    raw.parse()
        .map_err(|_| Parser::err(format!("{}: '{}' is not a number for '{}'", ctx, raw, key)))
}

fn parse_i64(pairs: &[(String, String)], key: &str, ctx: &str) -> Result<i64, RoutingError> {
    let raw = lookup(pairs, key)
        .ok_or_else(|| Parser::err(format!("{} is missing '{}'", ctx, key)))?;
    raw.parse()
        .map_err(|_| Parser::err(format!("{}: '{}' is not an integer for '{}'", ctx, raw, key)))
}

///
/// Parse GML text into a RoadGraph.
///
pub fn parse(src: &str) -> Result<RoadGraph, RoutingError> {
    let mut p = Parser {
        tokens: tokenize(src),
        pos: 0,
    };
    match p.next() {
        Some(Token::Word(w)) if w == "graph" => {}
        _ => return Err(Parser::err("expected a 'graph [ .. ]' block")),
    }
    match p.next() {
        Some(Token::Open) => {}
        _ => return Err(Parser::err("expected '[' after 'graph'")),
    }

    let mut directed = false;
    let mut graph = RoadGraph::new();
    let mut by_id = HashMap::new();
    let mut edges: Vec<(i64, i64, CostEdge)> = Vec::new();

    loop {
        match p.next() {
            Some(Token::Close) => break,
            Some(Token::Word(key)) => match key.as_str() {
                "directed" => directed = p.scalar("directed")? == "1",
                "node" => {
                    let pairs = p.block()?;
                    let id = parse_i64(&pairs, "id", "node")?;
                    let label = lookup(&pairs, "label")
                        .map(str::to_string)
                        .unwrap_or_else(|| id.to_string());
                    if by_id.contains_key(&id) {
                        return Err(Parser::err(format!("duplicate node id {}", id)));
                    }
                    by_id.insert(id, graph.add_node(label));
                }
                "edge" => {
                    let pairs = p.block()?;
                    let source = parse_i64(&pairs, "source", "edge")?;
                    let target = parse_i64(&pairs, "target", "edge")?;
                    let ctx = format!("edge {} -> {}", source, target);
                    let a = parse_f64(&pairs, "a", &ctx)?;
                    let b = parse_f64(&pairs, "b", &ctx)?;
                    edges.push((source, target, CostEdge::new(a, b)));
                }
                _ => p.skip_value()?,
            },
            _ => return Err(Parser::err("unbalanced 'graph [ .. ]' block")),
        }
    }

    for (source, target, w) in edges {
        let u = *by_id
            .get(&source)
            .ok_or_else(|| Parser::err(format!("edge references unknown node {}", source)))?;
        let v = *by_id
            .get(&target)
            .ok_or_else(|| Parser::err(format!("edge references unknown node {}", target)))?;
        graph.add_edge(u, v, w);
        if !directed {
            graph.add_edge(v, u, w);
        }
    }
    Ok(graph)
}

//
// tests
//
