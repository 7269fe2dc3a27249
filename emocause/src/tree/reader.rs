//! Reader for trees in Penn Treebank bracket notation.

use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use thiserror::Error;

use super::{Node, NodeId, Span, Tree};

/// Label of a root node that has no label, as in `( (S ...))`.
static UNLABELED_ROOT: &str = "ROOT";

/// Maximum nesting of constituents. Tree operations recurse over the
/// constituent structure, so deeper input is rejected.
pub const MAX_TREE_DEPTH: usize = 1000;

/// Tree reading errors.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TreeError {
    #[error("constituent '{label}' at offset {offset} has no children")]
    EmptyConstituent { label: String, offset: usize },

    #[error("tree does not contain any terminal")]
    NoTerminals,

    #[error("unexpected '{found}' at offset {offset}, expected {expected}")]
    UnexpectedInput {
        found: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("constituent at offset {offset} is nested deeper than {max_depth} levels")]
    TooDeep { offset: usize, max_depth: usize },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Lexeme<'a> {
    Open,
    Close,
    Atom(&'a str),
}

impl<'a> Lexeme<'a> {
    fn text(&self) -> &'a str {
        match self {
            Lexeme::Open => "(",
            Lexeme::Close => ")",
            Lexeme::Atom(atom) => atom,
        }
    }
}

struct Lexer<'a> {
    data: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(data: &'a str) -> Self {
        Lexer {
            data,
            chars: data.char_indices().peekable(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (usize, Lexeme<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }

        let (start, c) = self.chars.next()?;
        match c {
            '(' => Some((start, Lexeme::Open)),
            ')' => Some((start, Lexeme::Close)),
            _ => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, c)) = self.chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        break;
                    }
                    end = idx + c.len_utf8();
                    self.chars.next();
                }
                Some((start, Lexeme::Atom(&self.data[start..end])))
            }
        }
    }
}

struct TreeReader<'a> {
    lexer: Peekable<Lexer<'a>>,
    nodes: Vec<Node>,
    leaves: Vec<NodeId>,
}

impl<'a> TreeReader<'a> {
    fn new(data: &'a str) -> Self {
        TreeReader {
            lexer: Lexer::new(data).peekable(),
            nodes: Vec::new(),
            leaves: Vec::new(),
        }
    }

    fn read(mut self) -> Result<Tree, TreeError> {
        self.expect_open()?;
        self.read_constituent(None, 1)?;

        if let Some((offset, lexeme)) = self.lexer.next() {
            return Err(TreeError::UnexpectedInput {
                found: lexeme.text().to_owned(),
                offset,
                expected: "end of input",
            });
        }

        if self.leaves.is_empty() {
            return Err(TreeError::NoTerminals);
        }

        Ok(Tree {
            nodes: self.nodes,
            leaves: self.leaves,
        })
    }

    fn expect_open(&mut self) -> Result<(), TreeError> {
        match self.lexer.next() {
            Some((_, Lexeme::Open)) => Ok(()),
            Some((offset, lexeme)) => Err(TreeError::UnexpectedInput {
                found: lexeme.text().to_owned(),
                offset,
                expected: "'('",
            }),
            None => Err(TreeError::UnexpectedEnd { expected: "'('" }),
        }
    }

    fn add_node(&mut self, label: &str, parent: Option<NodeId>, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label: label.to_owned(),
            span,
            parent,
            children: Vec::new(),
        });

        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }

        id
    }

    /// Read a constituent, the opening bracket is already consumed.
    fn read_constituent(
        &mut self,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<NodeId, TreeError> {
        let (offset, label) = match self.lexer.peek() {
            Some(&(offset, Lexeme::Atom(label))) => {
                self.lexer.next();
                (offset, label)
            }
            Some(&(offset, Lexeme::Open)) if parent.is_none() => (offset, UNLABELED_ROOT),
            Some((offset, lexeme)) => {
                return Err(TreeError::UnexpectedInput {
                    found: lexeme.text().to_owned(),
                    offset: *offset,
                    expected: "constituent label",
                })
            }
            None => {
                return Err(TreeError::UnexpectedEnd {
                    expected: "constituent label",
                })
            }
        };

        if depth > MAX_TREE_DEPTH {
            return Err(TreeError::TooDeep {
                offset,
                max_depth: MAX_TREE_DEPTH,
            });
        }

        // The span is corrected once the children are read.
        let first_leaf = self.leaves.len();
        let node = self.add_node(label, parent, Span::new(first_leaf, first_leaf));

        loop {
            match self.lexer.next() {
                Some((_, Lexeme::Open)) => {
                    self.read_constituent(Some(node), depth + 1)?;
                }
                Some((_, Lexeme::Atom(word))) => {
                    let index = self.leaves.len();
                    let leaf = self.add_node(word, Some(node), Span::new(index, index));
                    self.leaves.push(leaf);
                }
                Some((_, Lexeme::Close)) => break,
                None => return Err(TreeError::UnexpectedEnd { expected: "')'" }),
            }
        }

        if self.nodes[node.0].children.is_empty() || self.leaves.len() == first_leaf {
            return Err(TreeError::EmptyConstituent {
                label: label.to_owned(),
                offset,
            });
        }

        self.nodes[node.0].span = Span::new(first_leaf, self.leaves.len() - 1);

        Ok(node)
    }
}

impl FromStr for Tree {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TreeReader::new(s).read()
    }
}
