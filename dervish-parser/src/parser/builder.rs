//! Online construction of a tree from a stream of bracket-depth-tagged items.
//!
//! Items arrive left to right. Each one is compared against the most recently inserted node
//! (`current`) by its effective precedence, the pair `(bracket depth, intrinsic precedence)`,
//! and is either attached below `current` or inserted above `current` or one of its ancestors.
//! Parent links live only in the builder's arena; the finished [`Node`] tree owns its children
//! and has no back references.

use log::trace;
use super::{
    ast::{Literal, Node, NodeKind},
    error::{kind, Error},
    token::op::{Associativity, BinOpKind, Precedence, UnaryOpKind},
};
use std::ops::Range;

/// The maximum height of a built tree.
pub const MAX_DEPTH: usize = 256;

/// A node without its children, as produced by the tokenizing stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    Literal(Literal),
    Unary(UnaryOpKind),
    Binary(BinOpKind),
}

impl Template {
    /// Returns the intrinsic precedence of the node.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Literal(_) => Precedence::Primary,
            Self::Unary(op) => op.precedence(),
            Self::Binary(op) => op.precedence(),
        }
    }

    /// Returns the associativity of the node.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Literal(_) => Associativity::Left,
            Self::Unary(op) => op.associativity(),
            Self::Binary(op) => op.associativity(),
        }
    }

    /// Returns the number of children the node takes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Literal(_) => 0,
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }

    /// Returns true if the node is a number, constant, or variable.
    pub fn is_operand(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// A [`Template`] tagged with the number of brackets enclosing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub template: Template,
    pub depth: usize,

    /// The region of the source code that this item was parsed from.
    pub span: Range<usize>,
}

impl Item {
    /// Creates a new item.
    pub fn new(template: Template, depth: usize, span: Range<usize>) -> Self {
        Self { template, depth, span }
    }

    /// The effective precedence of the item. Deeper brackets always bind tighter.
    fn key(&self) -> (usize, Precedence) {
        (self.depth, self.template.precedence())
    }
}

/// A node in the builder's arena.
#[derive(Debug)]
struct Slot {
    item: Item,
    parent: Option<usize>,
    children: [Option<usize>; 2],
}

impl Slot {
    /// Returns true if the node still has room for another child.
    fn is_unsaturated(&self) -> bool {
        self.children
            .iter()
            .take(self.item.template.arity())
            .any(Option::is_none)
    }
}

/// Builds a tree from [`Item`]s, one at a time.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    /// Arena of every node pushed so far, addressed by index.
    slots: Vec<Slot>,

    /// The index of the most recently inserted node.
    current: Option<usize>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the next item into the tree.
    pub fn push(&mut self, item: Item) -> Result<(), Error> {
        let idx = self.slots.len();
        let key = item.key();
        let associativity = item.template.associativity();
        let is_prefix = matches!(item.template, Template::Unary(_));
        self.slots.push(Slot { item, parent: None, children: [None, None] });

        let Some(current) = self.current else {
            self.current = Some(idx);
            return Ok(());
        };
        let current_key = self.slots[current].item.key();

        if is_prefix {
            // a prefix operator can only be the operand of an operator still waiting for one,
            // as in `2^-x` or `sin -x`, and never follows a complete operand, as in `x sin`
            if !self.slots[current].is_unsaturated() {
                return Err(self.missing_operator(current, idx));
            }
            trace!("attach prefix {} below {}", idx, current);
            self.attach_child(current, idx)?;
        } else if key > current_key
            || (key == current_key && associativity == Associativity::Right) {
            trace!("attach {} below {}", idx, current);
            self.attach_child(current, idx)?;
        } else if key == current_key {
            trace!("insert {} above {}", idx, current);
            self.insert_parent(current, idx)?;
        } else {
            let mut top = current;
            while let Some(parent) = self.slots[top].parent {
                let parent_key = self.slots[parent].item.key();
                let climb = match associativity {
                    Associativity::Left => parent_key >= key,
                    Associativity::Right => parent_key > key,
                };
                if !climb {
                    break;
                }
                top = parent;
            }
            trace!("insert {} above {}", idx, top);
            self.insert_parent(top, idx)?;
        }

        self.current = Some(idx);
        Ok(())
    }

    /// Attaches `child` to the first empty child slot of `parent`.
    fn attach_child(&mut self, parent: usize, child: usize) -> Result<(), Error> {
        let arity = self.slots[parent].item.template.arity();
        let position = self.slots[parent].children
            .iter()
            .take(arity)
            .position(Option::is_none)
            .ok_or_else(|| self.missing_operator(parent, child))?;

        self.slots[parent].children[position] = Some(child);
        self.slots[child].parent = Some(parent);
        Ok(())
    }

    /// Inserts `new` between `child` and its parent, making `child` the first child of `new`.
    fn insert_parent(&mut self, child: usize, new: usize) -> Result<(), Error> {
        if self.slots[new].item.template.arity() == 0 {
            return Err(self.missing_operator(child, new));
        }

        let old_parent = self.slots[child].parent;
        if let Some(old_parent) = old_parent {
            for slot in self.slots[old_parent].children.iter_mut() {
                if *slot == Some(child) {
                    *slot = Some(new);
                }
            }
        }

        self.slots[new].parent = old_parent;
        self.slots[new].children[0] = Some(child);
        self.slots[child].parent = Some(new);
        Ok(())
    }

    /// Creates an error describing two nodes that could not be joined.
    fn missing_operator(&self, first: usize, second: usize) -> Error {
        let (first, second) = (&self.slots[first].item.span, &self.slots[second].item.span);
        let mut spans = vec![first.clone(), second.clone()];
        spans.sort_by_key(|span| span.start);
        Error::new(spans, kind::MissingOperator)
    }

    /// Finishes building, returning the root of the tree.
    pub fn build(self) -> Result<Node, Error> {
        let Some(mut root) = self.current else {
            return Err(Error::new(vec![0..0], kind::EmptyExpression));
        };
        while let Some(parent) = self.slots[root].parent {
            root = parent;
        }

        // measure before converting, so that conversion recursion stays bounded
        let mut stack = vec![(root, 1)];
        while let Some((idx, height)) = stack.pop() {
            let slot = &self.slots[idx];
            if height > MAX_DEPTH {
                return Err(Error::new(
                    vec![slot.item.span.clone()],
                    kind::NestingTooDeep { max: MAX_DEPTH },
                ));
            }
            stack.extend(slot.children.iter().flatten().map(|&child| (child, height + 1)));
        }

        self.convert(root)
    }

    /// Converts the node at the given index into an owned [`Node`].
    fn convert(&self, idx: usize) -> Result<Node, Error> {
        let slot = &self.slots[idx];
        let span = slot.item.span.clone();
        let child = |position: usize| -> Result<Box<Node>, Error> {
            match slot.children[position] {
                Some(child) => Ok(Box::new(self.convert(child)?)),
                None => Err(Error::new(vec![span.clone()], kind::MissingOperand {
                    arity: slot.item.template.arity(),
                })),
            }
        };

        let kind = match &slot.item.template {
            Template::Literal(literal) => NodeKind::Literal(literal.clone()),
            Template::Unary(op) => NodeKind::Unary(*op, child(0)?),
            Template::Binary(op) => NodeKind::Binary(*op, child(0)?, child(1)?),
        };
        Ok(Node { kind, span })
    }
}
