//! Expression AST.
//!
//! Nodes live in an [`ExprArena`] and refer to each other by [`ExprId`].
//! An id is the node's identity: the checker memoizes per-node results by
//! id, and the position resolver walks the tree through [`ExprArena::children`].
//!
//! `ExprKind` is a closed enum. Consumers match it exhaustively, so adding a
//! node kind is a compile error everywhere a kind must be handled.
//!
//! All spans are relative to the text the expression was parsed from.

use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use tmpl_common::diagnostics::Diagnostic;
use tmpl_common::span::Span;

/// Index of a node in an [`ExprArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExprId(pub u32);

/// Binary operators.
///
/// `|` never reaches the parser as a binary operator (it introduces a pipe),
/// but hosts constructing trees directly may still use `BitwiseOr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
    Equals,
    NotEquals,
    StrictEquals,
    StrictNotEquals,
    LogicalAnd,
    LogicalOr,
    NullishCoalescing,
}

impl BinaryOperator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::UnsignedRightShift => ">>>",
            Self::BitwiseAnd => "&",
            Self::BitwiseXor => "^",
            Self::BitwiseOr => "|",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanEquals => "<=",
            Self::GreaterThanEquals => ">=",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::StrictEquals => "===",
            Self::StrictNotEquals => "!==",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::NullishCoalescing => "??",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a literal primitive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum LiteralValue {
    Boolean(bool),
    Null,
    Undefined,
    String(String),
    Number(f64),
}

/// Key of a literal map entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LiteralMapKey {
    pub key: String,
    pub quoted: bool,
}

/// Node payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ExprKind {
    /// Placeholder produced by error recovery.
    Empty,
    /// The receiver of unqualified names (`name` reads `<implicit>.name`).
    ImplicitReceiver,
    Binary {
        operator: BinaryOperator,
        left: ExprId,
        right: ExprId,
    },
    Chain {
        expressions: Vec<ExprId>,
    },
    Conditional {
        condition: ExprId,
        true_exp: ExprId,
        false_exp: ExprId,
    },
    /// Call of an arbitrary expression (`fn(a)`, `getter()(x)`).
    Call {
        target: ExprId,
        args: Vec<ExprId>,
    },
    Interpolation {
        strings: Vec<String>,
        expressions: Vec<ExprId>,
    },
    KeyedRead {
        receiver: ExprId,
        key: ExprId,
    },
    KeyedWrite {
        receiver: ExprId,
        key: ExprId,
        value: ExprId,
    },
    LiteralArray {
        elements: Vec<ExprId>,
    },
    LiteralMap {
        keys: Vec<LiteralMapKey>,
        values: Vec<ExprId>,
    },
    LiteralPrimitive {
        value: LiteralValue,
    },
    MethodCall {
        receiver: ExprId,
        name: String,
        name_span: Span,
        args: Vec<ExprId>,
    },
    NonNullAssert {
        expression: ExprId,
    },
    Pipe {
        expression: ExprId,
        name: String,
        name_span: Span,
        args: Vec<ExprId>,
    },
    PrefixNot {
        expression: ExprId,
    },
    PropertyRead {
        receiver: ExprId,
        name: String,
        name_span: Span,
    },
    PropertyWrite {
        receiver: ExprId,
        name: String,
        name_span: Span,
        value: ExprId,
    },
    /// `prefix:uninterpreted` text handed to an external interpreter.
    Quote {
        prefix: String,
        uninterpreted: String,
    },
    SafeMethodCall {
        receiver: ExprId,
        name: String,
        name_span: Span,
        args: Vec<ExprId>,
    },
    SafePropertyRead {
        receiver: ExprId,
        name: String,
        name_span: Span,
    },
}

impl ExprKind {
    /// Short kind name, for logging.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::ImplicitReceiver => "ImplicitReceiver",
            Self::Binary { .. } => "Binary",
            Self::Chain { .. } => "Chain",
            Self::Conditional { .. } => "Conditional",
            Self::Call { .. } => "Call",
            Self::Interpolation { .. } => "Interpolation",
            Self::KeyedRead { .. } => "KeyedRead",
            Self::KeyedWrite { .. } => "KeyedWrite",
            Self::LiteralArray { .. } => "LiteralArray",
            Self::LiteralMap { .. } => "LiteralMap",
            Self::LiteralPrimitive { .. } => "LiteralPrimitive",
            Self::MethodCall { .. } => "MethodCall",
            Self::NonNullAssert { .. } => "NonNullAssert",
            Self::Pipe { .. } => "Pipe",
            Self::PrefixNot { .. } => "PrefixNot",
            Self::PropertyRead { .. } => "PropertyRead",
            Self::PropertyWrite { .. } => "PropertyWrite",
            Self::Quote { .. } => "Quote",
            Self::SafeMethodCall { .. } => "SafeMethodCall",
            Self::SafePropertyRead { .. } => "SafePropertyRead",
        }
    }

    /// Member name and its span, for the member-like kinds.
    #[must_use]
    pub fn member_name(&self) -> Option<(&str, Span)> {
        match self {
            Self::MethodCall {
                name, name_span, ..
            }
            | Self::PropertyRead {
                name, name_span, ..
            }
            | Self::PropertyWrite {
                name, name_span, ..
            }
            | Self::SafeMethodCall {
                name, name_span, ..
            }
            | Self::SafePropertyRead {
                name, name_span, ..
            }
            | Self::Pipe {
                name, name_span, ..
            } => Some((name, *name_span)),
            _ => None,
        }
    }
}

/// A node: span plus payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExprNode {
    pub span: Span,
    pub kind: ExprKind,
}

/// Arena owning every node of one parse.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
}

impl ExprArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, span: Span, kind: ExprKind) -> ExprId {
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(ExprNode { span, kind });
        id
    }

    #[must_use]
    pub fn get(&self, id: ExprId) -> Option<&ExprNode> {
        self.nodes.get(id.0 as usize)
    }

    #[must_use]
    pub fn kind(&self, id: ExprId) -> Option<&ExprKind> {
        self.get(id).map(|node| &node.kind)
    }

    /// Span of a node; a dangling id yields an empty span at 0.
    #[must_use]
    pub fn span(&self, id: ExprId) -> Span {
        self.get(id).map(|node| node.span).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of a node, in source order.
    #[must_use]
    pub fn children(&self, id: ExprId) -> SmallVec<[ExprId; 4]> {
        let mut out = SmallVec::new();
        let Some(node) = self.get(id) else {
            return out;
        };
        match &node.kind {
            ExprKind::Empty
            | ExprKind::ImplicitReceiver
            | ExprKind::LiteralPrimitive { .. }
            | ExprKind::Quote { .. } => {}
            ExprKind::Binary { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            ExprKind::Chain { expressions } | ExprKind::Interpolation { expressions, .. } => {
                out.extend(expressions.iter().copied());
            }
            ExprKind::Conditional {
                condition,
                true_exp,
                false_exp,
            } => {
                out.push(*condition);
                out.push(*true_exp);
                out.push(*false_exp);
            }
            ExprKind::Call { target, args } => {
                out.push(*target);
                out.extend(args.iter().copied());
            }
            ExprKind::KeyedRead { receiver, key } => {
                out.push(*receiver);
                out.push(*key);
            }
            ExprKind::KeyedWrite {
                receiver,
                key,
                value,
            } => {
                out.push(*receiver);
                out.push(*key);
                out.push(*value);
            }
            ExprKind::LiteralArray { elements } => out.extend(elements.iter().copied()),
            ExprKind::LiteralMap { values, .. } => out.extend(values.iter().copied()),
            ExprKind::MethodCall { receiver, args, .. }
            | ExprKind::SafeMethodCall { receiver, args, .. } => {
                out.push(*receiver);
                out.extend(args.iter().copied());
            }
            ExprKind::Pipe {
                expression, args, ..
            } => {
                out.push(*expression);
                out.extend(args.iter().copied());
            }
            ExprKind::NonNullAssert { expression } | ExprKind::PrefixNot { expression } => {
                out.push(*expression);
            }
            ExprKind::PropertyRead { receiver, .. }
            | ExprKind::SafePropertyRead { receiver, .. } => out.push(*receiver),
            ExprKind::PropertyWrite {
                receiver, value, ..
            } => {
                out.push(*receiver);
                out.push(*value);
            }
        }
        out
    }
}

/// Result of parsing one piece of expression text.
#[derive(Clone, Debug, Serialize)]
pub struct ParsedExpression {
    /// The text that was parsed.
    pub source: String,
    /// Human-readable origin (file and attribute), used in messages.
    pub location: String,
    /// Offset of `source` within the enclosing template.
    pub base_offset: u32,
    pub arena: ExprArena,
    pub root: ExprId,
    /// Parse errors, spans relative to `source`.
    pub errors: Vec<Diagnostic>,
}

impl ParsedExpression {
    #[must_use]
    pub fn root_node(&self) -> Option<&ExprNode> {
        self.arena.get(self.root)
    }

    /// Span of the whole expression in template coordinates.
    #[must_use]
    pub fn template_span(&self) -> Span {
        Span::from_len(self.base_offset, self.source.len() as u32)
    }

    /// Convert a template offset into an offset relative to `source`.
    #[must_use]
    pub fn relative_position(&self, template_position: u32) -> Option<u32> {
        let span = self.template_span();
        span.contains(template_position)
            .then(|| template_position - self.base_offset)
    }
}
