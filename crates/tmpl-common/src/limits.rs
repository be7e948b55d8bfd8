//! Centralized limits and thresholds.
//!
//! Template expressions are short, but editors feed us whatever the user has
//! typed so far; these bounds keep recursion finite on pathological input.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth for expression parsing.
///
/// Deeper input produces a parse error and an empty node instead of recursing.
pub const MAX_PARSE_DEPTH: u32 = 256;

/// Maximum depth for expression type checking.
///
/// Deeper nodes type as `any`. Checking a long operator chain nests this
/// deep, so the checker grows its stack on demand (see the stack constants).
pub const MAX_EXPR_CHECK_DEPTH: u32 = 500;

// =============================================================================
// Stack Growth
// =============================================================================

/// Remaining stack below which a recursive pass switches to a new segment.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated for deep recursion.
pub const STACK_SEGMENT_SIZE: usize = 1024 * 1024;

/// Maximum number of `.type` hops followed when deciding whether a symbol is `any`.
pub const MAX_TYPE_CHAIN_DEPTH: u32 = 32;
