// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor and transformer infrastructure for tree traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order (left-to-right, top-to-bottom)
//!
//! The [`Visitor`] trait provides read-only traversal; [`walk_module`] drives
//! it. The [`Transformer`] trait rebuilds statement and handler lists, and
//! [`transform_module`] drives it.

mod comment_collector;
mod dispatch;
mod span_collector;
mod traits;

pub use comment_collector::{CommentCollector, CommentInfo};
pub use dispatch::{transform_module, walk_expr, walk_module, walk_stmt};
pub use span_collector::{SpanCollector, StatementSpan};
pub use traits::{Transform, Transformer, VisitResult, Visitor};
