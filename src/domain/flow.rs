//! Early-exit plumbing shared by all traversals.
//!
//! Visitor closures may return either `()` (always continue) or a
//! `ControlFlow<B>` to stop the walk and hand `B` back to the caller.

use std::convert::Infallible;
use std::ops::ControlFlow;

/// Return type of a visitor closure.
pub trait Flow {
    type Break;

    fn into_flow(self) -> ControlFlow<Self::Break>;
}

impl Flow for () {
    type Break = Infallible;

    fn into_flow(self) -> ControlFlow<Infallible> {
        ControlFlow::Continue(())
    }
}

impl<B> Flow for ControlFlow<B> {
    type Break = B;

    fn into_flow(self) -> ControlFlow<B> {
        self
    }
}

/// Extracts the break value of a finished traversal, if it stopped early.
pub fn break_value<B>(flow: ControlFlow<B>) -> Option<B> {
    match flow {
        ControlFlow::Break(value) => Some(value),
        ControlFlow::Continue(()) => None,
    }
}
