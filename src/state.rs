//! Navigation history.
//!
//! Every committed navigation produces an immutable [`NavigationState`]. The
//! [`NavigationStack`] keeps them in visiting order; its top is the state
//! currently displayed.

use crate::args::Args;
use crate::lifecycle::Routable;
use crate::route::Route;
use std::fmt;
use std::sync::{Arc, Weak};

/// Snapshot of one displayed route.
pub struct NavigationState<R> {
    route: Arc<Route>,
    root: R,
    args: Args,
    controller: Weak<dyn Routable>,
}

impl<R> NavigationState<R> {
    /// Capture a displayed route. The controller is held weakly; the
    /// component registry owns it.
    pub fn new(route: Arc<Route>, root: R, args: Args, controller: &Arc<dyn Routable>) -> Self {
        Self {
            route,
            root,
            args,
            controller: Arc::downgrade(controller),
        }
    }

    /// Route displayed by this state.
    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    /// Root node that was rendered.
    pub fn root(&self) -> &R {
        &self.root
    }

    /// Arguments the route was navigated with.
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Controller bound to the view, if the registry still holds it.
    pub fn controller(&self) -> Option<Arc<dyn Routable>> {
        self.controller.upgrade()
    }
}

impl<R: Clone> Clone for NavigationState<R> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
            root: self.root.clone(),
            args: self.args.clone(),
            controller: Weak::clone(&self.controller),
        }
    }
}

impl<R> fmt::Debug for NavigationState<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationState")
            .field("route", &self.route.name())
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Returned by [`NavigationStack::pop`] when popping would leave nothing to
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyStackNoOp;

impl fmt::Display for EmptyStackNoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no previous navigation state")
    }
}

impl std::error::Error for EmptyStackNoOp {}

/// Ordered history of navigation states; last = displayed.
pub struct NavigationStack<R> {
    entries: Vec<NavigationState<R>>,
}

impl<R> NavigationStack<R> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Push a new state on top.
    pub fn push(&mut self, state: NavigationState<R>) {
        self.entries.push(state);
    }

    /// Replace the top state. On an empty stack this is a push.
    pub fn replace_top(&mut self, state: NavigationState<R>) -> Option<NavigationState<R>> {
        let previous = self.entries.pop();
        self.entries.push(state);
        previous
    }

    /// Remove and return the top state.
    ///
    /// Fails when fewer than two states are stored, so there is always a
    /// state left to display.
    pub fn pop(&mut self) -> Result<NavigationState<R>, EmptyStackNoOp> {
        if self.entries.len() < 2 {
            return Err(EmptyStackNoOp);
        }
        self.entries.pop().ok_or(EmptyStackNoOp)
    }

    /// State currently displayed.
    pub fn peek(&self) -> Option<&NavigationState<R>> {
        self.entries.last()
    }

    /// State below the top, the one `back()` returns to.
    pub fn peek_previous(&self) -> Option<&NavigationState<R>> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    /// Drop every state.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` before the first navigation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate from the oldest state to the displayed one.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationState<R>> {
        self.entries.iter()
    }
}

impl<R> Default for NavigationStack<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for NavigationStack<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|s| s.route.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::ControllerKey;

    struct Page;
    impl Routable for Page {}

    fn state(name: &str, controller: &Arc<dyn Routable>) -> NavigationState<String> {
        let route = Arc::new(Route::new(name, format!("/{name}.fxml"), ControllerKey::of::<Page>()));
        NavigationState::new(route, format!("root:{name}"), Args::none(), controller)
    }

    fn names(stack: &NavigationStack<String>) -> Vec<String> {
        stack.iter().map(|s| s.route().name().to_string()).collect()
    }

    #[test]
    fn test_push_and_peek() {
        let controller: Arc<dyn Routable> = Arc::new(Page);
        let mut stack = NavigationStack::new();
        assert!(stack.peek().is_none());

        stack.push(state("a", &controller));
        stack.push(state("b", &controller));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek().unwrap().root(), "root:b");
        assert_eq!(stack.peek_previous().unwrap().route().name(), "a");
    }

    #[test]
    fn test_pop_keeps_last_entry() {
        let controller: Arc<dyn Routable> = Arc::new(Page);
        let mut stack = NavigationStack::new();
        assert_eq!(stack.pop().unwrap_err(), EmptyStackNoOp);

        stack.push(state("a", &controller));
        assert_eq!(stack.pop().unwrap_err(), EmptyStackNoOp);
        assert_eq!(stack.len(), 1);

        stack.push(state("b", &controller));
        let popped = stack.pop().unwrap();
        assert_eq!(popped.route().name(), "b");
        assert_eq!(names(&stack), ["a"]);
    }

    #[test]
    fn test_replace_top() {
        let controller: Arc<dyn Routable> = Arc::new(Page);
        let mut stack = NavigationStack::new();

        assert!(stack.replace_top(state("a", &controller)).is_none());
        assert_eq!(stack.len(), 1);

        stack.push(state("b", &controller));
        let replaced = stack.replace_top(state("c", &controller)).unwrap();
        assert_eq!(replaced.route().name(), "b");
        assert_eq!(names(&stack), ["a", "c"]);
    }

    #[test]
    fn test_clear() {
        let controller: Arc<dyn Routable> = Arc::new(Page);
        let mut stack = NavigationStack::new();
        stack.push(state("a", &controller));
        stack.push(state("b", &controller));
        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.peek_previous().is_none());
    }

    #[test]
    fn test_controller_is_held_weakly() {
        let controller: Arc<dyn Routable> = Arc::new(Page);
        let entry = state("a", &controller);
        assert!(entry.controller().is_some());

        drop(controller);
        assert!(entry.controller().is_none());
    }
}
