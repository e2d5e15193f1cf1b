//! Scoped provider/consumer propagation.
//!
//! A [`SharedContext`] is created once by the bootstrap code and passed by
//! reference to every constructor that needs it. The owner of some state
//! calls [`SharedContext::provide`] and builds its subtree while the returned
//! [`ProviderScope`] is alive; components built inside the scope call
//! [`SharedContext::consume`] instead of receiving the value through every
//! intermediate layer.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::trace;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "application::context";

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("`{context}` consumed outside of any provider scope")]
pub struct MissingProviderError {
    pub context: &'static str,
}

pub struct SharedContext<T> {
    name: &'static str,
    scopes: RwLock<Vec<(u64, T)>>,
    next_scope: AtomicU64,
}

impl<T: Clone> SharedContext<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            scopes: RwLock::new(Vec::new()),
            next_scope: AtomicU64::new(0),
        }
    }

    /// Make `value` available to `consume` until the returned scope is dropped.
    ///
    /// Scopes nest: the most recently opened live scope wins.
    pub fn provide(&self, value: T) -> ProviderScope<'_, T> {
        let id = self.next_scope.fetch_add(1, Ordering::SeqCst);
        rw_write(&self.scopes, SOURCE, "provide").push((id, value));
        trace!(context = self.name, scope = id, "Provider scope opened");
        ProviderScope { context: self, id }
    }

    pub fn consume(&self) -> Result<T, MissingProviderError> {
        rw_read(&self.scopes, SOURCE, "consume")
            .last()
            .map(|(_, value)| value.clone())
            .ok_or(MissingProviderError { context: self.name })
    }

    pub fn is_provided(&self) -> bool {
        !rw_read(&self.scopes, SOURCE, "is_provided").is_empty()
    }

    fn close(&self, id: u64) {
        rw_write(&self.scopes, SOURCE, "close").retain(|(scope, _)| *scope != id);
        trace!(context = self.name, scope = id, "Provider scope closed");
    }
}

/// Live provider scope; dropping it withdraws the value it provided.
#[must_use = "the provided value is withdrawn as soon as the scope is dropped"]
pub struct ProviderScope<'a, T: Clone> {
    context: &'a SharedContext<T>,
    id: u64,
}

impl<T: Clone> Drop for ProviderScope<'_, T> {
    fn drop(&mut self) {
        self.context.close(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_without_provider_fails() {
        let context: SharedContext<u32> = SharedContext::new("Numbers");

        assert_eq!(
            context.consume(),
            Err(MissingProviderError { context: "Numbers" })
        );
        assert!(!context.is_provided());
    }

    #[test]
    fn consume_inside_scope_sees_the_value() {
        let context = SharedContext::new("Numbers");
        let _scope = context.provide(5_u32);

        assert_eq!(context.consume(), Ok(5));
    }

    #[test]
    fn dropping_the_scope_withdraws_the_value() {
        let context = SharedContext::new("Numbers");
        {
            let _scope = context.provide(5_u32);
            assert!(context.is_provided());
        }

        assert!(context.consume().is_err());
    }

    #[test]
    fn innermost_scope_wins_and_outer_resumes() {
        let context = SharedContext::new("Numbers");
        let _outer = context.provide(1_u32);
        {
            let _inner = context.provide(2_u32);
            assert_eq!(context.consume(), Ok(2));
        }

        assert_eq!(context.consume(), Ok(1));
    }

    #[test]
    fn scopes_may_close_out_of_order() {
        let context = SharedContext::new("Numbers");
        let outer = context.provide(1_u32);
        let inner = context.provide(2_u32);

        drop(outer);
        assert_eq!(context.consume(), Ok(2));
        drop(inner);
        assert!(context.consume().is_err());
    }

    #[test]
    fn error_names_the_context() {
        let context: SharedContext<String> = SharedContext::new("PostContext");
        let error = context.consume().expect_err("no provider");

        assert_eq!(
            error.to_string(),
            "`PostContext` consumed outside of any provider scope"
        );
    }
}
