//! Navigation arguments.
//!
//! [`Args`] is the opaque payload handed from the caller of a navigation to
//! the controller that becomes current. The navigator never looks inside it;
//! it only stores it in the [`NavigationState`](crate::NavigationState) so
//! it can be replayed on `back()`, `pop()` and `refresh()`.
//!
//! # Example
//!
//! ```
//! use scene_navigator::Args;
//!
//! struct UserId(u32);
//!
//! let args = Args::new(UserId(42));
//! assert_eq!(args.get::<UserId>().map(|id| id.0), Some(42));
//! assert!(args.get::<String>().is_none());
//! assert!(Args::none().is_none());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque, cheaply cloneable navigation payload.
#[derive(Clone, Default)]
pub struct Args {
    value: Option<Arc<dyn Any + Send + Sync>>,
}

impl Args {
    /// Arguments carrying nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Some(Arc::new(value)),
        }
    }

    /// Wrap an already shared value without re-allocating.
    pub fn from_arc(value: Arc<dyn Any + Send + Sync>) -> Self {
        Self { value: Some(value) }
    }

    /// Borrow the payload as `T`, if it is one.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.as_deref()?.downcast_ref::<T>()
    }

    /// Check if there is no payload.
    pub fn is_none(&self) -> bool {
        self.value.is_none()
    }

    /// Check if both handles point at the same payload.
    ///
    /// Two empty `Args` are considered the same.
    pub fn same_as(&self, other: &Args) -> bool {
        match (&self.value, &other.value) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(_) => f.write_str("Args(..)"),
            None => f.write_str("Args(None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let args = Args::new("settings".to_string());
        assert_eq!(args.get::<String>().map(String::as_str), Some("settings"));
        assert!(args.get::<u32>().is_none());
        assert!(!args.is_none());
    }

    #[test]
    fn test_clone_shares_payload() {
        let args = Args::new(7_u8);
        let copy = args.clone();
        assert!(args.same_as(&copy));
        assert!(!args.same_as(&Args::new(7_u8)));
        assert!(Args::none().same_as(&Args::none()));
    }

    #[test]
    fn test_debug_hides_payload() {
        assert_eq!(format!("{:?}", Args::none()), "Args(None)");
        assert_eq!(format!("{:?}", Args::new(1)), "Args(..)");
    }
}
