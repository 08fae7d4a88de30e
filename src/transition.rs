//! Route transition effects
//!
//! After the navigator swaps the displayed root it applies a transition to
//! the new root. A route names its transition with
//! [`Route::with_transition`](crate::Route::with_transition); the name is
//! looked up in the [`TransitionRegistry`], falling back to the registry's
//! default effect, which is a no-op until configured. A missing name is
//! never an error.
//!
//! The engine does not animate anything itself. [`Transition`] describes the
//! common effects (fade, slide) and [`Transition::animate`] hands the
//! descriptor to a toolkit-specific driver.

use crate::error::ConfigError;
use crate::{debug_log, trace_log};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// TransitionEffect
// ============================================================================

/// Visual effect applied to a freshly displayed root.
///
/// Implemented for every `Fn(&R) + Send + Sync` closure.
pub trait TransitionEffect<R>: Send + Sync {
    /// Apply the effect to `root`.
    fn apply(&self, root: &R);
}

impl<R, F> TransitionEffect<R> for F
where
    F: Fn(&R) + Send + Sync,
{
    fn apply(&self, root: &R) {
        self(root);
    }
}

// ============================================================================
// Transition descriptors
// ============================================================================

/// Direction for slide transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Slide from left to right
    Left,
    /// Slide from right to left
    Right,
    /// Slide from top to bottom
    Up,
    /// Slide from bottom to top
    Down,
}

/// Built-in transition types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transition {
    /// No transition animation
    #[default]
    None,

    /// Fade transition (simple opacity animation)
    Fade {
        /// Duration in milliseconds
        duration_ms: u64,
    },

    /// Slide transition
    Slide {
        /// Direction to slide
        direction: SlideDirection,
        /// Duration in milliseconds
        duration_ms: u64,
    },
}

impl Transition {
    /// Create a fade transition
    pub fn fade(duration_ms: u64) -> Self {
        Self::Fade { duration_ms }
    }

    /// Create a slide transition in `direction`
    pub fn slide(direction: SlideDirection, duration_ms: u64) -> Self {
        Self::Slide {
            direction,
            duration_ms,
        }
    }

    /// Get the duration of this transition
    pub fn duration(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fade { duration_ms } | Self::Slide { duration_ms, .. } => {
                Duration::from_millis(*duration_ms)
            }
        }
    }

    /// Check if this is a no-op transition
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Turn this descriptor into an effect by handing it to `driver`
    /// together with the new root.
    ///
    /// # Example
    ///
    /// ```
    /// use scene_navigator::{Transition, TransitionEffect};
    ///
    /// let effect = Transition::fade(200).animate(|root: &String, transition| {
    ///     assert_eq!(root, "home");
    ///     assert_eq!(transition.duration().as_millis(), 200);
    /// });
    /// effect.apply(&"home".to_string());
    /// ```
    pub fn animate<R, D>(self, driver: D) -> impl Fn(&R) + Send + Sync
    where
        D: Fn(&R, &Transition) + Send + Sync,
    {
        move |root: &R| {
            trace_log!("Animating {:?} over {:?}", self, self.duration());
            driver(root, &self);
        }
    }
}

// ============================================================================
// TransitionRegistry
// ============================================================================

/// Named transition effects plus one default.
pub struct TransitionRegistry<R: 'static> {
    named: HashMap<String, Arc<dyn TransitionEffect<R>>>,
    default: Arc<dyn TransitionEffect<R>>,
}

impl<R: 'static> TransitionRegistry<R> {
    /// Create a registry whose default effect does nothing.
    pub fn new() -> Self {
        Self {
            named: HashMap::new(),
            default: Arc::new(|_: &R| {}),
        }
    }

    /// Register a named effect. Names can only be registered once.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        effect: impl TransitionEffect<R> + 'static,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.named.contains_key(&name) {
            return Err(ConfigError::DuplicateKey { key: name });
        }
        debug_log!("Registered transition '{}'", name);
        self.named.insert(name, Arc::new(effect));
        Ok(())
    }

    /// Replace the default effect.
    pub fn set_default(&mut self, effect: impl TransitionEffect<R> + 'static) {
        self.default = Arc::new(effect);
    }

    /// Effect registered under `name`, or the default effect.
    pub fn resolve(&self, name: Option<&str>) -> &dyn TransitionEffect<R> {
        match name {
            Some(name) => match self.named.get(name) {
                Some(effect) => effect.as_ref(),
                None => {
                    debug_log!("Transition '{}' not registered, using default", name);
                    self.default.as_ref()
                }
            },
            None => self.default.as_ref(),
        }
    }

    /// Check if a named effect is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Number of named effects (the default is not counted).
    pub fn len(&self) -> usize {
        self.named.len()
    }

    /// Return `true` if no named effect is registered.
    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }
}

impl<R: 'static> Default for TransitionRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: 'static> Clone for TransitionRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            named: self.named.clone(),
            default: Arc::clone(&self.default),
        }
    }
}

impl<R: 'static> fmt::Debug for TransitionRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.named.keys().collect();
        names.sort();
        f.debug_struct("TransitionRegistry")
            .field("named", &names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_transition_none() {
        let transition = Transition::default();
        assert!(transition.is_none());
        assert_eq!(transition.duration(), Duration::ZERO);
    }

    #[test]
    fn test_descriptor_durations() {
        assert_eq!(Transition::fade(200).duration(), Duration::from_millis(200));
        let slide = Transition::slide(SlideDirection::Right, 300);
        assert!(!slide.is_none());
        assert_eq!(slide.duration(), Duration::from_millis(300));
        assert_eq!(
            slide,
            Transition::Slide {
                direction: SlideDirection::Right,
                duration_ms: 300
            }
        );
    }

    #[test]
    fn test_registry_falls_back_to_default() {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let mut registry = TransitionRegistry::<&'static str>::new();

        let named = applied.clone();
        registry
            .add("fade", move |root: &&'static str| {
                named.lock().unwrap().push(format!("fade:{root}"));
            })
            .unwrap();
        let fallback = applied.clone();
        registry.set_default(move |root: &&'static str| {
            fallback.lock().unwrap().push(format!("default:{root}"));
        });

        registry.resolve(Some("fade")).apply(&"a");
        registry.resolve(Some("missing")).apply(&"b");
        registry.resolve(None).apply(&"c");

        assert_eq!(
            *applied.lock().unwrap(),
            vec!["fade:a", "default:b", "default:c"]
        );
    }

    #[test]
    fn test_unconfigured_default_is_no_op() {
        let registry = TransitionRegistry::<u32>::new();
        registry.resolve(Some("anything")).apply(&1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = TransitionRegistry::<u32>::new();
        registry.add("fade", |_: &u32| {}).unwrap();
        assert_eq!(
            registry.add("fade", |_: &u32| {}),
            Err(ConfigError::DuplicateKey {
                key: "fade".to_string()
            })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_animate_passes_descriptor() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let effect = Transition::slide(SlideDirection::Left, 150).animate(move |root: &u32, t| {
            *sink.lock().unwrap() = Some((*root, *t));
        });
        effect.apply(&9);
        assert_eq!(
            *seen.lock().unwrap(),
            Some((9, Transition::slide(SlideDirection::Left, 150)))
        );
    }
}
