#![forbid(unsafe_code)]

//! Tour items and target resolution.
//!
//! A [`TooltipItem`] names its target with a [`TargetRef`]: either an opaque
//! [`TargetHandle`] the host's [`GeometryResolver`] understands, or a
//! [`TargetLookup`] closure that reports the bounds directly. Both go through
//! [`GeometryResolver::resolve`], so the controller sees one code path.
//!
//! All rectangles share the coordinate space of
//! [`GeometryResolver::root_bounds`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tiptour_core::geometry::Rect;
use tiptour_layout::anchor::Side;

/// Errors from target resolution. The controller treats both as "skip this step".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The target could not be located, or is not currently laid out.
    Unresolvable(String),
    /// There is no root container to present into.
    NoRootContainer,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Unresolvable(what) => write!(f, "target unresolvable: {what}"),
            ResolveError::NoRootContainer => write!(f, "no root container available"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Opaque identifier for a host UI element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetHandle(String);

impl TargetHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetHandle {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TargetHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Host-supplied function returning the target's current bounds.
///
/// Returning `None` means the target is gone or hidden.
#[derive(Clone)]
pub struct TargetLookup(Rc<dyn Fn() -> Option<Rect>>);

impl TargetLookup {
    pub fn new(lookup: impl Fn() -> Option<Rect> + 'static) -> Self {
        Self(Rc::new(lookup))
    }

    /// Invoke the lookup.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        (self.0)()
    }
}

impl fmt::Debug for TargetLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TargetLookup(..)")
    }
}

/// Reference to the element a step points at.
#[derive(Debug, Clone)]
pub enum TargetRef {
    Handle(TargetHandle),
    Lookup(TargetLookup),
}

impl TargetRef {
    /// Reference by handle.
    pub fn handle(id: impl Into<TargetHandle>) -> Self {
        TargetRef::Handle(id.into())
    }

    /// Reference by lookup closure.
    pub fn lookup(lookup: impl Fn() -> Option<Rect> + 'static) -> Self {
        TargetRef::Lookup(TargetLookup::new(lookup))
    }
}

impl From<TargetHandle> for TargetRef {
    fn from(handle: TargetHandle) -> Self {
        TargetRef::Handle(handle)
    }
}

impl From<&str> for TargetRef {
    fn from(id: &str) -> Self {
        TargetRef::Handle(id.into())
    }
}

impl From<TargetLookup> for TargetRef {
    fn from(lookup: TargetLookup) -> Self {
        TargetRef::Lookup(lookup)
    }
}

/// One step of a tour: what to point at, what to say, and where.
#[derive(Debug, Clone)]
pub struct TooltipItem {
    target: TargetRef,
    message: String,
    side: Side,
}

impl TooltipItem {
    pub fn new(target: impl Into<TargetRef>, message: impl Into<String>, side: Side) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
            side,
        }
    }

    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

/// Maps target references to rectangles in the root container's space.
pub trait GeometryResolver {
    /// Bounds of the root container the tour is presented in.
    fn root_bounds(&self) -> Result<Rect, ResolveError>;

    /// Bounds of the element identified by `handle`.
    fn resolve_handle(&self, handle: &TargetHandle) -> Result<Rect, ResolveError>;

    /// Bounds of any target reference.
    fn resolve(&self, target: &TargetRef) -> Result<Rect, ResolveError> {
        match target {
            TargetRef::Handle(handle) => self.resolve_handle(handle),
            TargetRef::Lookup(lookup) => lookup
                .bounds()
                .ok_or_else(|| ResolveError::Unresolvable("lookup returned no bounds".into())),
        }
    }
}

impl<R: GeometryResolver + ?Sized> GeometryResolver for &R {
    fn root_bounds(&self) -> Result<Rect, ResolveError> {
        (**self).root_bounds()
    }

    fn resolve_handle(&self, handle: &TargetHandle) -> Result<Rect, ResolveError> {
        (**self).resolve_handle(handle)
    }

    fn resolve(&self, target: &TargetRef) -> Result<Rect, ResolveError> {
        (**self).resolve(target)
    }
}

/// Resolver backed by a fixed table of handle bounds.
///
/// Useful for tests, headless hosts and hosts that already track layout.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    root: Option<Rect>,
    targets: HashMap<TargetHandle, Rect>,
}

impl StaticResolver {
    /// Create a resolver with the given root bounds.
    #[must_use]
    pub fn new(root: Rect) -> Self {
        Self {
            root: Some(root),
            targets: HashMap::new(),
        }
    }

    /// Create a resolver with no root container. Every step is skipped.
    #[must_use]
    pub fn without_root() -> Self {
        Self::default()
    }

    /// Register a target (builder form).
    #[must_use]
    pub fn with_target(mut self, handle: impl Into<TargetHandle>, bounds: Rect) -> Self {
        self.insert(handle, bounds);
        self
    }

    /// Register or move a target.
    pub fn insert(&mut self, handle: impl Into<TargetHandle>, bounds: Rect) -> Option<Rect> {
        self.targets.insert(handle.into(), bounds)
    }

    /// Forget a target; later lookups fail.
    pub fn remove(&mut self, handle: &TargetHandle) -> Option<Rect> {
        self.targets.remove(handle)
    }

    /// Replace the root bounds.
    pub fn set_root(&mut self, root: Option<Rect>) {
        self.root = root;
    }
}

impl GeometryResolver for StaticResolver {
    fn root_bounds(&self) -> Result<Rect, ResolveError> {
        self.root.ok_or(ResolveError::NoRootContainer)
    }

    fn resolve_handle(&self, handle: &TargetHandle) -> Result<Rect, ResolveError> {
        self.targets
            .get(handle)
            .copied()
            .ok_or_else(|| ResolveError::Unresolvable(format!("no target registered as {handle}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const ROOT: Rect = Rect::from_size(375.0, 800.0);

    #[test]
    fn static_resolver_resolves_registered_handles() {
        let resolver = StaticResolver::new(ROOT).with_target("profile", Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(resolver.root_bounds(), Ok(ROOT));
        assert_eq!(
            resolver.resolve(&TargetRef::handle("profile")),
            Ok(Rect::new(10.0, 20.0, 30.0, 40.0))
        );
        assert!(matches!(
            resolver.resolve(&TargetRef::handle("missing")),
            Err(ResolveError::Unresolvable(_))
        ));
    }

    #[test]
    fn missing_root_is_reported() {
        let resolver = StaticResolver::without_root();
        assert_eq!(resolver.root_bounds(), Err(ResolveError::NoRootContainer));
    }

    #[test]
    fn remove_makes_target_unresolvable() {
        let mut resolver = StaticResolver::new(ROOT).with_target("a", Rect::new(0.0, 0.0, 1.0, 1.0));
        resolver.remove(&TargetHandle::new("a"));
        assert!(resolver.resolve(&"a".into()).is_err());
    }

    #[test]
    fn lookup_is_called_on_each_resolve() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let target = TargetRef::lookup(move || {
            counter.set(counter.get() + 1);
            Some(Rect::new(5.0, 5.0, 10.0, 10.0))
        });
        let resolver = StaticResolver::new(ROOT);
        assert!(resolver.resolve(&target).is_ok());
        assert!(resolver.resolve(&target).is_ok());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn lookup_returning_none_is_unresolvable() {
        let resolver = StaticResolver::new(ROOT);
        let target = TargetRef::lookup(|| None);
        assert!(matches!(resolver.resolve(&target), Err(ResolveError::Unresolvable(_))));
    }

    #[test]
    fn item_clones_share_lookup() {
        let item = TooltipItem::new(TargetRef::lookup(|| Some(Rect::default())), "hi", Side::Top);
        let copy = item.clone();
        assert_eq!(copy.message(), "hi");
        assert_eq!(copy.side(), Side::Top);
        assert!(matches!(copy.target(), TargetRef::Lookup(_)));
    }

    #[test]
    fn error_display() {
        assert_eq!(ResolveError::NoRootContainer.to_string(), "no root container available");
        assert_eq!(
            ResolveError::Unresolvable("x".into()).to_string(),
            "target unresolvable: x"
        );
    }
}
