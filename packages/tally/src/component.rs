//! The definition of the [`Component`] trait.

use crate::generic_node::GenericNode;
use crate::reactive::*;
use crate::view::View;

/// Trait that is implemented by components.
///
/// Components are plain functions taking a scope and their properties. There is no need to
/// implement this trait manually.
pub trait Component<G: GenericNode, Props> {
    /// Create a new component with an instance of the properties.
    fn create_component(&self, ctx: ScopeRef<'_>, props: Props) -> View<G>;
}

impl<G: GenericNode, Props, T> Component<G, Props> for T
where
    T: Fn(ScopeRef<'_>, Props) -> View<G>,
{
    fn create_component(&self, ctx: ScopeRef<'_>, props: Props) -> View<G> {
        self(ctx, props)
    }
}

/// Instantiates a component.
///
/// The component body runs untracked so that an enclosing effect does not subscribe to the
/// signals the component reads while it is being built.
#[inline(always)]
pub fn instantiate<G: GenericNode, Props, C: Component<G, Props>>(
    component: &C,
    ctx: ScopeRef<'_>,
    props: Props,
) -> View<G> {
    tracing::trace!(
        component = std::any::type_name::<C>(),
        "instantiating component"
    );
    untrack(|| component.create_component(ctx, props))
}
