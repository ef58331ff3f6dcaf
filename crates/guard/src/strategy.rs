//! View selection strategies.
//!
//! The UI layer hands the guard two render strategies and the decision
//! picks one. This replaces component-as-prop polymorphism with an
//! explicit seam: both arms are ordinary values, typed to produce the
//! same output.

/// Something that can produce a rendered view.
pub trait ViewStrategy {
    type Output;

    fn render(self) -> Self::Output;
}

/// Strategy used when the check passes.
pub struct AllowRender<F>(pub F);

/// Strategy used when the check fails (access-denied screens, fallback
/// content, nothing at all).
pub struct DenyRender<F>(pub F);

impl<F, O> ViewStrategy for AllowRender<F>
where
    F: FnOnce() -> O,
{
    type Output = O;

    fn render(self) -> O {
        (self.0)()
    }
}

impl<F, O> ViewStrategy for DenyRender<F>
where
    F: FnOnce() -> O,
{
    type Output = O;

    fn render(self) -> O {
        (self.0)()
    }
}

/// Pick a strategy by a permission decision.
pub fn select<A, D, O>(granted: bool, allow: A, deny: D) -> O
where
    A: ViewStrategy<Output = O>,
    D: ViewStrategy<Output = O>,
{
    if granted { allow.render() } else { deny.render() }
}

impl crate::guard::GuardOutcome {
    /// Render the screen for this outcome: the allow strategy for
    /// [`Allowed`](crate::guard::GuardOutcome::Allowed), the deny
    /// strategy for everything else that has settled, and the deny
    /// strategy for `Checking` too (callers wanting a distinct spinner
    /// match on the outcome first).
    pub fn view<A, D, O>(&self, allow: A, deny: D) -> O
    where
        A: ViewStrategy<Output = O>,
        D: ViewStrategy<Output = O>,
    {
        select(self.is_allowed(), allow, deny)
    }
}
