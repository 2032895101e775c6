use std::fmt;

/// Owned handle for an event listener or timer. Dropping it runs the
/// destructor, which detaches the listener or cancels the timer.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    destructor: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(destructor: impl FnOnce() + 'static) -> Self {
        Self {
            destructor: Some(Box::new(destructor)),
        }
    }

    /// A handle with nothing to tear down.
    pub fn noop() -> Self {
        Self { destructor: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(destructor) = self.destructor.take() {
            destructor();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("armed", &self.destructor.is_some())
            .finish()
    }
}
