// Viewport change source and per-target bindings.
// One event source, an ordered subscription list, queries evaluated in ascending threshold order.

use serde::{Deserialize, Serialize};

use crate::breakpoint::BreakpointResolver;
use crate::error::ResponsiveError;
use crate::target::SizedTarget;
use crate::types::*;

/// `(max-width: Npx)` / `(max-height: Npx)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaQuery {
    pub dimension: Dimension,
    pub max_extent: f64,
}

impl MediaQuery {
    pub fn new(dimension: Dimension, max_extent: f64) -> Self {
        MediaQuery {
            dimension,
            max_extent,
        }
    }

    /// True while the viewport extent is at or below the threshold.
    pub fn matches(&self, viewport: &ViewportSize) -> bool {
        f64::from(viewport.extent(self.dimension)) <= self.max_extent
    }

    /// CSS text usable with `window.matchMedia`.
    pub fn to_css(&self) -> String {
        format!("(max-{}: {}px)", self.dimension.as_str(), self.max_extent)
    }
}

/// Receives every viewport change from a `ViewportWatcher`.
pub trait ViewportListener {
    /// Returns how many sizes were applied.
    fn on_viewport_change(&mut self, viewport: &ViewportSize) -> usize;
}

/// A resolver bound to one target for the target's mounted lifetime.
pub struct ResponsiveBinding<T> {
    resolver: BreakpointResolver,
    queries: Vec<MediaQuery>,
    states: Vec<bool>,
    policy: UpdatePolicy,
    target: T,
}

impl<T: SizedTarget> ResponsiveBinding<T> {
    pub fn new(target: T, resolver: BreakpointResolver, policy: UpdatePolicy) -> Self {
        let queries = resolver.queries();
        ResponsiveBinding {
            resolver,
            states: vec![false; queries.len()],
            queries,
            policy,
            target,
        }
    }

    /// Evaluate every query and apply the initial size.
    pub fn mount(&mut self, viewport: &ViewportSize) -> usize {
        for (state, query) in self.states.iter_mut().zip(&self.queries) {
            *state = query.matches(viewport);
        }
        let size = self.resolver.first_match(&self.states);
        log::debug!("mount at {:?}: applying {:?}", viewport, size);
        self.target.set_size(size);
        1
    }

    /// Re-evaluate queries after a viewport change and apply sizes per the policy.
    pub fn update(&mut self, viewport: &ViewportSize) -> usize {
        let mut flipped = Vec::new();
        for (index, (state, query)) in self.states.iter_mut().zip(&self.queries).enumerate() {
            let matches = query.matches(viewport);
            if matches != *state {
                log::trace!("{} -> {}", query.to_css(), matches);
                *state = matches;
                flipped.push((index, matches));
            }
        }

        if flipped.is_empty() {
            return 0;
        }

        match self.policy {
            UpdatePolicy::Recompute => {
                let size = self.resolver.first_match(&self.states);
                log::debug!("viewport {:?}: applying {:?}", viewport, size);
                self.target.set_size(size);
                1
            }
            UpdatePolicy::PerQuery => {
                // Leaving ranges promotes upward, so go ascending; entering ranges
                // narrows downward, so go descending. The last size applied is then
                // the resolved one.
                let (entered, left): (Vec<_>, Vec<_>) =
                    flipped.iter().partition(|(_, matches)| *matches);
                for (index, matches) in left.into_iter().chain(entered.into_iter().rev()) {
                    let size = self.resolver.on_transition(index, matches);
                    log::debug!(
                        "viewport {:?}: breakpoint #{} -> {}, applying {:?}",
                        viewport,
                        index,
                        matches,
                        size
                    );
                    self.target.set_size(size);
                }
                flipped.len()
            }
        }
    }

    /// Current query states, ascending by threshold.
    pub fn states(&self) -> &[bool] {
        &self.states
    }
}

impl<T: SizedTarget> ViewportListener for ResponsiveBinding<T> {
    fn on_viewport_change(&mut self, viewport: &ViewportSize) -> usize {
        self.update(viewport)
    }
}

/// Handle for an attached target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(u32);

impl BindingId {
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Single source of viewport changes with an explicit, ordered subscription list.
pub struct ViewportWatcher {
    environment: Environment,
    next_id: u32,
    subscriptions: Vec<(BindingId, Box<dyn ViewportListener>)>,
}

impl ViewportWatcher {
    pub fn new(environment: Environment) -> Self {
        ViewportWatcher {
            environment,
            next_id: 0,
            subscriptions: Vec::new(),
        }
    }

    /// Bind `target` to a breakpoint table for its mounted lifetime.
    ///
    /// Validation happens before anything is registered: on error the target is
    /// dropped untouched. On success the initial size is applied synchronously.
    pub fn attach<T, I>(
        &mut self,
        target: T,
        table: I,
        fallback: SizeSpec,
        policy: UpdatePolicy,
    ) -> Result<BindingId, ResponsiveError>
    where
        T: SizedTarget + 'static,
        I: IntoIterator<Item = (f64, f64)>,
    {
        let resolver = BreakpointResolver::new(table, fallback).map_err(|err| {
            log::warn!("attach rejected: {}", err);
            err
        })?;

        let mut binding = ResponsiveBinding::new(target, resolver, policy);
        binding.mount(&self.environment.viewport);

        Ok(self.subscribe(Box::new(binding)))
    }

    /// Register an arbitrary listener. It is not notified of the current viewport.
    pub fn subscribe(&mut self, listener: Box<dyn ViewportListener>) -> BindingId {
        // Ids wrap around; skip any still held by a live subscription.
        let mut id = BindingId(self.next_id);
        while self.subscriptions.iter().any(|(live, _)| *live == id) {
            id = BindingId(id.0.wrapping_add(1));
        }
        self.next_id = id.0.wrapping_add(1);
        self.subscriptions.push((id, listener));
        id
    }

    /// Release a subscription. Returns false if it was already gone.
    pub fn detach(&mut self, id: BindingId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|(sub_id, _)| *sub_id != id);
        before != self.subscriptions.len()
    }

    /// Report a new viewport size. Returns the number of sizes applied across all targets.
    pub fn resize(&mut self, viewport: ViewportSize) -> usize {
        self.environment.viewport = viewport;
        self.subscriptions
            .iter_mut()
            .map(|(_, listener)| listener.on_viewport_change(&viewport))
            .sum()
    }

    /// Injected host capabilities, with the viewport kept current.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
