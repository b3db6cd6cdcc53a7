//! Shared test helpers for call-chain exploration test cases.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{CallGraph, CallNode, CallerResolver, CancellationToken, MethodSignature, Origin};

pub(super) const PACKAGE: &str = "com.example";

/// Builds a label from `Class.method`.
pub(super) fn method(qualified: &str) -> MethodSignature {
    let (class, name) = qualified.split_once('.').unwrap_or(("Main", qualified));
    MethodSignature::format(class, name, &[], PACKAGE)
}

pub(super) fn find<'g>(graph: &'g CallGraph, qualified: &str) -> &'g CallNode {
    graph
        .find_by_method(qualified)
        .unwrap_or_else(|| panic!("node {qualified} missing"))
}

pub(super) fn has_edge(graph: &CallGraph, caller: &str, callee: &str) -> bool {
    graph.contains_edge(find(graph, caller).id(), find(graph, callee).id())
}

#[derive(Debug, Error)]
#[error("reference index unavailable")]
pub(super) struct IndexUnavailable;

/// In-memory resolver keyed by callee label.
#[derive(Debug, Default)]
pub(super) struct MapResolver {
    callers: HashMap<MethodSignature, Vec<MethodSignature>>,
    origins: HashMap<MethodSignature, Origin>,
    failing: HashSet<MethodSignature>,
    cancel_on: Option<(MethodSignature, CancellationToken)>,
    lookups: Vec<MethodSignature>,
}

impl MapResolver {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Records that `caller` calls `callee`.
    pub(super) fn calls(mut self, caller: &str, callee: &str) -> Self {
        self.callers
            .entry(method(callee))
            .or_default()
            .push(method(caller));
        self
    }

    pub(super) fn origin(mut self, name: &str, origin: Origin) -> Self {
        self.origins.insert(method(name), origin);
        self
    }

    pub(super) fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(method(name));
        self
    }

    /// Trips `token` while answering the lookup for `name`.
    pub(super) fn cancelling_on(mut self, name: &str, token: CancellationToken) -> Self {
        self.cancel_on = Some((method(name), token));
        self
    }

    pub(super) fn lookups(&self) -> &[MethodSignature] {
        &self.lookups
    }
}

impl CallerResolver for MapResolver {
    type Error = IndexUnavailable;

    fn callers_of(&mut self, method: &MethodSignature) -> Result<Vec<MethodSignature>, Self::Error> {
        self.lookups.push(method.clone());
        if let Some((trigger, token)) = &self.cancel_on
            && trigger == method
        {
            token.cancel();
        }
        if self.failing.contains(method) {
            return Err(IndexUnavailable);
        }
        Ok(self.callers.get(method).cloned().unwrap_or_default())
    }

    fn classify_origin(&self, method: &MethodSignature) -> Origin {
        self.origins.get(method).copied().unwrap_or(Origin::Unknown)
    }
}
