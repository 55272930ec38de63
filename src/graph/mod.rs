//! The graph store: the only mutable state of the engine.
//!
//! Every mutation validates first, applies its change, and then runs a propagation pass
//! rooted at the nodes it touched. When the pass fails the store is restored to the state it
//! had before the mutation, so callers only ever observe settled graphs.

pub mod model;
pub mod snapshot;

use crate::config::EngineConfig;
use crate::engine::{self, PassReport, gather_inputs};
use crate::error::GraphError;
use crate::registry::{Behavior, CatalogEntry, PortShape, Registry};
use ahash::AHashSet;
use model::{
    DEFAULT_CHANNEL, Edge, EdgeId, GraphState, Node, NodeId, Outputs, Params, REGENERATE_PARAM,
    SEED_PARAM, is_private_param, param_u64,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use snapshot::GraphSnapshot;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

// Seeds stay within the integers a JSON double represents exactly.
const MAX_SEED: u64 = 1 << 53;

pub struct Graph {
    registry: Arc<Registry>,
    config: EngineConfig,
    state: GraphState,
    rng: StdRng,
    next_node: u64,
    next_edge: u64,
}

pub struct GraphBuilder {
    registry: Option<Arc<Registry>>,
    config: EngineConfig,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Fixes the seed all new `_seed` values are drawn from.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    pub fn build(self) -> Graph {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Graph {
            registry: self.registry.unwrap_or_else(Registry::with_defaults),
            config: self.config,
            state: GraphState::default(),
            rng,
            next_node: 1,
            next_edge: 1,
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// An empty graph over the built-in kinds.
    pub fn new() -> Self {
        GraphBuilder::new().build()
    }

    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.registry.catalog()
    }

    // --- Accessors ---

    pub fn nodes(&self) -> &[Node] {
        &self.state.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.state.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.state.node(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.state.edge(id)
    }

    /// The edge currently feeding `(target, port)`.
    pub fn edge_into(&self, target: &str, port: &str) -> Option<&Edge> {
        self.state.edge_into(target, port)
    }

    /// Resolves the ports of `id` against its current inputs. Unknown kinds have no ports.
    pub fn ports(&self, id: &str) -> Result<PortShape, GraphError> {
        let node = self.require_node(id)?;
        Ok(match self.registry.get(&node.kind) {
            Ok(transform) => transform.resolve_ports(&node.params, &gather_inputs(&self.state, id)),
            Err(_) => PortShape::default(),
        })
    }

    pub fn outputs(&self, id: &str) -> Result<&Outputs, GraphError> {
        Ok(&self.require_node(id)?.outputs)
    }

    /// The cached value of the default channel of `id`.
    pub fn output(&self, id: &str) -> Result<&str, GraphError> {
        Ok(self.require_node(id)?.value())
    }

    pub fn export(&self) -> GraphSnapshot {
        GraphSnapshot::from_state(&self.state)
    }

    // --- Mutations ---

    /// Creates a node of `kind` with its default params overlaid by `initial_params`.
    pub fn add_node(
        &mut self,
        kind: &str,
        initial_params: Params,
    ) -> Result<(NodeId, PassReport), GraphError> {
        let transform = self.registry.get(kind)?;
        let mut params = transform.default_params();
        let regenerative = transform.behavior() == Behavior::Regenerative;
        params.extend(
            initial_params
                .into_iter()
                .filter(|(key, _)| !is_private_param(key)),
        );
        if regenerative {
            params.insert(REGENERATE_PARAM.to_string(), Value::from(0u64));
            params.insert(SEED_PARAM.to_string(), Value::from(self.draw_seed()));
        }

        let id = self.fresh_node_id(kind);
        let node_id = id.clone();
        debug!(node = %id, kind, "adding node");
        let node = Node::new(id.clone(), kind, params);
        let report = self.mutate(|state| {
            state.nodes.push(node);
            vec![node_id]
        })?;
        Ok((id, report))
    }

    /// Removes a node and every edge incident to it.
    pub fn remove_node(&mut self, id: &str) -> Result<PassReport, GraphError> {
        self.require_node(id)?;
        self.mutate(|state| {
            state.nodes.retain(|n| n.id != id);
            let removed = state.take_edges(|e| e.source == id || e.target == id);
            removed
                .into_iter()
                .filter(|e| e.source == id)
                .map(|e| e.target)
                .collect()
        })
    }

    /// Shallow-merges `partial` into the params of `id`. Engine-private keys are ignored.
    pub fn set_node_params(&mut self, id: &str, partial: Params) -> Result<PassReport, GraphError> {
        self.require_node(id)?;
        self.mutate(|state| {
            if let Some(node) = state.node_mut(id) {
                for (key, value) in partial {
                    if is_private_param(&key) {
                        debug!(node = %id, key = %key, "ignoring engine-private param");
                        continue;
                    }
                    node.params.insert(key, value);
                }
            }
            vec![id.to_string()]
        })
    }

    /// Connects `source`'s channel to `target`'s port, replacing any edge already on that
    /// port. `source_channel` of `None` reads the default channel.
    pub fn add_edge(
        &mut self,
        source: &str,
        source_channel: Option<&str>,
        target: &str,
        target_port: &str,
    ) -> Result<(EdgeId, PassReport), GraphError> {
        self.validate_connection(source, source_channel, target, target_port)?;
        let id = self.fresh_edge_id();
        let edge = Edge::new(id.clone(), source, source_channel, target, target_port);
        let report = self.mutate(|state| connect(state, edge))?;
        Ok((id, report))
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<PassReport, GraphError> {
        let edge = self
            .state
            .edge(id)
            .cloned()
            .ok_or_else(|| GraphError::EdgeNotFound(id.to_string()))?;
        self.mutate(|state| {
            state.take_edges(|e| e.id == edge.id);
            vec![edge.target]
        })
    }

    /// Moves an existing edge to new endpoints in one step. The edge keeps its id. On
    /// rejection the original edge stays in place.
    pub fn reconnect_edge(
        &mut self,
        id: &str,
        source: &str,
        source_channel: Option<&str>,
        target: &str,
        target_port: &str,
    ) -> Result<PassReport, GraphError> {
        let previous = self
            .state
            .edge(id)
            .cloned()
            .ok_or_else(|| GraphError::EdgeNotFound(id.to_string()))?;

        let before = self.state.clone();
        self.state.take_edges(|e| e.id == previous.id);
        if let Err(err) = self.validate_connection(source, source_channel, target, target_port) {
            self.state = before;
            return Err(err);
        }
        let mut seeds = connect(
            &mut self.state,
            Edge::new(id, source, source_channel, target, target_port),
        );
        seeds.push(previous.target);
        self.propagate_or_restore(before, seeds)
    }

    /// Draws a fresh seed for a regenerative node, forcing it to produce a new output.
    pub fn regenerate(&mut self, id: &str) -> Result<PassReport, GraphError> {
        let node = self.require_node(id)?;
        let transform = self.registry.get(&node.kind)?;
        if transform.behavior() != Behavior::Regenerative {
            return Err(GraphError::NotRegenerative {
                node_id: id.to_string(),
                kind: node.kind.clone(),
            });
        }
        info!(node = %id, "regenerating");
        let seeds = vec![id.to_string()];
        self.reseed_and_commit(seeds)
    }

    /// Regenerates every regenerative node upstream of `id`, and `id` itself if it is
    /// regenerative, in a single pass.
    pub fn regenerate_upstream(&mut self, id: &str) -> Result<PassReport, GraphError> {
        self.require_node(id)?;
        let generators: Vec<NodeId> = self
            .upstream_of(id)
            .into_iter()
            .filter(|n| self.is_regenerative(n))
            .collect();
        info!(node = %id, generators = generators.len(), "regenerating upstream");
        self.reseed_and_commit(generators)
    }

    /// Re-evaluates every node.
    pub fn refresh(&mut self) -> Result<PassReport, GraphError> {
        let seeds: Vec<NodeId> = self.state.nodes.iter().map(|n| n.id.clone()).collect();
        self.mutate(|_| seeds)
    }

    // --- Persistence ---

    pub fn import_json(&mut self, json: &str) -> Result<PassReport, GraphError> {
        let snapshot = GraphSnapshot::from_json(json)?;
        self.import_snapshot(snapshot)
    }

    pub fn import_value(&mut self, value: Value) -> Result<PassReport, GraphError> {
        let snapshot = GraphSnapshot::from_value(value)?;
        self.import_snapshot(snapshot)
    }

    /// Replaces the whole store, then runs a pass from every node without inbound edges and
    /// every node that has no cached outputs yet.
    pub fn import_snapshot(&mut self, snapshot: GraphSnapshot) -> Result<PassReport, GraphError> {
        let before = std::mem::replace(&mut self.state, snapshot.into_state());

        let missing_seeds: Vec<usize> = self
            .state
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| self.is_regenerative(&n.id) && param_u64(&n.params, SEED_PARAM).is_none())
            .map(|(i, _)| i)
            .collect();
        for i in missing_seeds {
            let seed = self.draw_seed();
            let params = &mut self.state.nodes[i].params;
            params.insert(SEED_PARAM.to_string(), Value::from(seed));
            params
                .entry(REGENERATE_PARAM)
                .or_insert(Value::from(0u64));
        }
        for node in &self.state.nodes {
            if !self.registry.contains(&node.kind) {
                warn!(node = %node.id, kind = %node.kind, "imported node has an unknown kind");
            }
        }

        let roots: Vec<NodeId> = self
            .state
            .nodes
            .iter()
            .filter(|n| n.outputs.is_empty() || self.state.incoming(&n.id).next().is_none())
            .map(|n| n.id.clone())
            .collect();
        info!(
            nodes = self.state.nodes.len(),
            edges = self.state.edges.len(),
            "imported graph"
        );
        self.propagate_or_restore(before, roots)
    }

    // --- Internals ---

    fn require_node(&self, id: &str) -> Result<&Node, GraphError> {
        self.state
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    fn is_regenerative(&self, id: &str) -> bool {
        self.state
            .node(id)
            .and_then(|n| self.registry.get(&n.kind).ok())
            .is_some_and(|t| t.behavior() == Behavior::Regenerative)
    }

    fn draw_seed(&mut self) -> u64 {
        self.rng.random_range(0..MAX_SEED)
    }

    fn fresh_node_id(&mut self, kind: &str) -> NodeId {
        loop {
            let id = format!("{}-{}", kind, self.next_node);
            self.next_node += 1;
            if !self.state.contains_node(&id) {
                return id;
            }
        }
    }

    fn fresh_edge_id(&mut self) -> EdgeId {
        loop {
            let id = format!("edge-{}", self.next_edge);
            self.next_edge += 1;
            if self.state.edge(&id).is_none() {
                return id;
            }
        }
    }

    /// `id` and every node with a path into it.
    fn upstream_of(&self, id: &str) -> Vec<NodeId> {
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current.to_string());
            queue.extend(self.state.incoming(current).map(|e| e.source.as_str()));
        }
        order
    }

    fn validate_connection(
        &self,
        source: &str,
        source_channel: Option<&str>,
        target: &str,
        target_port: &str,
    ) -> Result<(), GraphError> {
        self.require_node(source)?;
        self.require_node(target)?;
        if source == target {
            return Err(GraphError::SelfLoop(source.to_string()));
        }

        let invalid = |message: String| GraphError::InvalidConnection {
            target_node_id: target.to_string(),
            target_port: target_port.to_string(),
            message,
        };
        if !self.ports(target)?.has_input(target_port) {
            return Err(invalid(format!("'{}' has no input port '{}'", target, target_port)));
        }
        let channel = source_channel.unwrap_or(DEFAULT_CHANNEL);
        if !self.ports(source)?.has_output(channel) {
            return Err(invalid(match source_channel {
                Some(name) => format!("'{}' has no output channel '{}'", source, name),
                None => format!("'{}' has no default output channel; name one", source),
            }));
        }

        if self.config.reject_cycles && self.upstream_of(source).iter().any(|n| n == target) {
            return Err(GraphError::CycleDetected {
                source_node_id: source.to_string(),
                target_node_id: target.to_string(),
            });
        }
        Ok(())
    }

    fn reseed_and_commit(&mut self, ids: Vec<NodeId>) -> Result<PassReport, GraphError> {
        let before = self.state.clone();
        for id in &ids {
            let seed = self.draw_seed();
            if let Some(node) = self.state.node_mut(id) {
                let token = param_u64(&node.params, REGENERATE_PARAM).unwrap_or(0) + 1;
                node.params
                    .insert(REGENERATE_PARAM.to_string(), Value::from(token));
                node.params.insert(SEED_PARAM.to_string(), Value::from(seed));
            }
        }
        let mut report = self.propagate_or_restore(before, ids.clone())?;
        // A fresh seed is a commit even when it happens to reproduce the old output.
        for id in ids {
            if !report.was_committed(&id) {
                report.committed.push(id);
            }
        }
        Ok(report)
    }

    /// Applies `change`, which returns the nodes to re-evaluate, and propagates from them.
    fn mutate<F>(&mut self, change: F) -> Result<PassReport, GraphError>
    where
        F: FnOnce(&mut GraphState) -> Vec<NodeId>,
    {
        let before = self.state.clone();
        let seeds = change(&mut self.state);
        self.propagate_or_restore(before, seeds)
    }

    fn propagate_or_restore(
        &mut self,
        before: GraphState,
        seeds: Vec<NodeId>,
    ) -> Result<PassReport, GraphError> {
        match engine::propagate(
            &mut self.state,
            &self.registry,
            self.config.max_iterations,
            seeds,
        ) {
            Ok(report) => Ok(report),
            Err(err) => {
                warn!(error = %err, "rolling back mutation");
                self.state = before;
                Err(err.into())
            }
        }
    }
}

/// Inserts `edge`, dropping whatever edge fed the same port. Returns the node to re-evaluate.
fn connect(state: &mut GraphState, edge: Edge) -> Vec<NodeId> {
    let superseded = state.take_edges(|e| e.target == edge.target && e.target_port == edge.target_port);
    for old in &superseded {
        debug!(edge = %old.id, replaced_by = %edge.id, "superseding edge");
    }
    let target = edge.target.clone();
    state.edges.push(edge);
    vec![target]
}
