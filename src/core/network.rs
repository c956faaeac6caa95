//! The neuron graph: construction, pruning, role binding, clone and mutate.
//!
//! Neurons live in one contiguous arena and every edge is an index into it,
//! so the inherently cyclic graph (outputs forward, inbound back-references)
//! needs no shared ownership, and cloning a network is an order-preserving
//! copy of the arena.

use hashbrown::HashSet;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::port::{BytePort, PortReport, PortRole};
use crate::prng::Prng;

/// Sentinel for a not-yet-remapped arena slot during compaction.
const INVALID_NEURON: usize = usize::MAX;

/// Outgoing edges per neuron. Wiring always fills all of them.
pub const OUTPUTS_PER_NEURON: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeuronKind {
    Excitatory,
    Inhibitory,
}

/// A weighted, delayed connection to another arena slot.
///
/// `delay_ticks` is fixed at wiring time; `weight` is the only field mutation
/// may touch.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub target: usize,
    pub delay_ticks: u64,
    pub weight: f32,
}

#[derive(Debug, Clone)]
pub struct Neuron {
    pub kind: NeuronKind,
    pub charge: f32,
    /// Arrival tick of the most recent spike, fired or not. The write-side
    /// sampling protocol reads this.
    pub last_spike_tick: u64,
    /// Bookkeeping for the optional charge leak.
    pub last_leak_tick: u64,
    /// Whether this neuron ever crossed the firing threshold.
    pub fired: bool,
    pub outputs: [Edge; OUTPUTS_PER_NEURON],
    /// Back-references, maintained only for pruning. Activation never reads
    /// them.
    pub inputs: Vec<usize>,
    /// One-time port binding: (port index, role).
    pub role: Option<(usize, PortRole)>,
}

impl Neuron {
    fn unwired(kind: NeuronKind) -> Self {
        let placeholder = Edge {
            target: 0,
            delay_ticks: 0,
            weight: 0.0,
        };
        Self {
            kind,
            charge: 0.0,
            last_spike_tick: 0,
            last_leak_tick: 0,
            fired: false,
            outputs: [placeholder; OUTPUTS_PER_NEURON],
            inputs: Vec::new(),
            role: None,
        }
    }
}

/// Geometric charge decay applied before each accumulation, when configured.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeakConfig {
    /// Retained fraction per decimation period, in `[0, 1]`.
    pub factor: f32,
    /// Elapsed ticks per decay application.
    pub decimation_period: u64,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkConfig {
    /// Neurons created before pruning.
    pub neuron_count: usize,
    /// Weighted chance, in percent, that a neuron is inhibitory.
    pub inhibitory_percent: usize,
    /// Edge delays are drawn from `[min_delay_ticks, max_delay_ticks)`.
    pub min_delay_ticks: u64,
    pub max_delay_ticks: u64,
    /// Background energy is injected every this many ticks.
    pub injection_interval_ticks: u64,
    pub seed: u64,
    /// Charge leak; absent means charge holds indefinitely between spikes.
    pub leak: Option<LeakConfig>,
}

impl NetworkConfig {
    /// Defaults for a network of `neuron_count` neurons.
    pub fn with_size(neuron_count: usize) -> Self {
        Self {
            neuron_count,
            inhibitory_percent: 20,
            min_delay_ticks: 10,
            max_delay_ticks: 10_000,
            injection_interval_ticks: 10,
            seed: 123,
            leak: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_delays(mut self, min_ticks: u64, max_ticks: u64) -> Self {
        self.min_delay_ticks = min_ticks;
        self.max_delay_ticks = max_ticks;
        self
    }

    pub fn with_injection_interval(mut self, ticks: u64) -> Self {
        self.injection_interval_ticks = ticks;
        self
    }

    pub fn with_inhibitory_percent(mut self, percent: usize) -> Self {
        self.inhibitory_percent = percent;
        self
    }

    pub fn with_leak(mut self, leak: LeakConfig) -> Self {
        self.leak = Some(leak);
        self
    }
}

/// Construction failures. All of them are fatal: a network is never returned
/// partially wired.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("neuron count {count} is too small to wire 3 distinct targets per neuron")]
    TooFewNeurons { count: usize },
    #[error("connectivity delay bounds {min}..{max} are degenerate")]
    BadDelayBounds { min: u64, max: u64 },
    #[error("spike injection interval must be at least one tick")]
    ZeroInjectionInterval,
    #[error("inhibitory percentage {percent} exceeds 100")]
    BadInhibitoryPercent { percent: usize },
    #[error("leak factor must be in [0, 1] and the decimation period nonzero")]
    BadLeakConfig,
    #[error("port {index} has zero length")]
    EmptyPort { index: usize },
    #[error("no eligible neuron left to bind role {role:?}; the network is too small or too sparse for the requested ports")]
    NoEligibleNeuron { role: PortRole },
    #[error("no eligible neuron left for background energy injection")]
    NoEnergyNeuron,
}

/// Per-port reverse lookups for the passive protocol roles. Trigger roles
/// dispatch through the firing neuron's own role tag and need no lookup here;
/// optional entries depend on the port's access mode.
#[derive(Debug, Clone)]
pub(crate) struct PortBinding {
    pub min_notifier: usize,
    pub max_notifier: usize,
    pub read_output: Option<usize>,
    pub write_input_a: Option<usize>,
    pub write_input_b: Option<usize>,
}

/// Aggregate numbers for the training collaborator.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    pub neuron_count: usize,
    pub excitatory_count: usize,
    pub inhibitory_count: usize,
    pub inhibitory_ratio: f32,
    /// Fraction of neurons that crossed the firing threshold at least once.
    pub fired_fraction: f32,
    pub total_spikes_enqueued: u64,
}

/// A pruned, role-bound spiking network plus its byte ports.
///
/// One instance is owned by one logical thread of control; nothing in here is
/// safe for concurrent mutation. Independent instances (from
/// [`Network::spawn_clone`]) share no mutable state.
pub struct Network {
    pub(crate) cfg: NetworkConfig,
    pub(crate) neurons: Vec<Neuron>,
    pub(crate) ports: Vec<BytePort>,
    pub(crate) bindings: Vec<PortBinding>,
    pub(crate) energy_target: usize,
    /// Arena indices excluded from mutation (port-role neurons).
    pub(crate) role_bound: HashSet<usize>,
    pub(crate) rng: Prng,
    pub(crate) total_spikes_enqueued: u64,
}

impl Network {
    /// Build, prune and role-bind a network over `ports`.
    pub fn new(cfg: NetworkConfig, ports: Vec<BytePort>) -> Result<Self, BuildError> {
        validate(&cfg, &ports)?;

        let mut rng = Prng::new(cfg.seed);
        let mut neurons = create_neurons(&cfg, &mut rng);
        wire(&cfg, &mut neurons, &mut rng);
        let neurons = prune_and_compact(neurons);
        info!(
            requested = cfg.neuron_count,
            surviving = neurons.len(),
            "network wired and pruned"
        );

        let mut net = Self {
            cfg,
            neurons,
            ports,
            bindings: Vec::new(),
            energy_target: 0,
            role_bound: HashSet::new(),
            rng,
            total_spikes_enqueued: 0,
        };
        net.bind_ports()?;
        net.energy_target = net
            .first_eligible()
            .ok_or(BuildError::NoEnergyNeuron)?;
        debug!(neuron = net.energy_target, "background energy neuron bound");

        Ok(net)
    }

    /// Structurally isomorphic deep copy with fresh dynamic state.
    ///
    /// Kinds, delays, weights, inbound lists and role bindings carry over by
    /// value; charge, spike bookkeeping and port instrumentation start fresh.
    /// The copy owns a snapshot of the random stream, so parent and clone
    /// share no mutable state.
    pub fn spawn_clone(&self) -> Network {
        let neurons = self
            .neurons
            .iter()
            .map(|n| Neuron {
                kind: n.kind,
                charge: 0.0,
                last_spike_tick: 0,
                last_leak_tick: 0,
                fired: false,
                outputs: n.outputs,
                inputs: n.inputs.clone(),
                role: n.role,
            })
            .collect();

        Network {
            cfg: self.cfg,
            neurons,
            ports: self.ports.iter().map(BytePort::cloned_for_spawn).collect(),
            bindings: self.bindings.clone(),
            energy_target: self.energy_target,
            role_bound: self.role_bound.clone(),
            rng: self.rng.clone(),
            total_spikes_enqueued: 0,
        }
    }

    /// Reassign one random edge weight on one random non-role neuron.
    ///
    /// This is the only mutation the evolutionary host applies; topology,
    /// delays and role bindings never change.
    pub fn mutate(&mut self) {
        let mut idx = self.rng.gen_range_usize(0, self.neurons.len());
        while self.role_bound.contains(&idx) {
            idx = self.rng.gen_range_usize(0, self.neurons.len());
        }
        let slot = self.rng.gen_range_usize(0, OUTPUTS_PER_NEURON);
        let weight = self.rng.next_f32_01();
        self.neurons[idx].outputs[slot].weight = weight;
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn ports(&self) -> &[BytePort] {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut [BytePort] {
        &mut self.ports
    }

    pub fn port_report(&self, index: usize) -> Option<PortReport> {
        self.ports.get(index).map(BytePort::report)
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let inhibitory_count = self
            .neurons
            .iter()
            .filter(|n| n.kind == NeuronKind::Inhibitory)
            .count();
        let fired = self.neurons.iter().filter(|n| n.fired).count();
        let total = self.neurons.len();
        Diagnostics {
            neuron_count: total,
            excitatory_count: total - inhibitory_count,
            inhibitory_count,
            inhibitory_ratio: inhibitory_count as f32 / total as f32,
            fired_fraction: fired as f32 / total as f32,
            total_spikes_enqueued: self.total_spikes_enqueued,
        }
    }

    fn bind_ports(&mut self) -> Result<(), BuildError> {
        for p in 0..self.ports.len() {
            self.bind_role(p, PortRole::CursorIncrementer)?;
            self.bind_role(p, PortRole::CursorDecrementer)?;
            let min_notifier = self.bind_role(p, PortRole::CursorMinLimitNotifier)?;
            let max_notifier = self.bind_role(p, PortRole::CursorMaxLimitNotifier)?;

            let access = self.ports[p].access();

            let read_output = if access.allows_read() {
                self.bind_role(p, PortRole::CursorRead)?;
                Some(self.bind_role(p, PortRole::CursorReadOutput)?)
            } else {
                None
            };

            let (write_input_a, write_input_b) = if access.allows_write() {
                self.bind_role(p, PortRole::CursorWrite)?;
                (
                    Some(self.bind_role(p, PortRole::CursorWriteInputA)?),
                    Some(self.bind_role(p, PortRole::CursorWriteInputB)?),
                )
            } else {
                (None, None)
            };

            self.bindings.push(PortBinding {
                min_notifier,
                max_notifier,
                read_output,
                write_input_a,
                write_input_b,
            });
        }
        Ok(())
    }

    /// Bind the first eligible neuron to `role` on port `port_idx`.
    fn bind_role(&mut self, port_idx: usize, role: PortRole) -> Result<usize, BuildError> {
        let idx = self
            .first_eligible()
            .ok_or(BuildError::NoEligibleNeuron { role })?;
        self.neurons[idx].role = Some((port_idx, role));
        self.role_bound.insert(idx);
        debug!(neuron = idx, port = port_idx, ?role, "role bound");
        Ok(idx)
    }

    /// First well-connected, unbound excitatory neuron in arena order.
    fn first_eligible(&self) -> Option<usize> {
        self.neurons.iter().position(|n| {
            n.kind == NeuronKind::Excitatory && n.inputs.len() > 3 && n.role.is_none()
        })
    }
}

fn validate(cfg: &NetworkConfig, ports: &[BytePort]) -> Result<(), BuildError> {
    // Each neuron needs 3 distinct targets besides itself.
    if cfg.neuron_count < 4 {
        return Err(BuildError::TooFewNeurons {
            count: cfg.neuron_count,
        });
    }
    if cfg.min_delay_ticks == 0 || cfg.min_delay_ticks >= cfg.max_delay_ticks {
        return Err(BuildError::BadDelayBounds {
            min: cfg.min_delay_ticks,
            max: cfg.max_delay_ticks,
        });
    }
    if cfg.injection_interval_ticks == 0 {
        return Err(BuildError::ZeroInjectionInterval);
    }
    if cfg.inhibitory_percent > 100 {
        return Err(BuildError::BadInhibitoryPercent {
            percent: cfg.inhibitory_percent,
        });
    }
    if let Some(leak) = cfg.leak {
        if leak.decimation_period == 0 || !(0.0..=1.0).contains(&leak.factor) {
            return Err(BuildError::BadLeakConfig);
        }
    }
    if let Some(index) = ports.iter().position(BytePort::is_empty) {
        return Err(BuildError::EmptyPort { index });
    }
    Ok(())
}

fn create_neurons(cfg: &NetworkConfig, rng: &mut Prng) -> Vec<Neuron> {
    (0..cfg.neuron_count)
        .map(|_| {
            let kind = if rng.gen_range_usize(0, 100) < cfg.inhibitory_percent {
                NeuronKind::Inhibitory
            } else {
                NeuronKind::Excitatory
            };
            Neuron::unwired(kind)
        })
        .collect()
}

/// Wire every neuron to 3 distinct downstream peers with random delay and
/// weight, recording back-references on the targets.
fn wire(cfg: &NetworkConfig, neurons: &mut [Neuron], rng: &mut Prng) {
    let n = neurons.len();
    for i in 0..n {
        if i > 0 && i % 10_000 == 0 {
            debug!(mapped = i, total = n, "wiring neurons");
        }

        let t0 = rng.gen_range_usize_excluding(0, n, &[i]);
        let t1 = rng.gen_range_usize_excluding(0, n, &[i, t0]);
        let t2 = rng.gen_range_usize_excluding(0, n, &[i, t0, t1]);
        let targets = [t0, t1, t2];

        let delays = [
            rng.gen_range_u64(cfg.min_delay_ticks, cfg.max_delay_ticks),
            rng.gen_range_u64(cfg.min_delay_ticks, cfg.max_delay_ticks),
            rng.gen_range_u64(cfg.min_delay_ticks, cfg.max_delay_ticks),
        ];
        let weights = [rng.next_f32_01(), rng.next_f32_01(), rng.next_f32_01()];

        for slot in 0..OUTPUTS_PER_NEURON {
            neurons[i].outputs[slot] = Edge {
                target: targets[slot],
                delay_ticks: delays[slot],
                weight: weights[slot],
            };
            neurons[targets[slot]].inputs.push(i);
        }
    }
}

/// Remove neurons with no live predecessor, cascading to a fixed point, then
/// compact the survivors into a dense arena preserving relative order.
///
/// A neuron that can never receive a spike only wastes event-queue churn; at
/// the fixed point every survivor has at least one inbound edge and every
/// edge target is a survivor.
fn prune_and_compact(mut neurons: Vec<Neuron>) -> Vec<Neuron> {
    let n = neurons.len();
    let mut alive = vec![true; n];

    loop {
        let mut removed = 0usize;
        for i in 0..n {
            if !alive[i] || !neurons[i].inputs.is_empty() {
                continue;
            }
            let outputs = neurons[i].outputs;
            for edge in outputs {
                let inputs = &mut neurons[edge.target].inputs;
                if let Some(pos) = inputs.iter().position(|&s| s == i) {
                    inputs.remove(pos);
                }
            }
            alive[i] = false;
            removed += 1;
        }
        if removed == 0 {
            break;
        }
        debug!(removed, "pruned source-less neurons");
    }

    let mut remap = vec![INVALID_NEURON; n];
    let mut next = 0usize;
    for i in 0..n {
        if alive[i] {
            remap[i] = next;
            next += 1;
        }
    }

    let mut compacted = Vec::with_capacity(next);
    for (i, mut neuron) in neurons.into_iter().enumerate() {
        if !alive[i] {
            continue;
        }
        for edge in &mut neuron.outputs {
            // Invariant from the prune fixed point: targets of survivors survive.
            debug_assert_ne!(remap[edge.target], INVALID_NEURON);
            edge.target = remap[edge.target];
        }
        for source in &mut neuron.inputs {
            debug_assert_ne!(remap[*source], INVALID_NEURON);
            *source = remap[*source];
        }
        compacted.push(neuron);
    }
    compacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortAccess;

    fn small_cfg() -> NetworkConfig {
        NetworkConfig::with_size(500)
            .with_seed(77)
            .with_delays(2, 50)
            .with_injection_interval(5)
    }

    #[test]
    fn build_produces_a_pruned_connected_arena() {
        let net = Network::new(small_cfg(), Vec::new()).expect("build");
        assert!(net.neuron_count() > 0);
        assert!(net.neuron_count() <= 500);

        for neuron in &net.neurons {
            // Prune fixed point: nobody is source-less, so a re-run removes nothing.
            assert!(!neuron.inputs.is_empty());
            for edge in &neuron.outputs {
                assert!(edge.target < net.neuron_count());
                assert!((2..50).contains(&edge.delay_ticks));
                assert!((0.0..1.0).contains(&edge.weight));
            }
            for &source in &neuron.inputs {
                assert!(source < net.neuron_count());
            }
        }
    }

    #[test]
    fn inbound_lists_mirror_outgoing_edges() {
        let net = Network::new(small_cfg(), Vec::new()).expect("build");
        for (i, neuron) in net.neurons.iter().enumerate() {
            for edge in &neuron.outputs {
                assert!(
                    net.neurons[edge.target].inputs.contains(&i),
                    "edge {i}->{} has no back-reference",
                    edge.target
                );
            }
        }
    }

    #[test]
    fn role_binding_covers_the_access_mode() {
        let ports = vec![
            BytePort::from_text("hi", PortAccess::Read, false),
            BytePort::new(4, PortAccess::ReadWrite, true),
            BytePort::new(4, PortAccess::Write, false),
        ];
        let net = Network::new(NetworkConfig::with_size(2_000).with_seed(5), ports)
            .expect("build");

        assert_eq!(net.bindings.len(), 3);

        let roles_on = |port: usize| -> Vec<PortRole> {
            net.neurons
                .iter()
                .filter_map(|n| n.role)
                .filter(|&(p, _)| p == port)
                .map(|(_, role)| role)
                .collect()
        };

        let read_only = roles_on(0);
        assert_eq!(read_only.len(), 6);
        assert!(read_only.contains(&PortRole::CursorRead));
        assert!(read_only.contains(&PortRole::CursorReadOutput));
        assert!(!read_only.contains(&PortRole::CursorWrite));

        let read_write = roles_on(1);
        assert_eq!(read_write.len(), 9);
        assert!(read_write.contains(&PortRole::CursorRead));
        assert!(read_write.contains(&PortRole::CursorWrite));
        assert!(net.bindings[1].write_input_a.is_some());
        assert!(net.bindings[1].write_input_b.is_some());

        let write_only = roles_on(2);
        assert_eq!(write_only.len(), 7);
        assert!(!write_only.contains(&PortRole::CursorRead));
        assert!(write_only.contains(&PortRole::CursorWrite));
        assert!(net.bindings[0].read_output.is_some());
        assert!(net.bindings[2].read_output.is_none());

        for &idx in &net.role_bound {
            let neuron = &net.neurons[idx];
            assert_eq!(neuron.kind, NeuronKind::Excitatory);
            assert!(neuron.inputs.len() > 3);
            assert!(neuron.role.is_some());
        }

        // The energy neuron carries no port role and stays mutable.
        assert!(net.neurons[net.energy_target].role.is_none());
    }

    #[test]
    fn degenerate_configs_fail_fast() {
        assert!(matches!(
            Network::new(NetworkConfig::with_size(3), Vec::new()),
            Err(BuildError::TooFewNeurons { count: 3 })
        ));
        assert!(matches!(
            Network::new(NetworkConfig::with_size(100).with_delays(50, 50), Vec::new()),
            Err(BuildError::BadDelayBounds { .. })
        ));
        assert!(matches!(
            Network::new(NetworkConfig::with_size(100).with_delays(0, 50), Vec::new()),
            Err(BuildError::BadDelayBounds { .. })
        ));
        assert!(matches!(
            Network::new(
                NetworkConfig::with_size(100).with_injection_interval(0),
                Vec::new()
            ),
            Err(BuildError::ZeroInjectionInterval)
        ));
        assert!(matches!(
            Network::new(
                NetworkConfig::with_size(100).with_inhibitory_percent(101),
                Vec::new()
            ),
            Err(BuildError::BadInhibitoryPercent { .. })
        ));
        assert!(matches!(
            Network::new(
                NetworkConfig::with_size(100),
                vec![BytePort::new(0, PortAccess::Read, false)]
            ),
            Err(BuildError::EmptyPort { index: 0 })
        ));
        assert!(matches!(
            Network::new(
                NetworkConfig::with_size(100).with_leak(LeakConfig {
                    factor: 0.9,
                    decimation_period: 0,
                }),
                Vec::new()
            ),
            Err(BuildError::BadLeakConfig)
        ));
    }

    #[test]
    fn too_small_a_network_cannot_bind_a_port() {
        // A read port needs 6 role neurons plus the energy neuron; 5 neurons
        // cannot supply that many well-connected excitatory candidates.
        let ports = vec![BytePort::from_text("x", PortAccess::Read, false)];
        let result = Network::new(NetworkConfig::with_size(5).with_seed(1), ports);
        assert!(matches!(
            result,
            Err(BuildError::NoEligibleNeuron { .. }) | Err(BuildError::NoEnergyNeuron)
        ));
    }

    #[test]
    fn clone_is_isomorphic_and_independent() {
        let ports = vec![
            BytePort::from_text("keep me", PortAccess::Read, false),
            BytePort::new(3, PortAccess::ReadWrite, true),
        ];
        let net = Network::new(NetworkConfig::with_size(2_000).with_seed(11), ports)
            .expect("build");
        let mut clone = net.spawn_clone();

        assert_eq!(clone.neuron_count(), net.neuron_count());
        assert_eq!(clone.energy_target, net.energy_target);
        for (a, b) in net.neurons.iter().zip(&clone.neurons) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.role, b.role);
            assert_eq!(a.inputs, b.inputs);
            for (ea, eb) in a.outputs.iter().zip(&b.outputs) {
                assert_eq!(ea.target, eb.target);
                assert_eq!(ea.delay_ticks, eb.delay_ticks);
                assert_eq!(ea.weight, eb.weight);
            }
        }

        // clear_on_clone zeroes, otherwise byte-for-byte.
        assert_eq!(clone.ports()[0].bytes(), b"keep me");
        assert_eq!(clone.ports()[1].bytes(), &[0, 0, 0]);
        assert_eq!(clone.ports()[0].access(), net.ports()[0].access());

        // Mutating the clone must not reach back into the parent.
        let before: Vec<[f32; OUTPUTS_PER_NEURON]> = net
            .neurons
            .iter()
            .map(|n| [n.outputs[0].weight, n.outputs[1].weight, n.outputs[2].weight])
            .collect();
        clone.mutate();
        for (neuron, weights) in net.neurons.iter().zip(&before) {
            for (edge, &w) in neuron.outputs.iter().zip(weights) {
                assert_eq!(edge.weight, w);
            }
        }
    }

    #[test]
    fn mutate_changes_exactly_one_non_role_weight() {
        let ports = vec![BytePort::new(2, PortAccess::ReadWrite, false)];
        let mut net = Network::new(NetworkConfig::with_size(2_000).with_seed(21), ports)
            .expect("build");

        let before: Vec<[f32; OUTPUTS_PER_NEURON]> = net
            .neurons
            .iter()
            .map(|n| [n.outputs[0].weight, n.outputs[1].weight, n.outputs[2].weight])
            .collect();
        net.mutate();

        let mut changed = Vec::new();
        for (i, (neuron, weights)) in net.neurons.iter().zip(&before).enumerate() {
            for (slot, (edge, &w)) in neuron.outputs.iter().zip(weights).enumerate() {
                if edge.weight != w {
                    changed.push((i, slot));
                }
            }
        }
        assert_eq!(changed.len(), 1);
        let (idx, _) = changed[0];
        assert!(!net.role_bound.contains(&idx));
    }

    #[test]
    fn diagnostics_reflect_the_arena() {
        let net = Network::new(small_cfg(), Vec::new()).expect("build");
        let diag = net.diagnostics();
        assert_eq!(diag.neuron_count, net.neuron_count());
        assert_eq!(
            diag.excitatory_count + diag.inhibitory_count,
            diag.neuron_count
        );
        assert_eq!(diag.fired_fraction, 0.0);
        assert_eq!(diag.total_spikes_enqueued, 0);
    }
}
