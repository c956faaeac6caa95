//! The discrete-event scheduler: a tick-ordered spike queue driving the
//! activation model and the port role protocol.
//!
//! Everything observable comes out of this loop. Two runs over the same
//! topology with the same tick budget produce identical neuron and port
//! state; the queue breaks arrival ties by insertion order to keep that true.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::network::{Network, NeuronKind};
use crate::port::PortRole;

/// Charge at which a neuron fires.
pub const FIRING_THRESHOLD: f32 = 1.0;

/// Charge of background injections, limit notifications and read pulses:
/// exactly enough to fire an idle excitatory neuron.
pub const FULL_CHARGE: f32 = 1.0;

/// A scheduled charge delivery. Lives only inside the queue.
#[derive(Debug, Clone, Copy)]
pub struct Spike {
    pub arrival_tick: u64,
    pub charge: f32,
    /// None for spikes originating outside the network (background energy).
    pub source: Option<usize>,
    pub target: usize,
}

struct QueuedSpike {
    arrival_tick: u64,
    seq: u64,
    spike: Spike,
}

impl QueuedSpike {
    #[inline]
    fn key(&self) -> (u64, u64) {
        (self.arrival_tick, self.seq)
    }
}

impl PartialEq for QueuedSpike {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueuedSpike {}

impl PartialOrd for QueuedSpike {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedSpike {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-heap of pending spikes ordered by `(arrival_tick, insertion order)`.
struct SpikeQueue {
    heap: BinaryHeap<Reverse<QueuedSpike>>,
    seq: u64,
}

impl SpikeQueue {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    fn push(&mut self, spike: Spike) {
        let queued = QueuedSpike {
            arrival_tick: spike.arrival_tick,
            seq: self.seq,
            spike,
        };
        self.seq += 1;
        self.heap.push(Reverse(queued));
    }

    /// Pop the next spike due at or before `t`. Overdue spikes are still
    /// delivered; the queue is drained, never dropped.
    fn pop_due(&mut self, t: u64) -> Option<Spike> {
        if self.heap.peek()?.0.arrival_tick <= t {
            Some(self.heap.pop()?.0.spike)
        } else {
            None
        }
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

impl Network {
    /// Run the event loop from tick 0 to `tick_limit`, mutating neuron and
    /// port state in place. Synchronous and strictly sequential; query the
    /// ports and [`Network::diagnostics`] afterwards.
    pub fn simulate(&mut self, tick_limit: u64) {
        let mut queue = SpikeQueue::new();

        for t in 0..tick_limit {
            while let Some(spike) = queue.pop_due(t) {
                self.process_spike(t, &mut queue, spike);
            }

            // Background energy keeps an otherwise quiet network moving.
            if t % self.cfg.injection_interval_ticks == 0 {
                self.enqueue(
                    &mut queue,
                    Spike {
                        arrival_tick: t,
                        charge: FULL_CHARGE,
                        source: None,
                        target: self.energy_target,
                    },
                );
            }
        }

        debug!(
            pending = queue.len(),
            enqueued = self.total_spikes_enqueued,
            "simulation budget exhausted"
        );
    }

    fn enqueue(&mut self, queue: &mut SpikeQueue, spike: Spike) {
        self.total_spikes_enqueued += 1;
        queue.push(spike);
    }

    fn process_spike(&mut self, t: u64, queue: &mut SpikeQueue, spike: Spike) {
        let idx = spike.target;
        trace!(
            tick = t,
            neuron = idx,
            source = ?spike.source,
            charge = spike.charge,
            "spike"
        );

        // The write-side sampling protocol reads this, so it is recorded for
        // every arrival, fired or not.
        self.neurons[idx].last_spike_tick = spike.arrival_tick;

        match self.neurons[idx].kind {
            NeuronKind::Inhibitory => {
                // Inhibitory neurons accumulate only positive charge.
                if spike.charge <= 0.0 {
                    return;
                }
                self.apply_leak(idx, spike.arrival_tick);
                self.neurons[idx].charge += spike.charge;
                if self.neurons[idx].charge >= FIRING_THRESHOLD {
                    self.neurons[idx].fired = true;
                    self.propagate(t, queue, idx, true);
                    // Inhibitory neurons are never role-bound.
                    self.neurons[idx].charge = 0.0;
                }
            }
            NeuronKind::Excitatory => {
                self.apply_leak(idx, spike.arrival_tick);
                let neuron = &mut self.neurons[idx];
                neuron.charge = (neuron.charge + spike.charge).clamp(0.0, 1.0);
                if neuron.charge >= FIRING_THRESHOLD {
                    neuron.fired = true;
                    self.propagate(t, queue, idx, false);
                    self.apply_port_role(t, queue, idx);
                    self.neurons[idx].charge = 0.0;
                }
            }
        }
    }

    /// Geometric decay of stored charge, applied strictly before the incoming
    /// charge when a leak is configured.
    fn apply_leak(&mut self, idx: usize, arrival: u64) {
        let Some(leak) = self.cfg.leak else {
            return;
        };
        let neuron = &mut self.neurons[idx];
        let elapsed = arrival.saturating_sub(neuron.last_leak_tick);
        let periods = (elapsed / leak.decimation_period) as i32;
        if periods > 0 {
            neuron.charge = (neuron.charge * leak.factor.powi(periods)).max(0.0);
        }
        neuron.last_leak_tick = arrival;
    }

    fn propagate(&mut self, t: u64, queue: &mut SpikeQueue, idx: usize, inhibitory: bool) {
        let outputs = self.neurons[idx].outputs;
        let sign = if inhibitory { -1.0 } else { 1.0 };
        for edge in outputs {
            self.enqueue(
                queue,
                Spike {
                    arrival_tick: t + edge.delay_ticks,
                    charge: edge.weight * sign,
                    source: Some(idx),
                    target: edge.target,
                },
            );
        }
    }

    /// Port side effect of a firing role neuron. Only excitatory neurons get
    /// here; inhibitory neurons are never bound.
    fn apply_port_role(&mut self, t: u64, queue: &mut SpikeQueue, idx: usize) {
        let Some((port_idx, role)) = self.neurons[idx].role else {
            return;
        };

        match role {
            // Passive roles: sampled or spiked by the protocol, no behavior
            // of their own.
            PortRole::CursorReadOutput
            | PortRole::CursorWriteInputA
            | PortRole::CursorWriteInputB
            | PortRole::CursorMinLimitNotifier
            | PortRole::CursorMaxLimitNotifier => {}

            PortRole::CursorIncrementer => {
                if !self.ports[port_idx].increment_cursor() {
                    let notifier = self.bindings[port_idx].max_notifier;
                    debug!(port = port_idx, "cursor at max limit");
                    self.notify_limit(t, queue, idx, notifier);
                }
            }

            PortRole::CursorDecrementer => {
                if !self.ports[port_idx].decrement_cursor() {
                    let notifier = self.bindings[port_idx].min_notifier;
                    debug!(port = port_idx, "cursor at min limit");
                    self.notify_limit(t, queue, idx, notifier);
                }
            }

            PortRole::CursorRead => {
                let Some(out_idx) = self.bindings[port_idx].read_output else {
                    return;
                };
                // No-op on a write-only port: nothing to encode.
                let Some(value) = self.ports[port_idx].read_at_cursor(t) else {
                    return;
                };
                debug!(port = port_idx, value, "cursor read");

                // Dual-pulse timing code over the read-output neuron's edges:
                // the offset between the pulses *is* the byte.
                let outputs = self.neurons[out_idx].outputs;
                for edge in outputs {
                    let presence = t + edge.delay_ticks;
                    self.enqueue(
                        queue,
                        Spike {
                            arrival_tick: presence,
                            charge: FULL_CHARGE,
                            source: Some(out_idx),
                            target: edge.target,
                        },
                    );
                    self.enqueue(
                        queue,
                        Spike {
                            arrival_tick: presence + value as u64,
                            charge: FULL_CHARGE,
                            source: Some(out_idx),
                            target: edge.target,
                        },
                    );
                }
            }

            PortRole::CursorWrite => {
                let binding = &self.bindings[port_idx];
                let (Some(a), Some(b)) = (binding.write_input_a, binding.write_input_b) else {
                    return;
                };
                // Differential timing code: the byte is the tick distance
                // between the sampling pair's most recent arrivals.
                let delta = self.neurons[a]
                    .last_spike_tick
                    .abs_diff(self.neurons[b].last_spike_tick);
                let value = (delta % 256) as u8;
                debug!(port = port_idx, value, "cursor write");
                self.ports[port_idx].write_at_cursor(t, value);
            }
        }
    }

    fn notify_limit(&mut self, t: u64, queue: &mut SpikeQueue, source: usize, notifier: usize) {
        self.enqueue(
            queue,
            Spike {
                arrival_tick: t,
                charge: FULL_CHARGE,
                source: Some(source),
                target: notifier,
            },
        );
    }
}
