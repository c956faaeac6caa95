//! # spikegraph
//!
//! A discrete-event simulator for directed, weighted, delay-annotated
//! networks of spiking neurons, with byte-addressable I/O ports driven
//! entirely by spike-timing codes.
//!
//! A network never sees a raw byte: reads leave a port as a dual-pulse pair
//! whose tick offset encodes the value, and writes are derived from the tick
//! distance between two sampling neurons' most recent spikes. An evolutionary
//! host clones, mutates and scores whole networks against the port contents;
//! this crate is the core it drives.
//!
//! ## Quick Start
//!
//! ```
//! use spikegraph::prelude::*;
//!
//! let ports = vec![
//!     BytePort::from_text("hi", PortAccess::Read, false),
//!     BytePort::new(2, PortAccess::ReadWrite, true),
//! ];
//! let cfg = NetworkConfig::with_size(2_000).with_seed(42);
//!
//! let mut net = Network::new(cfg, ports).expect("network too sparse for ports");
//! net.simulate(50_000);
//!
//! let stats = net.diagnostics();
//! let output = net.port_report(1).expect("bound port");
//! assert!(output.write_coverage <= 1.0);
//! # let _ = stats;
//! ```
//!
//! ## Modules
//!
//! - [`network`]: arena-based neuron graph, topology builder, clone and mutate
//! - [`engine`]: tick-ordered spike scheduler and the port role protocol
//! - [`port`]: byte ports with cursor, access modes and coverage tracking
//! - [`prng`]: the deterministic random stream threaded through everything

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/port.rs"]
pub mod port;

#[path = "core/network.rs"]
pub mod network;

#[path = "core/engine.rs"]
pub mod engine;

/// Prelude module for convenient imports.
///
/// ```
/// use spikegraph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::engine::{Spike, FIRING_THRESHOLD, FULL_CHARGE};
    pub use crate::network::{
        BuildError, Diagnostics, LeakConfig, Network, NetworkConfig, NeuronKind,
    };
    pub use crate::port::{BytePort, PortAccess, PortReport, PortRole};
    pub use crate::prng::Prng;
}
