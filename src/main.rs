use spikegraph::prelude::*;
use tracing::info;

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h" || a == "help") {
        print_help();
        return;
    }

    let neurons = flag_value(&args, "--neurons").unwrap_or(100_000);
    let ticks = flag_value(&args, "--ticks").unwrap_or(1_000_000);
    let seed = flag_value(&args, "--seed").unwrap_or(123);

    run_demo(neurons, ticks, seed);
}

fn flag_value(args: &[String], flag: &str) -> Option<u64> {
    let pos = args.iter().position(|a| a == flag)?;
    match args.get(pos + 1).map(|v| v.parse()) {
        Some(Ok(v)) => Some(v),
        _ => {
            eprintln!("{flag} needs a numeric value");
            std::process::exit(2);
        }
    }
}

/// Build a network over a preloaded read-only port and a blank read-write
/// port, run it for the requested budget, and dump what the scoring side
/// would see.
fn run_demo(neurons: u64, ticks: u64, seed: u64) {
    let ports = vec![
        BytePort::from_text("hello world!", PortAccess::Read, false),
        BytePort::new(12, PortAccess::ReadWrite, true),
    ];

    let cfg = NetworkConfig::with_size(neurons as usize).with_seed(seed);
    let mut network = match Network::new(cfg, ports) {
        Ok(net) => net,
        Err(err) => {
            eprintln!("cannot build network: {err}");
            std::process::exit(1);
        }
    };

    info!(
        neurons = network.neuron_count(),
        ticks,
        "network built, simulating"
    );
    network.simulate(ticks);

    let summary = serde_json::json!({
        "diagnostics": network.diagnostics(),
        "ports": (0..network.ports().len())
            .filter_map(|i| network.port_report(i))
            .collect::<Vec<_>>(),
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("cannot serialize summary: {err}"),
    }
}

fn print_help() {
    println!(
        "spikegraph demo

Builds a spiking network bound to a read-only port preloaded with
\"hello world!\" and a blank 12-byte read-write port, simulates it,
and prints the port reports and network diagnostics as JSON.

USAGE:
  spikegraph [--neurons N] [--ticks N] [--seed N]

OPTIONS:
  --neurons N   neurons before pruning (default 100000)
  --ticks N     simulation tick budget (default 1000000)
  --seed N      random seed (default 123)
  -h, --help    show this help"
    );
}
