//! warehouse — a small robot fleet shuttling between random stations.
//!
//! Spawns agents on the docks of a warehouse floor plan (built in, or loaded
//! from `--graph`), hands every idle agent a random destination each tick,
//! and writes per-agent snapshots plus the fleet event log as CSV.
//!
//! ```text
//! cargo run -p warehouse -- --agents 8 --ticks 1200 --out output/warehouse
//! RUST_LOG=fleet_traffic=debug cargo run -p warehouse
//! ```

mod floor_plan;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fleet_agent::Agent;
use fleet_core::{SimConfig, SimRng, Tick, VertexId};
use fleet_graph::{DijkstraRouter, NavGraph, load_graph_json};
use fleet_output::{CsvWriter, FleetOutputObserver, OutputWriter};
use fleet_sim::{Fleet, FleetBuilder, FleetEvent, FleetObserver};

use floor_plan::build_floor_plan;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "warehouse")]
#[command(about = "Drive a robot fleet around a warehouse floor plan")]
struct Args {
    /// Navigation graph JSON (first level is used).  Built-in plan if omitted.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// SimConfig JSON.  Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the CSV output files.
    #[arg(long, default_value = "output/warehouse")]
    out: PathBuf,

    /// Number of agents to spawn.
    #[arg(long, short = 'n', default_value_t = 6)]
    agents: usize,

    /// Override `total_ticks`.
    #[arg(long, short = 't')]
    ticks: Option<u64>,

    /// Override the master seed.
    #[arg(long, short = 's')]
    seed: Option<u64>,
}

// ── Observer wrapper to count events ─────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:     FleetOutputObserver<W>,
    completed: usize,
    waits:     usize,
    events:    usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: FleetOutputObserver<W>) -> Self {
        Self { inner, completed: 0, waits: 0, events: 0 }
    }
}

impl<W: OutputWriter> FleetObserver for CountingObserver<W> {
    fn on_event(&mut self, tick: Tick, event: &FleetEvent) {
        self.events += 1;
        match event {
            FleetEvent::TaskCompleted { .. } => self.completed += 1,
            FleetEvent::AgentWaiting { .. } => self.waits += 1,
            _ => {}
        }
        self.inner.on_event(tick, event);
    }

    fn on_tick_end(&mut self, tick: Tick, changed: usize) {
        self.inner.on_tick_end(tick, changed);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[Agent]) {
        self.inner.on_snapshot(tick, agents);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig { tick_secs: 0.1, total_ticks: 1_200, ..SimConfig::default() },
    };
    if let Some(ticks) = args.ticks {
        config.total_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn load_graph(path: Option<&Path>) -> Result<(NavGraph, Vec<VertexId>)> {
    let Some(path) = path else {
        return Ok(build_floor_plan());
    };
    let graph = load_graph_json(path).with_context(|| format!("loading graph {}", path.display()))?;
    if graph.is_empty() {
        bail!("graph {} has no vertices", path.display());
    }
    // Start on chargers when the file marks any, else on the first vertices.
    let mut starts = graph.chargers();
    if starts.is_empty() {
        starts = (0..graph.vertex_count().min(4) as u32).map(VertexId).collect();
    }
    Ok((graph, starts))
}

/// Give every available agent a random destination other than where it is.
fn dispatch(fleet: &mut Fleet, rng: &mut SimRng) {
    let vertex_count = fleet.graph().vertex_count();
    if vertex_count < 2 {
        return;
    }
    let available: Vec<_> = fleet.available_agents().collect();
    for agent in available {
        let Some(here) = fleet.agent(agent).map(|a| a.vertex()) else {
            continue;
        };
        let mut dest = VertexId(rng.gen_range(0..vertex_count as u32));
        if dest == here {
            dest = VertexId((dest.0 + 1) % vertex_count as u32);
        }
        if let Err(e) = fleet.assign_task(agent, dest) {
            warn!(agent = agent.0, "dispatch skipped: {e}");
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    // 1. Navigation graph.
    let (graph, starts) = load_graph(args.graph.as_deref())?;
    info!(
        vertices = graph.vertex_count(),
        lanes = graph.lane_count(),
        chargers = graph.chargers().len(),
        "graph ready"
    );

    // 2. Fleet: agents spread round-robin over the start vertices.
    let spawn_at: Vec<VertexId> = (0..args.agents).map(|i| starts[i % starts.len()]).collect();
    let mut fleet = FleetBuilder::new(config.clone(), graph, DijkstraRouter)
        .agents_at(spawn_at)
        .build()?;
    info!(
        agents = fleet.agent_count(),
        ticks = config.total_ticks,
        tick_secs = config.tick_secs,
        seed = config.seed,
        "fleet ready"
    );

    // 3. Output.
    let writer = CsvWriter::new(&args.out)?;
    let mut obs = CountingObserver::new(FleetOutputObserver::new(writer, &config));

    // 4. Run, dispatching between ticks.
    let mut rng = SimRng::new(config.seed).child(1);
    let t0 = Instant::now();
    while fleet.current_tick() < config.end_tick() {
        dispatch(&mut fleet, &mut rng);
        fleet.step(&mut obs);
    }
    obs.on_sim_end(fleet.current_tick());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!();
    println!(
        "Simulated {:.1} s in {:.3} s wall time",
        fleet.clock().elapsed_secs(),
        elapsed.as_secs_f64()
    );
    println!("  tasks completed : {}", obs.completed);
    println!("  lane waits      : {}", obs.waits);
    println!("  events written  : {} → {}", obs.events, args.out.display());
    println!();

    // 6. Final status table.
    println!("{:<6} {:<14} {:<10} {:>8}", "Agent", "State", "Vertex", "Progress");
    println!("{}", "-".repeat(41));
    for a in fleet.agents() {
        println!(
            "{:<6} {:<14} {:<10} {:>8.2}",
            a.id().0,
            a.state(),
            fleet.graph().vertex_name(a.vertex()),
            a.progress(),
        );
    }
    println!();
    for line in fleet.status_lines() {
        println!("{line}");
    }

    Ok(())
}
