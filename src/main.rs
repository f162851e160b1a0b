//! Ion Arena headless driver
//!
//! Usage: `ion-arena [settings.json] [scene.json] [dump.json]`
//!
//! Builds the start-up scene, runs it for a fixed number of ticks and logs
//! population samples along the way. Set `RUST_LOG=info` (or `debug` for
//! per-tick reports) to see progress.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ion Arena (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &[String]) -> ion_arena::Result<()> {
    use ion_arena::consts::SIM_DT;
    use ion_arena::sim::{CensusHistory, SceneLayout, Simulator};
    use ion_arena::Settings;

    let settings = match args.first() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let layout = match args.get(1) {
        Some(path) => SceneLayout::load(path)?,
        None => SceneLayout::default(),
    };

    let mut sim = Simulator::new(settings, layout.seed)?;
    let enclosure = layout.build(&mut sim)?;
    log::info!(
        "Arena {}x{} with {} entities, seed {}, electrodes {:?}",
        layout.width,
        layout.height,
        sim.len(),
        sim.seed(),
        enclosure.electrodes()
    );

    let mut history = CensusHistory::default();
    let sample_every = (layout.ticks / 10).max(1);
    let mut reactions = 0;
    for _ in 0..layout.ticks {
        let report = sim.simulate(SIM_DT);
        reactions += report.reactions;
        history.record(sim.census());
        if report.tick % sample_every == 0 {
            if let Some(census) = history.latest() {
                log::info!(
                    "tick {}: {} electrons, {} atoms, {} +ions, {} -ions",
                    report.tick,
                    census.electrons,
                    census.atoms,
                    census.positive_ions,
                    census.negative_ions
                );
            }
        }
    }

    let census = sim.census();
    println!(
        "after {} ticks: {} electrons, {} atoms, {} positive ions, {} negative ions ({} reactions, peak {})",
        sim.ticks(),
        census.electrons,
        census.atoms,
        census.positive_ions,
        census.negative_ions,
        reactions,
        history.peak()
    );

    if let Some(path) = args.get(2) {
        let entities: Vec<_> = sim.iter().map(|(_, e)| e).collect();
        std::fs::write(path, serde_json::to_string_pretty(&entities)?)?;
        log::info!("Wrote {} entities to {}", entities.len(), path);
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the product on wasm; there is no driver
}
