// Entry point and high-level CLI flow.
//
// One-shot run: load the three CSV inputs, build the frozen network graph,
// resolve the hospital path (Phase 0), rank the remaining damaged segments by
// beneficiaries per unit cost, fill phases 1-4 under the budget caps, then
// export the plan/synthesis tables and print previews.
mod cost;
mod error;
mod graph;
mod hospital;
mod loader;
mod output;
mod phases;
mod plan;
mod ranking;
mod types;
mod util;

use clap::Parser;
use cost::CostModel;
use error::PlanResult;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::info;
use util::{format_int, format_number};

#[derive(Parser)]
#[command(
    name = "grid-reconnect",
    about = "Phased, cost-prioritized electrical reconnection planner for a storm-damaged town network"
)]
struct Cli {
    /// Buildings CSV (id,kind,households)
    #[arg(long)]
    buildings: PathBuf,

    /// Segments CSV (id,material,length_m,damaged)
    #[arg(long)]
    segments: PathBuf,

    /// Network tree CSV (node_a,node_b,segment_id)
    #[arg(long)]
    network: PathBuf,

    /// Output path for the per-segment plan
    #[arg(long, default_value = "plan.csv")]
    out_plan: PathBuf,

    /// Output path for the per-phase synthesis
    #[arg(long, default_value = "phases.csv")]
    out_phases: PathBuf,

    /// Output path for the run summary JSON
    #[arg(long, default_value = "summary.json")]
    out_summary: PathBuf,
}

fn run(cli: &Cli) -> PlanResult<()> {
    let cost_model = CostModel::default();
    let (graph, load_report) =
        loader::load_network(&cli.buildings, &cli.segments, &cli.network, cost_model)?;
    info!(
        buildings = load_report.buildings,
        segments = load_report.segments,
        edges = load_report.edges,
        damaged = load_report.damaged_segments,
        "network loaded"
    );
    println!(
        "Processing network... ({} buildings, {} segments, {} damaged)",
        format_int(load_report.buildings as i64),
        format_int(load_report.segments as i64),
        format_int(load_report.damaged_segments as i64)
    );
    if load_report.orphan_segments > 0 {
        println!(
            "Note: {} segment records without a network edge were ignored.",
            format_int(load_report.orphan_segments as i64)
        );
    }
    println!();

    let source = graph.source_node()?;
    let hospital_node = graph.hospital_node()?;
    let path = hospital::resolve_path(&graph, source, hospital_node)?;
    let phase0 = path.damaged(&graph);
    let autonomy = hospital::check_autonomy(&graph, &phase0);

    let attribution = ranking::attribute_beneficiaries(&graph, source);
    let phase0_set: HashSet<graph::SegmentIdx> = phase0.iter().copied().collect();
    let ranked = ranking::rank_segments(&graph, &attribution, &phase0_set);
    let budget: f64 = ranked
        .iter()
        .map(|r| graph.segment(r.segment).cost.total_cost)
        .sum();
    let allocated = phases::allocate(&graph, &ranked, budget);
    let plan = plan::assemble(&graph, &phase0, &attribution, allocated, autonomy);

    println!("=== HOSPITAL (Phase 0) ===");
    println!(
        "Hospital node: {}",
        graph.node(hospital_node).id
    );
    let phase0_ids: Vec<&str> = phase0.iter().map(|&s| graph.segment(s).id.as_str()).collect();
    println!("Damaged segments on the supply path: {:?}", phase0_ids);
    println!(
        "Phase 0 cost: {}",
        format_number(plan.autonomy.phase0_cost, 2)
    );
    println!(
        "Critical duration (4-worker crews, parallel): {} h",
        format_number(plan.autonomy.critical_duration_hours, 2)
    );
    println!(
        "Autonomy target (20 h - 20%): {} h",
        format_number(plan.autonomy.target_hours, 2)
    );
    println!(
        "Within margin? {}",
        if plan.autonomy.within_margin { "YES" } else { "NO" }
    );
    println!();

    let plan_rows = plan.plan_rows(&graph, &attribution);
    output::write_csv(&cli.out_plan, &plan_rows)?;
    let phase_rows = plan.phase_rows(&graph);
    output::write_csv(&cli.out_phases, &phase_rows)?;
    output::write_json(&cli.out_summary, &plan.run_summary())?;

    output::preview_table("=== PHASE SYNTHESIS ===", &phase_rows, phase_rows.len());
    println!(
        "Total cost: {} for {} beneficiaries across {} damaged segments",
        format_number(plan.total_cost, 2),
        format_int(plan.total_beneficiaries),
        format_int(plan.damaged_segment_count() as i64)
    );
    println!(
        "Files written:\n - {}\n - {}\n - {}",
        cli.out_plan.display(),
        cli.out_phases.display(),
        cli.out_summary.display()
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
