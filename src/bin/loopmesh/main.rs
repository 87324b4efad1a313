//! loopmesh CLI - subdivide and simplify triangle meshes.
//!
//! Usage: loopmesh <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `loopmesh --help` for available commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::{Parser, Subcommand};

use loopmesh::algo::{simplify, subdivide, Progress};
use loopmesh::io;
use loopmesh::mesh::Mesh;

#[derive(Parser)]
#[command(name = "loopmesh")]
#[command(author, version, about = "Loop subdivision and edge-collapse simplification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Subdivide a mesh with Loop subdivision
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Simplify a mesh by collapsing its shortest edges
    Simplify {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Target number of triangles
        #[arg(short = 't', long, conflicts_with = "ratio")]
        triangles: Option<usize>,

        /// Target ratio of triangles to keep (0.0 to 1.0)
        #[arg(short, long, default_value = "0.5")]
        ratio: f64,
    },

    /// List boundary, crease, and plain edges
    Edges {
        /// Input mesh file
        input: PathBuf,

        /// Print every edge, not just the counts
        #[arg(long)]
        list: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Subdivide {
            input,
            output,
            iterations,
            sequential,
        } => {
            cmd_subdivide(&input, &output, iterations, sequential)?;
        }

        Commands::Simplify {
            input,
            output,
            triangles,
            ratio,
        } => {
            cmd_simplify(&input, &output, triangles, ratio)?;
        }

        Commands::Edges { input, list } => {
            cmd_edges(&input, list)?;
        }
    }

    Ok(())
}

const BAR_WIDTH: usize = 30;

/// A stderr progress bar that only redraws when the percentage grows.
fn create_progress() -> Progress {
    let drawn = AtomicUsize::new(0);

    Progress::new(move |done, total, message| {
        if total == 0 {
            return;
        }
        let percent = done.min(total) * 100 / total;
        if drawn.fetch_max(percent, Ordering::Relaxed) >= percent && percent < 100 {
            return;
        }

        let filled = "=".repeat(percent * BAR_WIDTH / 100);
        eprint!("\r[{:<width$}] {:3}% {}", filled, percent, message, width = BAR_WIDTH);
        let _ = std::io::stderr().flush();
        if done >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: Mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Triangles: {}", mesh.num_triangles());
    println!("Half-edges: {}", mesh.num_halfedges());

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for t in mesh.triangle_ids() {
        let area = mesh.triangle_area(t);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }

    println!("Surface area: {:.6}", mesh.surface_area());
    if mesh.num_triangles() > 0 {
        println!("Triangle area range: [{:.6}, {:.6}]", min_area, max_area);
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    if mesh.num_halfedges() > 0 {
        let total: f64 = mesh.halfedge_ids().map(|he| mesh.edge_length(he)).sum();
        println!(
            "Average edge length: {:.6}",
            total / mesh.num_halfedges() as f64
        );
    }

    let edges = mesh.classify_edges();
    if edges.boundary.is_empty() {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary half-edges)", edges.boundary.len());
    }
    println!("Creased edges: {}", edges.crease.len());

    match mesh.validate() {
        Ok(()) => println!("Structure: valid"),
        Err(e) => println!("Structure: INVALID ({})", e),
    }

    Ok(())
}

fn cmd_subdivide(
    input: &PathBuf,
    output: &PathBuf,
    iterations: usize,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: Mesh = io::load(input)?;

    println!(
        "Loaded: {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );

    let options = subdivide::SubdivideOptions::new(iterations).with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };
    let progress = create_progress();

    println!("Applying Loop subdivision ({} iterations, {})...", iterations, mode);
    let start = Instant::now();
    let report = subdivide::loop_subdivide_with_progress(&mut mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    if report.skipped_triangles > 0 {
        println!("Skipped triangles: {}", report.skipped_triangles);
    }
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_simplify(
    input: &PathBuf,
    output: &PathBuf,
    triangles: Option<usize>,
    ratio: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: Mesh = io::load(input)?;

    println!(
        "Loaded: {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );

    let options = if let Some(target) = triangles {
        println!("Simplifying to {} triangles...", target);
        simplify::SimplifyOptions::with_target_triangles(target)
    } else {
        println!("Simplifying to {:.0}% of triangles...", ratio * 100.0);
        simplify::SimplifyOptions::with_target_ratio(ratio)
    };

    let progress = create_progress();

    let start = Instant::now();
    let outcome = simplify::simplify_with_progress(&mut mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} triangles after {} collapses",
        outcome.achieved, outcome.collapses
    );
    if !outcome.reached {
        println!(
            "Target of {} triangles could not be reached",
            outcome.target
        );
    }
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_edges(input: &PathBuf, list: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: Mesh = io::load(input)?;
    let edges = mesh.classify_edges();

    let groups = [
        ("Boundary", &edges.boundary),
        ("Crease", &edges.crease),
        ("Plain", &edges.plain),
    ];
    for (name, pairs) in groups {
        println!("{}: {}", name, pairs.len());
        if list {
            for (a, b) in pairs {
                println!("  {} {}", a.index(), b.index());
            }
        }
    }

    Ok(())
}
