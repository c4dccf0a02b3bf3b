use clap::{Parser, Subcommand};
use ik_core::timing::{self, Timer};
use ik_kinematics::{
    AngleSolver, KinematicsError, LinearSweep, QueryError, SOLVE_CALLS, SweepGrid,
    effective_radius_cm, solve_batch,
};
use ik_project::ProjectError;
use ik_results::{
    BatchRequest, ResultsError, RunStore, RunTimingSummary, format_rows, format_table,
    parse_queries, run_batch,
};
use std::path::{Path, PathBuf};

const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("{0}")]
    Results(#[from] ResultsError),

    #[error("{0}")]
    Kinematics(#[from] KinematicsError),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ik-cli")]
#[command(about = "Centre-of-mass angles for a helical-orbit spectrometer", long_about = None)]
struct Cli {
    /// Report wall-clock timing
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a reaction file and print the derived frame
    Validate {
        /// Path to the reaction YAML or JSON file
        reaction_path: PathBuf,
    },
    /// Solve one query
    Angle {
        reaction_path: PathBuf,
        /// Recoil excitation energy (MeV)
        #[arg(long, allow_hyphen_values = true)]
        ex: f64,
        /// Axial position at the array (cm)
        #[arg(long, allow_hyphen_values = true)]
        z: f64,
    },
    /// Axial position for a given CM angle
    Position {
        reaction_path: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        ex: f64,
        /// CM emission angle (degrees)
        #[arg(long)]
        theta_cm: f64,
    },
    /// Reachable axial range for one excitation energy
    Reach {
        reaction_path: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        ex: f64,
    },
    /// Effective radius of a flat array face
    Radius {
        #[arg(long, allow_hyphen_values = true)]
        x1: f64,
        #[arg(long, allow_hyphen_values = true)]
        x2: f64,
        #[arg(long)]
        height: f64,
    },
    /// Solve every `ex z` pair in a query file
    Batch {
        reaction_path: PathBuf,
        /// Query file, one `ex z` pair per line
        queries_path: PathBuf,
        /// Write the table here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep the run in the run store
        #[arg(long)]
        store: bool,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Solve a grid of excitation energies and positions
    Sweep {
        reaction_path: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        ex_start: f64,
        #[arg(long, allow_hyphen_values = true)]
        ex_end: f64,
        #[arg(long)]
        ex_points: usize,
        #[arg(long, allow_hyphen_values = true)]
        z_start: f64,
        #[arg(long, allow_hyphen_values = true)]
        z_end: f64,
        #[arg(long)]
        z_points: usize,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List stored runs for a reaction
    Runs { reaction_path: PathBuf },
    /// Print a stored run
    ShowRun {
        reaction_path: PathBuf,
        run_id: String,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if cli.timing {
        timing::enable_timing();
    }

    match cli.command {
        Commands::Validate { reaction_path } => cmd_validate(&reaction_path),
        Commands::Angle {
            reaction_path,
            ex,
            z,
        } => cmd_angle(&reaction_path, ex, z),
        Commands::Position {
            reaction_path,
            ex,
            theta_cm,
        } => cmd_position(&reaction_path, ex, theta_cm),
        Commands::Reach { reaction_path, ex } => cmd_reach(&reaction_path, ex),
        Commands::Radius { x1, x2, height } => cmd_radius(x1, x2, height),
        Commands::Batch {
            reaction_path,
            queries_path,
            output,
            store,
            no_cache,
        } => cmd_batch(
            &reaction_path,
            &queries_path,
            output.as_deref(),
            store,
            !no_cache,
        ),
        Commands::Sweep {
            reaction_path,
            ex_start,
            ex_end,
            ex_points,
            z_start,
            z_end,
            z_points,
            output,
        } => {
            let grid = SweepGrid {
                ex_mev: LinearSweep::new(ex_start, ex_end, ex_points)?,
                z_cm: LinearSweep::new(z_start, z_end, z_points)?,
            };
            cmd_sweep(&reaction_path, grid, output.as_deref())
        }
        Commands::Runs { reaction_path } => cmd_runs(&reaction_path),
        Commands::ShowRun {
            reaction_path,
            run_id,
        } => cmd_show_run(&reaction_path, &run_id),
    }
}

fn load_solver(reaction_path: &Path) -> CliResult<(ik_project::ReactionFile, AngleSolver)> {
    let timer = Timer::start("load reaction");
    let file = ik_project::load_path(reaction_path)?;
    let solver = ik_project::build_solver(&file)?;
    timer.stop_and_log();
    Ok((file, solver))
}

fn write_or_print(output: Option<&Path>, text: &str, rows: usize) -> CliResult<()> {
    if let Some(path) = output {
        std::fs::write(path, text)?;
        println!("✓ Wrote {} rows to {}", rows, path.display());
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn cmd_validate(reaction_path: &Path) -> CliResult<()> {
    println!("Validating reaction: {}", reaction_path.display());
    let (file, solver) = load_solver(reaction_path)?;
    let frame = solver.frame();
    let reaction = solver.reaction();

    println!("✓ Reaction is valid: {}", file.name);
    println!("  Beam energy:     {:.4} MeV", reaction.beam_kinetic_energy_mev());
    println!("  E_cm (total):    {:.4} MeV", frame.total_cm);
    println!("  gamma:           {:.9}", frame.gamma);
    println!("  beta:            {:.9}", frame.beta);
    println!("  Q value:         {:.4} MeV", frame.q_value_mev());
    println!("  Ex threshold:    {:.4} MeV", frame.excitation_threshold_mev());
    println!("  Rigidity qB:     {:.6} MeV/cm", solver.rigidity_mev_per_cm());
    println!("  Array radius:    {:.6} cm", solver.array_radius_cm());
    Ok(())
}

fn cmd_angle(reaction_path: &Path, ex: f64, z: f64) -> CliResult<()> {
    let (_file, solver) = load_solver(reaction_path)?;
    let solution = solver.solve(ex, z)?;

    println!("Ex = {} MeV, z = {} cm", ex, z);
    println!("  theta_cm:   {:.6} deg", solution.theta_cm_deg);
    println!("  theta_lab:  {:.6} deg", solution.theta_lab_deg);
    println!("  KE_lab:     {:.6} MeV", solution.ejectile_lab_energy_mev);
    println!(
        "  p_cm:       para {:.6}, perp {:.6} MeV/c",
        solution.p_para_cm, solution.p_perp_cm
    );
    println!(
        "  residual:   {:.3e} cm after {} iterations",
        solution.residual_cm, solution.iterations
    );
    Ok(())
}

fn cmd_position(reaction_path: &Path, ex: f64, theta_cm: f64) -> CliResult<()> {
    let (_file, solver) = load_solver(reaction_path)?;
    let pos = solver.position_for_angle(ex, theta_cm)?;

    println!("Ex = {} MeV, theta_cm = {} deg", ex, theta_cm);
    println!("  z:            {:.6} cm", pos.z_cm);
    println!("  theta_lab:    {:.6} deg", pos.theta_lab_deg);
    println!("  KE_lab:       {:.6} MeV", pos.ejectile_lab_energy_mev);
    println!("  orbit radius: {:.6} cm", pos.orbit_radius_cm);
    Ok(())
}

fn cmd_reach(reaction_path: &Path, ex: f64) -> CliResult<()> {
    let (_file, solver) = load_solver(reaction_path)?;
    let window = solver.reach(ex)?;

    println!("Ex = {} MeV", ex);
    println!(
        "  z min: {:.4} cm (theta_cm = {:.3} deg)",
        window.z_min_cm, window.theta_at_min_deg
    );
    println!(
        "  z max: {:.4} cm (theta_cm = {:.3} deg)",
        window.z_max_cm, window.theta_at_max_deg
    );
    Ok(())
}

fn cmd_radius(x1: f64, x2: f64, height: f64) -> CliResult<()> {
    let radius = effective_radius_cm(x1, x2, height)?;
    println!("{:.12}", radius);
    Ok(())
}

fn cmd_batch(
    reaction_path: &Path,
    queries_path: &Path,
    output: Option<&Path>,
    store: bool,
    use_cache: bool,
) -> CliResult<()> {
    let file = ik_project::load_path(reaction_path)?;
    let text = std::fs::read_to_string(queries_path)?;
    let queries = parse_queries(&text)?;

    let response = run_batch(&BatchRequest {
        reaction_path,
        file: &file,
        queries: &queries,
        solver_version: SOLVER_VERSION,
        store,
        use_cache,
    })?;

    write_or_print(output, &format_rows(&response.rows), response.rows.len())?;

    let counts = response.manifest.counts;
    if response.loaded_from_cache {
        eprintln!("✓ Loaded from cache: {}", response.run_id);
    } else if store {
        eprintln!("✓ Stored run: {}", response.run_id);
    }
    eprintln!(
        "  {} queries: {} solved, {} forbidden, {} not converged, {} invalid",
        counts.total, counts.solved, counts.forbidden, counts.not_converged, counts.invalid
    );
    if timing::is_enabled() {
        print_timing_summary(&response.timing);
    }
    Ok(())
}

fn cmd_sweep(reaction_path: &Path, grid: SweepGrid, output: Option<&Path>) -> CliResult<()> {
    let (_file, solver) = load_solver(reaction_path)?;
    eprintln!("Sweeping Ex {} x z {}", grid.ex_mev, grid.z_cm);

    let timer = Timer::start("sweep");
    let records = solve_batch(&solver, &grid.queries());
    timer.stop_and_log();

    write_or_print(output, &format_table(&records), records.len())?;
    if timing::is_enabled() {
        eprintln!(
            "  {} solves, {:.3e} s average, {:.3e} s max",
            SOLVE_CALLS.count(),
            SOLVE_CALLS.average_seconds(),
            SOLVE_CALLS.max_seconds()
        );
    }
    Ok(())
}

fn print_timing_summary(timing: &RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    let solve_pct = 100.0 * timing.solve_time_s / total;

    eprintln!("\nTiming summary:");
    if timing.load_cache_time_s > 0.0 {
        eprintln!("  Cache load: {:.3}s", timing.load_cache_time_s);
    } else {
        eprintln!("  Build:   {:.3}s", timing.build_time_s);
        eprintln!("  Solve:   {:.3}s ({:.1}%)", timing.solve_time_s, solve_pct);
        eprintln!("  Save:    {:.3}s", timing.save_time_s);
        eprintln!(
            "  Per query: {:.3e}s over {} solves",
            SOLVE_CALLS.average_seconds(),
            SOLVE_CALLS.count()
        );
    }
    eprintln!("  Total:   {:.3}s", timing.total_time_s);
}

fn cmd_runs(reaction_path: &Path) -> CliResult<()> {
    let file = ik_project::load_path(reaction_path)?;
    let store = RunStore::for_reaction(reaction_path)?;
    let runs = store.list_runs(&file.name)?;

    if runs.is_empty() {
        println!("No stored runs for reaction: {}", file.name);
    } else {
        println!("Stored runs for '{}':", file.name);
        for manifest in runs {
            println!(
                "  {} ({}, {} queries, {} solved)",
                manifest.run_id, manifest.timestamp, manifest.counts.total, manifest.counts.solved
            );
        }
    }
    Ok(())
}

fn cmd_show_run(reaction_path: &Path, run_id: &str) -> CliResult<()> {
    let store = RunStore::for_reaction(reaction_path)?;
    let manifest = store.load_manifest(run_id)?;
    let rows = store.load_rows(run_id)?;

    eprintln!("Run {} of '{}'", manifest.run_id, manifest.reaction_name);
    eprintln!(
        "  {} (solver {})",
        manifest.timestamp, manifest.solver_version
    );
    print!("{}", format_rows(&rows));
    Ok(())
}
