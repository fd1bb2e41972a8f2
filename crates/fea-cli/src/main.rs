use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fea_solver::StaticAnalysis;

fn usage() {
    eprintln!("usage:");
    eprintln!("  fea-cli <input.json> [output.msh]");
    eprintln!();
    eprintln!("examples:");
    eprintln!("  fea-cli tension.json");
    eprintln!("  fea-cli tension.json deformed.msh");
    eprintln!();
    eprintln!("logging is configured through RUST_LOG (e.g. RUST_LOG=info)");
}

fn run(input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    let document = fea_io::read_input(input)?;
    let (task, params, mesh, boundary) = document.into_records();

    let stats = mesh.statistics();
    println!("nodes: {}", stats.num_nodes);
    println!("elements: {}", stats.num_elements);
    println!("dofs: {}", stats.num_nodes * task.dof);

    let mut analysis = StaticAnalysis::new(task, params, mesh, boundary)?;
    let results = analysis.run()?;

    println!("iterations: {}", results.stats.iterations);
    println!("residual: {:e}", results.stats.residual);
    if !results.stats.converged {
        eprintln!("warning: solver hit the iteration cap, results are the best iterate");
    }

    fea_io::write_gmsh_file(
        output,
        &analysis.mesh().nodes,
        &analysis.mesh().elements,
        &results.displacements,
        &results.stresses,
    )?;
    println!("wrote {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" {
        usage();
        return ExitCode::FAILURE;
    }

    let input = PathBuf::from(&args[1]);
    let output = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("deformed.msh"));

    match run(&input, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
