/// Meshport - Inspect, convert and generate mesh files
///
/// Commands:
///   - info <FILE>: Vertex/face counts and bounds
///   - convert <IN> <OUT>: Re-encode a mesh, formats picked by extension
///   - cube <OUT>: Write the sample cube

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use meshport_cli::report;

#[derive(Parser)]
#[command(name = "meshport")]
#[command(about = "Read, write and convert 3DS, LWO, OBJ, FBX, STL and PLY meshes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of a mesh file
    Info {
        /// Input mesh file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Convert a mesh between formats
    Convert {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file (3ds, lwo, obj or fbx)
        output: PathBuf,

        /// Object, surface or geometry name stored in the output
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Write an axis-aligned cube
    Cube {
        /// Output mesh file (3ds, lwo, obj or fbx)
        output: PathBuf,

        /// Edge length
        #[arg(short, long, default_value = "1.0")]
        size: f32,

        /// Object, surface or geometry name stored in the output
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Info { input } => meshport_cli::info(input).map(|summary| {
            report::print_summary(&summary, cli.verbose);
        }),
        Commands::Convert { input, output, name } => {
            meshport_cli::convert(input, output, name.as_deref()).map(|summary| {
                report::print_written(&summary, cli.verbose);
            })
        }
        Commands::Cube { output, size, name } => {
            meshport_cli::cube(output, *size, name.as_deref()).map(|summary| {
                report::print_written(&summary, cli.verbose);
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report::print_error(&err);
            ExitCode::FAILURE
        }
    }
}
