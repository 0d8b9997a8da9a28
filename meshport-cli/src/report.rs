/// Styled terminal output for command results
use crossterm::style::{StyledContent, Stylize};
use meshport_core::Vec3;

use crate::MeshSummary;

fn label(name: &str) -> StyledContent<String> {
    format!("{name:<10}").dark_grey()
}

fn format_vec(v: &Vec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

fn print_counts(summary: &MeshSummary, verbose: bool) {
    println!("  {}{}", label("format"), summary.format.extension().to_uppercase());
    println!("  {}{}", label("vertices"), summary.vertices);
    println!("  {}{}", label("faces"), summary.faces);

    if summary.vertices == 0 {
        return;
    }
    let bounds = &summary.bounds;
    println!("  {}{}", label("size"), format_vec(&bounds.size()));
    if verbose {
        println!("  {}{}", label("min"), format_vec(&bounds.min));
        println!("  {}{}", label("max"), format_vec(&bounds.max));
        println!("  {}{}", label("center"), format_vec(&bounds.center()));
    }
}

/// Summary of a loaded mesh.
pub fn print_summary(summary: &MeshSummary, verbose: bool) {
    println!("{}", summary.path.display().to_string().bold().cyan());
    print_counts(summary, verbose);
}

/// Confirmation after a file was written.
pub fn print_written(summary: &MeshSummary, verbose: bool) {
    println!(
        "{} {}",
        "Wrote".green().bold(),
        summary.path.display().to_string().bold()
    );
    if verbose {
        print_counts(summary, verbose);
    }
}

/// Error with its full cause chain.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {err}", "error:".red().bold());
    for cause in err.chain().skip(1) {
        eprintln!("  {} {cause}", "caused by:".yellow());
    }
}
