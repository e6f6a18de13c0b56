use std::env;
use std::path::{Path, PathBuf};
use track_extract::artifact::{overlay, read_edge_file};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let edge_path = PathBuf::from(args.next().ok_or_else(usage)?);
    let out_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output(&edge_path));

    let edges = read_edge_file(&edge_path).map_err(|e| e.to_string())?;
    let canvas = overlay::render_edges(&edges.outer_boundary, &edges.inner_boundary, None);
    canvas
        .save(&out_path)
        .map_err(|e| format!("Failed to save {}: {e}", out_path.display()))?;

    println!(
        "outer={} inner={} points -> {}",
        edges.outer_boundary.len(),
        edges.inner_boundary.len(),
        out_path.display()
    );
    Ok(())
}

fn default_output(edge_path: &Path) -> PathBuf {
    edge_path.with_extension("png")
}

fn usage() -> String {
    "Usage: render_edges <edge_coords.bin> [output.png]".to_string()
}
