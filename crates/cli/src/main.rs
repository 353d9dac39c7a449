use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rotunfold_core::prelude::*;
use rotunfold_core::record;

mod provenance;

#[derive(Parser)]
#[command(name = "rotunfold")]
#[command(about = "Rotational-unfolding overlap pipeline: enumerate, dedup, verify")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// E1: pruned DFS enumeration of path-shaped unfoldings.
    Enumerate {
        #[arg(long)]
        polyhedron: PathBuf,
        #[arg(long)]
        root_pairs: PathBuf,
        #[arg(long, default_value = "auto")]
        symmetric: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// E2: remove records isomorphic to an earlier kept record.
    Dedup {
        #[arg(long)]
        polyhedron: PathBuf,
        #[arg(long = "in")]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// E3: exact overlap verification and classification.
    Verify {
        #[arg(long)]
        polyhedron: PathBuf,
        #[arg(long = "in")]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Summarize a record stream's overlap-kind breakdown.
    Report {
        #[arg(long = "in")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cmd = Cmd::parse();
    match run(cmd) {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cmd: Cmd) -> Result<()> {
    match cmd.action {
        Action::Enumerate {
            polyhedron,
            root_pairs,
            symmetric,
            out,
        } => enumerate(polyhedron, root_pairs, symmetric, out),
        Action::Dedup {
            polyhedron,
            input,
            out,
        } => dedup(polyhedron, input, out),
        Action::Verify {
            polyhedron,
            input,
            out,
        } => verify(polyhedron, input, out),
        Action::Report { input } => report(input),
    }
}

fn load_polyhedron(path: &PathBuf) -> Result<Polyhedron> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_polyhedron(BufReader::new(file))
        .with_context(|| format!("parsing polyhedron document {}", path.display()))
}

fn enumerate(
    polyhedron_path: PathBuf,
    root_pairs_path: PathBuf,
    symmetric: String,
    out: PathBuf,
) -> Result<()> {
    let start = SystemTime::now();
    let argv: Vec<String> = std::env::args().collect();
    let cwd = std::env::current_dir().unwrap_or_default();

    let poly = load_polyhedron(&polyhedron_path)?;
    let root_pairs_file = File::open(&root_pairs_path)
        .with_context(|| format!("opening {}", root_pairs_path.display()))?;
    let root_pairs = read_root_pairs(BufReader::new(root_pairs_file))
        .with_context(|| format!("parsing root-pair document {}", root_pairs_path.display()))?;

    let mode: SymmetryMode = symmetric
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .with_context(|| format!("invalid --symmetric value {symmetric:?}"))?;
    let (symmetric_used, basis) = resolve_symmetry(mode, &poly.name);
    tracing::info!(
        root_pairs = root_pairs.len(),
        symmetric_used,
        ?basis,
        "starting E1 enumeration"
    );

    let out_file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = BufWriter::new(out_file);
    let count = run_enumerator(&poly, &root_pairs, symmetric_used, |rec| {
        record::write_line(&mut writer, &rec)
    })
    .context("E1 enumeration failed")?;
    tracing::info!(count, "E1 enumeration complete");

    let basis_label = match basis {
        ResolutionBasis::Forced => "forced",
        ResolutionBasis::AutoMatched => "auto-matched",
        ResolutionBasis::AutoUnmatched => "auto-unmatched",
    };
    provenance::write_sidecar(
        &out,
        provenance::Payload {
            start,
            end: SystemTime::now(),
            exit_status: 0,
            argv,
            cwd,
            input_paths: vec![
                polyhedron_path.canonicalize().unwrap_or(polyhedron_path),
                root_pairs_path.canonicalize().unwrap_or(root_pairs_path),
            ],
            symmetry_mode: symmetric,
            resolution_basis: basis_label.to_string(),
            record_count: count,
        },
    )
    .context("writing provenance sidecar")?;
    Ok(())
}

fn dedup(polyhedron_path: PathBuf, input: PathBuf, out: PathBuf) -> Result<()> {
    let poly = load_polyhedron(&polyhedron_path)?;
    let in_file = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
    let records = record::read_all(BufReader::new(in_file))
        .with_context(|| format!("reading records from {}", input.display()))?;
    tracing::info!(input = records.len(), "starting E2 deduplication");

    let out_file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = BufWriter::new(out_file);
    let kept = run_dedup(&poly, records, |rec| record::write_line(&mut writer, &rec))
        .context("E2 deduplication failed")?;
    tracing::info!(kept, "E2 deduplication complete");
    Ok(())
}

fn verify(polyhedron_path: PathBuf, input: PathBuf, out: PathBuf) -> Result<()> {
    let poly = load_polyhedron(&polyhedron_path)?;
    let in_file = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
    let records = record::read_all(BufReader::new(in_file))
        .with_context(|| format!("reading records from {}", input.display()))?;
    tracing::info!(input = records.len(), "starting E3 verification");

    let out_file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = BufWriter::new(out_file);
    let kept = run_verifier(&poly, records, |rec| record::write_line(&mut writer, &rec))
        .context("E3 verification failed")?;
    tracing::info!(kept, "E3 verification complete");
    Ok(())
}

fn report(input: PathBuf) -> Result<()> {
    let in_file = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
    let records = record::read_all(BufReader::new(in_file))
        .with_context(|| format!("reading records from {}", input.display()))?;

    let mut face_face = 0usize;
    let mut edge_edge = 0usize;
    let mut edge_vertex = 0usize;
    let mut vertex_vertex = 0usize;
    let mut unclassified = 0usize;
    for rec in &records {
        match rec.exact_overlap.map(|o| o.kind) {
            Some(OverlapKind::FaceFace) => face_face += 1,
            Some(OverlapKind::EdgeEdge) => edge_edge += 1,
            Some(OverlapKind::EdgeVertex) => edge_vertex += 1,
            Some(OverlapKind::VertexVertex) => vertex_vertex += 1,
            None => unclassified += 1,
        }
    }

    let summary = serde_json::json!({
        "total": records.len(),
        "face_face": face_face,
        "edge_edge": edge_edge,
        "edge_vertex": edge_vertex,
        "vertex_vertex": vertex_vertex,
        "unclassified": unclassified,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
