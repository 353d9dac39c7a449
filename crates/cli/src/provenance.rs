use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

/// Metadata used to generate a provenance sidecar for one E1 run
/// (`SPEC_FULL.md` §3, `spec.md` §6).
pub struct Payload {
    pub start: SystemTime,
    pub end: SystemTime,
    pub exit_status: i32,
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    pub input_paths: Vec<PathBuf>,
    pub symmetry_mode: String,
    pub resolution_basis: String,
    pub record_count: usize,
}

/// Write `<artifact>.provenance.json` alongside an E1 output stream.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "run_id": run_id(),
        "code_rev": current_git_rev(),
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "start_unix_seconds": unix_seconds(payload.start),
        "end_unix_seconds": unix_seconds(payload.end),
        "exit_status": payload.exit_status,
        "invocation": {
            "argv": payload.argv,
            "cwd": payload.cwd.to_string_lossy(),
        },
        "input_paths": payload
            .input_paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>(),
        "symmetry": {
            "mode": payload.symmetry_mode,
            "resolution_basis": payload.resolution_basis,
        },
        "record_count": payload.record_count,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    let mut name = stem;
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

fn unix_seconds(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// A run identifier unique enough for provenance correlation: process id plus
/// start time, not a claim of global uniqueness across machines.
fn run_id() -> String {
    format!("{}-{}", std::process::id(), unix_seconds(SystemTime::now()))
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT") {
        if !from_env.is_empty() {
            return from_env.to_string();
        }
    }
    if let Ok(env_override) = std::env::var("GIT_COMMIT") {
        if !env_override.is_empty() {
            return env_override;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample_payload() -> Payload {
        let now = SystemTime::now();
        Payload {
            start: now,
            end: now,
            exit_status: 0,
            argv: vec!["rotunfold".into(), "enumerate".into()],
            cwd: PathBuf::from("/tmp"),
            input_paths: vec![PathBuf::from("/tmp/poly.json")],
            symmetry_mode: "auto".into(),
            resolution_basis: "auto-matched".into(),
            record_count: 3,
        }
    }

    #[test]
    fn provenance_path_rewrites_extension() {
        let base = Path::new("/tmp/output/foo.jsonl");
        let derived = provenance_path(base);
        assert_eq!(derived, Path::new("/tmp/output/foo.provenance.json"));
    }

    #[test]
    fn write_sidecar_creates_file() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("a.jsonl");
        fs::write(&artifact, "").unwrap();
        let prov_path = write_sidecar(&artifact, sample_payload()).unwrap();
        assert!(prov_path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["record_count"], 3);
    }
}
