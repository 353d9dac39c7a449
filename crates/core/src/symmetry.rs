//! Resolution of the symmetry-mode option consumed by E1 (`spec.md` §6).

/// How the `symmetric_used` flag for a run was decided, recorded in provenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionBasis {
    /// The option was `on` or `off`; no inference was needed.
    Forced,
    /// The option was `auto`; the polyhedron's name matched the naming convention.
    AutoMatched,
    /// The option was `auto`; the polyhedron's name did not match.
    AutoUnmatched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymmetryMode {
    On,
    Off,
    Auto,
}

impl std::str::FromStr for SymmetryMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(SymmetryMode::On),
            "off" => Ok(SymmetryMode::Off),
            "auto" => Ok(SymmetryMode::Auto),
            other => Err(format!("unknown symmetry mode {other:?}")),
        }
    }
}

/// Resolve the symmetry-mode option against a polyhedron name.
///
/// Naming convention for `auto`: a leading `a`, `p`, or `r`, or a leading `s`
/// followed by two digits between `01` and `11` inclusive, denotes a
/// symmetric polyhedron.
pub fn resolve(mode: SymmetryMode, polyhedron_name: &str) -> (bool, ResolutionBasis) {
    match mode {
        SymmetryMode::On => (true, ResolutionBasis::Forced),
        SymmetryMode::Off => (false, ResolutionBasis::Forced),
        SymmetryMode::Auto => {
            if matches_naming_convention(polyhedron_name) {
                (true, ResolutionBasis::AutoMatched)
            } else {
                (false, ResolutionBasis::AutoUnmatched)
            }
        }
    }
}

fn matches_naming_convention(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some('a') | Some('p') | Some('r') => true,
        Some('s') => {
            let digits: String = chars.take(2).collect();
            if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
                return false;
            }
            let n: u32 = digits.parse().unwrap_or(0);
            (1..=11).contains(&n)
        }
        _ => false,
    }
}
