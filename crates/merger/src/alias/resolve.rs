use std::collections::{HashMap, HashSet};

use super::maps::{dir_code, file_code};
use super::spec::SourceSpec;
use super::tree::{join_label, Candidate, DirNode};

pub const MAX_ALIAS_LEVEL: u8 = 3;

/// Compute the display label of every source, in input order.
///
/// - level 0: explicit alias, else the resolved path
/// - level 1: explicit alias, else the argument as typed
/// - level 2: level 1, then shorten derived labels (extension, service
///   and project codes, irrelevant directories)
/// - level 3: level 2, plus directory names cut to unique suffixes
///
/// Each level 2 shortening step applies to every derived label at once,
/// and only when it leaves all labels distinct. Explicit aliases are
/// never altered. At every level a derived label that still collides
/// falls back to the full path. `keep_extensions` is set when the caller supplied its
/// own postfix.
pub fn resolve_aliases(specs: &[SourceSpec], level: u8, keep_extensions: bool) -> Vec<String> {
    let mut labels: Vec<String> = match level {
        0 => specs
            .iter()
            .map(|spec| spec.alias.clone().unwrap_or_else(|| spec.path.clone()))
            .collect(),
        1 => specs
            .iter()
            .map(|spec| spec.alias.clone().unwrap_or_else(|| spec.raw.clone()))
            .collect(),
        _ => return shorten(specs, level.min(MAX_ALIAS_LEVEL), keep_extensions),
    };
    ensure_unique(specs, &mut labels);
    labels
}

fn shorten(specs: &[SourceSpec], level: u8, keep_extensions: bool) -> Vec<String> {
    let explicit: HashSet<&str> = specs.iter().filter_map(|spec| spec.alias.as_deref()).collect();

    // Derived labels, keyed by position in `specs`
    let mut derived: Vec<(usize, Candidate)> = specs
        .iter()
        .enumerate()
        .filter(|(_, spec)| spec.alias.is_none())
        .map(|(index, spec)| (index, Candidate::split(spec.display_name())))
        .collect();

    if !keep_extensions {
        apply_step(&mut derived, &explicit, strip_extension);
    }
    apply_step(&mut derived, &explicit, map_file);
    apply_step(&mut derived, &explicit, map_dir);

    let mut tree = DirNode::build(derived.iter().map(|(_, candidate)| candidate));
    if level >= MAX_ALIAS_LEVEL {
        tree.reduce_names();
    }

    let mut labels: Vec<String> = specs
        .iter()
        .map(|spec| spec.alias.clone().unwrap_or_default())
        .collect();
    for (index, candidate) in &derived {
        labels[*index] = join_label(&tree.relevant_dirs(&candidate.dirs), &candidate.file);
    }

    ensure_unique(specs, &mut labels);
    labels
}

/// Apply a shortening step to every derived label, or to none of them.
fn apply_step(
    derived: &mut [(usize, Candidate)],
    explicit: &HashSet<&str>,
    step: fn(&Candidate) -> Candidate,
) {
    let next: Vec<Candidate> = derived.iter().map(|(_, candidate)| step(candidate)).collect();

    let mut seen = HashSet::new();
    let distinct = next.iter().all(|candidate| {
        let label = candidate.label();
        !explicit.contains(label.as_str()) && seen.insert(label)
    });
    if !distinct {
        return;
    }

    for ((_, candidate), shortened) in derived.iter_mut().zip(next) {
        *candidate = shortened;
    }
}

fn split_extension(file: &str) -> (&str, Option<&str>) {
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file, None),
    }
}

fn strip_extension(candidate: &Candidate) -> Candidate {
    let (stem, _) = split_extension(&candidate.file);
    Candidate {
        dirs: candidate.dirs.clone(),
        file: stem.to_string(),
    }
}

fn map_file(candidate: &Candidate) -> Candidate {
    let (stem, ext) = split_extension(&candidate.file);
    let file = match (file_code(stem), ext) {
        (Some(code), Some(ext)) => format!("{code}.{ext}"),
        (Some(code), None) => code.to_string(),
        (None, _) => candidate.file.clone(),
    };
    Candidate {
        dirs: candidate.dirs.clone(),
        file,
    }
}

fn map_dir(candidate: &Candidate) -> Candidate {
    let mut dirs = candidate.dirs.clone();
    match dirs.last().and_then(|dir| dir_code(dir)) {
        Some(code) => {
            dirs.pop();
            Candidate {
                dirs,
                file: format!("{code}-{}", candidate.file),
            }
        }
        None => candidate.clone(),
    }
}

/// Fall back to the full path for any derived label that still collides.
fn ensure_unique(specs: &[SourceSpec], labels: &mut [String]) {
    loop {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in labels.iter() {
            *counts.entry(label.as_str()).or_default() += 1;
        }

        let colliding: Vec<usize> = specs
            .iter()
            .enumerate()
            .filter(|(index, spec)| {
                spec.alias.is_none()
                    && labels[*index] != spec.path
                    && counts.get(labels[*index].as_str()).copied().unwrap_or(0) > 1
            })
            .map(|(index, _)| index)
            .collect();

        if colliding.is_empty() {
            return;
        }
        for index in colliding {
            tracing::debug!(source = %specs[index].path, label = %labels[index], "alias collides, using full path");
            labels[index] = specs[index].path.clone();
        }
    }
}
