use std::collections::BTreeMap;

/// A derived label in pieces: directory segments plus the file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub dirs: Vec<String>,
    pub file: String,
}

impl Candidate {
    /// Split a slash-separated name. A leading '/' stays attached to the
    /// first directory so absolute and relative names remain distinct.
    pub fn split(name: &str) -> Self {
        let absolute = name.starts_with('/');
        let mut segments: Vec<String> = name
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        let file = segments.pop().unwrap_or_default();
        if absolute {
            match segments.first_mut() {
                Some(first) => first.insert(0, '/'),
                None if !file.is_empty() => return Self { dirs: Vec::new(), file: format!("/{file}") },
                None => {}
            }
        }
        Self { dirs: segments, file }
    }

    pub fn label(&self) -> String {
        join_label(&self.dirs, &self.file)
    }
}

pub fn join_label(dirs: &[String], file: &str) -> String {
    if dirs.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dirs.join("/"), file)
    }
}

/// Directory tree built from every candidate, used to decide which
/// directories are worth keeping in a label.
#[derive(Debug, Default)]
pub struct DirNode {
    display: String,
    children: BTreeMap<String, DirNode>,
    files: usize,
}

impl DirNode {
    pub fn build<'a>(candidates: impl IntoIterator<Item = &'a Candidate>) -> Self {
        let mut root = DirNode::default();
        for candidate in candidates {
            let mut node = &mut root;
            for dir in &candidate.dirs {
                node = node.children.entry(dir.clone()).or_insert_with(|| DirNode {
                    display: dir.clone(),
                    ..DirNode::default()
                });
            }
            node.files += 1;
        }
        root
    }

    /// Replace every directory's display name with its shortest suffix
    /// that is still unique among its siblings, all the way down.
    pub fn reduce_names(&mut self) {
        let names: Vec<&str> = self.children.keys().map(String::as_str).collect();
        let reduced = shortest_unique_suffixes(&names);
        for (child, display) in self.children.values_mut().zip(reduced) {
            child.display = display;
            child.reduce_names();
        }
    }

    /// Directory segments worth showing for a candidate.
    ///
    /// A directory is shown when its parent has other subdirectories or
    /// holds files directly.
    pub fn relevant_dirs(&self, dirs: &[String]) -> Vec<String> {
        let mut kept = Vec::new();
        let mut node = self;
        for dir in dirs {
            let Some(child) = node.children.get(dir) else {
                break;
            };
            if node.children.len() > 1 || node.files > 0 {
                kept.push(child.display.clone());
            }
            node = child;
        }
        kept
    }
}

/// Shortest trailing substrings that keep distinct names distinct.
///
/// Every name grows by one character per round, from the right, until
/// the whole set is unique. A lone name shrinks to its last character.
pub fn shortest_unique_suffixes(names: &[&str]) -> Vec<String> {
    let chars: Vec<Vec<char>> = names.iter().map(|name| name.chars().collect()).collect();
    let longest = chars.iter().map(Vec::len).max().unwrap_or(0);

    let suffix = |name: &[char], len: usize| -> String {
        name[name.len().saturating_sub(len)..].iter().collect()
    };

    for len in 1..=longest {
        let reduced: Vec<String> = chars.iter().map(|name| suffix(name, len)).collect();
        let mut sorted: Vec<&String> = reduced.iter().collect();
        sorted.sort();
        sorted.dedup();
        if sorted.len() == reduced.len() {
            return reduced;
        }
    }
    names.iter().map(|name| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str) -> Candidate {
        Candidate::split(name)
    }

    #[test]
    fn test_split_relative_and_absolute() {
        assert_eq!(
            candidate("node1/var/log/api"),
            Candidate { dirs: vec!["node1".into(), "var".into(), "log".into()], file: "api".into() }
        );
        assert_eq!(
            candidate("/var/log/api"),
            Candidate { dirs: vec!["/var".into(), "log".into()], file: "api".into() }
        );
        assert_eq!(candidate("/api").file, "/api");
        assert_eq!(candidate("a//b").dirs, vec!["a".to_string()]);
    }

    #[test]
    fn test_suffixes_single_name() {
        assert_eq!(shortest_unique_suffixes(&["node1"]), vec!["1"]);
    }

    #[test]
    fn test_suffixes_grow_together() {
        assert_eq!(shortest_unique_suffixes(&["node1", "node2"]), vec!["1", "2"]);
        assert_eq!(shortest_unique_suffixes(&["cinder", "neutron", "nova"]), vec!["r", "n", "a"]);
        assert_eq!(shortest_unique_suffixes(&["a1", "b1"]), vec!["a1", "b1"]);
    }

    #[test]
    fn test_suffixes_unequal_lengths() {
        // "1" is itself a suffix of "x1", so the short name stays whole
        assert_eq!(shortest_unique_suffixes(&["1", "x1"]), vec!["1", "x1"]);
    }

    #[test]
    fn test_relevant_dirs_skip_single_child_chains() {
        let candidates = [candidate("node1/var/log/C-API"), candidate("node2/var/log/N-CPU")];
        let tree = DirNode::build(&candidates);

        assert_eq!(tree.relevant_dirs(&candidates[0].dirs), vec!["node1"]);
        assert_eq!(tree.relevant_dirs(&candidates[1].dirs), vec!["node2"]);
    }

    #[test]
    fn test_relevant_dirs_keep_dir_beside_files() {
        let candidates = [candidate("logs/api"), candidate("logs/old/api")];
        let tree = DirNode::build(&candidates);

        // Root has a single child and no files, "logs" holds a file
        assert!(tree.relevant_dirs(&candidates[0].dirs).is_empty());
        assert_eq!(tree.relevant_dirs(&candidates[1].dirs), vec!["old"]);
    }

    #[test]
    fn test_reduced_names_recurse() {
        let candidates = [candidate("node1/cinder/api"), candidate("node1/nova/api"), candidate("node2/nova/api")];
        let mut tree = DirNode::build(&candidates);
        tree.reduce_names();

        assert_eq!(tree.relevant_dirs(&candidates[0].dirs), vec!["1", "r"]);
        assert_eq!(tree.relevant_dirs(&candidates[1].dirs), vec!["1", "a"]);
        assert_eq!(tree.relevant_dirs(&candidates[2].dirs), vec!["2"]);
    }
}
