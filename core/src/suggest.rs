//! "Did you mean" suggestions over a flattened command tree.
//!
//! The tree is flattened depth-first into space-joined paths relative to the
//! root (`files list`, `files ls`, ...), one entry per node name and one per
//! alias. Queries rank entries by Levenshtein distance; ties go to the entry
//! flattened first.

use crate::types::CommandNode;

/// One flattened path and the node it reaches.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedEntry<'t> {
    pub full_path: String,
    pub node: &'t CommandNode,
}

/// Which entries a query considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionScope {
    /// Leaf commands only (completion).
    Commands,
    /// Groups and commands (failure diagnostics).
    Anything,
}

/// A ranked match.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<'t> {
    pub full_path: String,
    pub node: &'t CommandNode,
    pub distance: usize,
}

/// Flattens `root` into one entry per node name and alias.
///
/// Alias entries are prefixed by the parent's canonical path. The root
/// itself has an empty path and is not included.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{CommandNode, flatten_tree};
///
/// let tree = CommandNode::group("mycli").with_child(
///     CommandNode::group("files")
///         .with_child(CommandNode::command("list").with_alias("ls")),
/// );
/// let paths: Vec<String> = flatten_tree(&tree).into_iter().map(|e| e.full_path).collect();
/// assert_eq!(paths, ["files", "files list", "files ls"]);
/// ```
pub fn flatten_tree(root: &CommandNode) -> Vec<FlattenedEntry<'_>> {
    let mut entries = Vec::new();
    flatten_into(root, "", &mut entries);
    entries
}

fn flatten_into<'t>(node: &'t CommandNode, prefix: &str, entries: &mut Vec<FlattenedEntry<'t>>) {
    for child in &node.children {
        let path = join_path(prefix, &child.name);
        entries.push(FlattenedEntry {
            full_path: path.clone(),
            node: child,
        });
        for alias in &child.aliases {
            entries.push(FlattenedEntry {
                full_path: join_path(prefix, alias),
                node: child,
            });
        }
        flatten_into(child, &path, entries);
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.trim().to_string()
    } else {
        format!("{prefix} {}", name.trim())
    }
}

/// Levenshtein edit distance between two strings, counted in chars.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// assert_eq!(levenshtein("same", "same"), 0);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Nearest-path lookup over one command tree.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{CommandNode, SuggestionEngine};
///
/// let tree = CommandNode::group("mycli").with_child(
///     CommandNode::group("files")
///         .with_child(CommandNode::command("list"))
///         .with_child(CommandNode::command("remove")),
/// );
/// let engine = SuggestionEngine::new(&tree);
/// assert_eq!(engine.closest_command("files lsit").unwrap().full_path, "files list");
/// assert_eq!(engine.closest_anything("fils").unwrap().full_path, "files");
/// ```
#[derive(Debug, Clone)]
pub struct SuggestionEngine<'t> {
    entries: Vec<FlattenedEntry<'t>>,
}

impl<'t> SuggestionEngine<'t> {
    pub fn new(root: &'t CommandNode) -> Self {
        Self {
            entries: flatten_tree(root),
        }
    }

    pub fn entries(&self) -> &[FlattenedEntry<'t>] {
        &self.entries
    }

    /// Returns the nearest and second-nearest entries within `scope`.
    ///
    /// Both slots keep the earliest entry among equal distances.
    pub fn closest_two(
        &self,
        query: &str,
        scope: SuggestionScope,
    ) -> (Option<Suggestion<'t>>, Option<Suggestion<'t>>) {
        let mut best: Option<Suggestion<'t>> = None;
        let mut second: Option<Suggestion<'t>> = None;

        for entry in &self.entries {
            if entry.full_path.trim().is_empty() {
                continue;
            }
            if scope == SuggestionScope::Commands && entry.node.is_group() {
                continue;
            }
            let candidate = Suggestion {
                full_path: entry.full_path.clone(),
                node: entry.node,
                distance: levenshtein(query, &entry.full_path),
            };
            let beats = |slot: &Option<Suggestion<'t>>| {
                slot.as_ref()
                    .is_none_or(|current| candidate.distance < current.distance)
            };
            if beats(&best) {
                second = best.take();
                best = Some(candidate);
            } else if beats(&second) {
                second = Some(candidate);
            }
        }

        (best, second)
    }

    pub fn closest(&self, query: &str, scope: SuggestionScope) -> Option<Suggestion<'t>> {
        self.closest_two(query, scope).0
    }

    /// Nearest leaf command.
    pub fn closest_command(&self, query: &str) -> Option<Suggestion<'t>> {
        self.closest(query, SuggestionScope::Commands)
    }

    /// Nearest group or command.
    pub fn closest_anything(&self, query: &str) -> Option<Suggestion<'t>> {
        self.closest(query, SuggestionScope::Anything)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> CommandNode {
        CommandNode::group("mycli")
            .with_child(
                CommandNode::group("files")
                    .with_alias("f")
                    .with_child(CommandNode::command("list").with_alias("ls"))
                    .with_child(CommandNode::command("remove").with_alias("rm")),
            )
            .with_child(CommandNode::command("status"))
    }

    #[test]
    fn test_flatten_order_and_aliases() {
        let tree = tree();
        let paths: Vec<String> = flatten_tree(&tree)
            .into_iter()
            .map(|e| e.full_path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "files",
                "f",
                "files list",
                "files ls",
                "files remove",
                "files rm",
                "status"
            ]
        );
    }

    #[test]
    fn test_alias_entries_point_at_same_node() {
        let tree = tree();
        let entries = flatten_tree(&tree);
        let ls = entries.iter().find(|e| e.full_path == "files ls").unwrap();
        assert_eq!(ls.node.name, "list");
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("files lsit", "files list"), 2);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("über", "uber"), 1);
    }

    #[test]
    fn test_commands_scope_skips_groups() {
        let tree = tree();
        let engine = SuggestionEngine::new(&tree);
        let found = engine.closest_command("files").unwrap();
        assert_ne!(found.full_path, "files");
        assert!(!found.node.is_group());
        assert_eq!(engine.closest_anything("files").unwrap().full_path, "files");
    }

    #[test]
    fn test_ties_resolve_to_first_entry() {
        let tree = CommandNode::group("root")
            .with_child(CommandNode::command("ab"))
            .with_child(CommandNode::command("ba"));
        let engine = SuggestionEngine::new(&tree);
        // "aa" is one edit away from both.
        let (best, second) = engine.closest_two("aa", SuggestionScope::Commands);
        assert_eq!(best.unwrap().full_path, "ab");
        assert_eq!(second.unwrap().full_path, "ba");
    }

    #[test]
    fn test_second_nearest() {
        let tree = tree();
        let engine = SuggestionEngine::new(&tree);
        let (best, second) = engine.closest_two("files rn", SuggestionScope::Commands);
        assert_eq!(best.unwrap().full_path, "files rm");
        assert_eq!(second.unwrap().full_path, "files ls");
    }

    #[test]
    fn test_empty_tree_has_no_suggestion() {
        let tree = CommandNode::group("root");
        let engine = SuggestionEngine::new(&tree);
        assert!(engine.closest_anything("x").is_none());
        assert_eq!(engine.closest_two("x", SuggestionScope::Commands), (None, None));
    }
}
