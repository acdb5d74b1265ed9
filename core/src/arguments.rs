//! Parsed argument storage.
//!
//! [`ArgumentBag`] is the ordered mapping produced by the parser. It always
//! carries the matched command tokens (`_`) and the primary command (`$0`),
//! plus one value per bound option or positional. Option values are stored
//! once and indexed under every spelling a handler may use to read them: the
//! name as typed, its kebab-case form and its camelCase form.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Key under which the matched command tokens are exposed.
pub const COMMANDS_KEY: &str = "_";
/// Key under which the primary command name is exposed.
pub const PRIMARY_COMMAND_KEY: &str = "$0";

/// A single bound value.
///
/// Serializes untagged, so a bag renders as a plain JSON object
/// (`{"long": true, "dir": "/tmp", "tag": ["a", "b"], "count": null}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Number(i64),
    String(String),
    List(Vec<String>),
    /// Option given without the value it expects.
    Unset,
}

impl ArgValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// The kebab-case and camelCase spellings of an option name.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::option_format;
///
/// let format = option_format("dryRun");
/// assert_eq!(format.kebab_case, "dry-run");
/// assert_eq!(format.camel_case, "dryRun");
///
/// let format = option_format("response-format-json");
/// assert_eq!(format.camel_case, "responseFormatJson");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionFormat {
    pub key: String,
    pub kebab_case: String,
    pub camel_case: String,
}

/// Computes the [`OptionFormat`] of an option name.
pub fn option_format(name: &str) -> OptionFormat {
    OptionFormat {
        key: name.to_string(),
        kebab_case: to_kebab_case(name),
        camel_case: to_camel_case(name),
    }
}

fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' || ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Ordered argument mapping produced by the parser.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{ArgValue, ArgumentBag};
///
/// let mut bag = ArgumentBag::new("mycli");
/// bag.push_command("files");
/// bag.set_option("d", "dryRun", ArgValue::Bool(true));
///
/// assert_eq!(bag.commands(), ["files"]);
/// assert_eq!(bag.primary_command(), "mycli");
/// // One value, three spellings.
/// assert_eq!(bag.get("d"), Some(&ArgValue::Bool(true)));
/// assert_eq!(bag.get("dry-run"), Some(&ArgValue::Bool(true)));
/// assert_eq!(bag.get("dryRun"), Some(&ArgValue::Bool(true)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgumentBag {
    commands: Vec<String>,
    primary_command: String,
    values: Vec<ArgValue>,
    /// Spelling to index into `values`, in first-bound order.
    spellings: Vec<(String, usize)>,
}

impl ArgumentBag {
    /// Creates an empty bag for the given primary command.
    pub fn new(primary_command: impl Into<String>) -> Self {
        Self {
            primary_command: primary_command.into(),
            ..Default::default()
        }
    }

    /// Tokens that matched tree nodes, in traversal order (`_`).
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Resolved primary command (`$0`).
    pub fn primary_command(&self) -> &str {
        &self.primary_command
    }

    pub fn push_command(&mut self, token: impl Into<String>) {
        self.commands.push(token.into());
    }

    /// Binds `value` under a single key.
    pub fn set(&mut self, key: &str, value: ArgValue) {
        self.bind(&[key], value);
    }

    /// Binds an option value under the name as typed plus the kebab-case
    /// and camelCase forms of the option's canonical name.
    ///
    /// The canonical spellings decide which value is replaced; the typed
    /// spelling is then pointed at it. Another option that was typed the
    /// same way keeps its own value under its canonical spellings.
    pub fn set_option(&mut self, typed: &str, canonical: &str, value: ArgValue) {
        let format = option_format(canonical);
        let slot = self.bind(
            &[format.kebab_case.as_str(), format.camel_case.as_str()],
            value,
        );
        self.point(typed, slot);
    }

    fn bind(&mut self, keys: &[&str], value: ArgValue) -> usize {
        let slot = match keys.iter().find_map(|k| self.slot_of(k)) {
            Some(slot) => {
                self.values[slot] = value;
                slot
            }
            None => {
                self.values.push(value);
                self.values.len() - 1
            }
        };
        for key in keys {
            self.point(key, slot);
        }
        slot
    }

    fn point(&mut self, key: &str, slot: usize) {
        match self.spellings.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = slot,
            None => self.spellings.push((key.to_string(), slot)),
        }
    }

    fn slot_of(&self, key: &str) -> Option<usize> {
        self.spellings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, slot)| *slot)
    }

    /// Looks up a value by any of its spellings.
    ///
    /// The reserved keys `_` and `$0` are exposed through
    /// [`commands`](Self::commands) and
    /// [`primary_command`](Self::primary_command) instead.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.slot_of(key).map(|slot| &self.values[slot])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slot_of(key).is_some()
    }

    /// Returns `true` if `key` is bound to `true`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(ArgValue::Bool(true)))
    }

    /// Every bound spelling, in first-bound order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.spellings.iter().map(|(k, _)| k.as_str())
    }

    /// Number of distinct values reachable through some spelling.
    pub fn len(&self) -> usize {
        let mut slots: Vec<usize> = self.spellings.iter().map(|(_, slot)| *slot).collect();
        slots.sort_unstable();
        slots.dedup();
        slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spellings.is_empty()
    }
}

impl Serialize for ArgumentBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.spellings.len() + 2))?;
        map.serialize_entry(COMMANDS_KEY, &self.commands)?;
        map.serialize_entry(PRIMARY_COMMAND_KEY, &self.primary_command)?;
        for (key, slot) in &self.spellings {
            map.serialize_entry(key, &self.values[*slot])?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("dryRun"), "dry-run");
        assert_eq!(to_kebab_case("dry-run"), "dry-run");
        assert_eq!(to_kebab_case("max_depth"), "max-depth");
        assert_eq!(to_kebab_case("l"), "l");
        assert_eq!(to_kebab_case("URL"), "u-r-l");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("dry-run"), "dryRun");
        assert_eq!(to_camel_case("dryRun"), "dryRun");
        assert_eq!(to_camel_case("max_depth"), "maxDepth");
        assert_eq!(to_camel_case("-leading"), "leading");
    }

    #[test]
    fn test_option_spellings_share_one_value() {
        let mut bag = ArgumentBag::new("mycli");
        bag.set_option("l", "long", ArgValue::Bool(true));
        assert_eq!(bag.len(), 1);
        assert!(bag.flag("l"));
        assert!(bag.flag("long"));

        bag.set_option("long", "long", ArgValue::Bool(false));
        assert_eq!(bag.len(), 1);
        assert!(!bag.flag("l"));
        assert_eq!(bag.get("long"), Some(&ArgValue::Bool(false)));
    }

    #[test]
    fn test_shared_typed_spelling_keeps_other_option_value() {
        let mut bag = ArgumentBag::new("mycli");
        bag.set_option("f", "force", ArgValue::Bool(true));
        bag.set_option("f", "format", ArgValue::from("json"));

        assert_eq!(bag.get("force"), Some(&ArgValue::Bool(true)));
        assert_eq!(bag.get("format"), Some(&ArgValue::from("json")));
        assert_eq!(bag.get("f"), Some(&ArgValue::from("json")));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_len_ignores_unreachable_values() {
        let mut bag = ArgumentBag::new("mycli");
        assert!(bag.is_empty());
        bag.set("d", "/tmp".into());
        bag.set_option("d", "dryRun", ArgValue::Bool(true));
        assert_eq!(bag.get("d"), Some(&ArgValue::Bool(true)));
        assert_eq!(bag.len(), 1);
        assert!(!bag.is_empty());
    }

    #[test]
    fn test_keys_are_deduplicated_in_order() {
        let mut bag = ArgumentBag::new("mycli");
        bag.set("dir", "/tmp".into());
        bag.set_option("dryRun", "dry-run", ArgValue::Bool(true));
        let keys: Vec<&str> = bag.keys().collect();
        assert_eq!(keys, vec!["dir", "dry-run", "dryRun"]);
    }

    #[test]
    fn test_serialize_expands_spellings() {
        let mut bag = ArgumentBag::new("mycli");
        bag.push_command("files");
        bag.push_command("list");
        bag.set_option("l", "long", ArgValue::Bool(true));
        bag.set("dir", "/tmp".into());
        bag.set_option("count", "count", ArgValue::Unset);

        let json = serde_json::to_value(&bag).unwrap();
        assert_eq!(json["_"], serde_json::json!(["files", "list"]));
        assert_eq!(json["$0"], "mycli");
        assert_eq!(json["l"], true);
        assert_eq!(json["long"], true);
        assert_eq!(json["dir"], "/tmp");
        assert!(json["count"].is_null());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(ArgValue::from(3).as_i64(), Some(3));
        assert_eq!(ArgValue::from("x").as_str(), Some("x"));
        assert_eq!(ArgValue::from(true).as_bool(), Some(true));
        assert_eq!(
            ArgValue::from(vec!["a".to_string()]).as_list(),
            Some(&["a".to_string()][..])
        );
        assert!(ArgValue::Unset.is_unset());
        assert_eq!(ArgValue::Unset.as_str(), None);
    }
}
