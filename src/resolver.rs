// src/resolver.rs
//! Maps noisy spoken text onto an entry of a name -> symbol lookup table.
//!
//! Matching runs in a fixed order: exact name, exact symbol, case-insensitive
//! closest match, and finally the caller's default entry. The result always
//! borrows an entry of the table.

use crate::config::DEFAULT_MATCH_CUTOFF;
use crate::error::SkillError;
use difflib::sequencematcher::SequenceMatcher;
use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered canonical-name -> symbol table.
///
/// Entries keep their insertion order (document order when deserialized),
/// which decides ties during fuzzy matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: Vec<(String, String)>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing the symbol of an existing name in place.
    pub fn insert(&mut self, name: impl Into<String>, symbol: impl Into<String>) {
        let name = name.into();
        let symbol = symbol.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = symbol,
            None => self.entries.push((name, symbol)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name).map(|(_, symbol)| symbol)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Entry whose name equals `name` exactly.
    pub fn entry(&self, name: &str) -> Option<(&str, &str)> {
        self.iter().find(|(n, _)| *n == name)
    }

    /// First entry whose symbol equals `symbol` exactly.
    pub fn entry_for_symbol(&self, symbol: &str) -> Option<(&str, &str)> {
        self.iter().find(|(_, s)| *s == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(n, _)| n)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(_, s)| s)
    }

    /// Symbols that appear on more than one entry, in table order.
    pub fn duplicate_symbols(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (index, (_, symbol)) in self.iter().enumerate() {
            let seen_before = self.symbols().take(index).any(|s| s == symbol);
            if seen_before && !duplicates.contains(&symbol) {
                duplicates.push(symbol);
            }
        }
        duplicates
    }
}

impl<N: Into<String>, S: Into<String>> FromIterator<(N, S)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        let mut table = LookupTable::new();
        for (name, symbol) in iter {
            table.insert(name, symbol);
        }
        table
    }
}

impl Serialize for LookupTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, symbol) in self.iter() {
            map.serialize_entry(name, symbol)?;
        }
        map.end()
    }
}

struct LookupTableVisitor;

impl<'de> Visitor<'de> for LookupTableVisitor {
    type Value = LookupTable;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of canonical names to symbols")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = LookupTable::new();
        while let Some((name, symbol)) = access.next_entry::<String, String>()? {
            table.insert(name, symbol);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for LookupTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LookupTableVisitor)
    }
}

/// Which rule produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Name,
    Symbol,
    Fuzzy,
    Default,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchKind::Name => "exact name",
            MatchKind::Symbol => "exact symbol",
            MatchKind::Fuzzy => "closest match",
            MatchKind::Default => "default",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub name: &'a str,
    pub symbol: &'a str,
    pub kind: MatchKind,
}

impl<'a> Resolution<'a> {
    fn new((name, symbol): (&'a str, &'a str), kind: MatchKind) -> Self {
        Self { name, symbol, kind }
    }

    pub fn pair(&self) -> (&'a str, &'a str) {
        (self.name, self.symbol)
    }
}

/// Resolves `query` with the default similarity cutoff.
pub fn resolve<'a>(
    query: &str,
    table: &'a LookupTable,
    default_name: &str,
) -> Result<Resolution<'a>, SkillError> {
    resolve_with_cutoff(query, table, default_name, DEFAULT_MATCH_CUTOFF)
}

/// Resolves `query` to an entry of `table`, falling back to `default_name`.
///
/// Fails only when `table` is empty or `default_name` is not one of its names.
pub fn resolve_with_cutoff<'a>(
    query: &str,
    table: &'a LookupTable,
    default_name: &str,
    cutoff: f64,
) -> Result<Resolution<'a>, SkillError> {
    if table.is_empty() {
        return Err(SkillError::invalid_configuration("lookup table is empty"));
    }
    let default_entry = table.entry(default_name).ok_or_else(|| {
        SkillError::invalid_configuration(format!(
            "default entry '{}' is not in the lookup table",
            default_name
        ))
    })?;

    if let Some(entry) = table.entry(query) {
        return Ok(Resolution::new(entry, MatchKind::Name));
    }
    if let Some(entry) = table.entry_for_symbol(query) {
        return Ok(Resolution::new(entry, MatchKind::Symbol));
    }

    if let Some((token, score)) = closest_token(query, table, cutoff) {
        let entry = table.entry(token).or_else(|| table.entry_for_symbol(token));
        if let Some(entry) = entry {
            debug!("'{}' matched '{}' (similarity {:.3})", query, token, score);
            return Ok(Resolution::new(entry, MatchKind::Fuzzy));
        }
    }

    debug!("No match for '{}', using default '{}'", query, default_name);
    Ok(Resolution::new(default_entry, MatchKind::Default))
}

/// Lower-cased names then lower-cased symbols, each pointing at its
/// original-case token. A later token that folds onto an earlier one takes
/// over the mapping but keeps the earlier position.
fn candidate_tokens(table: &LookupTable) -> Vec<(String, &str)> {
    let mut candidates: Vec<(String, &str)> = Vec::with_capacity(table.len() * 2);
    for token in table.names().chain(table.symbols()) {
        let folded = token.to_lowercase();
        match candidates.iter_mut().find(|(f, _)| *f == folded) {
            Some(existing) => existing.1 = token,
            None => candidates.push((folded, token)),
        }
    }
    candidates
}

fn closest_token<'a>(
    query: &str,
    table: &'a LookupTable,
    cutoff: f64,
) -> Option<(&'a str, f64)> {
    let query = query.to_lowercase();
    let mut best: Option<(&'a str, f64)> = None;

    for (folded, token) in candidate_tokens(table) {
        // Ratcliff/Obershelp: twice the matched characters over the total length.
        let mut matcher = SequenceMatcher::new(folded.as_str(), query.as_str());
        let score = f64::from(matcher.ratio());
        if score < cutoff {
            continue;
        }
        // Strictly greater keeps the earliest candidate on ties.
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((token, score));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produce_table() -> LookupTable {
        [("Apple", "APC"), ("Banana", "BNC"), ("Carrot and Potato", "CAP")]
            .into_iter()
            .collect()
    }

    fn coin_table() -> LookupTable {
        [
            ("Bitcoin", "BTC"),
            ("Ethereum", "ETH"),
            ("Litecoin", "LTC"),
            ("Dogecoin", "DOGE"),
            ("Monero", "XMR"),
            ("Ripple", "XRP"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn resolves_lowercased_name_through_fuzzy_match() {
        let table = produce_table();
        let resolution = resolve("carrot and potato", &table, "Apple").unwrap();
        assert_eq!(resolution.pair(), ("Carrot and Potato", "CAP"));
        assert_eq!(resolution.kind, MatchKind::Fuzzy);
    }

    #[test]
    fn resolves_truncated_name() {
        let table = produce_table();
        assert_eq!(resolve("appl", &table, "Apple").unwrap().pair(), ("Apple", "APC"));
    }

    #[test]
    fn falls_back_to_default_when_nothing_is_close() {
        let table = produce_table();
        let resolution = resolve("zzz-no-match-zzz", &table, "Apple").unwrap();
        assert_eq!(resolution.pair(), ("Apple", "APC"));
        assert_eq!(resolution.kind, MatchKind::Default);
    }

    #[test]
    fn resolves_exact_symbol() {
        let table = produce_table();
        let resolution = resolve("BNC", &table, "Apple").unwrap();
        assert_eq!(resolution.pair(), ("Banana", "BNC"));
        assert_eq!(resolution.kind, MatchKind::Symbol);
    }

    #[test]
    fn resolves_spoken_coin_names() {
        let table = coin_table();
        for (spoken, expected) in [
            ("dog coin", ("Dogecoin", "DOGE")),
            ("doge coin", ("Dogecoin", "DOGE")),
            ("XM R", ("Monero", "XMR")),
            ("ethereum", ("Ethereum", "ETH")),
        ] {
            assert_eq!(resolve(spoken, &table, "Bitcoin").unwrap().pair(), expected);
        }
    }

    #[test]
    fn lowercase_symbol_resolves_through_fuzzy_match() {
        let table = coin_table();
        let resolution = resolve("xmr", &table, "Bitcoin").unwrap();
        assert_eq!(resolution.pair(), ("Monero", "XMR"));
        assert_eq!(resolution.kind, MatchKind::Fuzzy);
    }

    #[test]
    fn every_default_resolves_to_itself() {
        let table = coin_table();
        for name in table.names() {
            let resolution = resolve(name, &table, name).unwrap();
            assert_eq!(resolution.pair(), (name, table.get(name).unwrap()));
            assert_eq!(resolution.kind, MatchKind::Name);
        }
    }

    #[test]
    fn every_symbol_resolves_to_its_owner() {
        let table = coin_table();
        for (name, symbol) in table.iter() {
            assert_eq!(resolve(symbol, &table, "Ripple").unwrap().pair(), (name, symbol));
        }
    }

    #[test]
    fn uppercased_names_find_the_same_entry() {
        let table = coin_table();
        for name in table.names() {
            let direct = resolve(name, &table, "Bitcoin").unwrap();
            let shouted = resolve(&name.to_uppercase(), &table, "Bitcoin").unwrap();
            assert_eq!(direct.pair(), shouted.pair());
            assert_eq!(shouted.kind, MatchKind::Fuzzy);
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let table = coin_table();
        let first = resolve("lite coin", &table, "Bitcoin").unwrap();
        let second = resolve("lite coin", &table, "Bitcoin").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.pair(), ("Litecoin", "LTC"));
    }

    #[test]
    fn empty_query_uses_default() {
        let table = coin_table();
        assert_eq!(resolve("", &table, "Bitcoin").unwrap().pair(), ("Bitcoin", "BTC"));
    }

    #[test]
    fn ties_go_to_the_first_inserted_candidate() {
        let table: LookupTable = [("abcx", "ONE"), ("abcy", "TWO")].into_iter().collect();
        // "abcz" is one edit away from both names.
        assert_eq!(resolve("abcz", &table, "abcy").unwrap().pair(), ("abcx", "ONE"));

        let reversed: LookupTable = [("abcy", "TWO"), ("abcx", "ONE")].into_iter().collect();
        assert_eq!(resolve("abcz", &reversed, "abcx").unwrap().pair(), ("abcy", "TWO"));
    }

    #[test]
    fn cutoff_controls_fuzzy_acceptance() {
        let table = produce_table();
        let strict = resolve_with_cutoff("appl", &table, "Banana", 0.95).unwrap();
        assert_eq!(strict.pair(), ("Banana", "BNC"));
        assert_eq!(strict.kind, MatchKind::Default);

        let loose = resolve_with_cutoff("appl", &table, "Banana", 0.5).unwrap();
        assert_eq!(loose.pair(), ("Apple", "APC"));
    }

    #[test]
    fn missing_default_is_invalid_configuration() {
        let table = produce_table();
        let err = resolve("Apple", &table, "default").unwrap_err();
        assert!(matches!(err, SkillError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_table_is_invalid_configuration() {
        let table = LookupTable::new();
        let err = resolve("anything", &table, "Apple").unwrap_err();
        assert!(matches!(err, SkillError::InvalidConfiguration(_)));
    }

    #[test]
    fn symbol_colliding_with_name_resolves_to_its_entry() {
        let table: LookupTable = [("Dash", "DASH"), ("Bitcoin", "BTC")].into_iter().collect();
        assert_eq!(resolve("dash", &table, "Bitcoin").unwrap().pair(), ("Dash", "DASH"));
    }

    #[test]
    fn deserializes_in_document_order() {
        let table: LookupTable =
            serde_json::from_str(r#"{"Zcash": "ZEC", "Bitcoin": "BTC", "Monero": "XMR"}"#).unwrap();
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["Zcash", "Bitcoin", "Monero"]);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"Zcash":"ZEC","Bitcoin":"BTC","Monero":"XMR"}"#
        );
    }

    #[test]
    fn insert_replaces_existing_symbol_in_place() {
        let mut table = produce_table();
        table.insert("Apple", "APL");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("Apple"), Some("APL"));
        assert_eq!(table.names().next(), Some("Apple"));
    }

    #[test]
    fn reports_duplicate_symbols() {
        let table: LookupTable = [("A", "X"), ("B", "Y"), ("C", "X"), ("D", "X")]
            .into_iter()
            .collect();
        assert_eq!(table.duplicate_symbols(), vec!["X"]);
        assert!(produce_table().duplicate_symbols().is_empty());
    }
}
