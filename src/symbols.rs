use std::collections::{HashMap, HashSet};

/// Hands out temporary names for one compilation.
///
/// The first request for a prefix returns the prefix itself; later requests
/// append an increasing counter starting at 1 (`saved`, `saved1`, `saved2`).
/// A name is never returned twice, even when a counter-suffixed name
/// coincides with another prefix (`x` twice gives `x1`, after which `x1`
/// as a prefix gives `x11`).
#[derive(Debug, Default)]
pub struct SymbolGenerator {
    counters: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl SymbolGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        loop {
            let candidate = match *counter {
                0 => prefix.to_string(),
                n => format!("{}{}", prefix, n),
            };
            *counter += 1;
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_the_bare_prefix() {
        let mut symbols = SymbolGenerator::new();
        assert_eq!(symbols.allocate("saved"), "saved");
        assert_eq!(symbols.allocate("saved"), "saved1");
        assert_eq!(symbols.allocate("saved"), "saved2");
        assert_eq!(symbols.allocate("element"), "element");
    }

    #[test]
    fn suffixed_names_never_collide_with_prefixes() {
        let mut symbols = SymbolGenerator::new();
        assert_eq!(symbols.allocate("x"), "x");
        assert_eq!(symbols.allocate("x"), "x1");
        assert_eq!(symbols.allocate("x1"), "x11");
        assert_eq!(symbols.allocate("x1"), "x12");
    }
}
