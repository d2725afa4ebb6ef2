//! Named unit definitions
//!
//! The registry is an arena of definitions indexed by `UnitId`. Derived
//! definitions refer to other units by name and are only reduced when
//! resolved, so forward references are allowed and a definition can end up
//! referring back to itself. Resolution detects that and rejects it.

use std::collections::{HashMap, HashSet};

use mensura_core::{Power, UnitError};
use tracing::debug;

use crate::{si, BaseUnit, Dimension, Term, Unit};

/// Index of a definition in a `UnitRegistry`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(usize);

#[derive(Debug, Clone)]
enum Definition {
    Base(BaseUnit),
    Derived { factor: f64, terms: Vec<(String, Power)> },
}

#[derive(Debug, Clone)]
struct Entry {
    symbol: String,
    definition: Definition,
}

/// Registry of named units
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, UnitId>,
    aliases: HashMap<String, String>,
}

enum Frame {
    Enter(UnitId),
    Exit(UnitId),
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the seven SI base units
    pub fn with_si() -> Self {
        let mut registry = Self::new();
        for base in si::base_units() {
            registry.push(base.symbol().to_string(), Definition::Base(base.clone()));
        }
        registry
    }

    /// Create a new base unit and register it under its symbol
    pub fn define_base(
        &mut self,
        symbol: &str,
        dimension: &Dimension,
    ) -> Result<BaseUnit, UnitError> {
        let base = BaseUnit::new(symbol, dimension);
        self.register_base(base.clone())?;
        Ok(base)
    }

    /// Register an existing base unit under its symbol
    pub fn register_base(&mut self, base: BaseUnit) -> Result<UnitId, UnitError> {
        let symbol = base.symbol().to_string();
        self.insert(symbol, Definition::Base(base))
    }

    /// Define `symbol` as `factor` times the product of named terms.
    ///
    /// Names are not looked up until the unit is resolved.
    pub fn define<I, S, P>(&mut self, symbol: &str, factor: f64, terms: I) -> Result<UnitId, UnitError>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<Power>,
    {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(UnitError::InvalidFactor(factor));
        }
        let terms = terms
            .into_iter()
            .map(|(name, power)| (name.into(), power.into()))
            .collect();
        self.insert(symbol.to_string(), Definition::Derived { factor, terms })
    }

    /// Make `alias` resolve to the already defined `symbol`
    pub fn alias(&mut self, alias: &str, symbol: &str) -> Result<(), UnitError> {
        if self.lookup(alias).is_some() {
            return Err(UnitError::DuplicateUnit(alias.to_string()));
        }
        let canonical = self
            .entry(symbol)
            .map(|entry| entry.symbol.clone())
            .ok_or_else(|| UnitError::UnknownUnit(symbol.to_string()))?;
        self.aliases.insert(alias.to_string(), canonical);
        Ok(())
    }

    fn insert(&mut self, symbol: String, definition: Definition) -> Result<UnitId, UnitError> {
        if self.lookup(&symbol).is_some() {
            return Err(UnitError::DuplicateUnit(symbol));
        }
        Ok(self.push(symbol, definition))
    }

    fn push(&mut self, symbol: String, definition: Definition) -> UnitId {
        let id = UnitId(self.entries.len());
        debug!(symbol = %symbol, id = id.0, "defined unit");
        self.index.insert(symbol.clone(), id);
        self.entries.push(Entry { symbol, definition });
        id
    }

    /// Id of a symbol or alias
    pub fn lookup(&self, symbol: &str) -> Option<UnitId> {
        if let Some(id) = self.index.get(symbol) {
            return Some(*id);
        }
        self.aliases
            .get(symbol)
            .and_then(|canonical| self.index.get(canonical))
            .copied()
    }

    fn entry(&self, symbol: &str) -> Option<&Entry> {
        self.lookup(symbol).map(|id| &self.entries[id.0])
    }

    fn require(&self, symbol: &str) -> Result<UnitId, UnitError> {
        self.lookup(symbol)
            .ok_or_else(|| UnitError::UnknownUnit(symbol.to_string()))
    }

    /// The base unit registered under `symbol`, if it is one
    pub fn get_base(&self, symbol: &str) -> Option<&BaseUnit> {
        match &self.entry(symbol)?.definition {
            Definition::Base(base) => Some(base),
            Definition::Derived { .. } => None,
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup(symbol).is_some()
    }

    /// Defined symbols in definition order, aliases excluded
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.symbol.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reduce the named unit and everything it depends on.
    ///
    /// Explicit depth-first worklist; a definition entered again while it is
    /// still on the expansion path is a cycle.
    pub fn resolve(&self, symbol: &str) -> Result<Unit, UnitError> {
        let root = self.require(symbol)?;
        let mut resolved: HashMap<UnitId, Unit> = HashMap::new();
        let mut path: Vec<UnitId> = Vec::new();
        let mut on_path: HashSet<UnitId> = HashSet::new();
        let mut stack = vec![Frame::Enter(root)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(id) => {
                    if resolved.contains_key(&id) {
                        continue;
                    }
                    if on_path.contains(&id) {
                        let mut cycle: Vec<String> = path
                            .iter()
                            .map(|p| self.entries[p.0].symbol.clone())
                            .collect();
                        cycle.push(self.entries[id.0].symbol.clone());
                        return Err(UnitError::MalformedUnitDefinition {
                            symbol: self.entries[root.0].symbol.clone(),
                            cycle,
                        });
                    }
                    match &self.entries[id.0].definition {
                        Definition::Base(base) => {
                            resolved.insert(id, base.to_unit());
                        }
                        Definition::Derived { terms, .. } => {
                            path.push(id);
                            on_path.insert(id);
                            stack.push(Frame::Exit(id));
                            for (name, _) in terms.iter().rev() {
                                stack.push(Frame::Enter(self.require(name)?));
                            }
                        }
                    }
                }
                Frame::Exit(id) => {
                    path.pop();
                    on_path.remove(&id);
                    let entry = &self.entries[id.0];
                    if let Definition::Derived { factor, terms } = &entry.definition {
                        let mut built = Vec::with_capacity(terms.len());
                        for (name, power) in terms {
                            let dep = self.require(name)?;
                            let unit = resolved
                                .get(&dep)
                                .cloned()
                                .ok_or_else(|| UnitError::UnknownUnit(name.clone()))?;
                            built.push(Term::new(unit, power.clone()));
                        }
                        let unit = Unit::new(*factor, built)?.with_symbol(entry.symbol.as_str());
                        resolved.insert(id, unit);
                    }
                }
            }
        }

        let unit = resolved
            .remove(&root)
            .ok_or_else(|| UnitError::UnknownUnit(symbol.to_string()))?;
        debug!(symbol, factor = unit.factor(), "resolved unit");
        Ok(unit)
    }
}
