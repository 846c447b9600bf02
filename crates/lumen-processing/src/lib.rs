//! Board processing seam: configuration metadata, processors, registry.
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::error::Error;

use lumen_board::Board;
use serde_json::Value;


/// The slice of the game configuration file that processors consume: a
/// table of arbitrary JSON metadata keyed by name.
#[derive(Clone, Debug, Default)]
pub struct ConfigFile {
    meta: serde_json::Map<String, Value>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from a parsed JSON document; the document's `meta`
    /// object holds the metadata table. A missing or non-object `meta`
    /// yields an empty table.
    pub fn from_json_value(value: &Value) -> Self {
        let meta = value
            .get("meta")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        ConfigFile { meta }
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_json_value(&serde_json::from_str(text)?))
    }

    /// Inserts or replaces a metadata entry.
    pub fn set_meta(&mut self, key: impl Into<String>, value: Value) {
        self.meta.insert(key.into(), value);
    }

    #[inline]
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    #[inline]
    pub fn has_meta(&self, key: &str) -> bool {
        self.meta.contains_key(key)
    }
}

/// A transformation applied to the board between turns. Processors mutate
/// the board in place; a failed run reports its error before touching the
/// board wherever the processor can arrange it.
pub trait BoardProcessor {
    fn run(&self, config: &ConfigFile, board: &mut Board) -> Result<(), Box<dyn Error>>;
}

type ProcessorCtor = fn() -> Box<dyn BoardProcessor>;

/// Explicit name-to-processor table, built by the caller at startup.
/// Aliases are just additional names for the same constructor.
#[derive(Default)]
pub struct ProcessorRegistry {
    by_name: HashMap<String, ProcessorCtor>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, ctor: ProcessorCtor) {
        log::debug!("registering board processor {name}");
        self.by_name.insert(name.to_string(), ctor);
    }

    pub fn register_with_aliases(&mut self, name: &str, aliases: &[&str], ctor: ProcessorCtor) {
        self.register(name, ctor);
        for alias in aliases {
            self.register(alias, ctor);
        }
    }

    /// Constructs the processor registered under `name`.
    pub fn get(&self, name: &str) -> Option<Box<dyn BoardProcessor>> {
        self.by_name.get(name).map(|ctor| ctor())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}
