use std::collections::BTreeMap;

/// Preloaded content for one database of a nulled environment
#[derive(Clone, Debug, Default)]
pub struct ConfiguredDatabase {
    pub name: String,
    pub entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl ConfiguredDatabase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}
