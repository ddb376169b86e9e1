use std::collections::HashMap;

/// Runtime text substitution for text layers.
///
/// Implementations must be pure: the same `(keypath, source)` always yields the same string.
pub trait TextProvider: Send + Sync {
    /// Text to display for the layer at `keypath` whose document holds `source`.
    fn text_for(&self, keypath: &str, source: &str) -> String;
}

impl<F> TextProvider for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn text_for(&self, keypath: &str, source: &str) -> String {
        self(keypath, source)
    }
}

/// Displays the document text unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTextProvider;

impl TextProvider for DefaultTextProvider {
    fn text_for(&self, _keypath: &str, source: &str) -> String {
        source.to_string()
    }
}

/// Replaces the text of layers by keypath; other layers keep their document text.
#[derive(Clone, Debug, Default)]
pub struct DictionaryTextProvider {
    values: HashMap<String, String>,
}

impl DictionaryTextProvider {
    /// Provider backed by `values`, keyed by layer keypath.
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl TextProvider for DictionaryTextProvider {
    fn text_for(&self, keypath: &str, source: &str) -> String {
        self.values
            .get(keypath)
            .cloned()
            .unwrap_or_else(|| source.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/provider.rs"]
mod tests;
