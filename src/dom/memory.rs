use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::Dom;

#[derive(Debug, Default)]
struct Page {
    values: HashMap<String, String>,
    html: HashMap<String, String>,
    history: Vec<(String, String)>,
}

/// In-memory page: form values and element markup kept in maps, every write
/// recorded in order.
#[derive(Debug, Default)]
pub struct MemoryDom {
    page: Mutex<Page>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, id: &str, value: &str) -> Self {
        self.set_value(id, value);
        self
    }

    pub fn set_value(&self, id: &str, value: &str) {
        self.lock().values.insert(id.to_string(), value.to_string());
    }

    pub fn html(&self, id: &str) -> Option<String> {
        self.lock().html.get(id).cloned()
    }

    /// Every markup written to `id`, oldest first.
    pub fn history(&self, id: &str) -> Vec<String> {
        self.lock()
            .history
            .iter()
            .filter(|(target, _)| target == id)
            .map(|(_, html)| html.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Page> {
        self.page.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Dom for MemoryDom {
    fn value(&self, id: &str) -> Option<String> {
        self.lock().values.get(id).cloned()
    }

    fn set_html(&self, id: &str, html: &str) {
        let mut page = self.lock();
        page.html.insert(id.to_string(), html.to_string());
        page.history.push((id.to_string(), html.to_string()));
    }
}
