use serde::{Deserialize, Serialize};

/// Ordered, append-only list of assumption notes accumulated across tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssumptionLog {
    entries: Vec<String>,
}

impl AssumptionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, note: impl Into<String>) {
        self.entries.push(note.into());
    }

    /// Append every entry of `other`, preserving its order.
    pub fn append(&mut self, other: &AssumptionLog) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries recorded after the first `mark` ones.
    pub fn since(&self, mark: usize) -> &[String] {
        self.entries.get(mark..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut first = AssumptionLog::new();
        first.record("a");
        let mut second = AssumptionLog::new();
        second.record("b");
        second.record("c");
        first.append(&second);
        assert_eq!(first.entries(), &["a", "b", "c"]);
        assert_eq!(first.since(1), &["b", "c"]);
        assert!(first.since(7).is_empty());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut log = AssumptionLog::new();
        log.record("x");
        assert_eq!(serde_json::to_string(&log).unwrap(), r#"["x"]"#);
    }
}
