// Targets receiving resolved sizes.

use serde::{Deserialize, Serialize};

use crate::types::TargetSize;

/// Anything that can be resized along one axis (a card component, a test recorder).
pub trait SizedTarget {
    /// Apply a size. Called even when the size equals the previous one.
    fn set_size(&mut self, size: TargetSize);
}

impl<F> SizedTarget for F
where
    F: FnMut(TargetSize),
{
    fn set_size(&mut self, size: TargetSize) {
        self(size)
    }
}

/// An update queued for JS: either a size object or a card scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUpdate {
    Size(TargetSize),
    Scale(f64),
}

/// Collects updates so they can cross to JS in one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeLog {
    updates: Vec<SizeUpdate>,
}

impl SizeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, update: SizeUpdate) {
        self.updates.push(update);
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Take everything queued since the last drain.
    pub fn drain(&mut self) -> Vec<SizeUpdate> {
        std::mem::take(&mut self.updates)
    }
}

impl SizedTarget for SizeLog {
    fn set_size(&mut self, size: TargetSize) {
        self.push(SizeUpdate::Size(size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_is_a_target() {
        let mut last = None;
        {
            let mut target = |size: TargetSize| last = Some(size);
            target.set_size(TargetSize::Width(10.0));
        }
        assert_eq!(last, Some(TargetSize::Width(10.0)));
    }

    #[test]
    fn size_log_drains_in_order() {
        let mut log = SizeLog::new();
        log.set_size(TargetSize::Width(100.0));
        log.set_size(TargetSize::Width(100.0));
        log.push(SizeUpdate::Scale(0.5));

        let updates = log.drain();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0], updates[1]);
        assert!(log.is_empty());
    }

    #[test]
    fn updates_serialize_for_js() {
        let json = serde_json::to_string(&vec![
            SizeUpdate::Size(TargetSize::Height(300.0)),
            SizeUpdate::Scale(0.25),
        ])
        .unwrap();
        assert_eq!(json, r#"[{"size":{"height":300.0}},{"scale":0.25}]"#);
    }
}
