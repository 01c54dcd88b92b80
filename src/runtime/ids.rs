use uuid::Uuid;

/// Source of the unique suffixes used in node, edge and workflow ids.
pub trait IdGenerator: Send {
    fn next_suffix(&mut self) -> String;
}

/// Random v4 suffixes. The default for interactive editing.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_suffix(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Monotonic counter starting at 1. Gives reproducible ids.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_suffix(&mut self) -> String {
        self.counter += 1;
        self.counter.to_string()
    }
}
