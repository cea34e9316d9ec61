use uuid::Uuid;

/// Hands out session-unique identifiers for new entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
