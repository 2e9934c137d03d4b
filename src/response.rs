//! Response bodies that are not records.

use serde::Serialize;

/// Confirmation returned by DELETE.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
    pub id: i64,
}

impl Deleted {
    pub fn new(entity_name: &str, id: i64) -> Self {
        Deleted {
            message: format!("{} deleted successfully", entity_name),
            id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}
