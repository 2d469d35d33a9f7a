use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedErrandsList {
    pub id: Uuid,
    pub name: String,
    pub errands: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedErrandsList {
    pub fn new(name: String, errands: Vec<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name,
            errands,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(&mut self, name: String, errands: Vec<String>) {
        self.name = name;
        self.errands = errands;
        self.updated_at = Utc::now();
    }
}
