// 🗄️ Receipt Store - In-memory receipts keyed by generated id
// Lives for the process lifetime; shared across requests behind a lock

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

use crate::model::Receipt;

#[derive(Debug, Default)]
pub struct ReceiptStore {
    receipts: RwLock<HashMap<String, Receipt>>,
}

impl ReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a receipt under a fresh v4 UUID and return the id
    pub fn insert(&self, receipt: Receipt) -> String {
        let id = Uuid::new_v4().to_string();
        // A panicked writer cannot leave a half-inserted entry behind
        let mut receipts = self.receipts.write().unwrap_or_else(PoisonError::into_inner);
        receipts.insert(id.clone(), receipt);
        id
    }

    pub fn get(&self, id: &str) -> Option<Receipt> {
        let receipts = self.receipts.read().unwrap_or_else(PoisonError::into_inner);
        receipts.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.receipts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// TESTS
// ============================================================================
