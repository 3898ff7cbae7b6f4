use anyhow::Result;
use serde_json::Value;

/// A stored document plus its identifier.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Equality filters supported by the query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
}

/// One field filter for `query_documents`.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn ne(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::Ne,
            value: value.into(),
        }
    }
}

/// Sort order on a single field.
#[derive(Debug, Clone)]
pub struct SortOrder {
    pub field: String,
    pub descending: bool,
}

impl SortOrder {
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }
}

/// Document persistence surface.
///
/// Documents are JSON values in named collections; identifiers are caller
/// supplied unique strings. The store is an external service assumed to be
/// concurrency-safe on single-document operations; nothing here holds a lock
/// across a read-then-update.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, or `None` if the id is absent.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Create or fully replace a document.
    async fn set_document(&self, collection: &str, id: &str, doc: Value) -> Result<()>;

    /// Shallow-merge `patch` into an existing document. Fails if the
    /// document does not exist.
    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> Result<()>;

    /// Filtered, optionally ordered and limited scan of a collection.
    async fn query_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<SortOrder>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>>;
}
