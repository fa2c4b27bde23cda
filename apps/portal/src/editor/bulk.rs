use serde::Serialize;

/// An already-persisted item, sent back with its id and current fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistingItem<D> {
    pub id: String,
    #[serde(flatten)]
    pub draft: D,
}

/// Body of `PUT /{unit}/{id}/{collection}/bulk`.
///
/// The backend applies it all-or-nothing: existing items are overwritten,
/// `deleted_ids` removed and `new_items` inserted in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPayload<D> {
    pub items: Vec<ExistingItem<D>>,
    pub deleted_ids: Vec<String>,
    pub new_items: Vec<D>,
}

impl<D> BulkPayload<D> {
    pub fn is_noop(&self) -> bool {
        self.deleted_ids.is_empty() && self.new_items.is_empty() && self.items.is_empty()
    }
}
