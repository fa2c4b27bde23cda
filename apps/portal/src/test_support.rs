//! In-memory backend used by view-model tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api_client::{ApiReply, AuthToken, Collection, PortalApi};
use crate::errors::PortalError;
use crate::models::{ContentUnit, UnitDraft, UnitKind};

#[derive(Debug, Clone)]
pub struct BulkCall {
    pub kind: UnitKind,
    pub unit_id: String,
    pub collection: Collection,
    pub token: AuthToken,
    pub payload: Value,
}

#[derive(Default)]
pub struct FakeApi {
    units: Mutex<HashMap<UnitKind, Vec<ContentUnit>>>,
    bulk_calls: Mutex<Vec<BulkCall>>,
    next_failure: Mutex<Option<(u16, String)>>,
    list_calls: AtomicUsize,
    next_id: AtomicUsize,
}

pub fn unit(id: &str, order: i32) -> ContentUnit {
    serde_json::from_value(json!({
        "id": id,
        "order": order,
        "title": format!("Unit {id}"),
        "description": "",
        "guideLink": "https://example.com/guide.pdf",
        "guideDescription": "Study guide"
    }))
    .unwrap()
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(kind: UnitKind, units: Vec<ContentUnit>) -> Self {
        let api = Self::new();
        api.insert_units(kind, units);
        api
    }

    pub fn insert_units(&self, kind: UnitKind, units: Vec<ContentUnit>) {
        self.units.lock().unwrap().insert(kind, units);
    }

    pub fn stored(&self, kind: UnitKind) -> Vec<ContentUnit> {
        self.units
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// The next mutating call fails with this status and `info.message`.
    pub fn fail_next(&self, status: u16, message: &str) {
        *self.next_failure.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn bulk_calls(&self) -> Vec<BulkCall> {
        self.bulk_calls.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Result<(), PortalError> {
        match self.next_failure.lock().unwrap().take() {
            Some((status, message)) => Err(PortalError::Api { status, message }),
            None => Ok(()),
        }
    }

    fn generate_id(&self) -> String {
        format!("gen-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn not_found(kind: UnitKind, id: &str) -> PortalError {
        PortalError::Api {
            status: 404,
            message: format!("{} {id} not found", kind.label()),
        }
    }
}

fn field_name(collection: Collection) -> &'static str {
    match collection {
        Collection::Flashcards => "flashcards",
        Collection::SampleQuestions => "sampleQuestions",
        Collection::FinalQuestions => "finalQuestions",
        Collection::Audios => "audios",
        Collection::Presentations => "presentations",
        Collection::Notes => "notes",
    }
}

fn apply_draft(unit: &mut ContentUnit, draft: &UnitDraft) {
    unit.order = draft.order;
    unit.title = draft.title.clone();
    unit.description = draft.description.clone();
    unit.guide_link = draft.guide_link.clone();
    unit.guide_description = draft.guide_description.clone();
}

#[async_trait]
impl PortalApi for FakeApi {
    async fn list_units(
        &self,
        _token: &AuthToken,
        kind: UnitKind,
    ) -> Result<ApiReply<Vec<ContentUnit>>, PortalError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ApiReply {
            data: self.stored(kind),
            message: String::new(),
        })
    }

    async fn get_unit(
        &self,
        _token: &AuthToken,
        kind: UnitKind,
        id: &str,
    ) -> Result<ApiReply<ContentUnit>, PortalError> {
        self.stored(kind)
            .into_iter()
            .find(|u| u.id == id)
            .map(|data| ApiReply {
                data,
                message: String::new(),
            })
            .ok_or_else(|| Self::not_found(kind, id))
    }

    async fn create_unit(
        &self,
        _token: &AuthToken,
        kind: UnitKind,
        draft: &UnitDraft,
    ) -> Result<ApiReply<ContentUnit>, PortalError> {
        self.take_failure()?;
        let mut created = unit(&self.generate_id(), draft.order);
        apply_draft(&mut created, draft);
        self.units
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(created.clone());
        Ok(ApiReply {
            data: created,
            message: format!("{} created", kind.label()),
        })
    }

    async fn update_unit(
        &self,
        _token: &AuthToken,
        kind: UnitKind,
        id: &str,
        draft: &UnitDraft,
    ) -> Result<ApiReply<ContentUnit>, PortalError> {
        self.take_failure()?;
        let mut units = self.units.lock().unwrap();
        let target = units
            .get_mut(&kind)
            .and_then(|list| list.iter_mut().find(|u| u.id == id))
            .ok_or_else(|| Self::not_found(kind, id))?;
        apply_draft(target, draft);
        Ok(ApiReply {
            data: target.clone(),
            message: format!("{} updated", kind.label()),
        })
    }

    async fn delete_unit(
        &self,
        _token: &AuthToken,
        kind: UnitKind,
        id: &str,
    ) -> Result<ApiReply<Value>, PortalError> {
        self.take_failure()?;
        let mut units = self.units.lock().unwrap();
        let list = units.entry(kind).or_default();
        let before = list.len();
        list.retain(|u| u.id != id);
        if list.len() == before {
            return Err(Self::not_found(kind, id));
        }
        Ok(ApiReply {
            data: Value::Null,
            message: format!("{} deleted", kind.label()),
        })
    }

    async fn bulk_save(
        &self,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
        collection: Collection,
        payload: Value,
    ) -> Result<ApiReply<Value>, PortalError> {
        self.bulk_calls.lock().unwrap().push(BulkCall {
            kind,
            unit_id: id.to_string(),
            collection,
            token: token.clone(),
            payload: payload.clone(),
        });
        self.take_failure()?;

        let mut units = self.units.lock().unwrap();
        let target = units
            .get_mut(&kind)
            .and_then(|list| list.iter_mut().find(|u| u.id == id))
            .ok_or_else(|| Self::not_found(kind, id))?;

        let mut stored = Vec::new();
        for item in payload["items"].as_array().cloned().unwrap_or_default() {
            stored.push(item);
        }
        for mut item in payload["newItems"].as_array().cloned().unwrap_or_default() {
            item["id"] = Value::String(self.generate_id());
            stored.push(item);
        }

        let mut as_json = serde_json::to_value(&*target)?;
        as_json[field_name(collection)] = Value::Array(stored);
        *target = serde_json::from_value(as_json)?;

        Ok(ApiReply {
            data: Value::Null,
            message: "Saved successfully".to_string(),
        })
    }
}
