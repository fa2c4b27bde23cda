use tracing::{info, warn};

use crate::api_client::{AuthToken, PortalApi};
use crate::cache::QueryCache;
use crate::editor::validation::validate_unit;
use crate::errors::{PortalError, Toast};
use crate::models::{ContentUnit, Persisted, UnitDraft, UnitKind};

/// The create/edit dialog for a single unit.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitForm {
    Closed,
    Create(UnitDraft),
    Update { id: String, draft: UnitDraft },
}

/// Admin list of blocks, weeks or sections with a create/edit form.
pub struct UnitEditor {
    kind: UnitKind,
    units: Vec<ContentUnit>,
    form: UnitForm,
    pending: bool,
}

impl UnitEditor {
    pub async fn load(
        api: &dyn PortalApi,
        token: &AuthToken,
        cache: &QueryCache,
        kind: UnitKind,
    ) -> Result<Self, PortalError> {
        let units = cache.units(api, token, kind).await?;
        Ok(Self {
            kind,
            units,
            form: UnitForm::Closed,
            pending: false,
        })
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn units(&self) -> &[ContentUnit] {
        &self.units
    }

    pub fn form(&self) -> &UnitForm {
        &self.form
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// New units go to the end of the curriculum.
    pub fn next_order(&self) -> i32 {
        self.units.iter().map(|u| u.order).max().unwrap_or(0) + 1
    }

    pub fn open_create(&mut self) {
        self.form = UnitForm::Create(UnitDraft::placeholder(self.kind, self.next_order()));
    }

    /// Returns false when no unit has this id.
    pub fn open_update(&mut self, id: &str) -> bool {
        match self.units.iter().find(|u| u.id == id) {
            Some(unit) => {
                self.form = UnitForm::Update {
                    id: unit.id.clone(),
                    draft: unit.to_draft(),
                };
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.form = UnitForm::Closed;
    }

    pub fn draft_mut(&mut self) -> Option<&mut UnitDraft> {
        match &mut self.form {
            UnitForm::Closed => None,
            UnitForm::Create(draft) | UnitForm::Update { draft, .. } => Some(draft),
        }
    }

    /// Validates and submits the open form. The form stays open on failure.
    pub async fn submit(
        &mut self,
        api: &dyn PortalApi,
        token: &AuthToken,
        cache: &QueryCache,
    ) -> Toast {
        let result = match &self.form {
            UnitForm::Closed => return Toast::error("Nothing to save"),
            UnitForm::Create(draft) => {
                if let Err(e) = validate_unit(draft).into_result() {
                    return Toast::from(&e);
                }
                self.pending = true;
                api.create_unit(token, self.kind, draft).await
            }
            UnitForm::Update { id, draft } => {
                if let Err(e) = validate_unit(draft).into_result() {
                    return Toast::from(&e);
                }
                self.pending = true;
                api.update_unit(token, self.kind, id, draft).await
            }
        };
        self.pending = false;

        match result {
            Ok(reply) => {
                info!("Saved {} {}", self.kind.label(), reply.data.id);
                self.form = UnitForm::Closed;
                let message = success_message(reply.message, "Saved successfully");
                self.refresh_after_mutation(api, token, cache, message).await
            }
            Err(e) => {
                warn!("Saving {} failed: {e}", self.kind.label());
                Toast::from(&e)
            }
        }
    }

    pub async fn delete(
        &mut self,
        api: &dyn PortalApi,
        token: &AuthToken,
        cache: &QueryCache,
        id: &str,
    ) -> Toast {
        self.pending = true;
        let result = api.delete_unit(token, self.kind, id).await;
        self.pending = false;

        match result {
            Ok(reply) => {
                info!("Deleted {} {id}", self.kind.label());
                if matches!(&self.form, UnitForm::Update { id: open, .. } if open == id) {
                    self.form = UnitForm::Closed;
                }
                let message = success_message(reply.message, "Deleted successfully");
                self.refresh_after_mutation(api, token, cache, message).await
            }
            Err(e) => {
                warn!("Deleting {} {id} failed: {e}", self.kind.label());
                Toast::from(&e)
            }
        }
    }

    async fn refresh_after_mutation(
        &mut self,
        api: &dyn PortalApi,
        token: &AuthToken,
        cache: &QueryCache,
        message: String,
    ) -> Toast {
        cache.invalidate_kind(self.kind).await;
        match cache.units(api, token, self.kind).await {
            Ok(units) => {
                self.units = units;
                Toast::success(message)
            }
            // The mutation itself went through; only the refetch failed.
            Err(e) => Toast::from(&e),
        }
    }
}

fn success_message(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
