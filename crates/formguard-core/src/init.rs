//! Bulk initialization from `data-validate` attributes.

use crate::dom::{attrs, Dom};
use crate::error::{Error, Result};
use crate::field::{FieldConfig, FieldId};
use crate::manager::FormGuard;
use crate::tracing_macros::{trace_info, trace_warn};
use formguard_rules::{ElementId, ElementRef, RuleOptions};

impl<D: Dom> FormGuard<D> {
    /// Attach a field to every element carrying `data-validate`, inside
    /// `container` when given.
    ///
    /// The attribute holds the rule list; `data-validate-options` may hold a
    /// JSON options object for it.
    ///
    /// All or nothing: the first misconfigured element destroys every field
    /// this call already attached, then its error is returned.
    pub fn init_declarative(&mut self, container: Option<&str>) -> Result<Vec<FieldId>> {
        let scope = container
            .map(|selector| self.resolve(&ElementRef::from(selector)))
            .transpose()?;
        let selector = format!("[{}]", attrs::VALIDATE);
        let elements = self.dom().query_all(&selector, scope);

        let mut created = Vec::with_capacity(elements.len());
        for element in elements {
            match self.attach_declared(element) {
                Ok(id) => created.push(id),
                Err(err) => {
                    self.roll_back(&created);
                    return Err(err);
                }
            }
        }

        trace_info!(count = created.len(), container = ?container, "declarative fields attached");
        Ok(created)
    }

    fn attach_declared(&mut self, element: ElementId) -> Result<FieldId> {
        let names = self
            .dom()
            .attribute(element, attrs::VALIDATE)
            .unwrap_or_default();
        let options = self.declared_options(element)?;
        self.attach(element, FieldConfig::default(), &names, options)
    }

    fn roll_back(&mut self, created: &[FieldId]) {
        for &id in created.iter().rev() {
            if let Err(err) = self.destroy_field(id) {
                trace_warn!(field = %id, error = %err, "rollback could not destroy field");
            }
        }
        trace_warn!(count = created.len(), "declarative init rolled back");
    }

    fn declared_options(&self, element: ElementId) -> Result<RuleOptions> {
        match self.dom().attribute(element, attrs::VALIDATE_OPTIONS) {
            Some(json) => RuleOptions::from_json(&json).map_err(|source| {
                trace_warn!(%element, error = %source, "invalid declarative options");
                Error::InvalidOptions { element, source }
            }),
            None => Ok(RuleOptions::default()),
        }
    }
}
