use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Key under which a section's sub-state lives in the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque per-section payload. Its shape belongs to the section's view.
pub type SectionData = Map<String, Value>;

/// Pluggable editor for one section's sub-state.
///
/// Views receive the current sub-object (empty when the section was never visited) and report
/// every change as a full replacement through `on_change`.
pub trait SectionView: Send + Sync + fmt::Debug {
    fn render(&self, data: &SectionData) -> SectionRender;
    fn edit(&self, data: &SectionData, edit: FieldEdit, on_change: &mut dyn FnMut(SectionData));
}

/// One step of the wizard.
#[derive(Debug, Clone)]
pub struct SectionDescriptor {
    pub id: SectionId,
    pub title: String,
    pub description: String,
    pub view: Arc<dyn SectionView>,
}

impl SectionDescriptor {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        view: impl SectionView + 'static,
    ) -> Self {
        Self {
            id: SectionId::new(id),
            title: title.into(),
            description: description.into(),
            view: Arc::new(view),
        }
    }

    /// Label shown on the section navigator.
    pub fn short_label(&self) -> &str {
        match self.title.as_str() {
            "Data Subject Rights" => "Rights",
            "Data Processing" => "Processing",
            "Data Breach" => "Breach",
            title => title.split(' ').next().unwrap_or(title),
        }
    }
}

/// Input widget hint for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Date,
    LongText,
    YesNo,
    Choice { options: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }

    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn yes_no(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::YesNo)
    }

    pub fn choice(key: &'static str, label: &'static str, options: &[&str]) -> Self {
        let options = options.iter().map(|option| option.to_string()).collect();
        Self::new(key, label, FieldKind::Choice { options })
    }
}

/// Display model of a section with its current values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRender {
    pub fields: Vec<FieldRender>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRender {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: Value,
}

/// Single field change coming from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEdit {
    pub field: String,
    pub value: Value,
}

impl FieldEdit {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Generic view backed by an ordered field list.
///
/// Edits to fields the list does not declare are dropped; values themselves are not validated.
#[derive(Debug, Clone)]
pub struct FieldListView {
    fields: Vec<FieldSpec>,
}

impl FieldListView {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

impl SectionView for FieldListView {
    fn render(&self, data: &SectionData) -> SectionRender {
        let fields = self
            .fields
            .iter()
            .map(|spec| FieldRender {
                key: spec.key.to_string(),
                label: spec.label.to_string(),
                kind: spec.kind.clone(),
                value: data.get(spec.key).cloned().unwrap_or(Value::Null),
            })
            .collect();
        SectionRender { fields }
    }

    fn edit(&self, data: &SectionData, edit: FieldEdit, on_change: &mut dyn FnMut(SectionData)) {
        if !self.fields.iter().any(|spec| spec.key == edit.field) {
            debug!(field = %edit.field, "ignoring edit for undeclared field");
            return;
        }

        let mut next = data.clone();
        next.insert(edit.field, edit.value);
        on_change(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view() -> FieldListView {
        FieldListView::new(vec![
            FieldSpec::text("name", "Vendor name"),
            FieldSpec::yes_no("dpa_signed", "DPA signed"),
        ])
    }

    #[test]
    fn render_fills_missing_values_with_null() {
        let mut data = SectionData::new();
        data.insert("name".to_string(), json!("Acme"));

        let render = view().render(&data);
        assert_eq!(render.fields.len(), 2);
        assert_eq!(render.fields[0].value, json!("Acme"));
        assert_eq!(render.fields[1].value, Value::Null);
    }

    #[test]
    fn edit_reports_full_replacement() {
        let mut data = SectionData::new();
        data.insert("name".to_string(), json!("Acme"));

        let mut reported = Vec::new();
        view().edit(&data, FieldEdit::new("dpa_signed", true), &mut |next| {
            reported.push(next)
        });

        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].get("name"), Some(&json!("Acme")));
        assert_eq!(reported[0].get("dpa_signed"), Some(&json!(true)));
    }

    #[test]
    fn edit_ignores_undeclared_fields() {
        let mut calls = 0;
        view().edit(
            &SectionData::new(),
            FieldEdit::new("unexpected", "value"),
            &mut |_| calls += 1,
        );
        assert_eq!(calls, 0);
    }

    #[test]
    fn short_labels_abbreviate_long_titles() {
        let descriptor = |title: &str| SectionDescriptor::new("id", title, "", view());
        assert_eq!(descriptor("Data Subject Rights").short_label(), "Rights");
        assert_eq!(descriptor("Data Processing").short_label(), "Processing");
        assert_eq!(descriptor("Data Breach").short_label(), "Breach");
        assert_eq!(descriptor("Cross-Border Data Transfer").short_label(), "Cross-Border");
        assert_eq!(descriptor("Security Measures").short_label(), "Security");
    }
}
