//! Linked models
//!
//! A linked model groups variables (e.g. "Compensation Calculator"). Exactly
//! one model is active at a time, and the set never drops below one model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedModel {
    pub id: String,
    pub name: String,
    /// Free-form category ("Financial", "Analytics", ...)
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(alias = "is_active")]
    pub is_active: bool,
}

impl LinkedModel {
    fn builtin(id: &str, name: &str, kind: &str, color: &str, icon: &str, is_active: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            icon: Some(icon.to_string()),
            color: Some(color.to_string()),
            is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LinkedModel>", into = "Vec<LinkedModel>")]
pub struct ModelSet {
    models: Vec<LinkedModel>,
}

impl From<Vec<LinkedModel>> for ModelSet {
    fn from(models: Vec<LinkedModel>) -> Self {
        Self::from_models(models)
    }
}

impl From<ModelSet> for Vec<LinkedModel> {
    fn from(set: ModelSet) -> Self {
        set.models
    }
}

impl Default for ModelSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ModelSet {
    pub fn with_defaults() -> Self {
        Self {
            models: vec![
                LinkedModel::builtin("comp-calc", "Compensation Calculator", "Financial", "#7c4dff", "calculate", true),
                LinkedModel::builtin("equity-analyzer", "Equity Analysis", "Analytics", "#2196f3", "bar_chart", false),
                LinkedModel::builtin("performance-metrics", "Performance Metrics", "Data", "#4caf50", "table_chart", false),
            ],
        }
    }

    /// Build from stored models. An empty list falls back to the defaults so
    /// the set is never empty. Exactly one model ends up active: the first one
    /// marked active, else the first model.
    pub fn from_models(mut models: Vec<LinkedModel>) -> Self {
        if models.is_empty() {
            return Self::with_defaults();
        }

        let active_count = models.iter().filter(|m| m.is_active).count();
        if active_count != 1 {
            log::debug!("Stored models had {} active; keeping one", active_count);
            let keep = models.iter().position(|m| m.is_active).unwrap_or(0);
            for (i, model) in models.iter_mut().enumerate() {
                model.is_active = i == keep;
            }
        }
        Self { models }
    }

    /// Append a new, inactive model and return its id
    pub fn add(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        icon: Option<String>,
        color: Option<String>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let model = LinkedModel {
            id: id.clone(),
            name: name.into(),
            kind: kind.into(),
            icon,
            color,
            is_active: false,
        };
        log::info!("Added linked model '{}' ({})", model.name, id);
        self.models.push(model);
        id
    }

    /// Remove a model. Removing the last remaining model is refused; removing
    /// the active model activates the first remaining one.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.models.len() <= 1 {
            log::debug!("Refusing to remove the last linked model");
            return false;
        }
        let Some(index) = self.models.iter().position(|m| m.id == id) else {
            return false;
        };

        let removed = self.models.remove(index);
        if removed.is_active {
            for (i, model) in self.models.iter_mut().enumerate() {
                model.is_active = i == 0;
            }
        }
        log::info!("Removed linked model '{}'", removed.name);
        true
    }

    /// Make `id` the only active model. Unknown ids leave the set unchanged.
    pub fn set_active(&mut self, id: &str) -> bool {
        if !self.models.iter().any(|m| m.id == id) {
            return false;
        }
        for model in &mut self.models {
            model.is_active = model.id == id;
        }
        true
    }

    pub fn active(&self) -> Option<&LinkedModel> {
        self.models.iter().find(|m| m.is_active)
    }

    pub fn get(&self, id: &str) -> Option<&LinkedModel> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkedModel> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
