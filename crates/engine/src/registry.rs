//! Variable registry
//!
//! Maps variable names to their current numeric value. Tags in a formula
//! refer to variables by name; the expression builder substitutes the value
//! found here. Each binding belongs to one linked model, and names must be
//! unique within a model.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::format;

/// How a variable's value is shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    Currency,
    Percent,
    #[default]
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableBinding {
    pub id: String,
    pub name: String,
    pub value: f64,
    #[serde(alias = "model_id")]
    pub model_id: String,
    #[serde(default, alias = "display_format")]
    pub display_format: DisplayFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VariableBinding {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: f64,
        model_id: impl Into<String>,
        display_format: DisplayFormat,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            model_id: model_id.into(),
            display_format,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Value formatted per the binding's display format
    pub fn display_value(&self) -> String {
        match self.display_format {
            DisplayFormat::Currency if self.value.abs() >= 1_000_000.0 => {
                format::format_compact_currency(self.value)
            }
            DisplayFormat::Currency => format::format_currency(self.value),
            DisplayFormat::Percent => format::format_percent(self.value),
            DisplayFormat::Number => format::format_plain(self.value),
        }
    }

    /// Parse user input for this binding. Percent bindings read `"5%"` or
    /// `"5"` as 0.05; other formats ignore `$` and `,`.
    pub fn parse_input(&self, input: &str) -> Option<f64> {
        let input = input.trim();
        let parsed = match self.display_format {
            DisplayFormat::Percent => input
                .trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .ok()
                .map(|v| v / 100.0),
            _ => input.replace(['$', ','], "").trim().parse::<f64>().ok(),
        };
        parsed.filter(|v| v.is_finite())
    }
}

/// Source of variable values for expression building
pub trait VariableLookup {
    fn value_of(&self, name: &str) -> Option<f64>;
}

impl VariableLookup for std::collections::HashMap<String, f64> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// Storage for variable bindings across all models
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<VariableBinding>", into = "Vec<VariableBinding>")]
pub struct VariableRegistry {
    bindings: Vec<VariableBinding>,
    /// Name -> index of the first binding with that name
    by_name: FxHashMap<String, usize>,
}

impl PartialEq for VariableRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl From<Vec<VariableBinding>> for VariableRegistry {
    fn from(bindings: Vec<VariableBinding>) -> Self {
        let mut registry = Self {
            bindings,
            by_name: FxHashMap::default(),
        };
        registry.reindex();
        registry
    }
}

impl From<VariableRegistry> for Vec<VariableBinding> {
    fn from(registry: VariableRegistry) -> Self {
        registry.bindings
    }
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the built-in models' variables
    pub fn with_defaults() -> Self {
        Self::from(default_bindings())
    }

    /// Add a binding. Fails if the id is taken or the name already exists
    /// in the same model.
    pub fn insert(&mut self, binding: VariableBinding) -> Result<(), String> {
        if binding.name.trim().is_empty() {
            return Err("Variable name cannot be empty".into());
        }
        if self.bindings.iter().any(|b| b.id == binding.id) {
            return Err(format!("Variable id '{}' already exists", binding.id));
        }
        if self
            .bindings
            .iter()
            .any(|b| b.model_id == binding.model_id && b.name == binding.name)
        {
            return Err(format!(
                "Variable '{}' already exists in model '{}'",
                binding.name, binding.model_id
            ));
        }
        self.by_name
            .entry(binding.name.clone())
            .or_insert(self.bindings.len());
        self.bindings.push(binding);
        Ok(())
    }

    /// Look up a binding by name (first match across models)
    pub fn get(&self, name: &str) -> Option<&VariableBinding> {
        self.by_name.get(name).and_then(|&i| self.bindings.get(i))
    }

    pub fn get_by_id(&self, id: &str) -> Option<&VariableBinding> {
        self.bindings.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Set a binding's numeric value. Returns false for unknown ids.
    pub fn update_value(&mut self, id: &str, value: f64) -> bool {
        match self.bindings.iter_mut().find(|b| b.id == id) {
            Some(binding) => {
                binding.value = value;
                true
            }
            None => false,
        }
    }

    /// Bindings belonging to one model, in registry order
    pub fn for_model<'a>(&'a self, model_id: &'a str) -> impl Iterator<Item = &'a VariableBinding> + 'a {
        self.bindings.iter().filter(move |b| b.model_id == model_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        for (i, binding) in self.bindings.iter().enumerate() {
            self.by_name.entry(binding.name.clone()).or_insert(i);
        }
    }
}

impl VariableLookup for VariableRegistry {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).map(|b| b.value)
    }
}

fn default_bindings() -> Vec<VariableBinding> {
    use DisplayFormat::*;
    vec![
        VariableBinding::new("base-salary", "Base salary", 175000.0, "comp-calc", Currency)
            .with_description("Annual base salary before taxes"),
        VariableBinding::new("annual-equity", "Annual equity comp", 62500.0, "comp-calc", Currency)
            .with_description("Annual equity compensation value"),
        VariableBinding::new("option-grant", "Option grant", 0.005, "equity-analyzer", Percent)
            .with_description("Percentage of company ownership"),
        VariableBinding::new("current-valuation", "Current valuation", 50_000_000.0, "equity-analyzer", Currency)
            .with_description("Current company valuation"),
        VariableBinding::new("exit-valuation", "Exit valuation", 1_000_000_000.0, "equity-analyzer", Currency)
            .with_description("Projected exit valuation"),
        VariableBinding::new("future-dilution", "Future dilution", 0.3, "equity-analyzer", Percent)
            .with_description("Expected future dilution"),
        VariableBinding::new("vesting-period", "Vesting period", 4.0, "performance-metrics", Number)
            .with_description("Number of years for full vesting"),
    ]
}
