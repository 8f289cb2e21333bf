use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use tripwise_core::{TripwiseError, Value};

pub type PromptVars = HashMap<String, Value>;

fn placeholder() -> Result<Regex, TripwiseError> {
    Regex::new(r"\{\{\s*(\w+)\s*\}\}").map_err(|e| TripwiseError::InvalidConfig(e.to_string()))
}

/// A text template with `{{name}}` placeholders.
///
/// Every placeholder must be supplied when rendering. String values are
/// inserted verbatim, anything else as compact JSON.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn input_variables(&self) -> Result<BTreeSet<String>, TripwiseError> {
        Ok(placeholder()?
            .captures_iter(&self.template)
            .map(|caps| caps[1].to_string())
            .collect())
    }

    pub fn render(&self, vars: &PromptVars) -> Result<String, TripwiseError> {
        let pattern = placeholder()?;
        if let Some(missing) = self
            .input_variables()?
            .into_iter()
            .find(|name| !vars.contains_key(name))
        {
            return Err(TripwiseError::InvalidConfig(format!(
                "missing prompt variable '{missing}'"
            )));
        }

        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            match vars.get(&caps[1]) {
                Some(Value::String(text)) => text.clone(),
                Some(Value::Null) | None => String::new(),
                Some(value) => value.to_string(),
            }
        });
        Ok(rendered.into_owned())
    }
}
