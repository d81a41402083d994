use std::collections::HashMap;

use crate::error::{Error, Result};

/// Two-way lookup over a runtime's parser token constants.
///
/// Token numbering differs between runtime versions; each provider builds
/// its table from the constants its parser actually defines, and stub
/// diagnostics resolve names and values through it.
#[derive(Debug, Clone)]
pub struct DynamicTokens {
    by_name: HashMap<String, i32>,
    by_value: HashMap<i32, String>,
}

impl DynamicTokens {
    pub fn new(constants: &[(&str, i32)]) -> Self {
        let mut by_name = HashMap::new();
        let mut by_value = HashMap::new();
        for (name, value) in constants {
            by_name.insert((*name).to_string(), *value);
            by_value.entry(*value).or_insert_with(|| (*name).to_string());
        }
        Self { by_name, by_value }
    }

    pub fn value(&self, name: &str) -> Result<i32> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::Other(format!("unknown token name '{name}'")))
    }

    pub fn name(&self, value: i32) -> Result<&str> {
        self.by_value
            .get(&value)
            .map(String::as_str)
            .ok_or_else(|| Error::Other(format!("unknown token value {value}")))
    }
}
