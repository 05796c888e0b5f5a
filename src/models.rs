use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// A method schema as read from a JSON file.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Schema {
    /// Used as the trait name by the Rust templates.
    pub name: Option<String>,
    #[serde(default, rename(deserialize = "voidAliases"))]
    pub void_aliases: Vec<String>,
    pub methods: Vec<MethodDescriptor>,
}

impl Schema {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("Failed to open schema file {:?}", path))?;
        let schema = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("Failed to deserialize schema {:?}", path))?;
        Ok(schema)
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// One method: name, return type and ordered parameter list.
///
/// `name` and `return_type` default to empty so that an incomplete schema entry
/// reaches the generator and is reported there with its position.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct MethodDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename(deserialize = "returnType"))]
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl MethodDescriptor {
    pub fn new<N: Into<String>, R: Into<String>>(name: N, return_type: R) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            params: Vec::new(),
        }
    }

    pub fn param<T: Into<String>, N: Into<String>>(mut self, ty: T, name: N) -> Self {
        self.params.push(Parameter::new(ty, name));
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    #[serde(default, rename(deserialize = "type"))]
    pub ty: String,
    #[serde(default)]
    pub name: String,
}

impl Parameter {
    pub fn new<T: Into<String>, N: Into<String>>(ty: T, name: N) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}
