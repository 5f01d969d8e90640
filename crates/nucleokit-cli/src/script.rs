use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A scripted editing session: an ordered list of `[[step]]` tables.
///
/// Components are referred to by the name given in their `create` step.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Create {
        name: String,
        component: String,
        #[serde(default)]
        at: Option<[f64; 2]>,
    },
    Connect {
        a: String,
        b: String,
    },
    Disconnect {
        a: String,
        b: String,
    },
    Remove {
        target: String,
    },
    Detach {
        target: String,
    },
    Drag {
        target: String,
        by: [f64; 2],
    },
    Rotate {
        pivot: String,
        degrees: f64,
    },
    Select {
        target: String,
    },
    Cancel,
    Pair,
    Reset,
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Create { .. } => "create",
            Step::Connect { .. } => "connect",
            Step::Disconnect { .. } => "disconnect",
            Step::Remove { .. } => "remove",
            Step::Detach { .. } => "detach",
            Step::Drag { .. } => "drag",
            Step::Rotate { .. } => "rotate",
            Step::Select { .. } => "select",
            Step::Cancel => "cancel",
            Step::Pair => "pair",
            Step::Reset => "reset",
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
