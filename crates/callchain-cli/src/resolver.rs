//! Caller resolution backed by a recorded call map.
//!
//! The call map is a JSON document produced by an external indexer:
//!
//! ```json
//! {
//!   "callers": { "Foo.bar()  (com.example)": ["Baz.qux()  (com.example)"] },
//!   "origins": { "Baz.qux()  (com.example)": "production" }
//! }
//! ```

use std::collections::HashMap;
use std::convert::Infallible;
use std::fs;
use std::path::Path;

use callchain_graph::{CallerResolver, MethodSignature, Origin};
use serde::Deserialize;

use crate::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CallMap {
    #[serde(default)]
    callers: HashMap<MethodSignature, Vec<MethodSignature>>,
    #[serde(default)]
    origins: HashMap<MethodSignature, Origin>,
}

/// Resolver answering from an in-memory call map.
#[derive(Debug, Default)]
pub(crate) struct CallMapResolver {
    map: CallMap,
}

impl CallMapResolver {
    pub(crate) fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(|map| Self { map })
    }

    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let json = fs::read_to_string(path).map_err(|source| AppError::ReadCallMap {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| AppError::ParseCallMap {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl CallerResolver for CallMapResolver {
    type Error = Infallible;

    fn callers_of(&mut self, method: &MethodSignature) -> Result<Vec<MethodSignature>, Self::Error> {
        Ok(self.map.callers.get(method).cloned().unwrap_or_default())
    }

    fn classify_origin(&self, method: &MethodSignature) -> Origin {
        self.map
            .origins
            .get(method)
            .copied()
            .unwrap_or(Origin::Unknown)
    }
}
