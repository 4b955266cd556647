//! Member directory.
//!
//! Maps executor display names to contact identifiers (phone numbers for
//! DingTalk) so that the notification can @-mention them. Loaded once from
//! a two-column CSV file with a header row and never modified afterwards.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ConfigError, Result};

/// Read-only name to contact lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDirectory {
    members: HashMap<String, String>,
}

impl MemberDirectory {
    /// Loads the directory from a CSV file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a row has fewer than
    /// two columns.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_reader(file).map_err(|e| match e {
            ConfigError::Members { source, .. } => ConfigError::Members {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        debug!(path = %path.display(), count = directory.len(), "Loaded members");
        Ok(directory)
    }

    /// Reads `name,contact` rows after a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut members = HashMap::new();
        for record in csv.records() {
            let record = record.map_err(|source| ConfigError::Members {
                path: Default::default(),
                source,
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let (Some(name), Some(contact)) = (record.get(0), record.get(1)) else {
                return Err(ConfigError::MalformedMember {
                    line,
                    fields: record.len(),
                });
            };
            if name.is_empty() {
                warn!(line, "Skipping member row without a name");
                continue;
            }
            members.insert(name.to_string(), contact.to_string());
        }

        Ok(Self { members })
    }

    /// Looks up one executor's contact.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.members.get(name).map(String::as_str)
    }

    /// Resolves executors to contacts, in iteration order.
    ///
    /// Executors missing from the directory are logged and left out.
    pub fn resolve<'a, I>(&self, executors: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        executors
            .into_iter()
            .filter_map(|executor| match self.get(executor) {
                Some(contact) => Some(contact.to_string()),
                None => {
                    warn!(executor = %executor, "Executor not in member list, not mentioned");
                    None
                }
            })
            .collect()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<(String, String)> for MemberDirectory {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}
