//! Echo directory listing (`list.txt`)

use tracing::debug;

use super::{Error, Result};

/// One echo conference in a node's directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Echo {
    /// Echo name, e.g. `ii.test.14`
    pub name: String,
    /// Number of messages
    pub count: u64,
    /// Free-text description
    pub description: String,
}

/// Parse a `name:count:description` listing
///
/// Scanning stops at the first line without a colon, which is how the
/// trailing blank line is skipped. The description is the third field only;
/// text after a further colon is dropped.
///
/// # Errors
///
/// Returns [`Error::Format`] if a count is not a non-negative integer.
pub fn parse_echo_list(list: &str) -> Result<Vec<Echo>> {
    let mut echoes = Vec::new();

    for (line_no, line) in list.split('\n').enumerate() {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 2 {
            break;
        }

        let count = fields[1].parse::<u64>().map_err(|err| {
            debug!(line = line_no, count = fields[1], "rejecting echo list: bad count");
            Error::Format {
                line: line_no,
                reason: format!("echo count {:?}: {err}", fields[1]),
            }
        })?;

        echoes.push(Echo {
            name: fields[0].to_owned(),
            count,
            description: fields.get(2).copied().unwrap_or_default().to_owned(),
        });
    }

    Ok(echoes)
}
