//! Roster source files
//!
//! Sources are headerless CSV files, one combatant per record:
//!
//! ```text
//! Aria,3
//! Borin, -1
//! ```
//!
//! Every record must have as many fields as the first one. A modifier must
//! leave every d20 total inside `i32`.
//!
//! Files are discovered recursively and ordered by full path so that load
//! order (and therefore encounter indices) never depends on the order the
//! filesystem happens to list entries in.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::combat::{Combatant, DiceRoll, INITIATIVE_SIDES};
use crate::error::LoadError;

/// Extension recognised as a roster source
pub const SOURCE_EXTENSION: &str = "csv";

/// List every source file under `dir`, sorted by full path.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let dir_err = |source| LoadError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(dir_err)? {
        let entry = entry.map_err(dir_err)?;
        let path = entry.path();

        // Symlinked directories are not followed
        if entry.file_type().map_err(dir_err)?.is_dir() {
            walk(&path, files)?;
        } else if is_source(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_source(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
}

/// Parse combatant records from `reader`. `path` is only used in errors.
pub fn parse_records<R: Read>(reader: R, path: &Path) -> Result<Vec<Combatant>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut combatants = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record_no = i as u64 + 1;
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let (name, modifier) = match (record.get(0), record.get(1)) {
            (Some(name), Some(modifier)) => (name, modifier),
            _ => {
                return Err(LoadError::MissingField {
                    path: path.to_path_buf(),
                    record: record_no,
                })
            }
        };

        if name.trim().is_empty() {
            return Err(LoadError::EmptyName {
                path: path.to_path_buf(),
                record: record_no,
            });
        }

        let dexterity_modifier = modifier
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|m| rollable(*m))
            .ok_or_else(|| LoadError::InvalidModifier {
                path: path.to_path_buf(),
                record: record_no,
                value: modifier.to_string(),
            })?;

        combatants.push(Combatant::new(name, dexterity_modifier));
    }

    Ok(combatants)
}

/// Every d20 total for `modifier` must fit in an `i32`
fn rollable(modifier: i32) -> bool {
    let die = DiceRoll::d20(modifier);
    modifier.checked_add(die.count as i32).is_some()
        && modifier
            .checked_add((die.count * INITIATIVE_SIDES) as i32)
            .is_some()
}

/// Open and parse a single source file
pub fn read_source(path: &Path) -> Result<Vec<Combatant>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(file, path)
}
