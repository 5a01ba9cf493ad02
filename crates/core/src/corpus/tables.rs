use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{EvalError, EvalResult};
use crate::model::{Address, MatchedTable, SymbolTable};

/// Parse an address key: decimal, or hex with a `0x` prefix.
pub fn parse_address(raw: &str) -> Option<Address> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => Address::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Parse a disassembler dump.
///
/// The first non-empty line is a JSON object of address → name; an optional
/// second line carries the number of functions the matcher flagged as library code.
pub fn parse_table_dump(body: &str, path: &Path) -> EvalResult<MatchedTable> {
    let malformed = |reason: String| EvalError::MalformedTable { path: path.to_path_buf(), reason };

    let mut lines = body.lines().map(str::trim).filter(|l| !l.is_empty());
    let table_line = lines.next().ok_or_else(|| malformed("empty dump".to_string()))?;
    let raw: BTreeMap<String, String> = serde_json::from_str(table_line)
        .map_err(|source| EvalError::Json { path: path.to_path_buf(), source })?;

    let mut table = SymbolTable::new();
    for (key, name) in raw {
        let address =
            parse_address(&key).ok_or_else(|| malformed(format!("invalid address '{key}'")))?;
        table.insert(address, name);
    }

    let library_functions = match lines.next() {
        Some(line) => Some(
            line.parse::<usize>()
                .map_err(|_| malformed(format!("invalid library function count '{line}'")))?,
        ),
        None => None,
    };
    if let Some(extra) = lines.next() {
        return Err(malformed(format!("unexpected trailing content '{extra}'")));
    }

    Ok(MatchedTable::new(table).with_library_functions(library_functions))
}

/// Read and parse a dump file; a missing file is a `MissingArtifact`.
pub fn load_table_dump(path: &Path) -> EvalResult<MatchedTable> {
    if !path.is_file() {
        return Err(EvalError::MissingArtifact { path: path.to_path_buf() });
    }
    let body = std::fs::read_to_string(path)
        .map_err(|source| EvalError::Io { path: path.to_path_buf(), source })?;
    parse_table_dump(&body, path)
}
