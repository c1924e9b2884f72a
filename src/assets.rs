// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Directories of text assets.
//!
//! Melodies and LED patterns are both kept as `.txt` files in a flat
//! directory. An asset is identified by its file name and titled by its
//! stem, with underscores read as spaces.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::LoadError;

const ASSET_EXTENSION: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub id: String,
    pub title: String,
}

/// Text assets directly inside `root`, sorted by file name.
///
/// A missing or unreadable directory lists as empty.
pub fn list_entries(root: &Path) -> Vec<AssetEntry> {
    let mut entries: Vec<AssetEntry> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(ASSET_EXTENSION))
        })
        .filter_map(|e| {
            let id = e.file_name().to_str()?.to_string();
            let title = e.path().file_stem()?.to_str()?.replace('_', " ");
            Some(AssetEntry { id, title })
        })
        .collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    entries
}

/// Reads the asset `id` from `root`.
///
/// # Errors
///
/// [`LoadError::NotFound`] when there is no such file, [`LoadError::Io`]
/// when it cannot be read.
pub fn read_entry(root: &Path, id: &str) -> Result<String, LoadError> {
    let path = root.join(id);
    if !path.is_file() {
        return Err(LoadError::NotFound(id.to_string()));
    }
    fs::read_to_string(&path).map_err(|source| LoadError::Io {
        id: id.to_string(),
        source,
    })
}
