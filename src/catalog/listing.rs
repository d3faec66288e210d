use std::path::PathBuf;

use super::model::Catalog;

/// Number the catalog entries, showing each path relative to the root it was
/// found under.
pub fn numbered_listing(catalog: &Catalog, roots: &[PathBuf]) -> Vec<String> {
    catalog
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let shown = roots
                .iter()
                .find_map(|root| track.path.strip_prefix(root).ok())
                .filter(|rel| !rel.as_os_str().is_empty())
                .unwrap_or(track.path.as_path());
            format!("{}. {}", i + 1, shown.display())
        })
        .collect()
}

/// Lay out long listings in three left-aligned columns; short ones stay one
/// per line.
pub fn columns(entries: &[String]) -> Vec<String> {
    if entries.len() <= 20 {
        return entries.to_vec();
    }

    let width = entries.iter().map(|e| e.chars().count()).max().unwrap_or(0) + 3;
    entries
        .chunks(3)
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i + 1 < row.len() {
                    line.push_str(&format!("{cell:<width$}"));
                } else {
                    line.push_str(cell);
                }
            }
            line
        })
        .collect()
}
