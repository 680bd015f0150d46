use std::path::{Path, PathBuf};

use anyhow::Context;
use gallery_shared::GalleryLayout;

/// Conventional location of a gallery's layout, relative to its root.
pub const LAYOUT_DIR: &str = "layouts";
pub const DEFAULT_LAYOUT_FILE: &str = "black_cube.toml";

/// Where the layout in use came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found by walking up from the working directory.
    Discovered(PathBuf),
    /// No file; the compiled-in default.
    BuiltIn,
}

impl LayoutSource {
    pub fn label(&self) -> String {
        match self {
            Self::Explicit(path) | Self::Discovered(path) => path.display().to_string(),
            Self::BuiltIn => "built-in layout".to_string(),
        }
    }
}

/// Find `layouts/black_cube.toml` starting from a specific directory,
/// walking up.
pub fn find_layout_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(LAYOUT_DIR).join(DEFAULT_LAYOUT_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Resolve and load the layout for a command.
pub fn resolve_layout(explicit: Option<&Path>) -> anyhow::Result<(GalleryLayout, LayoutSource)> {
    resolve_layout_from(explicit, &std::env::current_dir()?)
}

pub fn resolve_layout_from(
    explicit: Option<&Path>,
    cwd: &Path,
) -> anyhow::Result<(GalleryLayout, LayoutSource)> {
    if let Some(path) = explicit {
        let layout = GalleryLayout::load(path)
            .with_context(|| format!("Invalid layout {}", path.display()))?;
        return Ok((layout, LayoutSource::Explicit(path.to_path_buf())));
    }
    match find_layout_from(cwd) {
        Some(path) => {
            let layout = GalleryLayout::load(&path)
                .with_context(|| format!("Invalid layout {}", path.display()))?;
            Ok((layout, LayoutSource::Discovered(path)))
        }
        None => Ok((GalleryLayout::default(), LayoutSource::BuiltIn)),
    }
}

/// Create `<root>/layouts/black_cube.toml` holding the default layout.
pub fn write_default_layout(root: &Path, force: bool) -> anyhow::Result<PathBuf> {
    let dir = root.join(LAYOUT_DIR);
    let path = dir.join(DEFAULT_LAYOUT_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists.\n\
             Use --force to overwrite it.",
            path.display()
        );
    }
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let body = GalleryLayout::default().to_toml_string()?;
    std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_layout_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let layouts = dir.path().join(LAYOUT_DIR);
        std::fs::create_dir(&layouts).unwrap();
        std::fs::write(layouts.join(DEFAULT_LAYOUT_FILE), "").unwrap();
        let nested = dir.path().join("assets/paintings");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_layout_from(&nested).unwrap();
        assert_eq!(found, layouts.join(DEFAULT_LAYOUT_FILE));
    }

    #[test]
    fn test_write_then_resolve_discovered() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_default_layout(dir.path(), false).unwrap();
        let (layout, source) = resolve_layout_from(None, dir.path()).unwrap();
        assert_eq!(source, LayoutSource::Discovered(path));
        assert_eq!(layout.interactables.len(), 1);
    }

    #[test]
    fn test_write_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        write_default_layout(dir.path(), false).unwrap();
        assert!(write_default_layout(dir.path(), false).is_err());
        assert!(write_default_layout(dir.path(), true).is_ok());
    }

    #[test]
    fn test_explicit_invalid_layout_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[player]\nradius = 0.0\n").unwrap();
        let err = resolve_layout_from(Some(&path), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("player.radius"));
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(LayoutSource::BuiltIn.label(), "built-in layout");
        let path = PathBuf::from("layouts/black_cube.toml");
        assert_eq!(LayoutSource::Explicit(path).label(), "layouts/black_cube.toml");
    }
}
