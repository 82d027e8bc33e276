use std::path::{Component, Path, PathBuf};

/// Resolves `target` against the directory of `referencing_file` and returns
/// an absolute path with `.` and `..` collapsed lexically. Symlinks are not
/// followed. Rooted targets are used without joining.
pub fn resolve_relative(referencing_file: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    let joined = if target.is_absolute() {
        target.to_path_buf()
    } else {
        referencing_file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(target)
    };

    let absolute = std::path::absolute(&joined).unwrap_or(joined);
    normalize(&absolute)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` at the root stays at the root.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
