//! Workspace discovery: each immediate subdirectory of the root that
//! contains C# sources becomes a project; sources directly under the root
//! form a root project. Build output directories are ignored.

use crate::errors::WorkspaceError;
use crate::workspace::model::{Project, Workspace};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const PATTERNS: &[&str] = &["**/*.cs", "!**/bin/**", "!**/obj/**"];

impl Workspace {
    pub fn discover(root: &Path) -> Result<Workspace, WorkspaceError> {
        if !root.is_dir() {
            return Err(WorkspaceError::InvalidRoot {
                path: root.display().to_string(),
            });
        }
        let walker = globwalk::GlobWalkerBuilder::from_patterns(root, PATTERNS)
            .build()
            .map_err(|e| WorkspaceError::Glob(e.to_string()))?;

        let mut grouped: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for entry in walker.filter_map(Result::ok) {
            let path = entry.path().to_path_buf();
            let project = project_name_for(root, &path);
            grouped.entry(project).or_default().push(path);
        }

        let mut projects = Vec::new();
        for (name, mut files) in grouped {
            files.sort();
            let project_root = if name == root_project_name(root) {
                root.to_path_buf()
            } else {
                root.join(&name)
            };
            projects.push(Project {
                name,
                root: project_root,
                files,
            });
        }
        Ok(Workspace {
            root: root.to_path_buf(),
            projects,
        })
    }
}

fn root_project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "root".to_string())
}

fn project_name_for(root: &Path, file: &Path) -> String {
    match file.strip_prefix(root).ok().and_then(|rel| {
        let mut components = rel.components();
        let first = components.next()?;
        // A bare file under the root has no directory component.
        components.next()?;
        Some(first.as_os_str().to_string_lossy().to_string())
    }) {
        Some(dir) => dir,
        None => root_project_name(root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn groups_files_by_top_level_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Api")).unwrap();
        fs::create_dir_all(dir.path().join("Worker/obj")).unwrap();
        fs::write(dir.path().join("Api/Program.cs"), "class P { }").unwrap();
        fs::write(dir.path().join("Worker/Worker.cs"), "class W { }").unwrap();
        fs::write(dir.path().join("Worker/obj/Gen.cs"), "class G { }").unwrap();
        fs::write(dir.path().join("Shared.cs"), "class S { }").unwrap();

        let workspace = Workspace::discover(dir.path()).unwrap();
        let names: Vec<&str> = workspace.projects.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Api"));
        assert!(names.contains(&"Worker"));
        let worker = workspace
            .projects
            .iter()
            .find(|p| p.name == "Worker")
            .unwrap();
        // obj/ output is not part of the project.
        assert_eq!(worker.files.len(), 1);
        assert_eq!(workspace.all_source_files().len(), 3);
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = Workspace::discover(Path::new("/nonexistent/loglens-root")).unwrap_err();
        assert!(matches!(err, WorkspaceError::InvalidRoot { .. }));
    }
}
