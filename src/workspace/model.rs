use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    pub root: PathBuf,
    pub projects: Vec<Project>,
}

impl Workspace {
    pub fn all_source_files(&self) -> Vec<&Path> {
        self.projects
            .iter()
            .flat_map(|p| p.files.iter())
            .map(|p| p.as_path())
            .collect()
    }
}
