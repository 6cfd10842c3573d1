//! The solution handle: one compilation per project, plus a combined
//! compilation spanning every project. Per-project compilations cannot
//! bind calls into their neighbors' sources, so the solution-wide caller
//! walk runs over the combined compilation instead.

use crate::errors::ParseError;
use crate::semantic::Compilation;
use crate::workspace::model::Workspace;

pub struct Solution {
    names: Vec<String>,
    compilations: Vec<Compilation>,
    combined: Compilation,
}

impl Solution {
    /// Read and parse every project of the workspace.
    pub fn load(workspace: &Workspace) -> Result<Solution, ParseError> {
        let mut projects = Vec::new();
        for project in &workspace.projects {
            let mut sources = Vec::new();
            for file in &project.files {
                let content = std::fs::read_to_string(file).map_err(|e| ParseError::Io {
                    path: file.display().to_string(),
                    source: e,
                })?;
                sources.push((file.display().to_string(), content));
            }
            projects.push((project.name.clone(), sources));
        }
        Self::from_project_sources(projects)
    }

    /// Build a solution from in-memory `(project name, sources)` pairs.
    pub fn from_project_sources(
        projects: Vec<(String, Vec<(String, String)>)>,
    ) -> Result<Solution, ParseError> {
        let mut names = Vec::new();
        let mut compilations = Vec::new();
        let mut all_sources = Vec::new();
        for (name, sources) in projects {
            names.push(name);
            all_sources.extend(sources.iter().cloned());
            compilations.push(Compilation::parse(sources)?);
        }
        let combined = Compilation::parse(all_sources)?;
        Ok(Solution {
            names,
            compilations,
            combined,
        })
    }

    pub fn compilations(&self) -> &[Compilation] {
        &self.compilations
    }

    /// Every project's sources in one compilation; cross-project calls
    /// bind here.
    pub fn combined(&self) -> &Compilation {
        &self.combined
    }

    pub fn project_names(&self) -> &[String] {
        &self.names
    }
}
