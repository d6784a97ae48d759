use assessor_core::AssessmentSource;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Reads every `*.json` file in one directory as an assessment definition.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssessmentSource for DirectorySource {
    type Error = io::Error;

    fn definition_names(&self) -> Result<Vec<String>, Self::Error> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_definition(&self, name: &str) -> Result<String, Self::Error> {
        fs::read_to_string(self.root.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "assessor-source-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn lists_only_json_files_sorted() {
        let dir = temp_dir("list");
        fs::write(dir.join("b.json"), "{}").unwrap();
        fs::write(dir.join("a.json"), "{}").unwrap();
        fs::write(dir.join("notes.txt"), "skip").unwrap();
        let source = DirectorySource::new(&dir);
        assert_eq!(source.definition_names().unwrap(), ["a.json", "b.json"]);
        assert_eq!(source.load_definition("a.json").unwrap(), "{}");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let source = DirectorySource::new("/nonexistent/assessor/definitions");
        assert!(source.definition_names().is_err());
    }
}
