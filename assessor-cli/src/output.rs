use anyhow::{Context, Result, ensure};
use assessor_core::is_plain_name;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

/// Where a single stream of report text goes.
pub enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    pub fn new(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

/// A rendered report and the assessment it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub name: String,
    pub body: String,
}

/// How a batch of reports is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Stdout, one blank line between reports.
    Stdout,
    /// One file, reports joined by a newline.
    File(PathBuf),
    /// One `<name>.<extension>` file per report.
    Directory { dir: PathBuf, extension: &'static str },
}

impl Destination {
    /// Write `reports`, returning the files created.
    pub fn write(&self, reports: &[RenderedReport]) -> Result<Vec<PathBuf>> {
        match self {
            Self::Stdout => {
                let mut target = OutputTarget::new(None)?;
                write_joined(&mut target, reports, "\n\n")?;
                Ok(Vec::new())
            }
            Self::File(path) => {
                let mut target = OutputTarget::new(Some(path))?;
                write_joined(&mut target, reports, "\n")?;
                Ok(vec![path.clone()])
            }
            Self::Directory { dir, extension } => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                let mut written = Vec::with_capacity(reports.len());
                for report in reports {
                    ensure!(
                        is_plain_name(&report.name),
                        "refusing to write report {:?} outside {}",
                        report.name,
                        dir.display()
                    );
                    let path = dir.join(format!("{}.{extension}", report.name));
                    let mut target = OutputTarget::new(Some(&path))?;
                    writeln!(target, "{}", report.body)?;
                    target.flush()?;
                    written.push(path);
                }
                Ok(written)
            }
        }
    }
}

fn write_joined(target: &mut OutputTarget, reports: &[RenderedReport], separator: &str) -> Result<()> {
    let joined = reports
        .iter()
        .map(|report| report.body.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    writeln!(target, "{joined}")?;
    target.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "assessor-output-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn reports() -> Vec<RenderedReport> {
        vec![
            RenderedReport {
                name: "first".to_string(),
                body: "one".to_string(),
            },
            RenderedReport {
                name: "second".to_string(),
                body: "two".to_string(),
            },
        ]
    }

    #[test]
    fn file_destination_joins_with_newline() {
        let path = temp_path("file");
        let written = Destination::File(path.clone()).write(&reports()).unwrap();
        assert_eq!(written, [path.clone()]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn directory_destination_writes_one_file_per_report() {
        let dir = temp_path("dir");
        let written = Destination::Directory {
            dir: dir.clone(),
            extension: "txt",
        }
        .write(&reports())
        .unwrap();
        assert_eq!(written, [dir.join("first.txt"), dir.join("second.txt")]);
        assert_eq!(fs::read_to_string(dir.join("second.txt")).unwrap(), "two\n");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn directory_destination_stays_inside_its_directory() {
        let base = temp_path("escape");
        let dir = base.join("out");
        for name in ["../escaped", "nested/report"] {
            let report = RenderedReport {
                name: name.to_string(),
                body: "body".to_string(),
            };
            let err = Destination::Directory {
                dir: dir.clone(),
                extension: "txt",
            }
            .write(&[report])
            .unwrap_err();
            assert!(err.to_string().contains("outside"), "{err}");
        }
        assert!(!base.join("escaped.txt").exists());
        fs::remove_dir_all(base).unwrap();
    }
}
