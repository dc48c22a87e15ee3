use std::{
    collections::HashMap,
    fs,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Default)]
pub struct VFile {
    pub data: Vec<u8>,
}

/// Read-only view over map assets.
///
/// Files registered in memory shadow the disk, anything else is read relative to `root`.
#[derive(Default, Clone)]
pub struct VFileSystem {
    files: Arc<HashMap<String, VFile>>,
    root: Option<PathBuf>,
}

impl VFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            files: Default::default(),
            root: Some(root.into()),
        }
    }

    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        Self {
            files: Arc::new(
                files
                    .into_iter()
                    .map(|(name, data)| {
                        let name: String = name.into();
                        (normalise(&name), VFile { data })
                    })
                    .collect(),
            ),
            root: None,
        }
    }

    /// Reads a whole file, from memory if registered, otherwise from disk.
    pub fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if let Some(file) = self.files.get(&normalise(&path.to_string_lossy())) {
            return Ok(file.data.clone());
        }

        let full = match &self.root {
            Some(root) => root.join(path),
            None => path.to_owned(),
        };

        fs::read(&full).map_err(|e| {
            log::error!("{:?} file not found", full);
            e
        })
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

fn normalise(path: &str) -> String {
    path.replace('\\', "/")
}
