//! Flat-file storage backend

use crate::config::{CollisionPolicy, OutputConfig};
use crate::storage::{PageRecord, ResourceRecord, Storage, StorageError, StorageResult};
use crate::url::{page_file_name, page_key};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default name of the resource address log inside the html directory
pub const IMAGE_LINKS_FILE_NAME: &str = "image_links.txt";

/// Owner recorded for the links log's name, never equal to a page key
const LINKS_LOG_OWNER: &str = "<image links log>";

/// Storage backed by two directories and an append-only text file
pub struct FileStorage {
    html_dir: PathBuf,
    image_dir: PathBuf,
    links_file: PathBuf,
    collision: CollisionPolicy,
    /// Page file names handed out in this run, mapped to the page key that owns them
    claimed_names: HashMap<String, String>,
}

impl FileStorage {
    /// Creates the output directories if needed
    pub fn new(config: &OutputConfig) -> StorageResult<Self> {
        let html_dir = PathBuf::from(&config.html_dir);
        let image_dir = PathBuf::from(&config.image_dir);
        let links_file = match &config.image_links_file {
            Some(path) => PathBuf::from(path),
            None => html_dir.join(IMAGE_LINKS_FILE_NAME),
        };

        create_dir(&html_dir)?;
        create_dir(&image_dir)?;
        if let Some(parent) = links_file.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir(parent)?;
            }
        }

        // Pages must never be written over the links log
        let mut claimed_names = HashMap::new();
        if links_file.parent() == Some(html_dir.as_path()) {
            if let Some(name) = links_file.file_name() {
                claimed_names.insert(
                    name.to_string_lossy().into_owned(),
                    LINKS_LOG_OWNER.to_string(),
                );
            }
        }

        Ok(Self {
            html_dir,
            image_dir,
            links_file,
            collision: config.collision,
            claimed_names,
        })
    }

    pub fn html_dir(&self) -> &Path {
        &self.html_dir
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn links_file(&self) -> &Path {
        &self.links_file
    }

    /// Picks the file name for a page, honoring the collision policy
    fn claim_page_name(&mut self, page: &PageRecord) -> String {
        let base = page_file_name(&page.url);
        let key = page_key(&page.url);

        let reserved = self
            .claimed_names
            .get(&base)
            .is_some_and(|owner| owner == LINKS_LOG_OWNER);
        if self.collision == CollisionPolicy::Overwrite && !reserved {
            return base;
        }

        let mut candidate = base.clone();
        let mut n = 1;
        loop {
            match self.claimed_names.get(&candidate) {
                None => {
                    self.claimed_names.insert(candidate.clone(), key);
                    return candidate;
                }
                Some(owner) if *owner == key => return candidate,
                Some(owner) => {
                    n += 1;
                    tracing::debug!(
                        "File name {} already holds {}, trying suffix {}",
                        candidate,
                        owner,
                        n
                    );
                    candidate = format!("{}-{}", base, n);
                }
            }
        }
    }

    fn append_links(&self, links: &[String]) -> StorageResult<()> {
        if links.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.links_file)
            .map_err(|source| StorageError::Write {
                path: self.links_file.clone(),
                source,
            })?;

        let mut block = links.join("\n");
        block.push('\n');
        file.write_all(block.as_bytes())
            .map_err(|source| StorageError::Write {
                path: self.links_file.clone(),
                source,
            })
    }
}

impl Storage for FileStorage {
    fn persist_page(&mut self, page: &PageRecord) -> StorageResult<PathBuf> {
        let name = self.claim_page_name(page);
        let path = self.html_dir.join(name);

        write_file(&path, page.markup.as_bytes())?;
        self.append_links(&page.resources)?;

        Ok(path)
    }

    fn resource_exists(&self, name: &str) -> bool {
        self.image_dir.join(name).exists()
    }

    fn persist_resource(&mut self, resource: &ResourceRecord) -> StorageResult<PathBuf> {
        let path = self.image_dir.join(&resource.name);
        write_file(&path, &resource.bytes)?;
        Ok(path)
    }
}

fn create_dir(path: &Path) -> StorageResult<()> {
    fs::create_dir_all(path).map_err(|source| StorageError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    fs::write(path, bytes).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
