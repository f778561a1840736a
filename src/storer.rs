use bytes::Bytes;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use uuid::Uuid;

use crate::error::Error;

pub trait FileStorer {
    fn write(&self, bytes: Bytes) -> Result<String, Error>;
    fn read(&self, fetch_code: &str) -> Result<Bytes, Error>;
}

pub struct LocalStorer {
    path: String,
}

impl LocalStorer {
    pub fn new(path: &str) -> Self {
        Self { path: path.to_owned() }
    }
}

impl FileStorer for LocalStorer {
    fn write(&self, bytes: Bytes) -> Result<String, Error> {
        let name = Uuid::new_v4().to_string();
        let mut file = File::create(Path::new(&self.path).join(&name))?;
        file.write_all(&bytes)?;
        Ok(name)
    }

    fn read(&self, fetch_code: &str) -> Result<Bytes, Error> {
        let mut file = File::open(Path::new(&self.path).join(fetch_code))?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(Bytes::from(content))
    }
}
