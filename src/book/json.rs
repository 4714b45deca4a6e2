use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::{AddressBook, BookFormat};
use crate::Result;

/// Persists a book as pretty printed JSON text
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

impl BookFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn save(&self, book: &AddressBook, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, book)?;
        writer.flush()?;
        debug!("wrote {} people to {:?}", book.len(), path);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<AddressBook> {
        let reader = BufReader::new(File::open(path)?);
        let book: AddressBook = serde_json::from_reader(reader)?;
        debug!("read {} people from {:?}", book.len(), path);
        Ok(book)
    }
}
