use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument};

use super::{AddressBook, BookFormat, Person};
use crate::Result;

/// An on-disk key-value store of people, keyed by [`Person::key`].
///
/// Values are the JSON encoding of the person. The store is a [`sled`] database living in a
/// directory.
///
/// [`sled`]: https://docs.rs/sled/latest/sled/
#[derive(Debug, Clone)]
pub struct Shelf {
    db: sled::Db,
}

impl Shelf {
    /// opens the shelf at `path` and removes anything already stored in it
    #[instrument]
    pub fn create(path: &Path) -> Result<Self> {
        let db = open_db(path)?;
        db.clear()?;
        debug!("created empty shelf");
        Ok(Shelf { db })
    }

    /// opens the existing shelf at `path`
    ///
    /// # Errors
    /// returns an IO `NotFound` error if nothing exists at `path`
    #[instrument]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no shelf found at {:?}", path),
            )
            .into());
        }
        let db = open_db(path)?;
        debug!(len = db.len(), "opened shelf");
        Ok(Shelf { db })
    }

    /// stores `person` under its key, returning the person that was previously stored there
    pub fn insert(&self, person: &Person) -> Result<Option<Person>> {
        let value = serde_json::to_vec(person)?;
        match self.db.insert(person.key().as_bytes(), value)? {
            Some(old) => Ok(Some(serde_json::from_slice(&old)?)),
            None => Ok(None),
        }
    }

    /// looks up the person stored under `key`, e.g. `"Fred Jones"`
    pub fn get(&self, key: &str) -> Result<Option<Person>> {
        match self.db.get(key.as_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// number of people on the shelf
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// true if the shelf is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// every person on the shelf, ordered by key
    pub fn people(&self) -> Result<Vec<Person>> {
        let mut people = Vec::with_capacity(self.len());
        for value in self.db.iter().values() {
            people.push(serde_json::from_slice(&value?)?);
        }
        Ok(people)
    }

    /// makes sure everything written so far is on disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

// a dropped `Db` keeps its directory lock until sled's flusher thread lets go of it
const LOCK_RETRIES: u32 = 20;
const LOCK_BACKOFF: Duration = Duration::from_millis(10);

/// opens the sled database at `path`, retrying while another handle is still releasing the lock
fn open_db(path: &Path) -> Result<sled::Db> {
    let mut attempt = 0;
    loop {
        match sled::open(path) {
            Ok(db) => return Ok(db),
            Err(sled::Error::Io(e)) if is_lock_error(&e) && attempt < LOCK_RETRIES => {
                attempt += 1;
                debug!("shelf at {:?} is still locked, retry {} of {}", path, attempt, LOCK_RETRIES);
                thread::sleep(LOCK_BACKOFF * attempt);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn is_lock_error(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock || e.to_string().contains("could not acquire lock")
}

/// Persists a book by writing every person onto a [`Shelf`] at `path`.
///
/// Saving always starts from an empty shelf. Two people with the same name share a key, the last
/// one saved wins. Loading returns the people ordered by key.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShelfFormat;

impl BookFormat for ShelfFormat {
    fn name(&self) -> &'static str {
        "shelf"
    }

    fn save(&self, book: &AddressBook, path: &Path) -> Result<()> {
        let shelf = Shelf::create(path)?;
        for person in book.people() {
            if shelf.insert(person)?.is_some() {
                debug!("replaced existing entry for {}", person.key());
            }
        }
        shelf.flush()?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<AddressBook> {
        Ok(AddressBook::from(Shelf::open(path)?.people()?))
    }
}
