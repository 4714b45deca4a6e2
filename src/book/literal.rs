use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AddressBook, BookFormat, Person};
use crate::Result;

/// Persists a book as a literal TOML document:
///
/// ```toml
/// [[person]]
/// first_name = "Chris"
/// last_name = "Barker"
/// city = "Seattle"
/// zip = 98123
/// ```
///
/// TOML has no `null`, so extra fields holding `null` are left out of the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralFormat;

// a TOML document must be a table at the top level, so the people live under `person`
#[derive(Serialize, Deserialize)]
struct LiteralDoc {
    #[serde(default)]
    person: Vec<Person>,
}

impl BookFormat for LiteralFormat {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn save(&self, book: &AddressBook, path: &Path) -> Result<()> {
        let doc = LiteralDoc {
            person: book.people().iter().map(Person::without_nulls).collect(),
        };
        fs::write(path, toml::to_string(&doc)?)?;
        debug!("wrote {} people to {:?}", book.len(), path);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<AddressBook> {
        let doc: LiteralDoc = toml::from_str(&fs::read_to_string(path)?)?;
        debug!("read {} people from {:?}", doc.person.len(), path);
        Ok(AddressBook::from(doc.person))
    }
}
