//! Three independent ways to persist an [`AddressBook`].
//!
//! - [`JsonFormat`] writes the book as structured JSON text
//! - [`LiteralFormat`] writes the book as a literal TOML document, one `[[person]]` table per entry
//! - [`ShelfFormat`] writes every person into an on-disk key-value [`Shelf`], keyed by full name
//!
//! None of these interact with the request runner.
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{FanoutError, Result};

mod json;
mod literal;
mod shelf;

pub use self::json::JsonFormat;
pub use self::literal::LiteralFormat;
pub use self::shelf::{Shelf, ShelfFormat};

/// A single address book record.
///
/// `first_name` and `last_name` are required, any other fields (phone, email, zip...) are kept
/// as-is, whatever their JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// given name
    pub first_name: String,
    /// family name
    pub last_name: String,
    // never holds `first_name` or `last_name`, they would be written twice
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl Person {
    /// a person with no fields besides their name
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Person {
            first_name: first_name.into(),
            last_name: last_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// adds (or replaces) an extra field.
    ///
    /// `first_name` and `last_name` are not extra fields, setting them here is ignored
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if Person::is_reserved(&name) {
            warn!("ignoring extra field named {:?} on {}", name, self.key());
            return self;
        }
        self.fields.insert(name, value.into());
        self
    }

    /// the extra field called `name`
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// every extra field, ordered by name
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// a copy of this person without the fields that are `null`
    fn without_nulls(&self) -> Person {
        let mut person = self.clone();
        person.fields.retain(|_, value| !value.is_null());
        person
    }

    fn is_reserved(name: &str) -> bool {
        name == "first_name" || name == "last_name"
    }

    /// the key this person is stored under in a [`Shelf`]: `"<first_name> <last_name>"`
    pub fn key(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An ordered list of [`Person`] records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    people: Vec<Person>,
}

impl AddressBook {
    /// an empty book
    pub fn new() -> Self {
        AddressBook::default()
    }

    /// the two-person book used by the `addrbook` demo
    pub fn sample() -> Self {
        AddressBook::from(vec![
            Person::new("Chris", "Barker")
                .with_field("street", "123 Fake St")
                .with_field("city", "Seattle")
                .with_field("state", "WA")
                .with_field("zip", "98123")
                .with_field("email", "PythonCHB@gmail.com")
                .with_field("cell_phone", "206-555-1234"),
            Person::new("Fred", "Jones")
                .with_field("street", "1234 Alan Turing Way")
                .with_field("city", "Redmond")
                .with_field("state", "WA")
                .with_field("zip", "98052")
                .with_field("email", "FredJones@some_company.com")
                .with_field("office_phone", "425-555-2345"),
        ])
    }

    /// reads a book from a JSON source file, e.g. one written by [`JsonFormat`]
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// the people in the book, in order
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// appends a person
    pub fn push(&mut self, person: Person) {
        self.people.push(person);
    }

    /// number of people
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// true if there is nobody in the book
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl From<Vec<Person>> for AddressBook {
    fn from(people: Vec<Person>) -> Self {
        AddressBook { people }
    }
}

impl fmt::Display for AddressBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for person in &self.people {
            write!(f, "{}", person.key())?;
            for (name, value) in person.fields() {
                match value {
                    Value::String(text) => write!(f, "\n    {}: {}", name, text)?,
                    other => write!(f, "\n    {}: {}", name, other)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A way of writing an [`AddressBook`] to `path` and reading it back
pub trait BookFormat {
    /// short name of the format, as accepted by [`FormatKind::from_str`]
    fn name(&self) -> &'static str;

    /// writes `book` to `path`, replacing anything that was there
    fn save(&self, book: &AddressBook, path: &Path) -> Result<()>;

    /// reads a book previously written to `path`
    ///
    /// # Errors
    /// returns an error if `path` can't be read, or if a record is missing a required field
    fn load(&self, path: &Path) -> Result<AddressBook>;
}

/// The available [`BookFormat`]s
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormatKind {
    /// [`JsonFormat`]
    Json,
    /// [`LiteralFormat`]
    Literal,
    /// [`ShelfFormat`]
    Shelf,
}

impl FormatKind {
    /// the names accepted by [`FormatKind::from_str`]
    pub const NAMES: [&'static str; 3] = ["json", "literal", "shelf"];

    /// the format implementation for this kind
    pub fn format(self) -> Box<dyn BookFormat> {
        match self {
            FormatKind::Json => Box::new(JsonFormat),
            FormatKind::Literal => Box::new(LiteralFormat),
            FormatKind::Shelf => Box::new(ShelfFormat),
        }
    }
}

impl FromStr for FormatKind {
    type Err = FanoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(FormatKind::Json),
            "literal" => Ok(FormatKind::Literal),
            "shelf" => Ok(FormatKind::Shelf),
            other => Err(FanoutError::Parsing(format!("unknown book format: {}", other))),
        }
    }
}
