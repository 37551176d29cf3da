//! Table entry model and field validation
//!
//! An entry describes the holder of one paper ticket: their name and the
//! class (grade plus grade letter) they belong to, together with scan
//! bookkeeping. Entries are canonicalized by [`format_entry`] before they
//! become visible in a table.

use super::error::{TableError, TableResult};

/// Packs `OPTE` into a big-endian `u32`
pub const ENTRY_TAG: u32 = u32::from_be_bytes(*b"OPTE");

/// Lowest accepted grade
pub const GRADE_MIN: u8 = 9;
/// Highest accepted grade
pub const GRADE_MAX: u8 = 12;

/// Lowest accepted grade letter
pub const GRADE_ID_MIN: char = 'A';
/// Highest accepted grade letter
pub const GRADE_ID_MAX: char = 'F';

/// Bitset of per-entry flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFlags(u32);

impl EntryFlags {
    pub const NONE: EntryFlags = EntryFlags(0);
    /// The ticket is refused at the door
    pub const NOT_SCANNABLE: EntryFlags = EntryFlags(1 << 0);

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: EntryFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: EntryFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: EntryFlags) {
        self.0 &= !other.0;
    }
}

/// Scan bookkeeping attached to every entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub flags: EntryFlags,
    pub scan_count: u32,
    /// Local time of the last scan; empty when never scanned
    pub last_scan_date: String,
}

impl EntryMetadata {
    pub fn is_scannable(&self) -> bool {
        !self.flags.contains(EntryFlags::NOT_SCANNABLE)
    }

    pub fn was_scanned(&self) -> bool {
        !self.last_scan_date.is_empty()
    }
}

/// A single ticket holder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Must equal [`ENTRY_TAG`]; any other value means the entry is corrupted
    pub tag: u32,
    pub metadata: EntryMetadata,
    pub first_name: String,
    pub last_name: String,
    pub grade: u8,
    pub grade_id: char,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            tag: ENTRY_TAG,
            metadata: EntryMetadata::default(),
            first_name: String::new(),
            last_name: String::new(),
            grade: 0,
            grade_id: '\0',
        }
    }
}

impl Entry {
    /// Creates an unformatted entry with fresh metadata
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        grade: u8,
        grade_id: char,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            grade,
            grade_id,
            ..Self::default()
        }
    }

    pub fn is_corrupted(&self) -> bool {
        self.tag != ENTRY_TAG
    }

    /// Fails with [`TableError::CorruptedTableEntry`] if the tag is wrong
    pub fn check_corrupted(&self) -> TableResult<()> {
        self.check_corrupted_or(TableError::CorruptedTableEntry)
    }

    /// Fails with the given error if the tag is wrong
    pub(crate) fn check_corrupted_or(&self, error: TableError) -> TableResult<()> {
        if self.is_corrupted() {
            return Err(error);
        }
        Ok(())
    }

    /// Class label such as `9A`
    pub fn class(&self) -> String {
        format!("{}{}", self.grade, self.grade_id)
    }

    /// Returns true if both entries name the same person in the same class
    pub fn is_same_holder(&self, other: &Entry) -> bool {
        self.grade == other.grade
            && self.grade_id == other.grade_id
            && self.last_name == other.last_name
            && self.first_name == other.first_name
    }
}

fn is_separator(character: char) -> bool {
    character == ' ' || character == '-'
}

/// Canonicalizes a person name
///
/// `"  jean--paul "` becomes `"Jean-Paul"`: every word is capitalized,
/// runs of separators collapse to their first character and separators at
/// either end are dropped.
pub fn format_name(name: &str) -> TableResult<String> {
    let mut formatted = String::with_capacity(name.len());
    let mut pending_separator: Option<char> = None;

    for character in name.chars() {
        if is_separator(character) {
            if !formatted.is_empty() && pending_separator.is_none() {
                pending_separator = Some(character);
            }
            continue;
        }

        if !character.is_ascii_alphabetic() {
            return Err(TableError::InvalidString(name.to_string()));
        }

        let starts_word = formatted.is_empty() || pending_separator.is_some();
        if let Some(separator) = pending_separator.take() {
            formatted.push(separator);
        }

        if starts_word {
            formatted.push(character.to_ascii_uppercase());
        } else {
            formatted.push(character.to_ascii_lowercase());
        }
    }

    Ok(formatted)
}

/// Validates and canonicalizes an entry
///
/// Checks the corruption tag first, then the grade and grade letter, then
/// canonicalizes both names. The input is consumed and returned formatted.
pub fn format_entry(mut entry: Entry) -> TableResult<Entry> {
    entry.check_corrupted()?;

    if !(GRADE_MIN..=GRADE_MAX).contains(&entry.grade) {
        return Err(TableError::InvalidEntryField("grade must be between 9 and 12"));
    }

    entry.grade_id = entry.grade_id.to_ascii_uppercase();
    if !(GRADE_ID_MIN..=GRADE_ID_MAX).contains(&entry.grade_id) {
        return Err(TableError::InvalidEntryField("grade ID must be a letter between A and F"));
    }

    entry.first_name = format_name(&entry.first_name)?;
    entry.last_name = format_name(&entry.last_name)?;

    Ok(entry)
}
