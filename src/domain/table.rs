//! The ticket table
//!
//! An ordered store of [`Entry`] values keyed by [`TicketId`]. The table owns
//! a generation counter that is bumped by every ID generation, insertion and
//! replacement; a [`GeneratedTicketId`] is only accepted while the counter
//! still matches the value it was drawn at.
//!
//! Entries iterate in ascending ticket ID order. Returned entry references
//! are shared borrows, so any mutating call ends them.

use std::collections::BTreeMap;
use std::ops::{ControlFlow, RangeInclusive};

use chrono::Local;
use rand::Rng;

use super::entry::{format_entry, Entry, EntryFlags};
use super::error::{TableError, TableResult};
use super::id::{GeneratedTicketId, TicketId, TICKET_ID_MAX, TICKET_ID_MIN};

/// Generation value of a table that was never initialized
pub const INVALID_GENERATION: u64 = 0;

/// How many random draws to try before giving up on an unused ID
pub const ID_GENERATION_ATTEMPTS: u32 = 512;

/// Display name used when a table is created without one
pub const DEFAULT_TABLE_NAME: &str = "Octopus";

/// Format of `last_scan_date`, e.g. `7/3/2024-19:5:42`
const SCAN_DATE_FORMAT: &str = "%-d/%-m/%Y-%-H:%-M:%-S";

/// Ordered store of ticket entries
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    entries: BTreeMap<TicketId, Entry>,
    generation: u64,
}

/// Tickets of one class, sorted by `"Last First"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTickets {
    pub grade: u8,
    pub grade_id: char,
    pub tickets: Vec<(String, TicketId)>,
}

impl ClassTickets {
    pub fn label(&self) -> String {
        format!("{}{}", self.grade, self.grade_id)
    }
}

impl Table {
    /// Creates an empty table
    pub fn create_new() -> Self {
        Self::with_name(DEFAULT_TABLE_NAME)
    }

    /// Creates an empty table with the given display name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
            generation: INVALID_GENERATION + 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Current value of the generation counter
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, id: TicketId) -> bool {
        self.entries.contains_key(&id)
    }

    fn bump_generation(&mut self) -> TableResult<u64> {
        self.generation = self
            .generation
            .checked_add(1)
            .ok_or(TableError::IntegerOverflow)?;
        Ok(self.generation)
    }

    // =========================================================================
    // Identifier generation
    // =========================================================================

    /// Draws an unused ticket ID and bumps the generation
    pub fn generate_ticket_id(&mut self) -> TableResult<GeneratedTicketId> {
        self.draw_ticket_id(&mut rand::thread_rng(), TICKET_ID_MIN..=TICKET_ID_MAX)
    }

    fn draw_ticket_id<R: Rng>(&mut self, rng: &mut R, range: RangeInclusive<u64>) -> TableResult<GeneratedTicketId> {
        for _ in 0..ID_GENERATION_ATTEMPTS {
            let id = TicketId::new(rng.gen_range(range.clone()))?;
            if !self.entries.contains_key(&id) {
                let generation = self.bump_generation()?;
                return Ok(GeneratedTicketId::new(id, generation));
            }
        }

        Err(TableError::IdGenerationFailed)
    }

    /// Returns true if the table was mutated since `generated` was drawn
    pub fn has_expired(&self, generated: &GeneratedTicketId) -> TableResult<bool> {
        if !generated.id().is_valid() {
            return Err(TableError::IdInvalid);
        }
        Ok(generated.generation() != self.generation)
    }

    // =========================================================================
    // Duplicate detection
    // =========================================================================

    /// Returns true if a stored entry names the same holder in the same class
    ///
    /// The candidate is compared as given; callers format it first.
    pub fn is_duplicate(&self, candidate: &Entry) -> TableResult<bool> {
        self.find_duplicate(candidate, None).map(|found| found.is_some())
    }

    fn find_duplicate(&self, candidate: &Entry, skip: Option<TicketId>) -> TableResult<Option<TicketId>> {
        candidate.check_corrupted()?;

        for (id, existing) in &self.entries {
            existing.check_corrupted_or(TableError::CorruptedTable)?;
            if Some(*id) == skip {
                continue;
            }
            if existing.is_same_holder(candidate) {
                return Ok(Some(*id));
            }
        }

        Ok(None)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Inserts an entry under a caller-chosen ticket ID
    ///
    /// Nothing is modified unless every check passes.
    pub fn insert_entry_with_ticket_id(&mut self, id: TicketId, entry: Entry) -> TableResult<()> {
        entry.check_corrupted()?;

        if !id.is_valid() {
            return Err(TableError::IdInvalid);
        }
        if self.entries.contains_key(&id) {
            return Err(TableError::IdAlreadyExists(id));
        }

        let entry = format_entry(entry)?;
        if self.is_duplicate(&entry)? {
            return Err(TableError::EntryAlreadyExists);
        }

        self.bump_generation()?;
        self.entries.insert(id, entry);
        Ok(())
    }

    /// Inserts an entry under a generated ticket ID, failing with
    /// [`TableError::IdExpired`] if the table changed since generation
    pub fn insert_entry_with_generated_ticket_id(
        &mut self,
        generated: GeneratedTicketId,
        entry: Entry,
    ) -> TableResult<()> {
        if self.has_expired(&generated)? {
            return Err(TableError::IdExpired);
        }
        self.insert_entry_with_ticket_id(generated.id(), entry)
    }

    /// Generates a fresh ticket ID and inserts the entry under it
    pub fn insert_entry(&mut self, entry: Entry) -> TableResult<TicketId> {
        let generated = self.generate_ticket_id()?;
        self.insert_entry_with_generated_ticket_id(generated, entry)?;
        Ok(generated.id())
    }

    /// Replaces the holder details of an existing ticket
    ///
    /// The scan metadata of the existing entry is kept. Returns the
    /// previous entry.
    pub fn replace_entry(&mut self, id: TicketId, entry: Entry) -> TableResult<Entry> {
        let metadata = self.get_entry(id)?.metadata.clone();

        let mut entry = format_entry(entry)?;
        if self.find_duplicate(&entry, Some(id))?.is_some() {
            return Err(TableError::EntryAlreadyExists);
        }
        entry.metadata = metadata;

        self.bump_generation()?;
        let slot = self.entries.get_mut(&id).ok_or(TableError::IdNotFound(id))?;
        Ok(std::mem::replace(slot, entry))
    }

    /// Removes a ticket, returning its entry
    ///
    /// A corrupted entry is reported and left in place.
    pub fn remove_ticket(&mut self, id: TicketId) -> TableResult<Entry> {
        self.get_entry(id)?;
        self.entries.remove(&id).ok_or(TableError::IdNotFound(id))
    }

    /// Records a scan: stamps the local time and increments the scan count
    pub fn increment_ticket_scan_count(&mut self, id: TicketId) -> TableResult<()> {
        let entry = self.get_entry_mut(id)?;

        if !entry.metadata.is_scannable() {
            return Err(TableError::IdNotScannable(id));
        }

        let scan_count = entry
            .metadata
            .scan_count
            .checked_add(1)
            .ok_or(TableError::IntegerOverflow)?;

        entry.metadata.last_scan_date = Local::now().format(SCAN_DATE_FORMAT).to_string();
        entry.metadata.scan_count = scan_count;
        Ok(())
    }

    /// Marks a ticket as accepted or refused at the door
    pub fn set_ticket_scannable(&mut self, id: TicketId, scannable: bool) -> TableResult<()> {
        let entry = self.get_entry_mut(id)?;
        if scannable {
            entry.metadata.flags.remove(EntryFlags::NOT_SCANNABLE);
        } else {
            entry.metadata.flags.insert(EntryFlags::NOT_SCANNABLE);
        }
        Ok(())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn get_entry(&self, id: TicketId) -> TableResult<&Entry> {
        let entry = self.entries.get(&id).ok_or(TableError::IdNotFound(id))?;
        entry.check_corrupted()?;
        Ok(entry)
    }

    fn get_entry_mut(&mut self, id: TicketId) -> TableResult<&mut Entry> {
        let entry = self.entries.get_mut(&id).ok_or(TableError::IdNotFound(id))?;
        entry.check_corrupted()?;
        Ok(entry)
    }

    /// Returns the IDs of all entries with exactly these names
    pub fn find_ticket_id_by_name(&self, first_name: &str, last_name: &str) -> TableResult<Vec<TicketId>> {
        let mut ids = Vec::new();

        self.iterate_over_entries(|id, entry| {
            if entry.first_name == first_name && entry.last_name == last_name {
                ids.push(id);
            }
            Ok(ControlFlow::Continue(()))
        })?;

        Ok(ids)
    }

    /// Visits entries in ascending ticket ID order
    ///
    /// Stops early when the callback breaks. A corrupted entry aborts the
    /// whole walk with [`TableError::CorruptedTable`].
    pub fn iterate_over_entries<F>(&self, mut callback: F) -> TableResult<()>
    where
        F: FnMut(TicketId, &Entry) -> TableResult<ControlFlow<()>>,
    {
        for (id, entry) in &self.entries {
            entry.check_corrupted_or(TableError::CorruptedTable)?;
            if callback(*id, entry)?.is_break() {
                break;
            }
        }

        Ok(())
    }

    /// Groups tickets by class, in grade then letter order
    ///
    /// Classes without tickets are omitted.
    pub fn class_report(&self) -> TableResult<Vec<ClassTickets>> {
        // Keyed by name parts: "Mary Ann" + "Lee" and "Mary" + "Ann Lee" are different holders
        let mut classes: BTreeMap<(u8, char), BTreeMap<(String, String), TicketId>> = BTreeMap::new();

        self.iterate_over_entries(|id, entry| {
            classes
                .entry((entry.grade, entry.grade_id))
                .or_default()
                .insert((entry.last_name.clone(), entry.first_name.clone()), id);
            Ok(ControlFlow::Continue(()))
        })?;

        Ok(classes
            .into_iter()
            .map(|((grade, grade_id), tickets)| ClassTickets {
                grade,
                grade_id,
                tickets: tickets
                    .into_iter()
                    .map(|((last_name, first_name), id)| (format!("{} {}", last_name, first_name), id))
                    .collect(),
            })
            .collect())
    }

    #[cfg(test)]
    pub(crate) fn entry_slot_mut(&mut self, id: TicketId) -> Option<&mut Entry> {
        self.entries.get_mut(&id)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::create_new()
    }
}
