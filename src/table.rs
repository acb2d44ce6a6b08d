//! Open-addressing hash table keyed by borrowed names.
//!
//! Slots hold indices into `stations`, which keeps every unique entry in first-insertion order.
//! Probing is linear from `hash & (capacity - 1)` with wraparound, and the slot array doubles
//! once more than half of it is occupied.

/// Default slot count: holds 10k names without growing
pub const DEFAULT_CAPACITY: usize = 1 << 15;
/// Largest initial slot count; tables still grow past it as names arrive
pub const MAX_CAPACITY: usize = 1 << 24;

const EMPTY: u32 = u32::MAX;

/// Running min, sum, max and count for one name.
/// All measurements are fixed point, scaled by ten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Station<'a> {
    pub name: &'a [u8],
    pub hash: u32,
    pub count: u64,
    pub sum: i64,
    pub min: i32,
    pub max: i32,
}

impl<'a> Station<'a> {
    pub fn new(name: &'a [u8], hash: u32, measurement: i32) -> Self {
        Self {
            name,
            hash,
            count: 1,
            sum: measurement as i64,
            min: measurement,
            max: measurement,
        }
    }

    #[inline]
    pub fn add_measurement(&mut self, measurement: i32) {
        self.count += 1;
        self.sum += measurement as i64;
        self.min = self.min.min(measurement);
        self.max = self.max.max(measurement);
    }

    /// Folds another partial aggregate for the same name into this one.
    pub fn add_station(&mut self, other: &Station<'_>) {
        debug_assert_eq!(self.name, other.name);
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn min(&self) -> f64 {
        self.min as f64 / 10.
    }

    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.count as f64 / 10.
    }

    pub fn max(&self) -> f64 {
        self.max as f64 / 10.
    }
}

#[derive(Debug, Clone)]
pub struct StationTable<'a> {
    slots: Box<[u32]>,
    stations: Vec<Station<'a>>,
}

impl<'a> Default for StationTable<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> StationTable<'a> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` is clamped to `2..=MAX_CAPACITY` and rounded up to a power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = slot_count(capacity);
        Self {
            slots: vec![EMPTY; capacity].into_boxed_slice(),
            stations: Vec::with_capacity(capacity / 2),
        }
    }

    /// Number of unique names
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Slot count, always a power of two
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Unique entries in first-insertion order
    pub fn stations(&self) -> &[Station<'a>] {
        &self.stations
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns the slot holding `name`, or the empty slot where it would go, plus the index of
    /// its entry in `stations`.
    #[inline]
    fn probe(&self, hash: u32, name: &[u8]) -> (usize, Option<usize>) {
        let mask = self.mask();
        let mut slot = hash as usize & mask;
        loop {
            let idx = self.slots[slot];
            if idx == EMPTY {
                return (slot, None);
            }
            if self.stations[idx as usize].name == name {
                return (slot, Some(idx as usize));
            }
            slot = (slot + 1) & mask;
        }
    }

    /// Finds `name`. On a miss, the returned slot is where [StationTable::insert_at] should put it.
    pub fn lookup(&self, hash: u32, name: &[u8]) -> (usize, Option<&Station<'a>>) {
        let (slot, idx) = self.probe(hash, name);
        (slot, idx.map(|i| &self.stations[i]))
    }

    #[inline]
    pub fn lookup_mut(&mut self, hash: u32, name: &[u8]) -> (usize, Option<&mut Station<'a>>) {
        let (slot, idx) = self.probe(hash, name);
        (slot, idx.map(|i| &mut self.stations[i]))
    }

    /// Stores a new entry at `slot`, which must have just been returned empty by a lookup for
    /// `station.name`. Grows the table once it is more than half full.
    pub fn insert_at(&mut self, slot: usize, station: Station<'a>) {
        debug_assert_eq!(self.slots[slot], EMPTY, "insert_at on an occupied slot");
        self.slots[slot] = self.stations.len() as u32;
        self.stations.push(station);

        if self.stations.len() > self.slots.len() / 2 {
            self.grow();
        }
    }

    /// Replaces the stored entry for `station.name`. Returns false if the name is absent.
    pub fn update(&mut self, station: Station<'a>) -> bool {
        match self.lookup_mut(station.hash, station.name) {
            (_, Some(existing)) => {
                *existing = station;
                true
            }
            (_, None) => false,
        }
    }

    /// Doubles the slot array and re-places every entry.
    /// Names are already unique, so placement only needs the hash.
    #[cold]
    fn grow(&mut self) {
        let capacity = self.slots.len() * 2;
        let mask = capacity - 1;
        let mut slots = vec![EMPTY; capacity].into_boxed_slice();
        for (idx, station) in self.stations.iter().enumerate() {
            let mut slot = station.hash as usize & mask;
            while slots[slot] != EMPTY {
                slot = (slot + 1) & mask;
            }
            slots[slot] = idx as u32;
        }
        self.slots = slots;
        tracing::trace!(capacity, unique = self.stations.len(), "table grew");
    }

    /// Folds every entry of `other` into `self`. Names new to `self` are adopted as they are.
    pub fn combine(&mut self, other: StationTable<'a>) {
        for station in other.stations {
            match self.lookup_mut(station.hash, station.name) {
                (_, Some(existing)) => existing.add_station(&station),
                (slot, None) => self.insert_at(slot, station),
            }
        }
    }

    /// Consumes the table, returning its entries sorted bytewise by name.
    pub fn into_sorted(self) -> Vec<Station<'a>> {
        let mut stations = self.stations;
        stations.sort_by(|a, b| a.name.cmp(b.name));
        stations
    }
}

/// Initial slot count for a requested capacity.
pub fn slot_count(requested: usize) -> usize {
    requested.clamp(2, MAX_CAPACITY).next_power_of_two()
}
