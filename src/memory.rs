use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::engine::{EngineError, conflict};
use crate::limits::{MAX_BOOKINGS_PER_DAY, MAX_NAME_LEN};
use crate::model::{Amenity, Availability, Booking};
use crate::store::{AmenityDirectory, BookingStore};

/// One amenity's bookings on one calendar day.
type DayKey = (Ulid, NaiveDate);
type SharedDay = Arc<RwLock<Vec<Booking>>>;

/// In-memory reference store.
///
/// `reserve` and `update` re-run the conflict rules under the day
/// bucket's write lock — the compare-and-reserve primitive. Concurrent
/// competitors for the same slot key serialize on the lock and at most
/// one wins.
pub struct MemoryStore {
    days: DashMap<DayKey, SharedDay>,
    /// Reverse lookup: booking id → day bucket.
    index: DashMap<Ulid, DayKey>,
    amenities: DashMap<Ulid, Amenity>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            days: DashMap::new(),
            index: DashMap::new(),
            amenities: DashMap::new(),
        }
    }

    /// Get or create the bucket for a day. Buckets are never removed;
    /// an emptied day stays as an empty Vec.
    fn day_bucket(&self, key: DayKey) -> SharedDay {
        self.days.entry(key).or_default().value().clone()
    }

    fn existing_bucket(&self, key: &DayKey) -> Option<SharedDay> {
        self.days.get(key).map(|e| e.value().clone())
    }

    // ── Amenity directory administration ─────────────────────

    pub fn add_amenity(&self, amenity: Amenity) -> Result<(), EngineError> {
        if amenity.name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("amenity name too long"));
        }
        self.amenities.insert(amenity.id, amenity);
        Ok(())
    }

    pub fn set_availability(
        &self,
        id: Ulid,
        availability: Availability,
    ) -> Result<(), EngineError> {
        match self.amenities.get_mut(&id) {
            Some(mut amenity) => {
                amenity.availability = availability;
                Ok(())
            }
            None => Err(EngineError::NotFound(id)),
        }
    }

    pub fn remove_amenity(&self, id: &Ulid) -> bool {
        self.amenities.remove(id).is_some()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_day(
        &self,
        amenity_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, EngineError> {
        let bucket = match self.existing_bucket(&(amenity_id, date)) {
            Some(b) => b,
            None => return Ok(Vec::new()),
        };
        Ok(bucket.read().await.clone())
    }

    async fn find_from(
        &self,
        amenity_id: Ulid,
        from: NaiveDate,
    ) -> Result<Vec<Booking>, EngineError> {
        // Snapshot the matching buckets first; never hold the map
        // iterator across an await.
        let buckets: Vec<SharedDay> = self
            .days
            .iter()
            .filter(|e| e.key().0 == amenity_id && e.key().1 >= from)
            .map(|e| e.value().clone())
            .collect();
        let mut out = Vec::new();
        for bucket in buckets {
            out.extend(bucket.read().await.iter().cloned());
        }
        out.sort_by_key(|b| (b.date, b.id));
        Ok(out)
    }

    async fn find_by_booker(&self, booked_by: Ulid) -> Result<Vec<Booking>, EngineError> {
        let buckets: Vec<SharedDay> = self.days.iter().map(|e| e.value().clone()).collect();
        let mut out = Vec::new();
        for bucket in buckets {
            out.extend(
                bucket
                    .read()
                    .await
                    .iter()
                    .filter(|b| b.booked_by == booked_by)
                    .cloned(),
            );
        }
        out.sort_by_key(|b| (b.date, b.id));
        Ok(out)
    }

    async fn get(&self, id: Ulid) -> Result<Option<Booking>, EngineError> {
        let key = match self.index.get(&id) {
            Some(e) => *e.value(),
            None => return Ok(None),
        };
        let bucket = match self.existing_bucket(&key) {
            Some(b) => b,
            None => return Ok(None),
        };
        let guard = bucket.read().await;
        Ok(guard.iter().find(|b| b.id == id).cloned())
    }

    async fn reserve(&self, booking: Booking) -> Result<Booking, EngineError> {
        let key = (booking.amenity_id, booking.date);
        let bucket = self.day_bucket(key);
        let mut guard = bucket.write().await;
        if guard.len() >= MAX_BOOKINGS_PER_DAY {
            return Err(EngineError::LimitExceeded("too many bookings for this day"));
        }
        // The caller's snapshot check may be stale by now; this run under
        // the write lock is the deciding one.
        conflict::check(&guard, &booking.kind).map_err(EngineError::Conflict)?;
        guard.push(booking.clone());
        self.index.insert(booking.id, key);
        Ok(booking)
    }

    async fn update(&self, id: Ulid, updated: Booking) -> Result<Booking, EngineError> {
        debug_assert_eq!(updated.id, id);
        let old_key = match self.index.get(&id) {
            Some(e) => *e.value(),
            None => return Err(EngineError::NotFound(id)),
        };
        let new_key = (updated.amenity_id, updated.date);

        if old_key == new_key {
            let bucket = self
                .existing_bucket(&old_key)
                .ok_or(EngineError::NotFound(id))?;
            let mut guard = bucket.write().await;
            let pos = guard
                .iter()
                .position(|b| b.id == id)
                .ok_or(EngineError::NotFound(id))?;
            let others: Vec<Booking> = guard.iter().filter(|b| b.id != id).cloned().collect();
            conflict::check(&others, &updated.kind).map_err(EngineError::Conflict)?;
            guard[pos] = updated.clone();
            return Ok(updated);
        }

        // Date move: take both bucket locks in key order so two crossing
        // moves cannot deadlock.
        let old_bucket = self
            .existing_bucket(&old_key)
            .ok_or(EngineError::NotFound(id))?;
        let new_bucket = self.day_bucket(new_key);
        let (mut old_guard, mut new_guard) = if old_key < new_key {
            let old = old_bucket.write().await;
            let new = new_bucket.write().await;
            (old, new)
        } else {
            let new = new_bucket.write().await;
            let old = old_bucket.write().await;
            (old, new)
        };
        let pos = old_guard
            .iter()
            .position(|b| b.id == id)
            .ok_or(EngineError::NotFound(id))?;
        if new_guard.len() >= MAX_BOOKINGS_PER_DAY {
            return Err(EngineError::LimitExceeded("too many bookings for this day"));
        }
        conflict::check(&new_guard, &updated.kind).map_err(EngineError::Conflict)?;
        old_guard.remove(pos);
        new_guard.push(updated.clone());
        self.index.insert(id, new_key);
        Ok(updated)
    }

    async fn delete(&self, id: Ulid) -> Result<bool, EngineError> {
        let key = match self.index.get(&id) {
            Some(e) => *e.value(),
            None => return Ok(false),
        };
        let bucket = match self.existing_bucket(&key) {
            Some(b) => b,
            None => return Ok(false),
        };
        let mut guard = bucket.write().await;
        match guard.iter().position(|b| b.id == id) {
            Some(pos) => {
                guard.remove(pos);
                self.index.remove(&id);
                Ok(true)
            }
            // A concurrent delete got here first.
            None => {
                self.index.remove(&id);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl AmenityDirectory for MemoryStore {
    async fn get(&self, id: Ulid) -> Result<Option<Amenity>, EngineError> {
        Ok(self.amenities.get(&id).map(|e| e.value().clone()))
    }
}
