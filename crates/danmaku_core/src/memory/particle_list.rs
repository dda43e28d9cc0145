//! # Particle List
//!
//! Fixed-capacity record store for objects that are spawned and retired in
//! bulk every frame.

/// A fixed-capacity slab of value records.
///
/// Live records are always packed into `slots[..len]`, oldest first. The
/// most recently inserted record is the *front*. Removal happens only inside
/// [`retain`](Self::retain), which compacts the slab in place while it walks
/// it, so one pass both visits and reaps.
///
/// Capacity is fixed at construction. Inserting into a full list fails and
/// leaves every existing record untouched; the list is not a ring buffer.
///
/// # Thread Safety
///
/// No internal locking. Use one list per thread or synchronize externally.
///
/// # Example
///
/// ```rust
/// use danmaku_core::ParticleList;
///
/// #[derive(Clone, Copy, Default)]
/// struct Spark { x: f32, life: u32 }
///
/// let mut list: ParticleList<Spark> = ParticleList::new(10_000);
///
/// // Insert - O(1), no heap allocation
/// if let Some(spark) = list.insert(Spark { x: 0.0, life: 3 }) {
///     spark.x = 4.0;
/// }
///
/// // Advance and reap in one pass
/// list.retain(|s| {
///     s.life -= 1;
///     s.life > 0
/// });
/// assert_eq!(list.len(), 1);
/// ```
#[derive(Clone)]
pub struct ParticleList<T> {
    /// The storage array. Only `slots[..len]` is live.
    slots: Box<[T]>,
    /// Number of live records.
    len: usize,
}

impl<T: Copy + Default> ParticleList<T> {
    /// Creates a new list with the specified capacity.
    ///
    /// All memory is pre-allocated upfront.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            slots: vec![T::default(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Copies `record` in as the new front.
    ///
    /// This is a **O(1)** operation with **zero heap allocations**.
    ///
    /// # Returns
    ///
    /// The stored record, or `None` if the list is full. The reference stays
    /// valid until the next `retain` or `clear`, which the borrow checker
    /// enforces.
    #[inline]
    pub fn insert(&mut self, record: T) -> Option<&mut T> {
        let slot = self.slots.get_mut(self.len)?;
        *slot = record;
        self.len += 1;
        Some(slot)
    }

    /// Visits every live record once, oldest first, and removes each record
    /// for which `keep` returns `false`.
    ///
    /// Removal compacts in place behind a write cursor, so records not yet
    /// visited are never skipped or visited twice, and survivors keep their
    /// relative order.
    ///
    /// # Returns
    ///
    /// The number of removed records.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&mut T) -> bool,
    {
        let live = self.len;
        let slots = &mut self.slots[..live];
        let mut write = 0;

        for read in 0..live {
            if keep(&mut slots[read]) {
                if write != read {
                    slots[write] = slots[read];
                }
                write += 1;
            }
        }

        self.len = write;
        live - write
    }
}

impl<T> ParticleList<T> {
    /// Removes all records. O(1); slots are overwritten on reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns the number of live records.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no record is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the fixed capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.len
    }

    /// Returns true if the next insert would fail.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// The most recently inserted record.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// The most recently inserted record, mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Live records, oldest first.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    /// Live records, oldest first, mutably. Cannot remove.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots[..self.len]
    }

    /// Iterates over live records, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a ParticleList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> std::fmt::Debug for ParticleList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleList")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .finish()
    }
}
