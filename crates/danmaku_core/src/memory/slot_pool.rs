//! # Slot Pool
//!
//! Fixed-capacity allocator for long-lived objects addressed by handle,
//! such as one particle pool per emitter.

/// Handle to an object stored in a [`SlotPool`].
///
/// Carries the slot's generation, so a handle kept after its object was
/// freed never aliases whatever reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    /// Index into the pool.
    index: u32,
    /// Generation of the slot when the handle was issued.
    generation: u32,
}

impl SlotHandle {
    /// Slot index, stable for the object's lifetime.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at allocation time.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// A slot in the pool.
struct Slot<T> {
    value: Option<T>,
    generation: u32,
}

/// A pool allocator with O(1) allocate and free.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread or wrap in a mutex.
pub struct SlotPool<T> {
    /// The storage array.
    slots: Box<[Slot<T>]>,
    /// Free list - indices of available slots.
    free_list: Vec<u32>,
    /// Number of allocated objects.
    allocated_count: usize,
}

impl<T> SlotPool<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or does not fit in `u32`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(u32::try_from(capacity).is_ok(), "Capacity must fit in u32");

        let slots: Vec<Slot<T>> = (0..capacity)
            .map(|_| Slot { value: None, generation: 0 })
            .collect();
        // Lowest index is handed out first.
        let mut free_list: Vec<u32> = (0u32..).take(capacity).collect();
        free_list.reverse();

        Self {
            slots: slots.into_boxed_slice(),
            free_list,
            allocated_count: 0,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of currently allocated objects.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.allocated_count
    }

    /// Returns true if nothing is allocated.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.allocated_count == 0
    }

    /// Stores `value` in a free slot.
    ///
    /// # Returns
    ///
    /// A handle to the object, or `None` if the pool is full.
    pub fn allocate(&mut self, value: T) -> Option<SlotHandle> {
        let index = self.free_list.pop()?;
        let slot = &mut self.slots[index as usize];

        slot.value = Some(value);
        self.allocated_count += 1;

        Some(SlotHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Frees the object behind `handle`.
    ///
    /// # Returns
    ///
    /// The freed object, or `None` if the handle is stale or invalid.
    pub fn free(&mut self, handle: SlotHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.allocated_count -= 1;

        Some(value)
    }

    /// Gets a reference to an allocated object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Gets a mutable reference to an allocated object.
    #[inline]
    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Iterates over allocated objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotHandle, &T)> {
        self.slots.iter().zip(0u32..).filter_map(|(slot, index)| {
            slot.value.as_ref().map(|v| {
                (
                    SlotHandle {
                        index,
                        generation: slot.generation,
                    },
                    v,
                )
            })
        })
    }

    /// Iterates mutably over allocated objects in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotHandle, &mut T)> {
        self.slots.iter_mut().zip(0u32..).filter_map(|(slot, index)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|v| (SlotHandle { index, generation }, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_allocate_free() {
        let mut pool: SlotPool<u32> = SlotPool::new(10);

        let h1 = pool.allocate(42).unwrap();
        assert_eq!(*pool.get(h1).unwrap(), 42);
        assert_eq!(pool.len(), 1);

        assert_eq!(pool.free(h1), Some(42));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_full() {
        let mut pool: SlotPool<u8> = SlotPool::new(2);

        assert!(pool.allocate(1).is_some());
        assert!(pool.allocate(2).is_some());
        assert!(pool.allocate(3).is_none());
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut pool: SlotPool<u32> = SlotPool::new(1);

        let h1 = pool.allocate(1).unwrap();
        pool.free(h1);

        let h2 = pool.allocate(2).unwrap();
        assert_eq!(h1.index(), h2.index());
        assert_ne!(h1.generation(), h2.generation());
        assert!(pool.get(h1).is_none());
        assert!(pool.free(h1).is_none());
        assert_eq!(*pool.get(h2).unwrap(), 2);
    }

    #[test]
    fn test_iter_skips_freed_slots() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        let a = pool.allocate(10).unwrap();
        let b = pool.allocate(20).unwrap();
        let c = pool.allocate(30).unwrap();
        pool.free(b);

        let live: Vec<(SlotHandle, u32)> = pool.iter().map(|(h, v)| (h, *v)).collect();
        assert_eq!(live, vec![(a, 10), (c, 30)]);
        assert_eq!(a.index(), 0);
        assert_eq!(c.index(), 2);
    }
}
