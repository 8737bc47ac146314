//! Capacity-tracked storage reused across frames.
//!
//! Every per-frame collection in the effect is rebuilt from empty each frame,
//! but its backing slots are kept and overwritten in place. [`RetainedBuffer`]
//! tracks a logical length separately from the number of allocated slots:
//! anything past `len()` is logically absent, whatever value the slot still
//! holds from an earlier frame.

/// Growable buffer with a logical length and grow-only slot storage.
#[derive(Debug, Clone)]
pub struct RetainedBuffer<T> {
    slots: Vec<T>,
    len: usize,
}

impl<T> Default for RetainedBuffer<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }
}

impl<T> RetainedBuffer<T> {
    /// Create an empty buffer with no slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots. Never decreases.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Forget all live entries. Slots are kept for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Live entries as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    /// Live entries as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots[..self.len]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Append a value, overwriting a stale slot if one is available.
    pub fn push(&mut self, value: T) {
        if self.len < self.slots.len() {
            self.slots[self.len] = value;
        } else {
            self.slots.push(value);
        }
        self.len += 1;
    }

    /// Overwrite a live entry.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, value: T) {
        assert!(index < self.len, "index {} out of live range {}", index, self.len);
        self.slots[index] = value;
    }
}

impl<T: Default> RetainedBuffer<T> {
    /// Create a buffer with `capacity` default-initialized slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Self::new();
        buffer.reserve(capacity);
        buffer
    }

    /// Make sure at least `capacity` slots exist. Returns `true` if storage grew.
    pub fn reserve(&mut self, capacity: usize) -> bool {
        if capacity <= self.slots.len() {
            return false;
        }
        self.slots.resize_with(capacity, T::default);
        true
    }

    /// Extend the live range by one and hand out the (possibly stale) slot.
    ///
    /// The caller is responsible for resetting whatever state the slot
    /// carried from a previous frame. This is how nested retained buffers
    /// keep their inner allocations.
    pub fn next_slot(&mut self) -> &mut T {
        if self.len == self.slots.len() {
            self.slots.push(T::default());
        }
        self.len += 1;
        &mut self.slots[self.len - 1]
    }
}

impl<T: PartialEq> RetainedBuffer<T> {
    /// Linear membership test over the live entries.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.as_slice().contains(value)
    }
}

impl<T> std::ops::Index<usize> for RetainedBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<'a, T> IntoIterator for &'a RetainedBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_clear_keeps_slots() {
        let mut buf = RetainedBuffer::new();
        buf.push(1u32);
        buf.push(2);
        buf.push(3);
        assert_eq!(buf.as_slice(), &[1, 2, 3]);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 3);

        buf.push(9);
        assert_eq!(buf.as_slice(), &[9]);
        assert_eq!(buf.capacity(), 3);
    }

    #[test]
    fn test_stale_slots_are_not_visible() {
        let mut buf = RetainedBuffer::new();
        buf.push(7u32);
        buf.push(8);
        buf.clear();
        buf.push(1);

        assert!(!buf.contains(&8));
        assert_eq!(buf.get(1), None);
    }

    #[test]
    fn test_reserve_is_grow_only() {
        let mut buf: RetainedBuffer<u32> = RetainedBuffer::with_capacity(8);
        assert_eq!(buf.capacity(), 8);
        assert!(!buf.reserve(4));
        assert_eq!(buf.capacity(), 8);
        assert!(buf.reserve(16));
        assert_eq!(buf.capacity(), 16);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_next_slot_reuses_inner_allocation() {
        let mut outer: RetainedBuffer<Vec<u32>> = RetainedBuffer::new();
        outer.next_slot().extend([1, 2, 3, 4]);
        outer.clear();

        let slot = outer.next_slot();
        assert_eq!(slot.len(), 4, "slot is handed out stale");
        slot.clear();
        assert!(slot.capacity() >= 4);
        assert_eq!(outer.capacity(), 1);
    }

    #[test]
    fn test_set_overwrites_live_entry() {
        let mut buf = RetainedBuffer::new();
        buf.push(1u32);
        buf.set(0, 5);
        assert_eq!(buf[0], 5);
    }

    #[test]
    #[should_panic]
    fn test_set_past_len_panics() {
        let mut buf: RetainedBuffer<u32> = RetainedBuffer::with_capacity(4);
        buf.set(2, 1);
    }
}
