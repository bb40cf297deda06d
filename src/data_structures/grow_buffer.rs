//! A growable array that keeps its own length and capacity.
//!
//! The parser only ever appends. Capacity is tracked here and never read back
//! from the allocator: when an append would overflow, the capacity at least
//! doubles (or jumps straight to what is required, if that is more).

#[derive(Clone, Debug)]
pub struct GrowBuffer<T> {
    items: Vec<T>,
    len: usize,
    capacity: usize,
}

impl<T> Default for GrowBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowBuffer<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            len: 0,
            capacity: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            len: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Make room for `additional` more items.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len + additional;
        if required <= self.capacity {
            return;
        }
        let new_capacity = (self.capacity * 2).max(required);
        self.items.reserve_exact(new_capacity - self.len);
        self.capacity = new_capacity;
    }

    pub fn push(&mut self, item: T) {
        self.reserve(1);
        self.items.push(item);
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.as_slice().get(idx)
    }
}

impl<T: bytemuck::Pod> GrowBuffer<T> {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }
}
