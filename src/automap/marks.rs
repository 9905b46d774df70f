//! Fixed-capacity ring used for mark points and queued messages.

/// What `push` does once every slot is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Reuse the slot after the newest one (oldest entry goes).
    Overwrite,
    /// Refuse the new item.
    Drop,
}

#[derive(Clone, Debug)]
pub struct RingBuffer<T, const N: usize> {
    slots: [Option<T>; N],
    /// Slot the next push lands in.
    head: usize,
    len: usize,
    policy: OverflowPolicy,
}

impl<T, const N: usize> RingBuffer<T, N> {
    pub fn new(policy: OverflowPolicy) -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            head: 0,
            len: 0,
            policy,
        }
    }

    /// Store `item` and return its slot, or hand it back if the ring is
    /// full and the policy is [`OverflowPolicy::Drop`].
    pub fn push(&mut self, item: T) -> Result<usize, T> {
        if N == 0 {
            return Err(item);
        }
        if self.len == N && self.policy == OverflowPolicy::Drop {
            return Err(item);
        }
        let slot = self.head;
        self.slots[slot] = Some(item);
        self.head = (self.head + 1) % N;
        self.len = (self.len + 1).min(N);
        Ok(slot)
    }

    /// Oldest entry.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let tail = (self.head + N - self.len) % N;
        self.len -= 1;
        self.slots[tail].take()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.head = 0;
        self.len = 0;
    }

    /// Slot the next push would use.
    #[inline]
    pub fn next_slot(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Occupied slots with their index, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }
}
