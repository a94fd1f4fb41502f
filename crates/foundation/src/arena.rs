use core::marker::PhantomData;

/// Typed index into an [`Arena`].
pub struct ArenaKey<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaKey<T> {
    fn new(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl<T> Clone for ArenaKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaKey<T> {}

impl<T> PartialEq for ArenaKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for ArenaKey<T> {}

impl<T> core::hash::Hash for ArenaKey<T> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> core::fmt::Debug for ArenaKey<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ArenaKey({})", self.index)
    }
}

/// Append-only arena. Items live until the arena itself is dropped, so keys
/// never dangle while the arena is alive.
#[derive(Debug)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, v: T) -> ArenaKey<T> {
        self.items.push(v);
        ArenaKey::new((self.items.len() - 1) as u32)
    }

    pub fn get(&self, key: ArenaKey<T>) -> Option<&T> {
        self.items.get(key.index as usize)
    }

    pub fn get_mut(&mut self, key: ArenaKey<T>) -> Option<&mut T> {
        self.items.get_mut(key.index as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (ArenaKey<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, v)| (ArenaKey::new(i as u32), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ArenaKey<T>, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (ArenaKey::new(i as u32), v))
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;

    #[test]
    fn alloc_and_lookup() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn iteration_follows_allocation_order() {
        let mut arena = Arena::new();
        arena.alloc(3);
        arena.alloc(1);
        arena.alloc(2);
        let values: Vec<_> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![3, 1, 2]);
    }
}
