use std::collections::HashMap;

use foundation::arena::{Arena, ArenaKey};

use crate::region::Region;

pub type RegionKey = ArenaKey<Region>;

/// Counters gathered while building a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub features_seen: usize,
    pub features_skipped: usize,
    pub degenerate_rings: usize,
    pub fills: usize,
    pub fallback_discs: usize,
}

/// Sole owner of every [`Region`].
///
/// Regions are only created by the builder and only destroyed by dropping the
/// registry; everything else holds [`RegionKey`]s.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    regions: Arena<Region>,
    by_id: HashMap<String, RegionKey>,
    children: HashMap<String, Vec<RegionKey>>,
    stats: BuildStats,
}

impl RegionRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts `region` unless its id is taken. Returns the key on success.
    pub(crate) fn insert(&mut self, region: Region) -> Option<RegionKey> {
        if self.by_id.contains_key(&region.id) {
            return None;
        }
        let id = region.id.clone();
        let key = self.regions.alloc(region);
        self.by_id.insert(id, key);
        Some(key)
    }

    pub(crate) fn add_child(&mut self, parent: &str, child: RegionKey) {
        self.children.entry(parent.to_string()).or_default().push(child);
    }

    pub(crate) fn stats_mut(&mut self) -> &mut BuildStats {
        &mut self.stats
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (RegionKey, &mut Region)> {
        self.regions.iter_mut()
    }

    pub(crate) fn get_mut(&mut self, key: RegionKey) -> Option<&mut Region> {
        self.regions.get_mut(key)
    }

    pub fn get(&self, key: RegionKey) -> Option<&Region> {
        self.regions.get(key)
    }

    pub fn key_of(&self, id: &str) -> Option<RegionKey> {
        self.by_id.get(id).copied()
    }

    pub fn by_id(&self, id: &str) -> Option<&Region> {
        self.key_of(id).and_then(|k| self.regions.get(k))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Subdivisions registered under `parent`, in build order.
    pub fn subdivisions_of(&self, parent: &str) -> &[RegionKey] {
        self.children.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionKey, &Region)> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn visited_count(&self) -> usize {
        self.regions.iter().filter(|(_, r)| r.visited).count()
    }

    /// Number of line strips plus fill meshes, i.e. GPU buffers once uploaded.
    pub fn primitive_count(&self) -> usize {
        self.regions
            .iter()
            .map(|(_, r)| r.boundaries.len() + usize::from(r.fill.is_some()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::RegionRegistry;
    use crate::region::{LayerKind, Region};
    use foundation::bounds::Aabb3;
    use foundation::math::Vec3;

    fn region(id: &str) -> Region {
        Region {
            id: id.to_string(),
            layer: LayerKind::Base,
            visited: false,
            radius: 1.0,
            polygons: Vec::new(),
            bounds: Aabb3::empty(),
            centroid: Vec3::ZERO,
            boundaries: Vec::new(),
            fill: None,
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut reg = RegionRegistry::new();
        assert!(reg.insert(region("a")).is_some());
        assert!(reg.insert(region("a")).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn children_lookup() {
        let mut reg = RegionRegistry::new();
        let k = reg.insert(region("p-c")).expect("insert");
        reg.add_child("p", k);
        assert_eq!(reg.subdivisions_of("p"), &[k]);
        assert!(reg.subdivisions_of("q").is_empty());
        assert_eq!(reg.by_id("p-c").map(|r| r.id.as_str()), Some("p-c"));
    }
}
