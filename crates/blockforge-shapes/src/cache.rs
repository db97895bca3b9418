use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use blockforge_geom::Direction;
use hashbrown::HashMap;

use crate::ops::rotated;
use crate::shape::Shape;

/// Identity of a caller's shape handle: the address of its allocation.
/// Equal shapes behind different `Arc`s are different keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct ShapeKey(usize);

impl ShapeKey {
    #[inline]
    fn of(shape: &Arc<Shape>) -> Self {
        ShapeKey(Arc::as_ptr(shape) as usize)
    }
}

struct CachedRotation {
    // Held so the keyed allocation cannot be freed and its address reused.
    source: Arc<Shape>,
    // Filled outside the map lock by whichever caller gets there first.
    rotated: OnceLock<Arc<Shape>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RotationCacheStats {
    pub hits: u64,
    pub computed: u64,
    pub entries: usize,
}

/// Memoized rotations: facing → (shape instance → rotated shape).
///
/// Entries are never evicted. Each key is computed at most once: a miss
/// reserves the key's slot under the facing's write lock, then fills it with
/// the lock released, so misses on other shapes are not held up.
pub struct RotationCache {
    facings: [RwLock<HashMap<ShapeKey, Arc<CachedRotation>>>; 6],
    hits: AtomicU64,
    computed: AtomicU64,
}

impl Default for RotationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationCache {
    pub fn new() -> Self {
        Self {
            facings: std::array::from_fn(|_| RwLock::new(HashMap::new())),
            hits: AtomicU64::new(0),
            computed: AtomicU64::new(0),
        }
    }

    /// The process-wide cache behind [`crate::rotate_shape`].
    pub fn global() -> &'static RotationCache {
        static GLOBAL: OnceLock<RotationCache> = OnceLock::new();
        GLOBAL.get_or_init(RotationCache::new)
    }

    pub fn rotate(&self, shape: &Arc<Shape>, facing: Direction) -> Arc<Shape> {
        if facing == Direction::Down {
            return Arc::clone(shape);
        }
        if let Some(hit) = self.cached(shape, facing) {
            return hit;
        }
        let key = ShapeKey::of(shape);
        let slot = {
            let mut entries = self.facings[facing.index()]
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key).or_insert_with(|| {
                Arc::new(CachedRotation {
                    source: Arc::clone(shape),
                    rotated: OnceLock::new(),
                })
            }))
        };
        let mut computed_here = false;
        let out = slot.rotated.get_or_init(|| {
            computed_here = true;
            let out = Arc::new(rotated(shape, facing));
            self.computed.fetch_add(1, Ordering::Relaxed);
            log::debug!(
                target: "shapes",
                "cached rotation {:#x} -> {facing}: {} box(es)",
                key.0,
                out.to_boxes().len()
            );
            out
        });
        if !computed_here {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Arc::clone(out)
    }

    /// Cached rotation of this exact instance, if one exists. Counts as a hit.
    pub fn cached(&self, shape: &Arc<Shape>, facing: Direction) -> Option<Arc<Shape>> {
        let entries = self.facings[facing.index()]
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&ShapeKey::of(shape))?;
        debug_assert!(Arc::ptr_eq(&entry.source, shape));
        let rotated = Arc::clone(entry.rotated.get()?);
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(rotated)
    }

    pub fn len(&self) -> usize {
        self.facings
            .iter()
            .map(|slot| slot.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> RotationCacheStats {
        RotationCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            computed: self.computed.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
