//! Square-lattice geometry for the autoregressive scan.
//!
//! Sites are visited in boustrophedon (snake) order: row 0 left to right, then
//! even rows left to right and odd rows right to left. Each site reads two
//! already-visited neighbors: the preceding site in its row ("left", in scan
//! direction) and the site in the same column one row up ("top").
//!
//! ```text
//!   L = 3          scan index
//!   row 0:  →      0 1 2
//!   row 1:  ←      5 4 3
//!   row 2:  →      6 7 8
//! ```
//!
//! [`ScanOrder::last_site`] is the site the degenerate-state correction acts
//! on, so it is derived from the same traversal rather than stored separately.

/// A lattice site, `(row, col)` with `0 <= row, col < L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Site {
    pub row: usize,
    pub col: usize,
}

impl Site {
    pub const fn new(row: usize, col: usize) -> Self {
        Site { row, col }
    }
}

/// Context sites feeding the cell at one site; `None` means "use the sentinel".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub left: Option<Site>,
    pub top: Option<Site>,
}

/// Snake traversal of an `L x L` lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanOrder {
    size: usize,
}

impl ScanOrder {
    /// Scan order for an `size x size` lattice.
    ///
    /// # Panics
    ///
    /// If `size == 0`.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "lattice size must be at least 1");
        ScanOrder { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn n_sites(&self) -> usize {
        self.size * self.size
    }

    /// Site visited at scan step `j` of row `i`.
    fn site_at(&self, i: usize, j: usize) -> Site {
        if i % 2 == 1 {
            Site::new(i, self.size - 1 - j)
        } else {
            Site::new(i, j)
        }
    }

    /// All sites in visiting order.
    pub fn sites(&self) -> impl Iterator<Item = Site> + '_ {
        (0..self.size).flat_map(move |i| (0..self.size).map(move |j| self.site_at(i, j)))
    }

    /// The final site of the traversal.
    pub fn last_site(&self) -> Site {
        self.site_at(self.size - 1, self.size - 1)
    }

    /// Resolve the left and top context sites of `site`.
    pub fn resolve(&self, site: Site) -> Neighbors {
        let Site { row: i, col } = site;
        debug_assert!(i < self.size && col < self.size, "site {:?} off lattice", site);

        if i == 0 {
            // Top boundary: only the left neighbor, if any
            return Neighbors {
                left: (col > 0).then(|| Site::new(0, col - 1)),
                top: None,
            };
        }

        let top = Some(Site::new(i - 1, col));
        let left = if i % 2 == 0 {
            (col > 0).then(|| Site::new(i, col - 1))
        } else {
            // Right-to-left row: the preceding site sits one column to the right
            (col < self.size - 1).then(|| Site::new(i, col + 1))
        };

        Neighbors { left, top }
    }

    /// Row-major flat index of a site.
    pub fn flat_index(&self, site: Site) -> usize {
        site.row * self.size + site.col
    }
}

/// Dense per-site storage, written exactly once per site.
///
/// Backs the hidden-state grids and the per-site value/log-probability grids
/// of a single scan; later sites read arbitrary earlier entries.
#[derive(Debug, Clone)]
pub struct SiteArena<T> {
    order: ScanOrder,
    slots: Vec<Option<T>>,
}

impl<T> SiteArena<T> {
    pub fn new(order: ScanOrder) -> Self {
        let slots = (0..order.n_sites()).map(|_| None).collect();
        SiteArena { order, slots }
    }

    /// Store the entry for `site`.
    ///
    /// # Panics
    ///
    /// If `site` was already written during this pass.
    pub fn insert(&mut self, site: Site, value: T) {
        let idx = self.order.flat_index(site);
        assert!(
            self.slots[idx].is_none(),
            "site {:?} written twice in one pass",
            site
        );
        self.slots[idx] = Some(value);
    }

    pub fn get(&self, site: Site) -> Option<&T> {
        self.slots[self.order.flat_index(site)].as_ref()
    }

    /// Entry for a site the scan has already visited.
    ///
    /// # Panics
    ///
    /// If `site` has not been written yet.
    pub fn visited(&self, site: Site) -> &T {
        self.get(site)
            .unwrap_or_else(|| panic!("site {:?} read before it was visited", site))
    }

    /// Consume the arena, yielding entries in row-major order.
    ///
    /// Returns `None` if any site is missing.
    pub fn into_row_major(self) -> Option<Vec<T>> {
        self.slots.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_order_three() {
        let order = ScanOrder::new(3);
        let sites: Vec<(usize, usize)> = order.sites().map(|s| (s.row, s.col)).collect();
        assert_eq!(
            sites,
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 2),
                (1, 1),
                (1, 0),
                (2, 0),
                (2, 1),
                (2, 2)
            ]
        );
        assert_eq!(order.last_site(), Site::new(2, 2));
    }

    #[test]
    fn test_last_site_follows_row_parity() {
        assert_eq!(ScanOrder::new(1).last_site(), Site::new(0, 0));
        assert_eq!(ScanOrder::new(2).last_site(), Site::new(1, 0));
        assert_eq!(ScanOrder::new(4).last_site(), Site::new(3, 0));
        assert_eq!(ScanOrder::new(5).last_site(), Site::new(4, 4));
    }

    #[test]
    fn test_arena_write_once() {
        let order = ScanOrder::new(2);
        let mut arena = SiteArena::new(order);
        arena.insert(Site::new(0, 1), 7);
        assert_eq!(arena.get(Site::new(0, 1)), Some(&7));
        assert!(arena.get(Site::new(1, 1)).is_none());

        let result = std::panic::catch_unwind(move || {
            let mut arena = arena;
            arena.insert(Site::new(0, 1), 8);
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_arena_row_major() {
        let order = ScanOrder::new(2);
        let mut arena = SiteArena::new(order);
        for site in order.sites() {
            arena.insert(site, order.flat_index(site));
        }
        assert_eq!(arena.into_row_major(), Some(vec![0, 1, 2, 3]));
    }
}
