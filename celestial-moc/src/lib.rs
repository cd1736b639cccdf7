//! Range-based coverage indexes over HEALPix cells.
//!
//! A [`RangeMocIndex`] is a set of nested cell ids at a single depth,
//! stored as sorted half-open intervals. Memory grows with the number of
//! runs, not the number of cells, so a whole-sphere index at depth 29 is
//! sixteen bytes.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`index`] | Construction, zone coverage, accessors, set algebra, internal boundary |
//! | [`select`] | Positional (`isel`) and label (`sel`) selection |
//! | [`slice`] | [`Slice`] and its resolved form [`ConcreteSlice`] |
//! | [`codec`] | Binary encoding, streams and files |
//! | [`error`] | [`MocError`] and [`MocResult`] |
//!
//! # Example
//!
//! ```
//! use celestial_moc::{RangeMocIndex, Slice};
//!
//! let a = RangeMocIndex::from_cell_ids(1, [1, 2, 3, 4, 21, 22]).unwrap();
//! let b = RangeMocIndex::from_cell_ids(1, [23, 25, 26]).unwrap();
//! let both = a.union(&b).unwrap();
//! assert_eq!(both.n_intervals(), 3);
//!
//! let (positions, picked) = both.sel(Slice::range(3, 21), 1).unwrap();
//! assert_eq!(picked.cell_ids(), vec![3, 4, 21]);
//! assert_eq!(positions.positions(), vec![2, 3, 4]);
//! ```

pub mod codec;
pub mod error;
pub mod index;
pub mod select;
pub mod slice;

pub use error::{MocError, MocResult};
pub use index::RangeMocIndex;
pub use select::{Indexer, LabelIndexer, SelIndexer};
pub use slice::{ConcreteSlice, Slice};
