//! Flowfields are a means of handling pathfinding for a crowd of actors.
//!
//! [Fixing Pathfinding Once and For All](https://web.archive.org/web/20150905073624/http://www.ai-blog.net/archives/000152.html)
//!
//! [jdxdev](https://www.jdxdev.com/blog/2020/05/03/flowfields/)
//!
//! [leifnode](https://leifnode.com/2013/12/flow-field-pathfinding/)
//!
//! The map is a single grid of cells, each either open or blocked, indexed
//! from the top-left corner with `y` growing downwards. Nothing here owns
//! the grid, every computation reads it through a [BlockedPredicate].
//!
//! Definitions:
//!
//! * Flow field - a dense map of the direction an actor on each cell should
//! move in and the weighted distance from that cell to the nearest target
//! * ROI - region of interest, a rectangle of the grid a computation is
//! restricted to so that per-tick work stays bounded on large maps
//! * Footprint - the rectangle occupied by a multi-cell actor and the header
//! cell anchoring it
//! * Composite passability - the header positions where a footprint fits,
//! used as the obstacle grid of a multi-cell actor
//! * Solution band - cells whose detour between a source and target is
//! within a slack of the optimum, the search space for route discovery
//! * Junction - a band cell with three or more band neighbours
//! * Corridor - a single-file chain of band cells between junctions
//!

pub mod config;
pub mod fields;
pub mod routes;
pub mod utilities;
