#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod bar;
pub mod errors;
pub mod geometry;
pub mod mass;
pub mod model;
pub mod node;
pub mod session;
pub mod snapshot;
pub mod structure;
pub mod topology;

pub use bar::{Bar, USE_CURRENT_LENGTH};
pub use errors::{EditError, InputError, InputList, StepError, TopologyError};
pub use geometry::{line, point, Line, Point, TriangleMesh};
pub use mass::MassStrategy;
pub use model::{ModelInput, PointLoad};
pub use node::{Node, NodeKind, RollerMode};
pub use session::{Session, Tick};
pub use snapshot::{Advisory, Snapshot};
pub use structure::{StepParameters, Structure};
pub use topology::{nearest_node, snap_segments, SnappedSegment};
