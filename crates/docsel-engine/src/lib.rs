//! docsel-engine
//!
//! Document aggregation and selection state for retrieval results: folds
//! scored citations into unique documents, tracks user selections across
//! searches, counts documents per type and orders the rendered view.
pub mod aggregate;
pub mod ledger;
pub mod prompt;
pub mod session;
pub mod state;
pub mod type_counter;
pub mod view;

pub use aggregate::{aggregate, DocumentMap};
pub use ledger::{current_selections, SelectionLedger};
pub use session::{Session, SessionView};
pub use state::{reduce, GenerationStatus, RequestId, SearchState, SessionEvent};
pub use type_counter::{count_types, TypeState};
pub use view::{compute_visible, VisibleDocuments};
