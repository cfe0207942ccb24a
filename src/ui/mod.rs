//! User interface layer.
//!
//! The UI follows a declarative rendering model:
//!
//! ```text
//! App → compute_viewmodel → UIViewModel → render_to_string → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Plain-text screen renderer
//! - [`helpers`]: Shared rendering utilities (highlighting)

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::render_to_string;
pub use viewmodel::{
    BangDetail, BangView, DropdownInfo, HomeView, PageBody, RelatedLink, ResultRow, ResultsView,
    SearchBarInfo, SentinelInfo, SuggestionItem, TabInfo, UIViewModel,
};
