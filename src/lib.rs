pub mod caret;
pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod logging;
pub mod outline;
pub mod render;
pub mod store;
pub mod surface;
pub mod theme;

pub use caret::{CaretGeometry, CaretTranslator, CursorLocus, EditingSurface, Motion};
pub use error::{ConfigError, DocumentError, OutlineError, OutlineResult};
pub use layout::{HardBreaks, LineLayout, SoftWrap, VisualLine};
pub use outline::{Block, BlockId, BlockRecord, Outline};
pub use store::{CommandOutcome, OutlineStore};
