//! Tree emission: records, overlay boxes and diagram markup.
//!
//! ```text
//! EnclosureTree → TreeEmitter → EmitReport
//!                                  ├─ records   (text log)
//!                                  ├─ overlays  (boxes to draw)
//!                                  └─ diagram   (TikZ preamble + tree)
//! ```

pub mod diagram;
pub mod emitter;
pub mod overlay;
pub mod report;

pub use diagram::{DiagramMarkup, DiagramNode};
pub use emitter::TreeEmitter;
pub use overlay::{DisplayColor, OverlayBox};
pub use report::{EmitReport, RegionDescriptor};
