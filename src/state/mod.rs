//! State Module - What the user sees and where they are
//!
//! - **UI mirror** - Displayed value and selection of form controls
//! - **Focus** - Focus changes and sequential navigation
//! - **Selection** - Word/line ranges, caret movement, mouse selection

pub mod focus;
pub mod selection;
pub mod ui;
