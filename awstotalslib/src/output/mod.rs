//! Output formatting: present reports as HTML.
//!
//! This module handles the fourth and final stage of the pipeline -
//! formatting report rows for display. It provides:
//!
//! - **NumberFormat**: locale separators, byte scaling
//! - **Labels**: AWStats language file messages with English fallback
//! - **HTML**: the period form, the sortable totals table, the full page
//!
//! Rendering is pure presentation - all filtering, merging and sorting
//! happens in the query stage.

pub mod format;
pub mod html;
pub mod lang;

pub use format::NumberFormat;
pub use html::{escape_html, render_form, render_page, render_table, PageContext};
pub use lang::Labels;
