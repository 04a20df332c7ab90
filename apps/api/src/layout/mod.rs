// Layout primitives for the PDF export: font metrics, colors and explicit page flow.
// Pure CPU work; callers run it inside tokio::task::spawn_blocking.

pub mod color;
pub mod font_metrics;
pub mod page_flow;

pub use color::{parse_accent_color, Rgb};
pub use font_metrics::Font;
pub use page_flow::{a4_page_config, Align, DrawOp, Page, PageConfig, PageFlow, Span};
