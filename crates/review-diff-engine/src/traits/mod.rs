//! Seams to the host application: data source and theme.

mod review_source;
mod theme_provider;

pub use review_source::{load_file_review, ReviewSource, ReviewTarget, SourceError};
pub use theme_provider::{DefaultTheme, ThemeProvider};
