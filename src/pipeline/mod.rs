//! The page pipeline: front matter → markdown → templates → output.
//!
//! # Build Flow
//!
//! ```text
//! scan()  ───────────────► SourceFile[] + SiteData (demo list complete)
//!    │
//!    ▼  per file, sequential
//! markdown ──► inline template ──► layout template ──► pretty URL ──► minify ──► write
//! ```
//!
//! The scan phase must finish before any file is rendered: templates may
//! enumerate the site-wide demo list, so the extractor collects every
//! file first and only then hands them downstream.

pub mod front_matter;
pub mod markdown;
pub mod pages;
pub mod template;
