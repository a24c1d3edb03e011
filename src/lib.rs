//! A config-driven static site generator for Markdown page trees.
//!
//! One run walks a source directory of Markdown files, renders each through
//! a page template into a mirrored HTML tree, and copies a resource
//! directory alongside. Files whose paths match a configurable pattern are
//! posts: their title and summary are extracted from the parsed document
//! tree, an optional sidecar file supplies dates for an injected footer, and
//! all posts feed a generated `posts.html` listing page.
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.*` loading with defaults for every field |
//! | [`build`] | The render pipeline: parse, inspect, mutate, render, write |
//! | [`commands`] | Command entry points wiring config to the pipeline |

pub mod build;
pub mod commands;
pub mod config;
