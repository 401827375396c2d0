//! Core library for the hacklab-hub command line application.
//!
//! The library powers a catalog browser for learning tools: it loads the static
//! category and tool documents, tracks per-tool progress, and derives the views
//! the command line paints. Responsibilities stay narrow: documents and entities
//! live in [`hacklab::hub::model`] and [`hacklab::hub::loader`], persisted progress
//! in [`hacklab::hub::progress`], the pure derivations in [`hacklab::hub::filter`],
//! [`hacklab::hub::dashboard`] and [`hacklab::hub::card`], and the event-driven
//! state in [`hacklab::hub::app`]. The [`hacklab::hub::manifest`] module regenerates
//! `tools.json` from repository READMEs.

pub mod hacklab;

pub use hacklab::hub::{
    HubError, Result, app, card, config, dashboard, error, filter, i18n, loader, manifest, model,
    progress, render, share,
};
