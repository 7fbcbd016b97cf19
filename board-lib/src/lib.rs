//! # Effects Board Library
//!
//! Core of a grid-based audio trigger board: a configurable matrix of cells,
//! each optionally bound to a sound file and a per-language label. This crate
//! covers persisted configuration with schema migration, grid addressing and
//! resize, label resolution and the single-channel playback engine, tied
//! together by [`BoardController`].

pub mod assets;
pub mod board;
pub mod config;
pub mod grid;
pub mod language;
pub mod playback;
pub mod tools;

pub use board::{BoardController, BoardError, BoardSettings, CellView, Status};
