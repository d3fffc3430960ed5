//! # Tourganizer Engine
//!
//! A pairing and standings engine for debate tournaments.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (tournaments, teams, pairings, rounds)
//! - **draw**: Round generation: power-pairing, brackets, adjudicator allocation
//! - **calculate**: Standings computation from recorded results
//! - **validate**: Command validation against tournament state
//! - **engine**: Serialized command surface tying the layers together
//! - **storage**: Filesystem persistence (JSON + JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod draw;
pub mod engine;
pub mod models;
pub mod storage;
pub mod validate;

pub use models::*;
