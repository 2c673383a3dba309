// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Trajectory playback for reaction-network graph widgets.
//!
//! A simulation produces, for every time point, a color, width and tooltip
//! value per edge and a pie fraction per node. This crate plays that
//! trajectory back as a sequence of eased style transitions on a graph
//! scene, with a play/pause/reset/scrub transport and a selector for the
//! simulation run and process being shown.
//!
//! # Key entry points
//!
//! - [`playback::Scheduler`] - the playback state machine
//! - [`scene::Scene`] - the renderer capability the scheduler drives
//! - [`trajectory::TrajectoryStore`] - loads and validates trajectories
//! - [`options::Options`] - timing, easing and readout formatting
//!
//! # Architecture
//!
//! Everything runs on the host's UI thread. The scheduler starts
//! fire-and-forget transitions on the scene and is called back with a
//! [`scene::TransitionTicket`] whenever one finishes. A style-less pacing
//! clock decides when a frame is committed, so elements that are hidden or
//! slow never hold playback back, and generation tokens make callbacks
//! from an interrupted pass harmless.
//!
//! [`scene::MemoryScene`] is a headless scene with explicit time, used by
//! the tests and by the `vipr-player` binary.

pub mod animation;
pub mod error;
pub mod options;
pub mod playback;
pub mod scene;
pub mod style;
pub mod trajectory;
