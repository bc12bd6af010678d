//! A genetic-algorithm based cutting-stock optimizer for steel rebar
//! ("cartillas" of demanded pieces cut from commercial stock bars).
//!
//! The three main elements:
//! * The [data model](crate::model) (`Piece`, `Bar`, `Pattern`, `Chromosome`) — the search space
//! * [`fitness`] — the search goal (minimize waste, unmet demand, bar count; reward scrap reuse)
//! * The [`engine`] — the search strategy (a generational GA, with a [`homogeneous`]-case
//!   shortcut and a deterministic [`fallback`] packer)
//!
//! [`driver`] chains the engine across every `(diameter, execution_group)` sub-problem in a
//! cartilla, threading reusable off-cuts forward from earlier execution groups to later ones.
//!
//! ## Quick usage
//!
//! ```rust
//! use rebar_cutting_ga::config::GaConfig;
//! use rebar_cutting_ga::engine;
//! use rebar_cutting_ga::model::{BarPool, PieceDemand};
//! use rebar_cutting_ga::reporter::NullReporter;
//!
//! let demand = vec![
//!     PieceDemand::new("P001", 2.5, 3),
//!     PieceDemand::new("P002", 1.8, 2),
//! ];
//! let pool = BarPool::new(vec![6.0, 4.0, 8.0], vec![]);
//! let config = GaConfig::fast();
//! let mut reporter = NullReporter;
//!
//! let output = engine::run(&demand, &pool, &config, &mut reporter).unwrap();
//! assert!(rebar_cutting_ga::model::chromosome::completeness(&output.chromosome, &demand).is_complete());
//! ```
//!
//! For a full cartilla spanning many diameters and execution groups, see [`driver::run_cartilla`].

pub mod adapter;
pub mod config;
pub mod crossover;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod fallback;
pub mod fitness;
pub mod homogeneous;
pub mod init;
pub mod model;
pub mod mutate;
pub mod reporter;
pub mod select;
