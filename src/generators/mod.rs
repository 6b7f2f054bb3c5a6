//! Mock data generators.
//!
//! Every public generator has an entropy-seeded entry point and a
//! `*_with_rng` variant for deterministic tests. Live and paper generations
//! never share an RNG.

pub mod dashboard;
pub mod news;
pub mod quant;
pub mod reference;
pub mod screener;
pub mod series;

pub use dashboard::{generate_dashboard, generate_dashboard_with_rng};
pub use news::generate_intelligence;
pub use quant::{generate_quant, generate_quant_with_rng};
pub use reference::{reference_asset, reference_rows, REFERENCE_ASSETS};
pub use screener::{screen, ScreenerFilter};
